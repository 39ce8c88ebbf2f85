use crate::Result;
use crate::dom::{Dom, NodeId};

pub(crate) const REVEAL_TARGETS: &str = ".section-title, .event-card, .ticket-card, .info-item";

/// Elements that fade in once they scroll into view.
#[derive(Debug, Clone, Default)]
pub(crate) struct ScrollReveal {
    targets: Vec<NodeId>,
}

impl ScrollReveal {
    /// Collects the targets and puts them in their hidden starting pose.
    pub(crate) fn bind(dom: &mut Dom) -> Result<Self> {
        let targets = dom.query_selector_all(REVEAL_TARGETS)?;
        for target in &targets {
            dom.style_set(*target, "opacity", "0")?;
            dom.style_set(*target, "transform", "translateY(20px)")?;
            dom.style_set(*target, "transition", "all 0.6s ease-out")?;
        }
        Ok(Self { targets })
    }

    pub(crate) fn targets(&self) -> &[NodeId] {
        &self.targets
    }

    pub(crate) fn reveal(&self, dom: &mut Dom, target: NodeId) -> Result<bool> {
        if !self.targets.contains(&target) {
            return Ok(false);
        }
        dom.class_add(target, "visible")?;
        dom.style_set(target, "opacity", "1")?;
        dom.style_set(target, "transform", "translateY(0)")?;
        Ok(true)
    }
}
