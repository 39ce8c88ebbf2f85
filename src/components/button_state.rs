use crate::Result;
use crate::dom::{Dom, NodeId};

/// A button's markup and disabled flag from before it entered a loading
/// state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ButtonSnapshot {
    node: NodeId,
    inner_html: String,
    disabled: bool,
}

impl ButtonSnapshot {
    pub(crate) fn capture(dom: &Dom, node: NodeId) -> Result<Self> {
        Ok(Self {
            node,
            inner_html: dom.inner_html(node)?,
            disabled: dom.disabled(node),
        })
    }

    /// Captures the button, then swaps in `loading_html` and disables it.
    pub(crate) fn enter_loading(dom: &mut Dom, node: NodeId, loading_html: &str) -> Result<Self> {
        let snapshot = Self::capture(dom, node)?;
        dom.set_inner_html(node, loading_html)?;
        dom.set_disabled(node, true)?;
        Ok(snapshot)
    }

    pub(crate) fn restore(&self, dom: &mut Dom) -> Result<()> {
        dom.set_inner_html(self.node, &self.inner_html)?;
        dom.set_disabled(self.node, self.disabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::parse_html;

    #[test]
    fn restore_brings_back_label_and_enabled_state() -> Result<()> {
        let mut dom = parse_html("<button id='b'><span>Confirm Payment</span></button>")?;
        let button = dom.by_id("b").expect("button");
        let snapshot = ButtonSnapshot::enter_loading(
            &mut dom,
            button,
            "<i class=\"fas fa-spinner fa-spin\"></i> Processing...",
        )?;
        assert!(dom.disabled(button));
        assert_eq!(dom.text_content(button), " Processing...");

        snapshot.restore(&mut dom)?;
        assert!(!dom.disabled(button));
        assert_eq!(dom.inner_html(button)?, "<span>Confirm Payment</span>");
        Ok(())
    }
}
