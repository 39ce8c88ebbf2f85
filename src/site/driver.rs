use super::*;
use crate::dispatch::{EventKind, route};

impl Site {
    pub fn click(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        self.click_node(target)
    }

    pub(crate) fn click_node(&mut self, target: NodeId) -> Result<()> {
        if self.dom.disabled(target) {
            return Ok(());
        }
        self.dispatch_event(target, EventKind::Click)?;

        if is_checkable_input(&self.dom, target) {
            let current = self.dom.checked(target)?;
            let is_radio = self.dom.attr(target, "type").as_deref() == Some("radio");
            if !(is_radio && current) {
                self.dom.set_checked(target, !current)?;
                self.dispatch_event(target, EventKind::Input)?;
                self.dispatch_event(target, EventKind::Change)?;
            }
        }

        if is_submit_control(&self.dom, target) {
            if let Some(form) = self.dom.closest(target, "form")? {
                self.dispatch_event(form, EventKind::Submit)?;
            }
        }
        Ok(())
    }

    pub fn type_text(&mut self, selector: &str, text: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        if self.dom.disabled(target) {
            return Ok(());
        }
        let tag = self.dom.tag_name(target).unwrap_or_default().to_string();
        if tag != "input" && tag != "textarea" {
            return Err(Error::TypeMismatch {
                selector: selector.to_string(),
                expected: "input or textarea".into(),
                actual: tag,
            });
        }
        self.dom.set_value(target, text)?;
        self.dispatch_event(target, EventKind::Input)
    }

    /// Picks the option of a `<select>` whose value is `value`.
    pub fn select_option(&mut self, selector: &str, value: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        if self.dom.disabled(target) {
            return Ok(());
        }
        if self.dom.tag_name(target) != Some("select") {
            return Err(Error::TypeMismatch {
                selector: selector.to_string(),
                expected: "select".into(),
                actual: self.dom.describe(target),
            });
        }
        let has_option = self
            .dom
            .query_selector_all_from(target, "option")?
            .into_iter()
            .any(|option| self.dom.option_value(option) == value);
        if !has_option {
            return Err(Error::SelectorNotFound(format!(
                "{selector} option[value=\"{value}\"]"
            )));
        }
        if self.dom.value(target)? != value {
            self.dom.set_value(target, value)?;
            self.dispatch_event(target, EventKind::Input)?;
            self.dispatch_event(target, EventKind::Change)?;
        }
        Ok(())
    }

    pub fn set_checked(&mut self, selector: &str, checked: bool) -> Result<()> {
        let target = self.select_one(selector)?;
        if self.dom.disabled(target) {
            return Ok(());
        }
        if !is_checkable_input(&self.dom, target) {
            return Err(Error::TypeMismatch {
                selector: selector.to_string(),
                expected: "input[type=checkbox|radio]".into(),
                actual: self.dom.describe(target),
            });
        }
        if self.dom.checked(target)? != checked {
            self.dom.set_checked(target, checked)?;
            self.dispatch_event(target, EventKind::Input)?;
            self.dispatch_event(target, EventKind::Change)?;
        }
        Ok(())
    }

    /// Submits the form matched by `selector`, or the form enclosing it.
    pub fn submit(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let Some(form) = self.dom.closest(target, "form")? else {
            return Ok(());
        };
        self.dispatch_event(form, EventKind::Submit)
    }

    /// Fires a named event at the first match of `selector`. Unknown event
    /// names reach no handler.
    pub fn dispatch(&mut self, selector: &str, event: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        match EventKind::from_name(event) {
            Some(kind) => self.dispatch_event(target, kind),
            None => {
                self.trace.event_line(format!(
                    "[event] {event} target={} action=none",
                    self.dom.describe(target)
                ));
                Ok(())
            }
        }
    }

    pub fn set_document_hidden(&mut self, hidden: bool) -> Result<()> {
        if self.platform.document_hidden() == hidden {
            return Ok(());
        }
        self.platform.set_document_hidden(hidden);
        let root = self.dom.root();
        self.dispatch_event(root, EventKind::VisibilityChange)
    }

    /// Reports that the element matched by `selector` is `ratio` in view.
    pub fn intersect(&mut self, selector: &str, ratio: f64) -> Result<()> {
        let target = self.select_one(selector)?;
        if ratio < self.config.reveal_threshold {
            return Ok(());
        }
        self.dispatch_event(target, EventKind::Intersection)
    }

    pub(crate) fn dispatch_event(&mut self, target: NodeId, kind: EventKind) -> Result<()> {
        let path = if kind.bubbles() {
            self.dom.ancestry(target)
        } else {
            vec![target]
        };

        let mut actions = Vec::new();
        for current in path {
            for binding in self.bindings.iter().filter(|binding| binding.node == current) {
                if let Some(action) = route(kind, &binding.capability) {
                    actions.push((current, action));
                }
            }
        }
        if kind.bubbles() || kind == EventKind::VisibilityChange {
            let root = self.dom.root();
            for capability in &self.document_bindings {
                if let Some(action) = route(kind, capability) {
                    actions.push((root, action));
                }
            }
        }

        let target_label = self.dom.describe(target);
        if actions.is_empty() {
            self.trace.event_line(format!(
                "[event] {} target={target_label} action=none",
                kind.name()
            ));
            return Ok(());
        }

        for (current, action) in actions {
            self.trace.event_line(format!(
                "[event] {} target={target_label} action={action:?}",
                kind.name()
            ));
            log::debug!("{} on {target_label} -> {action:?}", kind.name());
            self.run_action(action, target, current)?;
        }
        Ok(())
    }
}

fn is_checkable_input(dom: &Dom, node: NodeId) -> bool {
    dom.tag_name(node) == Some("input")
        && matches!(
            dom.attr(node, "type")
                .map(|kind| kind.to_ascii_lowercase())
                .as_deref(),
            Some("checkbox" | "radio")
        )
}

fn is_submit_control(dom: &Dom, node: NodeId) -> bool {
    let kind = dom.attr(node, "type").map(|kind| kind.to_ascii_lowercase());
    match dom.tag_name(node) {
        Some("button") => matches!(kind.as_deref(), None | Some("submit")),
        Some("input") => matches!(kind.as_deref(), Some("submit" | "image")),
        _ => false,
    }
}
