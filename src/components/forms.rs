use crate::Result;
use crate::dom::{Dom, NodeId};
use crate::validation::CapturedForm;

/// `#error-message`, where generic forms report the first failed check.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ErrorBanner {
    pub(crate) node: NodeId,
}

impl ErrorBanner {
    pub(crate) fn bind(dom: &Dom) -> Option<Self> {
        dom.by_id("error-message").map(|node| Self { node })
    }

    pub(crate) fn show(&self, dom: &mut Dom, message: &str) -> Result<()> {
        dom.set_text_content(self.node, message)?;
        dom.style_set(self.node, "display", "block")
    }

    pub(crate) fn hide(&self, dom: &mut Dom) -> Result<()> {
        dom.style_set(self.node, "display", "none")
    }
}

/// Clears old `.error` marks in `form`, then flags each blank required
/// control with `error` and `aria-invalid`.
pub(crate) fn mark_generic_form(dom: &mut Dom, form: NodeId, captured: &CapturedForm) -> Result<()> {
    for marked in dom.query_selector_all_from(form, ".error")? {
        dom.class_remove(marked, "error")?;
    }
    for (field, control) in captured.snapshot.fields.iter().zip(&captured.controls) {
        if !field.required {
            continue;
        }
        if field.is_missing() {
            dom.class_add(*control, "error")?;
            dom.set_attr(*control, "aria-invalid", "true")?;
        } else {
            dom.set_attr(*control, "aria-invalid", "false")?;
        }
    }
    Ok(())
}

/// Id, else name, else a short description of the form.
pub(crate) fn form_label(dom: &Dom, form: NodeId) -> String {
    dom.attr(form, "id")
        .or_else(|| dom.attr(form, "name"))
        .filter(|label| !label.is_empty())
        .unwrap_or_else(|| dom.describe(form))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::parse_html;
    use crate::validation::capture_form;

    #[test]
    fn marks_blank_required_controls_and_clears_old_marks() -> Result<()> {
        let mut dom = parse_html(
            r#"<form id="contact">
                 <p class="hint error">old</p>
                 <input id="name" required value="  ">
                 <input id="email" type="email" required value="a@b.co">
                 <input id="note">
               </form>"#,
        )?;
        let form = dom.by_id("contact").expect("form");
        let captured = capture_form(&dom, form)?;
        mark_generic_form(&mut dom, form, &captured)?;

        let name = dom.by_id("name").expect("name");
        let email = dom.by_id("email").expect("email");
        let note = dom.by_id("note").expect("note");
        assert!(dom.class_contains(name, "error"));
        assert_eq!(dom.attr(name, "aria-invalid").as_deref(), Some("true"));
        assert_eq!(dom.attr(email, "aria-invalid").as_deref(), Some("false"));
        assert_eq!(dom.attr(note, "aria-invalid"), None);
        assert_eq!(dom.query_selector_all("#contact .error")?.len(), 1);
        Ok(())
    }

    #[test]
    fn banner_shows_message_then_hides() -> Result<()> {
        let mut dom = parse_html("<div id='error-message' style='display: none;'></div>")?;
        let banner = ErrorBanner::bind(&dom).expect("banner");
        banner.show(&mut dom, "Please fill in all required fields")?;
        assert_eq!(dom.style_get(banner.node, "display").as_deref(), Some("block"));
        assert_eq!(dom.text_content(banner.node), "Please fill in all required fields");
        banner.hide(&mut dom)?;
        assert_eq!(dom.style_get(banner.node, "display").as_deref(), Some("none"));
        Ok(())
    }

    #[test]
    fn form_label_prefers_id() -> Result<()> {
        let dom = parse_html("<form id='a'></form><form name='b'></form><form class='c'></form>")?;
        let labels = dom
            .query_selector_all("form")?
            .into_iter()
            .map(|form| form_label(&dom, form))
            .collect::<Vec<_>>();
        assert_eq!(labels, vec!["a", "b", "form.c"]);
        Ok(())
    }
}
