use crate::Result;
use crate::dom::{Dom, NodeId};

pub(crate) const RESET_SENDING_HTML: &str = "<span>Sending...</span>";
pub(crate) const RESET_LINK_SENT: &str = "Password reset link has been sent to your email";

/// `#forgotPasswordModal` on the login page.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ForgotPassword {
    pub(crate) modal: NodeId,
}

impl ForgotPassword {
    pub(crate) fn bind(dom: &Dom) -> Option<Self> {
        dom.by_id("forgotPasswordModal").map(|modal| Self { modal })
    }

    pub(crate) fn show(&self, dom: &mut Dom) -> Result<()> {
        dom.style_set(self.modal, "display", "block")?;
        set_body_overflow(dom, "hidden")
    }

    pub(crate) fn close(&self, dom: &mut Dom) -> Result<()> {
        dom.style_set(self.modal, "display", "none")?;
        set_body_overflow(dom, "auto")
    }
}

fn set_body_overflow(dom: &mut Dom, value: &str) -> Result<()> {
    match dom.body() {
        Some(body) => dom.style_set(body, "overflow", value),
        None => Ok(()),
    }
}
