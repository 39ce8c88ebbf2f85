use std::sync::LazyLock;

use fancy_regex::Regex;
use thiserror::Error;

use crate::Result;
use crate::dom::{Dom, NodeId};
use crate::payment_method::PaymentMethod;

pub const MIN_PASSWORD_LEN: usize = 6;

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

/// First failing check, in the order the checks run. The `Display` text is
/// the message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please select a payment method")]
    NoMethodSelected,
    #[error("Please fill in all required fields")]
    MissingRequiredFields { fields: Vec<String> },
    #[error("Please enter a valid email address")]
    InvalidEmail,
    #[error("Password must be at least {MIN_PASSWORD_LEN} characters")]
    PasswordTooShort,
    #[error("Please accept the terms and conditions")]
    TermsNotAccepted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Generic,
    Payment,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSnapshot {
    /// Element id, else `name`, else `field-{index}`.
    pub key: String,
    /// Lowercased `type` for inputs, the tag name for `select`/`textarea`.
    pub input_type: String,
    pub value: String,
    pub required: bool,
}

impl FieldSnapshot {
    pub fn new(key: &str, input_type: &str, value: &str, required: bool) -> Self {
        Self {
            key: key.to_string(),
            input_type: input_type.to_string(),
            value: value.to_string(),
            required,
        }
    }

    /// Required and blank once whitespace is trimmed.
    pub fn is_missing(&self) -> bool {
        self.required && self.value.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSnapshot {
    pub kind: FormKind,
    pub fields: Vec<FieldSnapshot>,
    pub selected_method: Option<PaymentMethod>,
    /// `None` when the form has no terms checkbox.
    pub terms_accepted: Option<bool>,
}

impl FormSnapshot {
    pub fn generic(fields: Vec<FieldSnapshot>) -> Self {
        Self {
            kind: FormKind::Generic,
            fields,
            selected_method: None,
            terms_accepted: None,
        }
    }

    pub fn payment(
        fields: Vec<FieldSnapshot>,
        selected_method: Option<PaymentMethod>,
        terms_accepted: Option<bool>,
    ) -> Self {
        Self {
            kind: FormKind::Payment,
            fields,
            selected_method,
            terms_accepted,
        }
    }

    pub fn blank_required_fields(&self) -> Vec<String> {
        self.fields
            .iter()
            .filter(|field| field.is_missing())
            .map(|field| field.key.clone())
            .collect()
    }

    fn first_of_type(&self, input_type: &str) -> Option<&FieldSnapshot> {
        self.fields
            .iter()
            .find(|field| field.input_type == input_type)
    }
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email).unwrap_or(false)
}

/// Runs the checks in order and stops at the first failure.
pub fn validate(form: &FormSnapshot) -> std::result::Result<(), ValidationError> {
    if form.kind == FormKind::Payment && form.selected_method.is_none() {
        return Err(ValidationError::NoMethodSelected);
    }

    let missing = form.blank_required_fields();
    if !missing.is_empty() {
        return Err(ValidationError::MissingRequiredFields { fields: missing });
    }

    if let Some(email) = form.first_of_type("email") {
        if !is_valid_email(&email.value) {
            return Err(ValidationError::InvalidEmail);
        }
    }

    if let Some(password) = form.first_of_type("password") {
        if password.value.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::PasswordTooShort);
        }
    }

    if form.kind == FormKind::Payment && form.terms_accepted == Some(false) {
        return Err(ValidationError::TermsNotAccepted);
    }

    Ok(())
}

/// A form read out of the DOM. `controls[i]` is the element behind
/// `snapshot.fields[i]`.
#[derive(Debug, Clone)]
pub(crate) struct CapturedForm {
    pub(crate) snapshot: FormSnapshot,
    pub(crate) controls: Vec<NodeId>,
}

impl CapturedForm {
    pub(crate) fn control(&self, key: &str) -> Option<NodeId> {
        self.snapshot
            .fields
            .iter()
            .position(|field| field.key == key)
            .and_then(|idx| self.controls.get(idx).copied())
    }
}

pub(crate) fn capture_form(dom: &Dom, form: NodeId) -> Result<CapturedForm> {
    let mut fields = Vec::new();
    let mut controls = Vec::new();
    for (index, control) in dom
        .query_selector_all_from(form, "input, select, textarea")?
        .into_iter()
        .enumerate()
    {
        let tag = dom.tag_name(control).unwrap_or("input").to_string();
        let input_type = if tag == "input" {
            dom.attr(control, "type")
                .map(|kind| kind.to_ascii_lowercase())
                .unwrap_or_else(|| "text".to_string())
        } else {
            tag
        };
        if matches!(
            input_type.as_str(),
            "checkbox" | "radio" | "submit" | "button" | "reset" | "hidden" | "image"
        ) {
            continue;
        }
        let key = dom
            .attr(control, "id")
            .or_else(|| dom.attr(control, "name"))
            .filter(|key| !key.is_empty())
            .unwrap_or_else(|| format!("field-{index}"));
        fields.push(FieldSnapshot {
            key,
            input_type,
            value: dom.value(control)?,
            required: dom.required(control),
        });
        controls.push(control);
    }
    Ok(CapturedForm {
        snapshot: FormSnapshot::generic(fields),
        controls,
    })
}
