//! Headless page model for a ticket-booking site.
//!
//! A [`Site`] parses the site's HTML into a small DOM, binds the page
//! behavior (navigation, scroll reveal, forms, background video, and the
//! booking/payment modal) and exposes a deterministic driver API. Time is
//! virtual: timers only run when the caller advances the clock.

use thiserror::Error;

mod components;
mod config;
mod dispatch;
mod dom;
mod fees;
mod gateway;
mod html;
mod modal;
mod payment_method;
mod platform;
mod scheduler;
mod selector;
mod site;
mod validation;
mod workflow;

pub use components::InputMask;
pub use config::SiteConfig;
pub use dispatch::{Action, Capability, EventKind, route};
pub use fees::{
    FeeBreakdown, SERVICE_FEE_RATE, TOTAL_RATE, VAT_RATE, compute_fees, format_amount,
    parse_price, round2,
};
pub use gateway::{
    GatewayError, PaymentDetails, PaymentGateway, Receipt, SimulatedGateway,
    validate_payment_details,
};
pub use modal::{EventSummary, ModalState, TicketSelection, format_event_date};
pub use payment_method::PaymentMethod;
pub use platform::LocationNavigation;
pub use scheduler::PendingTimer;
pub use site::Site;
pub use validation::{FieldSnapshot, FormKind, FormSnapshot, ValidationError, is_valid_email, validate};
pub use workflow::{Booking, BookingWorkflow, WorkflowError, WorkflowState};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("html parse error: {0}")]
    HtmlParse(String),
    #[error("selector not found: {0}")]
    SelectorNotFound(String),
    #[error("unsupported selector: {0}")]
    UnsupportedSelector(String),
    #[error("type mismatch for {selector}: expected {expected}, actual {actual}")]
    TypeMismatch {
        selector: String,
        expected: String,
        actual: String,
    },
    #[error("timer error: {0}")]
    Timer(String),
    #[error("workflow error: {0}")]
    Workflow(#[from] WorkflowError),
    #[error("dom error: {0}")]
    Dom(String),
    #[error("invalid setting: {0}")]
    InvalidSetting(String),
    #[error(
        "assertion failed for {selector}: expected {expected}, actual {actual}, snippet {dom_snippet}"
    )]
    AssertionFailed {
        selector: String,
        expected: String,
        actual: String,
        dom_snippet: String,
    },
}
