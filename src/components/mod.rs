//! Page behaviors bound at startup. Each `bind` returns `None` (or an empty
//! set of targets) when the markup it needs is missing.

mod auth;
mod button_state;
mod forms;
mod input_masks;
mod navigation;
mod quick_booking;
mod scroll_effects;
mod video;

pub(crate) use auth::{ForgotPassword, RESET_LINK_SENT, RESET_SENDING_HTML};
pub(crate) use button_state::ButtonSnapshot;
pub(crate) use forms::{ErrorBanner, form_label, mark_generic_form};
pub use input_masks::InputMask;
pub(crate) use navigation::{Navigation, swap_login_link};
pub(crate) use quick_booking::{QUICK_BOOKING_LOADING_HTML, QUICK_BOOKING_SUCCESS, booking_prompt};
pub(crate) use scroll_effects::ScrollReveal;
pub(crate) use video::BackgroundVideo;
