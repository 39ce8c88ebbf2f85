use crate::components::InputMask;
use crate::payment_method::PaymentMethod;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Click,
    Submit,
    Input,
    Change,
    LoadedData,
    Ended,
    VisibilityChange,
    Intersection,
}

impl EventKind {
    pub fn from_name(name: &str) -> Option<Self> {
        let kind = match name.trim().to_ascii_lowercase().as_str() {
            "click" => EventKind::Click,
            "submit" => EventKind::Submit,
            "input" => EventKind::Input,
            "change" => EventKind::Change,
            "loadeddata" => EventKind::LoadedData,
            "ended" => EventKind::Ended,
            "visibilitychange" => EventKind::VisibilityChange,
            "intersection" => EventKind::Intersection,
            _ => return None,
        };
        Some(kind)
    }

    pub fn name(self) -> &'static str {
        match self {
            EventKind::Click => "click",
            EventKind::Submit => "submit",
            EventKind::Input => "input",
            EventKind::Change => "change",
            EventKind::LoadedData => "loadeddata",
            EventKind::Ended => "ended",
            EventKind::VisibilityChange => "visibilitychange",
            EventKind::Intersection => "intersection",
        }
    }

    /// Whether the event walks up from the target to the document.
    pub fn bubbles(self) -> bool {
        matches!(
            self,
            EventKind::Click | EventKind::Submit | EventKind::Input | EventKind::Change
        )
    }
}

/// What a bound element (or the document) is able to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Capability {
    MenuToggle,
    /// Document-level: closes the menu on clicks outside it.
    MenuOutsideClick,
    AnchorLink { href: String },
    LogoutLink,
    /// `.book-btn` inside a `.ticket-type`.
    BookTicket,
    /// `.book-btn` on an event card without ticket types.
    QuickBook,
    PaymentMethodOption(PaymentMethod),
    ClosePaymentModal,
    PaymentModalBackdrop,
    PaymentForm,
    LoginForm,
    ForgotPasswordForm,
    GenericForm,
    ShowForgotPassword,
    CloseForgotPassword,
    ForgotPasswordBackdrop,
    InputMask(InputMask),
    BackgroundVideo,
    /// Document-level: pauses and resumes the background video.
    VideoVisibility,
    RevealOnScroll,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    ToggleMenu,
    CloseMenuIfOutside,
    ScrollTo(String),
    Logout,
    OpenBooking,
    QuickBook,
    SelectPaymentMethod(PaymentMethod),
    ClosePaymentModal,
    /// Closes only when the click landed on the backdrop itself.
    ClosePaymentModalFromBackdrop,
    SubmitPayment,
    Login,
    RequestPasswordReset,
    ValidateForm,
    ShowForgotPassword,
    CloseForgotPassword,
    CloseForgotPasswordFromBackdrop,
    ApplyMask(InputMask),
    PlayVideo,
    ReplayVideo,
    SyncVideoVisibility,
    Reveal,
}

pub fn route(kind: EventKind, capability: &Capability) -> Option<Action> {
    use Capability as C;
    use EventKind as E;

    let action = match (kind, capability) {
        (E::Click, C::MenuToggle) => Action::ToggleMenu,
        (E::Click, C::MenuOutsideClick) => Action::CloseMenuIfOutside,
        (E::Click, C::AnchorLink { href }) => Action::ScrollTo(href.clone()),
        (E::Click, C::LogoutLink) => Action::Logout,
        (E::Click, C::BookTicket) => Action::OpenBooking,
        (E::Click, C::QuickBook) => Action::QuickBook,
        (E::Click, C::PaymentMethodOption(method)) => Action::SelectPaymentMethod(*method),
        (E::Click, C::ClosePaymentModal) => Action::ClosePaymentModal,
        (E::Click, C::PaymentModalBackdrop) => Action::ClosePaymentModalFromBackdrop,
        (E::Click, C::ShowForgotPassword) => Action::ShowForgotPassword,
        (E::Click, C::CloseForgotPassword) => Action::CloseForgotPassword,
        (E::Click, C::ForgotPasswordBackdrop) => Action::CloseForgotPasswordFromBackdrop,
        (E::Submit, C::PaymentForm) => Action::SubmitPayment,
        (E::Submit, C::LoginForm) => Action::Login,
        (E::Submit, C::ForgotPasswordForm) => Action::RequestPasswordReset,
        (E::Submit, C::GenericForm) => Action::ValidateForm,
        (E::Input, C::InputMask(mask)) => Action::ApplyMask(*mask),
        (E::LoadedData, C::BackgroundVideo) => Action::PlayVideo,
        (E::Ended, C::BackgroundVideo) => Action::ReplayVideo,
        (E::VisibilityChange, C::VideoVisibility) => Action::SyncVideoVisibility,
        (E::Intersection, C::RevealOnScroll) => Action::Reveal,
        _ => return None,
    };
    Some(action)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forms_route_submit_by_role() {
        assert_eq!(route(EventKind::Submit, &Capability::PaymentForm), Some(Action::SubmitPayment));
        assert_eq!(route(EventKind::Submit, &Capability::LoginForm), Some(Action::Login));
        assert_eq!(route(EventKind::Submit, &Capability::GenericForm), Some(Action::ValidateForm));
        assert_eq!(route(EventKind::Click, &Capability::PaymentForm), None);
    }

    #[test]
    fn payload_carrying_capabilities_pass_it_through() {
        assert_eq!(
            route(
                EventKind::Click,
                &Capability::AnchorLink {
                    href: "#events".into()
                }
            ),
            Some(Action::ScrollTo("#events".into()))
        );
        assert_eq!(
            route(
                EventKind::Click,
                &Capability::PaymentMethodOption(PaymentMethod::MobileWallet)
            ),
            Some(Action::SelectPaymentMethod(PaymentMethod::MobileWallet))
        );
        assert_eq!(
            route(EventKind::Input, &Capability::InputMask(InputMask::Expiry)),
            Some(Action::ApplyMask(InputMask::Expiry))
        );
    }

    #[test]
    fn media_events_do_not_bubble() {
        assert!(EventKind::Click.bubbles());
        assert!(!EventKind::LoadedData.bubbles());
        assert!(!EventKind::Intersection.bubbles());
        assert_eq!(route(EventKind::Ended, &Capability::BackgroundVideo), Some(Action::ReplayVideo));
        assert_eq!(route(EventKind::Click, &Capability::BackgroundVideo), None);
    }

    #[test]
    fn event_names_parse_case_insensitively() {
        assert_eq!(EventKind::from_name("LoadedData"), Some(EventKind::LoadedData));
        assert_eq!(EventKind::from_name("mouseover"), None);
        assert_eq!(EventKind::VisibilityChange.name(), "visibilitychange");
    }
}
