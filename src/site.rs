use crate::components::{
    BackgroundVideo, ButtonSnapshot, ErrorBanner, ForgotPassword, InputMask, Navigation,
    ScrollReveal, swap_login_link,
};
use crate::config::SiteConfig;
use crate::dispatch::Capability;
use crate::dom::{Dom, NodeId};
use crate::gateway::{GatewayError, PaymentDetails, PaymentGateway, Receipt, SimulatedGateway};
use crate::html::parse_html;
use crate::modal::{ModalState, PaymentModal};
use crate::payment_method::PaymentMethod;
use crate::platform::{LocationNavigation, PlatformMocks, TraceState};
use crate::scheduler::{PendingTimer, Scheduler};
use crate::workflow::{Booking, BookingWorkflow, WorkflowState};
use crate::{Error, Result};

mod actions;
mod assertions;
mod driver;
mod timers;

const DEFAULT_URL: &str = "about:blank";
const USERNAME_KEY: &str = "username";

/// Deferred work standing in for `setTimeout` callbacks.
#[derive(Debug, Clone)]
enum Task {
    HideErrorMessage,
    SettlePayment {
        details: PaymentDetails,
        button: Option<ButtonSnapshot>,
    },
    FinishQuickBooking {
        button: ButtonSnapshot,
    },
    FinishPasswordReset {
        button: Option<ButtonSnapshot>,
    },
}

#[derive(Debug, Clone)]
struct Binding {
    node: NodeId,
    capability: Capability,
}

/// A loaded page of the booking site with its behavior bound.
///
/// The site owns the DOM, the virtual clock, the mocked platform services
/// and the booking workflow. Everything runs on the caller's thread; timers
/// only fire when the clock is advanced.
pub struct Site {
    dom: Dom,
    scheduler: Scheduler<Task>,
    platform: PlatformMocks,
    trace: TraceState,
    config: SiteConfig,
    gateway: Box<dyn PaymentGateway>,
    workflow: BookingWorkflow,
    bindings: Vec<Binding>,
    document_bindings: Vec<Capability>,
    navigation: Option<Navigation>,
    reveal: ScrollReveal,
    video: Option<BackgroundVideo>,
    payment_modal: Option<PaymentModal>,
    forgot_password: Option<ForgotPassword>,
    error_banner: Option<ErrorBanner>,
    scroll_log: Vec<String>,
    submitted_forms: Vec<String>,
}

impl Site {
    pub fn from_html(html: &str) -> Result<Self> {
        Self::from_html_with_options(DEFAULT_URL, html, &[], SiteConfig::default())
    }

    pub fn from_html_with_url(url: &str, html: &str) -> Result<Self> {
        Self::from_html_with_options(url, html, &[], SiteConfig::default())
    }

    pub fn from_html_with_local_storage(
        url: &str,
        html: &str,
        initial_local_storage: &[(&str, &str)],
    ) -> Result<Self> {
        Self::from_html_with_options(url, html, initial_local_storage, SiteConfig::default())
    }

    pub fn from_html_with_config(html: &str, config: SiteConfig) -> Result<Self> {
        Self::from_html_with_options(DEFAULT_URL, html, &[], config)
    }

    pub fn from_html_with_options(
        url: &str,
        html: &str,
        initial_local_storage: &[(&str, &str)],
        config: SiteConfig,
    ) -> Result<Self> {
        let dom = parse_html(html)?;
        let mut site = Self {
            dom,
            scheduler: Scheduler::new(config.timer_step_limit),
            platform: PlatformMocks::new(url, initial_local_storage),
            trace: TraceState::default(),
            config,
            gateway: Box::new(SimulatedGateway::new()),
            workflow: BookingWorkflow::new(),
            bindings: Vec::new(),
            document_bindings: Vec::new(),
            navigation: None,
            reveal: ScrollReveal::default(),
            video: None,
            payment_modal: None,
            forgot_password: None,
            error_banner: None,
            scroll_log: Vec::new(),
            submitted_forms: Vec::new(),
        };
        site.bind_page()?;
        Ok(site)
    }

    fn bind_page(&mut self) -> Result<()> {
        self.bind_navigation()?;
        self.reveal = ScrollReveal::bind(&mut self.dom)?;
        for target in self.reveal.targets().to_vec() {
            self.bind(target, Capability::RevealOnScroll);
        }
        self.bind_forms()?;
        self.bind_video()?;
        self.bind_booking()?;
        self.bind_auth()?;
        self.error_banner = ErrorBanner::bind(&self.dom);
        Ok(())
    }

    fn bind_navigation(&mut self) -> Result<()> {
        self.navigation = Navigation::bind(&self.dom)?;
        let Some(navigation) = self.navigation else {
            return Ok(());
        };
        self.bind(navigation.menu_button, Capability::MenuToggle);
        self.document_bindings.push(Capability::MenuOutsideClick);

        for anchor in self.dom.query_selector_all("a[href^=\"#\"]")? {
            let href = self.dom.attr(anchor, "href").unwrap_or_default();
            self.bind(anchor, Capability::AnchorLink { href });
        }

        let username = self
            .platform
            .local_storage_get(USERNAME_KEY)
            .filter(|name| !name.is_empty())
            .map(str::to_string);
        if let Some(username) = username {
            if let Some(logout) = swap_login_link(&mut self.dom, &username)? {
                self.bind(logout, Capability::LogoutLink);
            }
        }
        Ok(())
    }

    fn bind_forms(&mut self) -> Result<()> {
        for form in self.dom.query_selector_all("form")? {
            let capability = match self.dom.attr(form, "id").as_deref() {
                Some("paymentForm") => Capability::PaymentForm,
                Some("loginForm") => Capability::LoginForm,
                Some("forgotPasswordForm") => Capability::ForgotPasswordForm,
                _ => Capability::GenericForm,
            };
            self.bind(form, capability);
        }
        for input in self.dom.query_selector_all("input[id]")? {
            let mask = self
                .dom
                .attr(input, "id")
                .as_deref()
                .and_then(InputMask::for_field_id);
            if let Some(mask) = mask {
                self.bind(input, Capability::InputMask(mask));
            }
        }
        Ok(())
    }

    fn bind_video(&mut self) -> Result<()> {
        self.video = BackgroundVideo::bind(&self.dom)?;
        if let Some(node) = self.video.as_ref().map(|video| video.node) {
            self.bind(node, Capability::BackgroundVideo);
            self.document_bindings.push(Capability::VideoVisibility);
        }
        Ok(())
    }

    fn bind_booking(&mut self) -> Result<()> {
        for button in self.dom.query_selector_all(".book-btn")? {
            if self.dom.closest(button, ".ticket-type")?.is_some() {
                self.bind(button, Capability::BookTicket);
            } else if self.dom.closest(button, ".event-card")?.is_some() {
                self.bind(button, Capability::QuickBook);
            }
        }

        self.payment_modal = PaymentModal::bind(&self.dom)?;
        let Some(modal) = self.payment_modal.as_ref() else {
            return Ok(());
        };
        let root = modal.root();
        let options = modal
            .methods()
            .map(|methods| {
                methods
                    .options()
                    .filter_map(|option| Some((option, methods.method_for_option(option)?)))
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();

        self.bind(root, Capability::PaymentModalBackdrop);
        if let Some(close) = self.dom.query_selector_from(root, ".close-modal")? {
            self.bind(close, Capability::ClosePaymentModal);
        }
        for (option, method) in options {
            self.bind(option, Capability::PaymentMethodOption(method));
        }
        Ok(())
    }

    fn bind_auth(&mut self) -> Result<()> {
        for link in self.dom.query_selector_all("[data-action=\"forgot-password\"]")? {
            self.bind(link, Capability::ShowForgotPassword);
        }
        for link in self
            .dom
            .query_selector_all("[data-action=\"close-forgot-password\"]")?
        {
            self.bind(link, Capability::CloseForgotPassword);
        }
        self.forgot_password = ForgotPassword::bind(&self.dom);
        if let Some(forgot) = self.forgot_password {
            self.bind(forgot.modal, Capability::ForgotPasswordBackdrop);
        }
        Ok(())
    }

    fn bind(&mut self, node: NodeId, capability: Capability) {
        self.bindings.push(Binding { node, capability });
    }

    /// Replaces the payment backend. The default is a [`SimulatedGateway`].
    pub fn set_gateway(&mut self, gateway: impl PaymentGateway + 'static) {
        self.gateway = Box::new(gateway);
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn url(&self) -> &str {
        self.platform.document_url()
    }

    pub fn workflow_state(&self) -> WorkflowState {
        self.workflow.state()
    }

    pub fn booking(&self) -> Option<&Booking> {
        self.workflow.booking()
    }

    pub fn last_receipt(&self) -> Option<&Receipt> {
        self.workflow.last_receipt()
    }

    pub fn last_payment_error(&self) -> Option<&GatewayError> {
        self.workflow.last_error()
    }

    /// `None` when the page has no payment modal.
    pub fn modal_state(&self) -> Option<ModalState> {
        self.payment_modal
            .as_ref()
            .map(|modal| modal.state(&self.dom))
    }

    pub fn selected_payment_method(&self) -> Option<PaymentMethod> {
        self.payment_modal
            .as_ref()
            .and_then(PaymentModal::selected_method)
    }

    /// Ids of the payment form controls currently flagged `required`.
    pub fn required_payment_fields(&self) -> Result<Vec<String>> {
        let methods = self
            .payment_modal
            .as_ref()
            .and_then(PaymentModal::methods)
            .ok_or_else(|| Error::SelectorNotFound("#paymentForm".into()))?;
        methods.required_field_ids(&self.dom)
    }

    /// `None` when the page has no background video.
    pub fn video_playing(&self) -> Option<bool> {
        self.video.as_ref().map(BackgroundVideo::playing)
    }

    pub fn menu_open(&self) -> Option<bool> {
        self.navigation
            .as_ref()
            .map(|navigation| navigation.is_open(&self.dom))
    }

    /// In-page anchors scrolled into view since the last call.
    pub fn take_scroll_log(&mut self) -> Vec<String> {
        std::mem::take(&mut self.scroll_log)
    }

    /// Generic forms that passed validation since the last call.
    pub fn take_submitted_forms(&mut self) -> Vec<String> {
        std::mem::take(&mut self.submitted_forms)
    }

    pub fn enqueue_confirm_response(&mut self, accepted: bool) {
        self.platform.enqueue_confirm_response(accepted);
    }

    pub fn set_default_confirm_response(&mut self, accepted: bool) {
        self.platform.set_default_confirm_response(accepted);
    }

    pub fn take_alert_messages(&mut self) -> Vec<String> {
        self.platform.take_alert_messages()
    }

    pub fn take_confirm_messages(&mut self) -> Vec<String> {
        self.platform.take_confirm_messages()
    }

    pub fn take_location_navigations(&mut self) -> Vec<LocationNavigation> {
        self.platform.take_location_navigations()
    }

    pub fn local_storage_get(&self, key: &str) -> Option<&str> {
        self.platform.local_storage_get(key)
    }

    pub fn set_autoplay_allowed(&mut self, allowed: bool) {
        self.platform.set_autoplay_allowed(allowed);
    }

    pub fn now_ms(&self) -> i64 {
        self.scheduler.now_ms()
    }

    pub fn pending_timers(&self) -> Vec<PendingTimer> {
        self.scheduler.pending_timers()
    }

    pub fn set_timer_step_limit(&mut self, max_steps: usize) -> Result<()> {
        self.scheduler.set_timer_step_limit(max_steps)
    }

    pub fn enable_trace(&mut self, enabled: bool) {
        self.trace.enabled = enabled;
    }

    pub fn set_trace_events(&mut self, enabled: bool) {
        self.trace.events = enabled;
    }

    pub fn set_trace_timers(&mut self, enabled: bool) {
        self.trace.timers = enabled;
    }

    pub fn set_trace_stderr(&mut self, enabled: bool) {
        self.trace.to_stderr = enabled;
    }

    pub fn set_trace_log_limit(&mut self, max_entries: usize) -> Result<()> {
        if max_entries == 0 {
            return Err(Error::InvalidSetting(
                "set_trace_log_limit requires at least 1 entry".into(),
            ));
        }
        self.trace.log_limit = max_entries;
        while self.trace.logs.len() > self.trace.log_limit {
            self.trace.logs.pop_front();
        }
        Ok(())
    }

    pub fn take_trace_logs(&mut self) -> Vec<String> {
        self.trace.logs.drain(..).collect()
    }

    /// Runs `f`, then restores `button` whatever `f` returned.
    fn with_button_restored<T>(
        &mut self,
        button: Option<ButtonSnapshot>,
        f: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        let result = f(self);
        if let Some(button) = button {
            button.restore(&mut self.dom)?;
        }
        result
    }
}
