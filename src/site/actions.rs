use super::*;
use crate::components::{
    QUICK_BOOKING_LOADING_HTML, QUICK_BOOKING_SUCCESS, RESET_LINK_SENT, RESET_SENDING_HTML,
    booking_prompt, form_label, mark_generic_form,
};
use crate::dispatch::Action;
use crate::modal::{EventSummary, TicketSelection};
use crate::validation::{CapturedForm, FormKind, ValidationError, capture_form, validate};

const PROCESSING_HTML: &str = "<i class=\"fas fa-spinner fa-spin\"></i> Processing...";
const PAYMENT_SUCCESS: &str = "Payment successful! Check your email for confirmation.";

impl Site {
    /// `target` is where the event started, `current` the node whose binding
    /// produced `action` (the document root for document-level bindings).
    pub(crate) fn run_action(&mut self, action: Action, target: NodeId, current: NodeId) -> Result<()> {
        match action {
            Action::ToggleMenu => {
                if let Some(navigation) = self.navigation {
                    navigation.toggle(&mut self.dom)?;
                }
                Ok(())
            }
            Action::CloseMenuIfOutside => {
                if let Some(navigation) = self.navigation {
                    if navigation.is_outside(&self.dom, target) {
                        navigation.close(&mut self.dom)?;
                    }
                }
                Ok(())
            }
            Action::ScrollTo(href) => self.scroll_to(&href),
            Action::Logout => self.logout(),
            Action::OpenBooking => self.open_booking(current),
            Action::QuickBook => self.quick_book(current),
            Action::SelectPaymentMethod(method) => {
                if let Some(modal) = self.payment_modal.as_mut() {
                    modal.select_method(&mut self.dom, method)?;
                }
                Ok(())
            }
            Action::ClosePaymentModal => self.close_payment_modal(),
            Action::ClosePaymentModalFromBackdrop => {
                if target == current {
                    self.close_payment_modal()?;
                }
                Ok(())
            }
            Action::SubmitPayment => self.submit_payment(current),
            Action::Login => self.login(current),
            Action::RequestPasswordReset => self.request_password_reset(current),
            Action::ValidateForm => {
                if self.validate_generic_form(current)? {
                    let label = form_label(&self.dom, current);
                    log::debug!("form {label} passed validation");
                    self.submitted_forms.push(label);
                }
                Ok(())
            }
            Action::ShowForgotPassword => match self.forgot_password {
                Some(forgot) => forgot.show(&mut self.dom),
                None => Ok(()),
            },
            Action::CloseForgotPassword => match self.forgot_password {
                Some(forgot) => forgot.close(&mut self.dom),
                None => Ok(()),
            },
            Action::CloseForgotPasswordFromBackdrop => match self.forgot_password {
                Some(forgot) if target == current => forgot.close(&mut self.dom),
                _ => Ok(()),
            },
            Action::ApplyMask(mask) => {
                let raw = self.dom.value(current)?;
                let masked = mask.apply(&raw);
                if masked != raw {
                    self.dom.set_value(current, &masked)?;
                }
                Ok(())
            }
            Action::PlayVideo => self.play_video(true),
            Action::ReplayVideo => self.play_video(false),
            Action::SyncVideoVisibility => {
                if self.platform.document_hidden() {
                    if let Some(video) = self.video.as_mut() {
                        video.pause();
                    }
                    Ok(())
                } else {
                    self.play_video(false)
                }
            }
            Action::Reveal => {
                self.reveal.reveal(&mut self.dom, current)?;
                Ok(())
            }
        }
    }

    fn scroll_to(&mut self, href: &str) -> Result<()> {
        if href.len() < 2 {
            return Ok(());
        }
        match self.dom.query_selector(href) {
            Ok(Some(_)) => {
                self.scroll_log.push(href.to_string());
                Ok(())
            }
            Ok(None) | Err(Error::UnsupportedSelector(_)) => Ok(()),
            Err(err) => Err(err),
        }
    }

    fn logout(&mut self) -> Result<()> {
        self.platform.local_storage_remove(USERNAME_KEY);
        let home = self.config.home_url.clone();
        self.platform.navigate(&home);
        Ok(())
    }

    fn play_video(&mut self, fallback_on_block: bool) -> Result<()> {
        let allowed = self.platform.autoplay_allowed();
        let Some(video) = self.video.as_mut() else {
            return Ok(());
        };
        if video.play(allowed) {
            return Ok(());
        }
        log::warn!("Video autoplay failed: playback blocked");
        if fallback_on_block {
            video.apply_fallback(&mut self.dom)?;
        }
        Ok(())
    }

    fn open_booking(&mut self, button: NodeId) -> Result<()> {
        let Some(ticket_type) = self.dom.closest(button, ".ticket-type")? else {
            return Ok(());
        };
        let Some(details) = self.dom.query_selector(".event-info-detailed")? else {
            log::warn!("book button clicked on a page without event details");
            return Ok(());
        };
        if self.payment_modal.is_none() {
            return Ok(());
        }
        if self.workflow.state() == WorkflowState::Submitting {
            log::warn!("ignoring new booking while a payment is in flight");
            return Ok(());
        }

        let summary = EventSummary::scrape(&self.dom, details)?;
        let ticket = TicketSelection::scrape(&self.dom, ticket_type)?;
        let fees = match self.payment_modal.as_mut() {
            Some(modal) => modal.open(&mut self.dom, &summary, &ticket, &self.config.currency)?,
            None => return Ok(()),
        };
        self.workflow.open(Booking {
            summary,
            ticket,
            fees,
        })?;
        Ok(())
    }

    fn close_payment_modal(&mut self) -> Result<()> {
        if let Some(modal) = self.payment_modal.as_mut() {
            modal.close(&mut self.dom)?;
        }
        self.workflow.close();
        Ok(())
    }

    fn submit_payment(&mut self, form: NodeId) -> Result<()> {
        if self.workflow.state() == WorkflowState::Submitting {
            log::debug!("payment already submitting");
            return Ok(());
        }
        let Some(modal) = self.payment_modal.as_mut() else {
            return Ok(());
        };

        let mut captured = capture_form(&self.dom, form)?;
        captured.snapshot.kind = FormKind::Payment;
        captured.snapshot.selected_method = modal.selected_method();
        captured.snapshot.terms_accepted = match self.dom.by_id("terms") {
            Some(terms) if self.dom.contains(form, terms) => Some(self.dom.checked(terms)?),
            _ => None,
        };

        let outcome = validate(&captured.snapshot);
        if outcome != Err(ValidationError::NoMethodSelected) {
            for (field, control) in captured.snapshot.fields.iter().zip(&captured.controls) {
                let invalid = field.required && field.is_missing();
                modal.mark_field(&mut self.dom, &field.key, *control, invalid)?;
            }
        }
        if let Err(err) = outcome {
            self.platform.alert(&err.to_string());
            return Ok(());
        }
        let Some(method) = captured.snapshot.selected_method else {
            return Ok(());
        };

        let amount = match self.workflow.begin_submit() {
            Ok(booking) => booking.fees.total,
            Err(err) => {
                log::warn!("payment form submitted without an open booking: {err}");
                return Ok(());
            }
        };
        let details = payment_details(&self.dom, &captured, method, amount)?;

        let button = self
            .dom
            .query_selector_from(form, "#confirmPayment")?
            .or_else(|| self.dom.by_id("confirmPayment"));
        let button = match button {
            Some(button) => Some(ButtonSnapshot::enter_loading(
                &mut self.dom,
                button,
                PROCESSING_HTML,
            )?),
            None => None,
        };
        let delay = self.config.payment_delay_ms;
        self.schedule(delay, Task::SettlePayment { details, button });
        Ok(())
    }

    pub(super) fn settle_payment(&mut self, details: &PaymentDetails) -> Result<()> {
        let outcome = self.gateway.submit(details);
        let message = match &outcome {
            Ok(_) => PAYMENT_SUCCESS,
            Err(err) => err.user_message(),
        };
        let succeeded = outcome.is_ok();
        self.workflow.settle(outcome)?;
        self.platform.alert(message);
        if succeeded {
            if let Some(modal) = self.payment_modal.as_mut() {
                modal.close(&mut self.dom)?;
            }
        }
        Ok(())
    }

    fn quick_book(&mut self, button: NodeId) -> Result<()> {
        let Some(prompt) = booking_prompt(&self.dom, button)? else {
            return Ok(());
        };
        if !self.platform.confirm(&prompt) {
            return Ok(());
        }
        let snapshot = ButtonSnapshot::enter_loading(&mut self.dom, button, QUICK_BOOKING_LOADING_HTML)?;
        let delay = self.config.booking_delay_ms;
        self.schedule(delay, Task::FinishQuickBooking { button: snapshot });
        Ok(())
    }

    pub(super) fn finish_quick_booking(&mut self) -> Result<()> {
        self.platform.alert(QUICK_BOOKING_SUCCESS);
        Ok(())
    }

    fn login(&mut self, form: NodeId) -> Result<()> {
        if !self.validate_generic_form(form)? {
            return Ok(());
        }
        if let Some(username) = self.dom.query_selector_from(form, "#username")? {
            let username = self.dom.value(username)?;
            self.platform.local_storage_set(USERNAME_KEY, &username);
        }
        let home = self.config.home_url.clone();
        self.platform.navigate(&home);
        Ok(())
    }

    fn request_password_reset(&mut self, form: NodeId) -> Result<()> {
        if !self.validate_generic_form(form)? {
            return Ok(());
        }
        let button = match self.dom.query_selector_from(form, "button")? {
            Some(button) => Some(ButtonSnapshot::enter_loading(
                &mut self.dom,
                button,
                RESET_SENDING_HTML,
            )?),
            None => None,
        };
        let delay = self.config.password_reset_delay_ms;
        self.schedule(delay, Task::FinishPasswordReset { button });
        Ok(())
    }

    pub(super) fn finish_password_reset(&mut self) -> Result<()> {
        self.platform.alert(RESET_LINK_SENT);
        match self.forgot_password {
            Some(forgot) => forgot.close(&mut self.dom),
            None => Ok(()),
        }
    }

    /// Marks and checks a non-payment form. The first failure goes to the
    /// error banner.
    fn validate_generic_form(&mut self, form: NodeId) -> Result<bool> {
        let captured = capture_form(&self.dom, form)?;
        mark_generic_form(&mut self.dom, form, &captured)?;
        match validate(&captured.snapshot) {
            Ok(()) => Ok(true),
            Err(err) => {
                self.show_error_message(&err.to_string())?;
                Ok(false)
            }
        }
    }

    fn show_error_message(&mut self, message: &str) -> Result<()> {
        let Some(banner) = self.error_banner else {
            log::debug!("no #error-message for {message:?}");
            return Ok(());
        };
        banner.show(&mut self.dom, message)?;
        let delay = self.config.error_display_ms;
        self.schedule(delay, Task::HideErrorMessage);
        Ok(())
    }
}

fn payment_details(
    dom: &Dom,
    captured: &CapturedForm,
    method: PaymentMethod,
    amount: rust_decimal::Decimal,
) -> Result<PaymentDetails> {
    let field = |id: &str| -> Result<String> {
        match captured.control(id) {
            Some(control) => dom.value(control),
            None => Ok(String::new()),
        }
    };
    Ok(PaymentDetails {
        method,
        card_number: field("cardNumber")?,
        expiry_date: field("expiryDate")?,
        cvv: field("cvv")?,
        phone: field("vodafoneNumber")?,
        amount,
    })
}
