use booking_site::{
    GatewayError, PaymentDetails, PaymentGateway, PaymentMethod, Receipt, Site, WorkflowState,
};
use rust_decimal::Decimal;

const EVENT_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Event</title></head>
<body>
  <section class="event-info-detailed">
    <h1>Cairo Jazz Night</h1>
    <p><i class="fas fa-calendar"></i> March 15, 2025</p>
    <p><i class="fas fa-clock"></i> 8:00 PM</p>
    <p><i class="fas fa-map-marker-alt"></i> Cairo Opera House</p>
  </section>

  <div class="ticket-types">
    <div class="ticket-type" id="regular">
      <h3>Regular</h3>
      <span class="price">500 EGP</span>
      <button class="book-btn" id="book-regular">Book Now</button>
    </div>
    <div class="ticket-type" id="vip">
      <h3>VIP</h3>
      <span class="price">1,200.50 EGP</span>
      <button class="book-btn" id="book-vip">Book Now</button>
    </div>
  </div>

  <div id="paymentModal" class="modal" style="display: none;">
    <div class="modal-content">
      <span class="close-modal">&times;</span>
      <div class="booking-summary">
        <h3 class="event-title"></h3>
        <p class="event-date"></p>
        <p class="event-time"></p>
        <p class="event-location"></p>
        <p class="ticket-info"></p>
        <span class="subtotal"></span>
        <span class="service-fee"></span>
        <span class="vat-amount"></span>
        <strong class="total-amount" id="summary-total"></strong>
      </div>
      <form id="paymentForm">
        <div class="form-group"><input type="text" id="fullName" required></div>
        <div class="payment-methods">
          <div class="payment-method" data-method="credit-card" id="opt-card">Card</div>
          <div class="payment-method" data-method="vodafone-cash" id="opt-wallet">Vodafone Cash</div>
          <div class="payment-method" data-method="fawry" id="opt-fawry">Fawry</div>
        </div>
        <div class="payment-details-section credit-card-details">
          <div class="form-group"><input type="text" id="cardNumber"></div>
          <div class="form-group"><input type="text" id="expiryDate"></div>
          <div class="form-group"><input type="text" id="cvv"></div>
        </div>
        <div class="payment-details-section vodafone-cash-details">
          <div class="form-group"><input type="tel" id="vodafoneNumber"></div>
        </div>
        <div class="payment-details-section fawry-details"><p>Pay at any Fawry outlet.</p></div>
        <label><input type="checkbox" id="terms"> I agree</label>
        <p>Total: <span class="total-amount" id="button-total"></span></p>
        <button type="submit" id="confirmPayment"><span>Confirm Payment</span></button>
      </form>
    </div>
  </div>
</body>
</html>"#;

#[derive(Debug, Default)]
struct RecordingGateway {
    amounts: Vec<Decimal>,
}

impl PaymentGateway for RecordingGateway {
    fn submit(&mut self, details: &PaymentDetails) -> Result<Receipt, GatewayError> {
        self.amounts.push(details.amount);
        Ok(Receipt {
            reference: format!("REC-{}", self.amounts.len()),
            method: details.method,
            amount: details.amount,
        })
    }
}

fn fill_name_and_terms(site: &mut Site) -> booking_site::Result<()> {
    site.type_text("#fullName", "Nour Hassan")?;
    site.set_checked("#terms", true)
}

#[test]
fn opening_a_booking_renders_summary_and_fees() -> booking_site::Result<()> {
    let mut site = Site::from_html(EVENT_PAGE)?;
    site.click("#book-regular")?;

    assert!(site.modal_state().is_some_and(|state| state.visible));
    assert!(site.has_class("body", "modal-open")?);
    site.assert_text("#paymentModal .event-title", "Cairo Jazz Night")?;
    site.assert_text("#paymentModal .event-date", "Saturday, March 15, 2025")?;
    site.assert_text("#paymentModal .event-time", "8:00 PM")?;
    site.assert_text("#paymentModal .event-location", "Cairo Opera House")?;
    site.assert_text("#paymentModal .ticket-info", "Regular")?;
    site.assert_text("#paymentModal .subtotal", "500.00 EGP")?;
    site.assert_text("#paymentModal .service-fee", "25.00 EGP")?;
    site.assert_text("#paymentModal .vat-amount", "70.00 EGP")?;
    site.assert_text("#summary-total", "595.00 EGP")?;
    site.assert_text("#button-total", "595.00 EGP")?;

    assert_eq!(site.workflow_state(), WorkflowState::AwaitingConfirmation);
    assert_eq!(site.selected_payment_method(), None);
    assert_eq!(site.required_payment_fields()?, vec!["fullName"]);
    Ok(())
}

#[test]
fn fawry_booking_pays_after_delay_and_closes_modal() -> booking_site::Result<()> {
    let mut site = Site::from_html(EVENT_PAGE)?;
    site.click("#book-vip")?;
    site.click("#opt-fawry")?;
    fill_name_and_terms(&mut site)?;
    site.click("#confirmPayment")?;

    assert_eq!(site.workflow_state(), WorkflowState::Submitting);
    assert!(site.is_disabled("#confirmPayment")?);
    site.assert_text("#confirmPayment", " Processing...")?;
    assert!(site.take_alert_messages().is_empty());

    site.advance_time(1999)?;
    assert_eq!(site.workflow_state(), WorkflowState::Submitting);
    site.advance_time(1)?;

    assert_eq!(site.workflow_state(), WorkflowState::Succeeded);
    assert_eq!(
        site.take_alert_messages(),
        vec!["Payment successful! Check your email for confirmation."]
    );
    assert!(site.modal_state().is_some_and(|state| !state.visible));
    assert!(!site.has_class("body", "modal-open")?);
    assert!(!site.is_disabled("#confirmPayment")?);
    site.assert_text("#confirmPayment", "Confirm Payment")?;

    let receipt = site.last_receipt().expect("receipt");
    assert_eq!(receipt.reference, "TKT-000001");
    assert_eq!(receipt.method, PaymentMethod::CashVoucher);
    assert_eq!(receipt.amount, Decimal::new(142_860, 2));
    Ok(())
}

#[test]
fn card_payment_masks_inputs_and_charges_total() -> booking_site::Result<()> {
    let mut site = Site::from_html(EVENT_PAGE)?;
    site.click("#book-regular")?;
    site.click("#opt-card")?;
    assert_eq!(
        site.required_payment_fields()?,
        vec!["fullName", "cardNumber", "expiryDate", "cvv"]
    );

    fill_name_and_terms(&mut site)?;
    site.type_text("#cardNumber", "4111 1111 1111 1111 99")?;
    site.type_text("#expiryDate", "1230")?;
    site.type_text("#cvv", "12a34")?;
    site.assert_value("#cardNumber", "4111111111111111")?;
    site.assert_value("#expiryDate", "12/30")?;
    site.assert_value("#cvv", "123")?;

    site.click("#confirmPayment")?;
    site.flush()?;

    assert_eq!(site.workflow_state(), WorkflowState::Succeeded);
    assert_eq!(site.last_receipt().map(|r| r.amount), Some(Decimal::new(59_500, 2)));
    Ok(())
}

#[test]
fn custom_gateway_receives_the_booking_total() -> booking_site::Result<()> {
    let mut site = Site::from_html(EVENT_PAGE)?;
    site.set_gateway(RecordingGateway::default());
    site.click("#book-regular")?;
    site.click("#opt-fawry")?;
    fill_name_and_terms(&mut site)?;
    site.click("#confirmPayment")?;
    site.flush()?;

    assert_eq!(
        site.last_receipt().map(|r| r.reference.as_str()),
        Some("REC-1")
    );
    Ok(())
}

#[test]
fn submitting_without_method_alerts_and_marks_nothing() -> booking_site::Result<()> {
    let mut site = Site::from_html(EVENT_PAGE)?;
    site.click("#book-regular")?;
    site.click("#confirmPayment")?;

    assert_eq!(site.take_alert_messages(), vec!["Please select a payment method"]);
    assert_eq!(site.workflow_state(), WorkflowState::AwaitingConfirmation);
    assert!(site.pending_timers().is_empty());
    let state = site.modal_state().expect("modal");
    assert!(state.field_errors.is_empty());
    assert!(state.visible);
    assert!(!site.is_disabled("#confirmPayment")?);
    Ok(())
}

#[test]
fn blank_required_fields_are_flagged_on_their_groups() -> booking_site::Result<()> {
    let mut site = Site::from_html(EVENT_PAGE)?;
    site.click("#book-regular")?;
    site.click("#opt-wallet")?;
    site.click("#confirmPayment")?;

    assert_eq!(
        site.take_alert_messages(),
        vec!["Please fill in all required fields"]
    );
    let state = site.modal_state().expect("modal");
    assert!(state.field_errors.contains("fullName"));
    assert!(state.field_errors.contains("vodafoneNumber"));
    assert!(site.dump_dom("#paymentForm")?.contains("form-group error"));

    site.type_text("#fullName", "Nour Hassan")?;
    site.type_text("#vodafoneNumber", "01012345678")?;
    site.click("#confirmPayment")?;
    assert_eq!(
        site.take_alert_messages(),
        vec!["Please accept the terms and conditions"]
    );
    assert!(site.modal_state().expect("modal").field_errors.is_empty());
    Ok(())
}

#[test]
fn declined_payment_keeps_modal_open_for_retry() -> booking_site::Result<()> {
    let mut site = Site::from_html(EVENT_PAGE)?;
    let mut gateway = booking_site::SimulatedGateway::new();
    gateway.fail_next(GatewayError::Declined);
    site.set_gateway(gateway);

    site.click("#book-regular")?;
    site.click("#opt-fawry")?;
    fill_name_and_terms(&mut site)?;
    site.click("#confirmPayment")?;
    site.flush()?;

    assert_eq!(site.workflow_state(), WorkflowState::Failed);
    assert_eq!(
        site.take_alert_messages(),
        vec!["Payment failed. Please try again."]
    );
    assert_eq!(site.last_payment_error(), Some(&GatewayError::Declined));
    assert!(site.modal_state().is_some_and(|state| state.visible));
    assert!(!site.is_disabled("#confirmPayment")?);

    site.click("#confirmPayment")?;
    site.flush()?;
    assert_eq!(site.workflow_state(), WorkflowState::Succeeded);
    Ok(())
}

#[test]
fn invalid_wallet_number_is_rejected_by_gateway() -> booking_site::Result<()> {
    let mut site = Site::from_html(EVENT_PAGE)?;
    site.click("#book-regular")?;
    site.click("#opt-wallet")?;
    fill_name_and_terms(&mut site)?;
    site.type_text("#vodafoneNumber", "12345")?;
    site.click("#confirmPayment")?;
    site.flush()?;

    assert_eq!(site.workflow_state(), WorkflowState::Failed);
    assert_eq!(site.take_alert_messages(), vec!["Invalid payment details"]);
    Ok(())
}

#[test]
fn reopening_resets_previous_form_state() -> booking_site::Result<()> {
    let mut site = Site::from_html(EVENT_PAGE)?;
    site.click("#book-regular")?;
    site.click("#opt-card")?;
    site.type_text("#fullName", "Someone")?;
    site.click(".close-modal")?;

    assert_eq!(site.workflow_state(), WorkflowState::Idle);
    assert!(site.modal_state().is_some_and(|state| !state.visible));

    site.click("#book-vip")?;
    site.assert_value("#fullName", "")?;
    assert_eq!(site.selected_payment_method(), None);
    assert!(!site.has_class("#opt-card", "selected")?);
    assert_eq!(site.required_payment_fields()?, vec!["fullName"]);
    site.assert_text("#paymentModal .ticket-info", "VIP")?;
    site.assert_text("#summary-total", "1428.60 EGP")?;
    Ok(())
}

#[test]
fn backdrop_click_closes_but_inner_click_does_not() -> booking_site::Result<()> {
    let mut site = Site::from_html(EVENT_PAGE)?;
    site.click("#book-regular")?;

    site.click("#paymentModal .booking-summary")?;
    assert!(site.modal_state().is_some_and(|state| state.visible));

    site.click("#paymentModal")?;
    assert!(site.modal_state().is_some_and(|state| !state.visible));
    Ok(())
}

#[test]
fn new_booking_is_ignored_while_payment_in_flight() -> booking_site::Result<()> {
    let mut site = Site::from_html(EVENT_PAGE)?;
    site.click("#book-regular")?;
    site.click("#opt-fawry")?;
    fill_name_and_terms(&mut site)?;
    site.click("#confirmPayment")?;

    site.click("#book-vip")?;
    site.assert_text("#paymentModal .ticket-info", "Regular")?;
    assert_eq!(site.workflow_state(), WorkflowState::Submitting);

    site.submit("#paymentForm")?;
    assert_eq!(site.pending_timers().len(), 1);
    Ok(())
}

#[test]
fn opening_twice_rerenders_one_fresh_modal() -> booking_site::Result<()> {
    let mut site = Site::from_html(EVENT_PAGE)?;
    site.click("#book-regular")?;
    site.click("#opt-card")?;
    site.type_text("#cardNumber", "4111")?;

    site.click("#book-vip")?;
    assert!(site.modal_state().is_some_and(|state| state.visible));
    assert_eq!(site.selected_payment_method(), None);
    site.assert_value("#cardNumber", "")?;
    assert!(!site.dump_dom("#paymentForm")?.contains("active"));
    site.assert_text("#paymentModal .ticket-info", "VIP")?;
    assert_eq!(site.workflow_state(), WorkflowState::AwaitingConfirmation);
    Ok(())
}

#[test]
fn closing_the_modal_discards_the_selection() -> booking_site::Result<()> {
    let mut site = Site::from_html(EVENT_PAGE)?;
    site.click("#book-regular")?;
    site.click("#opt-card")?;
    site.click("#confirmPayment")?;
    assert!(!site.modal_state().expect("modal").field_errors.is_empty());

    site.click("#paymentModal")?;
    let state = site.modal_state().expect("modal");
    assert!(!state.visible);
    assert_eq!(state.selected_method, None);
    assert!(state.field_errors.is_empty());
    assert!(!site.has_class("#opt-card", "selected")?);
    assert!(!site.dump_dom("#paymentForm")?.contains("error"));
    assert_eq!(site.required_payment_fields()?, vec!["fullName"]);
    Ok(())
}

#[test]
fn switching_method_drops_errors_of_the_old_method() -> booking_site::Result<()> {
    let mut site = Site::from_html(EVENT_PAGE)?;
    site.click("#book-regular")?;
    site.click("#opt-card")?;
    site.type_text("#fullName", "Nour Hassan")?;
    site.click("#confirmPayment")?;
    assert_eq!(
        site.take_alert_messages(),
        vec!["Please fill in all required fields"]
    );
    let flagged = site.modal_state().expect("modal").field_errors;
    assert_eq!(
        flagged.iter().map(String::as_str).collect::<Vec<_>>(),
        vec!["cardNumber", "cvv", "expiryDate"]
    );

    site.click("#opt-fawry")?;
    assert!(site.modal_state().expect("modal").field_errors.is_empty());
    assert!(!site.dump_dom("#paymentForm")?.contains("form-group error"));

    site.click("#confirmPayment")?;
    assert_eq!(
        site.take_alert_messages(),
        vec!["Please accept the terms and conditions"]
    );
    let state = site.modal_state().expect("modal");
    assert_eq!(state.selected_method, Some(PaymentMethod::CashVoucher));
    assert!(state.field_errors.is_empty());
    Ok(())
}

#[test]
fn oversized_ticket_price_opens_without_overflow() -> booking_site::Result<()> {
    let page = EVENT_PAGE.replace("500 EGP", "70000000000000000000000000000 EGP");
    let mut site = Site::from_html(&page)?;
    site.click("#book-regular")?;

    assert!(site.modal_state().is_some_and(|state| state.visible));
    assert_eq!(site.workflow_state(), WorkflowState::AwaitingConfirmation);
    site.assert_text(
        "#paymentModal .subtotal",
        "70000000000000000000000000000.00 EGP",
    )?;
    site.assert_text(
        "#summary-total",
        &format!("{:.2} EGP", Decimal::MAX),
    )?;
    Ok(())
}
