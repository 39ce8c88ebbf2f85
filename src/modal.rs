use std::collections::BTreeSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::Result;
use crate::dom::{Dom, NodeId};
use crate::fees::{FeeBreakdown, compute_fees, format_amount, parse_price};
use crate::payment_method::{MethodSelector, PaymentMethod};

const DATE_INPUT_FORMATS: &[&str] = &[
    "%A, %B %d, %Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%Y-%m-%d",
    "%m/%d/%Y",
];

const DATE_OUTPUT_FORMAT: &str = "%A, %B %-d, %Y";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventSummary {
    pub title: String,
    /// Display-formatted, e.g. `Saturday, March 15, 2025`.
    pub date: String,
    pub time: String,
    pub location: String,
}

impl EventSummary {
    /// Reads the event header of a details page. Missing regions read as
    /// empty strings.
    pub(crate) fn scrape(dom: &Dom, details: NodeId) -> Result<Self> {
        let title = dom
            .query_selector_from(details, "h1")?
            .map(|heading| dom.text_content(heading).trim().to_string())
            .unwrap_or_default();
        let date = icon_label(dom, details, ".fa-calendar")?;
        Ok(Self {
            title,
            date: format_event_date(&date),
            time: icon_label(dom, details, ".fa-clock")?,
            location: icon_label(dom, details, ".fa-map-marker-alt")?,
        })
    }
}

/// Trimmed text of the element wrapping an icon such as `.fa-clock`.
fn icon_label(dom: &Dom, scope: NodeId, icon: &str) -> Result<String> {
    Ok(dom
        .query_selector_from(scope, icon)?
        .and_then(|icon| dom.parent(icon))
        .map(|wrapper| dom.text_content(wrapper).trim().to_string())
        .unwrap_or_default())
}

/// Reformats a scraped event date as `Saturday, March 15, 2025`. Text that
/// does not parse as a date is returned trimmed.
pub fn format_event_date(raw: &str) -> String {
    let trimmed = raw.trim();
    DATE_INPUT_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
        .map(|date| date.format(DATE_OUTPUT_FORMAT).to_string())
        .unwrap_or_else(|| trimmed.to_string())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketSelection {
    pub label: String,
    pub unit_price: Decimal,
}

impl TicketSelection {
    pub(crate) fn scrape(dom: &Dom, ticket_type: NodeId) -> Result<Self> {
        let label = dom
            .query_selector_from(ticket_type, "h3")?
            .map(|heading| dom.text_content(heading).trim().to_string())
            .unwrap_or_default();
        let unit_price = dom
            .query_selector_from(ticket_type, ".price")?
            .map(|price| parse_price(&dom.text_content(price)))
            .unwrap_or(Decimal::ZERO);
        Ok(Self { label, unit_price })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModalState {
    pub visible: bool,
    pub selected_method: Option<PaymentMethod>,
    pub field_errors: BTreeSet<String>,
}

/// `#paymentModal` and the payment form inside it.
#[derive(Debug, Clone)]
pub(crate) struct PaymentModal {
    root: NodeId,
    form: Option<NodeId>,
    methods: Option<MethodSelector>,
    field_errors: BTreeSet<String>,
}

impl PaymentModal {
    pub(crate) fn bind(dom: &Dom) -> Result<Option<Self>> {
        let Some(root) = dom.by_id("paymentModal") else {
            return Ok(None);
        };
        let form = dom
            .by_id("paymentForm")
            .filter(|form| dom.contains(root, *form));
        let methods = match form {
            Some(form) => Some(MethodSelector::bind(dom, form, root)?),
            None => None,
        };
        Ok(Some(Self {
            root,
            form,
            methods,
            field_errors: BTreeSet::new(),
        }))
    }

    pub(crate) fn root(&self) -> NodeId {
        self.root
    }

    pub(crate) fn methods(&self) -> Option<&MethodSelector> {
        self.methods.as_ref()
    }

    pub(crate) fn is_visible(&self, dom: &Dom) -> bool {
        dom.style_get(self.root, "display").as_deref() == Some("block")
    }

    pub(crate) fn state(&self, dom: &Dom) -> ModalState {
        ModalState {
            visible: self.is_visible(dom),
            selected_method: self.selected_method(),
            field_errors: self.field_errors.clone(),
        }
    }

    pub(crate) fn selected_method(&self) -> Option<PaymentMethod> {
        self.methods.as_ref().and_then(MethodSelector::selected)
    }

    /// Resets the form, fills the slots and shows the modal. Opening an
    /// already visible modal re-renders it in place.
    pub(crate) fn open(
        &mut self,
        dom: &mut Dom,
        summary: &EventSummary,
        ticket: &TicketSelection,
        currency: &str,
    ) -> Result<FeeBreakdown> {
        self.reset(dom)?;
        let fees = compute_fees(ticket.unit_price);
        self.render(dom, summary, ticket, &fees, currency)?;
        dom.style_set(self.root, "display", "block")?;
        if let Some(body) = dom.body() {
            dom.class_add(body, "modal-open")?;
        }
        Ok(fees)
    }

    /// Hides the modal and drops whatever was selected or typed in it.
    pub(crate) fn close(&mut self, dom: &mut Dom) -> Result<()> {
        self.reset(dom)?;
        dom.style_set(self.root, "display", "none")?;
        if let Some(body) = dom.body() {
            dom.class_remove(body, "modal-open")?;
        }
        Ok(())
    }

    pub(crate) fn reset(&mut self, dom: &mut Dom) -> Result<()> {
        if let Some(form) = self.form {
            dom.reset_form(form)?;
            for marked in dom.query_selector_all_from(form, ".error")? {
                dom.class_remove(marked, "error")?;
            }
        }
        if let Some(methods) = self.methods.as_mut() {
            methods.clear(dom)?;
        }
        self.field_errors.clear();
        Ok(())
    }

    /// Switches the payment method. Fields of the other methods stop being
    /// required, so their error marks go too.
    pub(crate) fn select_method(&mut self, dom: &mut Dom, method: PaymentMethod) -> Result<()> {
        let Some(methods) = self.methods.as_mut() else {
            return Ok(());
        };
        methods.select(dom, method)?;
        let Some(form) = self.form else {
            return Ok(());
        };
        for other in PaymentMethod::ALL.into_iter().filter(|other| *other != method) {
            for field_id in other.required_fields() {
                let Some(control) = dom.by_id(field_id).filter(|field| dom.contains(form, *field))
                else {
                    continue;
                };
                self.mark_field(dom, field_id, control, false)?;
            }
        }
        Ok(())
    }

    /// Flags the `.form-group` around `control`.
    pub(crate) fn mark_field(
        &mut self,
        dom: &mut Dom,
        key: &str,
        control: NodeId,
        invalid: bool,
    ) -> Result<()> {
        if invalid {
            self.field_errors.insert(key.to_string());
        } else {
            self.field_errors.remove(key);
        }
        let Some(group) = dom.closest(control, ".form-group")? else {
            return Ok(());
        };
        if invalid {
            dom.class_add(group, "error")
        } else {
            dom.class_remove(group, "error")
        }
    }

    fn render(
        &self,
        dom: &mut Dom,
        summary: &EventSummary,
        ticket: &TicketSelection,
        fees: &FeeBreakdown,
        currency: &str,
    ) -> Result<()> {
        self.fill_slot(dom, ".event-title", &summary.title)?;
        self.fill_slot(dom, ".event-date", &summary.date)?;
        self.fill_slot(dom, ".event-time", &summary.time)?;
        self.fill_slot(dom, ".event-location", &summary.location)?;
        self.fill_slot(dom, ".ticket-info", &ticket.label)?;
        self.fill_slot(dom, ".subtotal", &format_amount(fees.subtotal, currency))?;
        self.fill_slot(dom, ".service-fee", &format_amount(fees.service_fee, currency))?;
        self.fill_slot(dom, ".vat-amount", &format_amount(fees.vat, currency))?;

        let total = format_amount(fees.total, currency);
        for slot in dom.query_selector_all_from(self.root, ".total-amount")? {
            dom.set_text_content(slot, &total)?;
        }
        Ok(())
    }

    fn fill_slot(&self, dom: &mut Dom, selector: &str, text: &str) -> Result<()> {
        if let Some(slot) = dom.query_selector_from(self.root, selector)? {
            dom.set_text_content(slot, text)?;
        }
        Ok(())
    }
}
