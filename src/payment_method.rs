use std::fmt;

use crate::Result;
use crate::dom::{Dom, NodeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentMethod {
    CreditCard,
    MobileWallet,
    CashVoucher,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 3] = [
        PaymentMethod::CreditCard,
        PaymentMethod::MobileWallet,
        PaymentMethod::CashVoucher,
    ];

    /// The `data-method` value used in markup.
    pub fn key(self) -> &'static str {
        match self {
            PaymentMethod::CreditCard => "credit-card",
            PaymentMethod::MobileWallet => "vodafone-cash",
            PaymentMethod::CashVoucher => "fawry",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|method| method.key() == key.trim())
    }

    /// Ids of the inputs this method needs filled in.
    pub fn required_fields(self) -> &'static [&'static str] {
        match self {
            PaymentMethod::CreditCard => &["cardNumber", "expiryDate", "cvv"],
            PaymentMethod::MobileWallet => &["vodafoneNumber"],
            PaymentMethod::CashVoucher => &[],
        }
    }

    /// Class of the details panel shown while this method is selected.
    pub fn details_class(self) -> String {
        format!("{}-details", self.key())
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PaymentMethod::CreditCard => "Credit Card",
            PaymentMethod::MobileWallet => "Vodafone Cash",
            PaymentMethod::CashVoucher => "Fawry",
        };
        f.write_str(label)
    }
}

/// The method options and detail panels of the payment form.
#[derive(Debug, Clone)]
pub(crate) struct MethodSelector {
    form: NodeId,
    options: Vec<(PaymentMethod, NodeId)>,
    panels: Vec<(PaymentMethod, NodeId)>,
    selected: Option<PaymentMethod>,
}

impl MethodSelector {
    pub(crate) fn bind(dom: &Dom, form: NodeId, scope: NodeId) -> Result<Self> {
        let mut options = Vec::new();
        for option in dom.query_selector_all_from(scope, ".payment-method[data-method]")? {
            let key = dom.attr(option, "data-method").unwrap_or_default();
            match PaymentMethod::from_key(&key) {
                Some(method) => options.push((method, option)),
                None => log::warn!("ignoring unknown payment method option {key:?}"),
            }
        }

        let mut panels = Vec::new();
        for method in PaymentMethod::ALL {
            let selector = format!(".payment-details-section.{}", method.details_class());
            if let Some(panel) = dom.query_selector_from(scope, &selector)? {
                panels.push((method, panel));
            }
        }

        Ok(Self {
            form,
            options,
            panels,
            selected: None,
        })
    }

    pub(crate) fn selected(&self) -> Option<PaymentMethod> {
        self.selected
    }

    pub(crate) fn method_for_option(&self, node: NodeId) -> Option<PaymentMethod> {
        self.options
            .iter()
            .find(|(_, option)| *option == node)
            .map(|(method, _)| *method)
    }

    pub(crate) fn options(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.options.iter().map(|(_, option)| *option)
    }

    /// Marks `method` as chosen, shows only its panel and makes exactly its
    /// fields required.
    pub(crate) fn select(&mut self, dom: &mut Dom, method: PaymentMethod) -> Result<()> {
        for (option_method, option) in &self.options {
            if *option_method == method {
                dom.class_add(*option, "selected")?;
            } else {
                dom.class_remove(*option, "selected")?;
            }
        }
        for (panel_method, panel) in &self.panels {
            if *panel_method == method {
                dom.class_add(*panel, "active")?;
            } else {
                dom.class_remove(*panel, "active")?;
            }
        }
        self.sync_required(dom, Some(method))?;
        self.selected = Some(method);
        Ok(())
    }

    pub(crate) fn clear(&mut self, dom: &mut Dom) -> Result<()> {
        for (_, option) in &self.options {
            dom.class_remove(*option, "selected")?;
        }
        for (_, panel) in &self.panels {
            dom.class_remove(*panel, "active")?;
        }
        self.sync_required(dom, None)?;
        self.selected = None;
        Ok(())
    }

    fn sync_required(&self, dom: &mut Dom, selected: Option<PaymentMethod>) -> Result<()> {
        for method in PaymentMethod::ALL {
            let required = selected == Some(method);
            for field_id in method.required_fields() {
                let Some(field) = dom.by_id(field_id) else {
                    continue;
                };
                if dom.contains(self.form, field) {
                    dom.set_required(field, required)?;
                }
            }
        }
        Ok(())
    }

    /// Ids of every control in the form currently flagged required.
    pub(crate) fn required_field_ids(&self, dom: &Dom) -> Result<Vec<String>> {
        Ok(dom
            .query_selector_all_from(self.form, "input, select, textarea")?
            .into_iter()
            .filter(|control| dom.required(*control))
            .filter_map(|control| dom.attr(control, "id"))
            .collect())
    }
}
