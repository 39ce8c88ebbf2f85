use rust_decimal::Decimal;
use thiserror::Error;

use crate::payment_method::PaymentMethod;

/// Everything the payment form holds at submit time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentDetails {
    pub method: PaymentMethod,
    pub card_number: String,
    pub expiry_date: String,
    pub cvv: String,
    pub phone: String,
    pub amount: Decimal,
}

impl PaymentDetails {
    pub fn new(method: PaymentMethod, amount: Decimal) -> Self {
        Self {
            method,
            card_number: String::new(),
            expiry_date: String::new(),
            cvv: String::new(),
            phone: String::new(),
            amount,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub reference: String,
    pub method: PaymentMethod,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("invalid payment details: {0}")]
    InvalidDetails(String),
    #[error("payment declined")]
    Declined,
    #[error("payment service unavailable")]
    Unavailable,
}

impl GatewayError {
    /// Text shown to the user when a submission fails.
    pub fn user_message(&self) -> &'static str {
        match self {
            GatewayError::InvalidDetails(_) => "Invalid payment details",
            GatewayError::Declined | GatewayError::Unavailable => {
                "Payment failed. Please try again."
            }
        }
    }
}

pub trait PaymentGateway {
    fn submit(&mut self, details: &PaymentDetails) -> Result<Receipt, GatewayError>;
}

/// Checks the per-method shape of the details. No network is involved.
pub fn validate_payment_details(details: &PaymentDetails) -> Result<(), GatewayError> {
    match details.method {
        PaymentMethod::CreditCard => {
            let digits = details
                .card_number
                .chars()
                .filter(|ch| !ch.is_whitespace())
                .collect::<String>();
            if !(13..=19).contains(&digits.len()) || !passes_luhn(&digits) {
                return Err(GatewayError::InvalidDetails("card number".into()));
            }
            if !is_valid_expiry(&details.expiry_date) {
                return Err(GatewayError::InvalidDetails("expiry date".into()));
            }
            if details.cvv.len() != 3 || !details.cvv.bytes().all(|b| b.is_ascii_digit()) {
                return Err(GatewayError::InvalidDetails("cvv".into()));
            }
        }
        PaymentMethod::MobileWallet => {
            let phone = details.phone.trim();
            if phone.len() != 11
                || !phone.starts_with("01")
                || !phone.bytes().all(|b| b.is_ascii_digit())
            {
                return Err(GatewayError::InvalidDetails("wallet number".into()));
            }
        }
        PaymentMethod::CashVoucher => {}
    }
    Ok(())
}

fn passes_luhn(digits: &str) -> bool {
    let mut sum = 0u32;
    for (idx, byte) in digits.bytes().rev().enumerate() {
        if !byte.is_ascii_digit() {
            return false;
        }
        let mut digit = u32::from(byte - b'0');
        if idx % 2 == 1 {
            digit *= 2;
            if digit > 9 {
                digit -= 9;
            }
        }
        sum += digit;
    }
    sum % 10 == 0
}

fn is_valid_expiry(expiry: &str) -> bool {
    let Some((month, year)) = expiry.split_once('/') else {
        return false;
    };
    if month.len() != 2 || year.len() != 2 {
        return false;
    }
    if !month.bytes().chain(year.bytes()).all(|b| b.is_ascii_digit()) {
        return false;
    }
    matches!(month.parse::<u8>(), Ok(1..=12))
}

/// Accepts well-formed details and hands out sequential `TKT-` references.
#[derive(Debug, Default)]
pub struct SimulatedGateway {
    issued: u64,
    queued_failures: Vec<GatewayError>,
    submissions: Vec<PaymentDetails>,
}

impl SimulatedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next submission fail with `error`. Calls stack up and are
    /// consumed in order.
    pub fn fail_next(&mut self, error: GatewayError) {
        self.queued_failures.push(error);
    }

    pub fn submissions(&self) -> &[PaymentDetails] {
        &self.submissions
    }
}

impl PaymentGateway for SimulatedGateway {
    fn submit(&mut self, details: &PaymentDetails) -> Result<Receipt, GatewayError> {
        self.submissions.push(details.clone());
        if !self.queued_failures.is_empty() {
            return Err(self.queued_failures.remove(0));
        }
        validate_payment_details(details)?;
        self.issued += 1;
        Ok(Receipt {
            reference: format!("TKT-{:06}", self.issued),
            method: details.method,
            amount: details.amount,
        })
    }
}
