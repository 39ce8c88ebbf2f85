/// Keystroke filters for the card inputs of the payment form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMask {
    CardNumber,
    Expiry,
    Cvv,
}

impl InputMask {
    pub fn for_field_id(id: &str) -> Option<Self> {
        match id {
            "cardNumber" => Some(InputMask::CardNumber),
            "expiryDate" => Some(InputMask::Expiry),
            "cvv" => Some(InputMask::Cvv),
            _ => None,
        }
    }

    pub fn apply(self, raw: &str) -> String {
        let digits = raw
            .chars()
            .filter(char::is_ascii_digit)
            .collect::<String>();
        match self {
            InputMask::CardNumber => digits.chars().take(16).collect(),
            InputMask::Cvv => digits.chars().take(3).collect(),
            InputMask::Expiry => {
                let with_slash = if digits.len() > 2 {
                    format!("{}/{}", &digits[..2], &digits[2..])
                } else {
                    digits
                };
                with_slash.chars().take(5).collect()
            }
        }
    }
}
