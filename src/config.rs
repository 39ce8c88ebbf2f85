/// Tunables for a [`crate::Site`]. Delays are in virtual milliseconds.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteConfig {
    pub payment_delay_ms: i64,
    pub booking_delay_ms: i64,
    pub password_reset_delay_ms: i64,
    pub error_display_ms: i64,
    /// Intersection ratio at which a reveal target becomes visible.
    pub reveal_threshold: f64,
    pub currency: String,
    /// Where login and logout send the user.
    pub home_url: String,
    pub timer_step_limit: usize,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            payment_delay_ms: 2000,
            booking_delay_ms: 1500,
            password_reset_delay_ms: 1500,
            error_display_ms: 3000,
            reveal_threshold: 0.1,
            currency: "EGP".to_string(),
            home_url: "index.html".to_string(),
            timer_step_limit: 10_000,
        }
    }
}

impl SiteConfig {
    pub fn with_payment_delay_ms(mut self, delay_ms: i64) -> Self {
        self.payment_delay_ms = delay_ms;
        self
    }

    pub fn with_booking_delay_ms(mut self, delay_ms: i64) -> Self {
        self.booking_delay_ms = delay_ms;
        self
    }

    pub fn with_password_reset_delay_ms(mut self, delay_ms: i64) -> Self {
        self.password_reset_delay_ms = delay_ms;
        self
    }

    pub fn with_error_display_ms(mut self, display_ms: i64) -> Self {
        self.error_display_ms = display_ms;
        self
    }

    pub fn with_reveal_threshold(mut self, threshold: f64) -> Self {
        self.reveal_threshold = threshold;
        self
    }

    pub fn with_currency(mut self, currency: &str) -> Self {
        self.currency = currency.to_string();
        self
    }

    pub fn with_home_url(mut self, url: &str) -> Self {
        self.home_url = url.to_string();
        self
    }

    pub fn with_timer_step_limit(mut self, max_steps: usize) -> Self {
        self.timer_step_limit = max_steps;
        self
    }
}
