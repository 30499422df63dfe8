// src/form/submit.rs

use thiserror::Error;
use tokio_util::sync::CancellationToken;

pub const IDLE_LABEL: &str = "Generate Microsite";
pub const BUSY_LABEL: &str = "Generating...";

/// Reasons a submission never leaves the builder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitRejection {
    #[error("Please enter a business name")]
    MissingBusinessName,

    #[error("Please add at least one product")]
    NoNamedProduct,

    #[error("Your microsite is already being generated")]
    AlreadySubmitting,
}

/// Checks run before anything is sent: business name first, then at least one
/// named product. Stops at the first failure.
pub fn validate_submission<'a, I>(business_name: &str, product_names: I) -> Result<(), SubmitRejection>
where
    I: IntoIterator<Item = &'a str>,
{
    if business_name.trim().is_empty() {
        return Err(SubmitRejection::MissingBusinessName);
    }
    if !product_names.into_iter().any(|name| !name.trim().is_empty()) {
        return Err(SubmitRejection::NoNamedProduct);
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitState {
    Idle,
    Submitting { attempt: u64 },
}

/// Handle for one accepted submission. The token cancels the pending reset.
#[derive(Debug, Clone)]
pub struct SubmitTicket {
    pub attempt: u64,
    pub reset: CancellationToken,
}

#[derive(Debug)]
pub struct SubmitButton {
    state: SubmitState,
    attempts: u64,
    pending_reset: Option<CancellationToken>,
}

impl Default for SubmitButton {
    fn default() -> Self {
        Self {
            state: SubmitState::Idle,
            attempts: 0,
            pending_reset: None,
        }
    }
}

impl SubmitButton {
    pub fn state(&self) -> SubmitState {
        self.state
    }

    pub fn is_disabled(&self) -> bool {
        matches!(self.state, SubmitState::Submitting { .. })
    }

    pub fn label(&self) -> &'static str {
        match self.state {
            SubmitState::Idle => IDLE_LABEL,
            SubmitState::Submitting { .. } => BUSY_LABEL,
        }
    }

    /// Idle -> Submitting. Any reset still pending from an earlier attempt is
    /// cancelled so it cannot touch this one.
    pub fn begin(&mut self) -> Result<SubmitTicket, SubmitRejection> {
        if self.is_disabled() {
            return Err(SubmitRejection::AlreadySubmitting);
        }
        if let Some(stale) = self.pending_reset.take() {
            stale.cancel();
        }
        self.attempts += 1;
        let token = CancellationToken::new();
        self.pending_reset = Some(token.clone());
        self.state = SubmitState::Submitting {
            attempt: self.attempts,
        };
        Ok(SubmitTicket {
            attempt: self.attempts,
            reset: token,
        })
    }

    /// The submission for `attempt` finished; back to Idle and drop the timer.
    pub fn finish(&mut self, attempt: u64) -> bool {
        if !self.owns(attempt) {
            return false;
        }
        if let Some(token) = self.pending_reset.take() {
            token.cancel();
        }
        self.state = SubmitState::Idle;
        true
    }

    /// The reset timer for `attempt` fired. Ignored if that attempt is no
    /// longer the current one.
    pub fn time_out(&mut self, attempt: u64) -> bool {
        if !self.owns(attempt) {
            return false;
        }
        self.pending_reset = None;
        self.state = SubmitState::Idle;
        true
    }

    fn owns(&self, attempt: u64) -> bool {
        self.state == SubmitState::Submitting { attempt }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn business_name_is_checked_first() {
        let result = validate_submission("   ", ["", " "]);
        assert_eq!(result, Err(SubmitRejection::MissingBusinessName));
    }

    #[test]
    fn blank_product_names_are_rejected() {
        let result = validate_submission("Acme", ["", "  \t"]);
        assert_eq!(result, Err(SubmitRejection::NoNamedProduct));
        assert_eq!(
            SubmitRejection::NoNamedProduct.to_string(),
            "Please add at least one product"
        );
    }

    #[test]
    fn one_named_product_is_enough() {
        assert!(validate_submission("Acme", ["", "Widget"]).is_ok());
    }

    #[test]
    fn begin_disables_and_is_not_reentrant() {
        let mut button = SubmitButton::default();
        let ticket = button.begin().unwrap();
        assert!(button.is_disabled());
        assert_eq!(button.label(), BUSY_LABEL);
        assert_eq!(button.begin().unwrap_err(), SubmitRejection::AlreadySubmitting);

        assert!(button.finish(ticket.attempt));
        assert!(ticket.reset.is_cancelled());
        assert_eq!(button.label(), IDLE_LABEL);
    }

    #[test]
    fn stale_timeout_does_not_reset_newer_attempt() {
        let mut button = SubmitButton::default();
        let first = button.begin().unwrap();
        button.time_out(first.attempt);
        let second = button.begin().unwrap();

        assert!(!button.time_out(first.attempt));
        assert_eq!(button.state(), SubmitState::Submitting { attempt: second.attempt });
    }

    #[test]
    fn new_attempt_cancels_leftover_reset() {
        let mut button = SubmitButton::default();
        let first = button.begin().unwrap();
        // Finished through a path that kept the token, e.g. a timeout race.
        button.state = SubmitState::Idle;
        let _second = button.begin().unwrap();
        assert!(first.reset.is_cancelled());
    }
}
