use thiserror::Error;

use crate::fees::FeeBreakdown;
use crate::gateway::{GatewayError, Receipt};
use crate::modal::{EventSummary, TicketSelection};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    Idle,
    AwaitingConfirmation,
    Submitting,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error("cannot {action} while {state:?}")]
    IllegalTransition {
        action: &'static str,
        state: WorkflowState,
    },
}

/// What the user is paying for, captured when the modal opens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Booking {
    pub summary: EventSummary,
    pub ticket: TicketSelection,
    pub fees: FeeBreakdown,
}

/// Booking lifecycle without any DOM or timers attached.
///
/// ```text
/// Idle -> AwaitingConfirmation -> Submitting -> Succeeded | Failed
///                 ^                                  |
///                 +------------- open / retry -------+
/// ```
#[derive(Debug, Clone)]
pub struct BookingWorkflow {
    state: WorkflowState,
    booking: Option<Booking>,
    last_receipt: Option<Receipt>,
    last_error: Option<GatewayError>,
}

impl Default for BookingWorkflow {
    fn default() -> Self {
        Self::new()
    }
}

impl BookingWorkflow {
    pub fn new() -> Self {
        Self {
            state: WorkflowState::Idle,
            booking: None,
            last_receipt: None,
            last_error: None,
        }
    }

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    pub fn booking(&self) -> Option<&Booking> {
        self.booking.as_ref()
    }

    pub fn last_receipt(&self) -> Option<&Receipt> {
        self.last_receipt.as_ref()
    }

    pub fn last_error(&self) -> Option<&GatewayError> {
        self.last_error.as_ref()
    }

    /// Starts a new booking. Refused while a submission is in flight.
    pub fn open(&mut self, booking: Booking) -> Result<(), WorkflowError> {
        self.ensure_not(WorkflowState::Submitting, "open a booking")?;
        self.booking = Some(booking);
        self.last_receipt = None;
        self.last_error = None;
        self.transition(WorkflowState::AwaitingConfirmation);
        Ok(())
    }

    /// User dismissed the modal. An in-flight submission keeps running.
    pub fn close(&mut self) {
        if self.state != WorkflowState::Submitting {
            self.transition(WorkflowState::Idle);
        }
    }

    /// Moves to `Submitting` once the form passed validation. Allowed from
    /// `AwaitingConfirmation` and, for a retry, from `Failed`.
    pub fn begin_submit(&mut self) -> Result<&Booking, WorkflowError> {
        let can_submit = matches!(
            self.state,
            WorkflowState::AwaitingConfirmation | WorkflowState::Failed
        );
        if !can_submit || self.booking.is_none() {
            return Err(WorkflowError::IllegalTransition {
                action: "submit",
                state: self.state,
            });
        }
        self.transition(WorkflowState::Submitting);
        self.booking.as_ref().ok_or(WorkflowError::IllegalTransition {
            action: "submit",
            state: WorkflowState::Submitting,
        })
    }

    pub fn settle(&mut self, outcome: Result<Receipt, GatewayError>) -> Result<(), WorkflowError> {
        if self.state != WorkflowState::Submitting {
            return Err(WorkflowError::IllegalTransition {
                action: "settle",
                state: self.state,
            });
        }
        match outcome {
            Ok(receipt) => {
                log::info!("payment settled reference={}", receipt.reference);
                self.last_receipt = Some(receipt);
                self.last_error = None;
                self.transition(WorkflowState::Succeeded);
            }
            Err(err) => {
                log::info!("payment failed: {err}");
                self.last_error = Some(err);
                self.transition(WorkflowState::Failed);
            }
        }
        Ok(())
    }

    fn ensure_not(&self, state: WorkflowState, action: &'static str) -> Result<(), WorkflowError> {
        if self.state == state {
            return Err(WorkflowError::IllegalTransition {
                action,
                state: self.state,
            });
        }
        Ok(())
    }

    fn transition(&mut self, next: WorkflowState) {
        if self.state != next {
            log::info!("booking workflow {:?} -> {:?}", self.state, next);
        }
        self.state = next;
    }
}
