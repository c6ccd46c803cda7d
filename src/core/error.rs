use std::io;
use thiserror::Error;

/// Failures that cross the run loop boundary.
///
/// Navigation (back, skip, dismiss) and validation are not errors and never
/// show up here.
#[derive(Debug, Error)]
pub enum WizardError {
    /// The cursor left `[1, total]`. The transition logic is broken.
    #[error("step {step} is outside the declared range 1..={total}")]
    StepOutOfRange { step: usize, total: usize },

    /// The view host failed to create, show or read a view.
    #[error("view host failed: {0}")]
    Io(#[from] io::Error),
}

pub type WizardResult<T> = Result<T, WizardError>;
