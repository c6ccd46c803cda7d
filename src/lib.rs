pub mod config;
pub mod core;
pub mod host;
pub mod logging;
pub mod runtime;
pub mod state;
pub mod view;
pub mod widgets;

pub use crate::core::{SelectItem, StepResult, WizardError, WizardResult};
pub use runtime::{StepRunner, run};
pub use state::{ItemSource, SelectStep, START_STEP, Step, TextStep};
pub use view::{SelectView, StepView, TextView, ViewButton, ViewEvent, ViewHost};
pub use widgets::validators;
