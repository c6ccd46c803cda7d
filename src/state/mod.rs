pub mod demo;
pub mod flow;
pub mod step;

pub use flow::{Flow, START_STEP, StepIndicator, StepStatus};
pub use step::{ItemSource, SelectStep, Step, TextStep};
