pub mod outcome;
pub mod runner;
pub mod select;
pub mod text;

pub use outcome::{StepOutcome, StepPosition};
pub use runner::{StepRunner, run};
