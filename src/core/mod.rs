pub mod error;
pub mod item;
pub mod result;

pub use error::{WizardError, WizardResult};
pub use item::SelectItem;
pub use result::{StepResult, assemble};
