use tracing::{debug, warn};

use crate::state::flow::{Flow, StepIndicator};
use crate::view::ViewButton;

/// How a single step visit ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The value passed the step's accept rule and was written.
    Accepted,
    /// Accepted with no-op write: an extra button advanced past the step.
    Skipped,
    Back,
    Dismissed,
}

/// What a step view needs to know about its place in the flow.
#[derive(Debug, Clone, Copy)]
pub struct StepPosition {
    pub indicator: Option<StepIndicator>,
    pub has_back: bool,
}

impl StepPosition {
    pub fn of(flow: &Flow) -> Self {
        Self {
            indicator: flow.indicator(),
            has_back: flow.has_back(),
        }
    }

    pub fn buttons(&self, extra: &[String]) -> Vec<ViewButton> {
        let back = self.has_back.then_some(ViewButton::Back);
        back.into_iter()
            .chain(extra.iter().cloned().map(ViewButton::Custom))
            .collect()
    }

    /// `None` means the button does nothing here and the view keeps waiting.
    pub fn button_outcome(&self, button: ViewButton) -> Option<StepOutcome> {
        match button {
            ViewButton::Back if self.has_back => Some(StepOutcome::Back),
            ViewButton::Back => {
                warn!("back requested on the first step, ignoring");
                None
            }
            ViewButton::Custom(label) => {
                debug!(button = %label, "advancing without writing a value");
                Some(StepOutcome::Skipped)
            }
        }
    }
}
