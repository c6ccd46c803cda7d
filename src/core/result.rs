use serde::{Deserialize, Serialize};

use crate::core::item::SelectItem;
use crate::state::step::Step;

/// The collected value of one step, in the step's declared kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StepResult {
    Selection(Vec<SelectItem>),
    Text(Option<String>),
}

impl StepResult {
    pub fn as_selection(&self) -> Option<&[SelectItem]> {
        match self {
            Self::Selection(items) => Some(items.as_slice()),
            Self::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => value.as_deref(),
            Self::Selection(_) => None,
        }
    }

    pub fn labels(&self) -> Vec<&str> {
        self.as_selection()
            .map(|items| items.iter().map(SelectItem::label).collect())
            .unwrap_or_default()
    }
}

/// Projects every step's slot into the final result list.
///
/// Only called once all steps have been accepted or skipped.
pub fn assemble(steps: &[Step]) -> Vec<StepResult> {
    steps
        .iter()
        .map(|step| match step {
            Step::Select(select) => StepResult::Selection(select.selected_items.clone()),
            Step::Text(text) => StepResult::Text(text.value.clone()),
        })
        .collect()
}
