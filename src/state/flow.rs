use crate::core::error::{WizardError, WizardResult};

pub const START_STEP: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Pending,
    Active,
    Done,
    Skipped,
    Cancelled,
}

/// 1-based position shown on a view as "step / total".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepIndicator {
    pub step: usize,
    pub total: usize,
}

/// Cursor over `[START_STEP, total]` plus one status per step.
#[derive(Debug, Clone)]
pub struct Flow {
    cursor: usize,
    statuses: Vec<StepStatus>,
}

impl Flow {
    pub fn new(total: usize) -> Self {
        Self::starting_at(total, START_STEP)
    }

    pub(crate) fn starting_at(total: usize, cursor: usize) -> Self {
        Self {
            cursor,
            statuses: vec![StepStatus::Pending; total],
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn total(&self) -> usize {
        self.statuses.len()
    }

    /// Index into the step slice for the current cursor.
    pub fn index(&self) -> usize {
        self.cursor - START_STEP
    }

    pub fn check(&self) -> WizardResult<()> {
        if self.cursor < START_STEP || self.cursor > self.total() {
            return Err(WizardError::StepOutOfRange {
                step: self.cursor,
                total: self.total(),
            });
        }
        Ok(())
    }

    pub fn has_back(&self) -> bool {
        self.cursor > START_STEP
    }

    pub fn indicator(&self) -> Option<StepIndicator> {
        self.has_back().then_some(StepIndicator {
            step: self.cursor,
            total: self.total(),
        })
    }

    pub fn is_complete(&self) -> bool {
        self.cursor > self.total()
    }

    /// The step under the cursor reads as `Active` unless it was cancelled;
    /// every other step keeps the status its last visit settled on.
    pub fn status_at(&self, step: usize) -> StepStatus {
        let settled = step
            .checked_sub(START_STEP)
            .and_then(|i| self.statuses.get(i))
            .copied()
            .unwrap_or(StepStatus::Pending);
        if step == self.cursor && settled != StepStatus::Cancelled {
            StepStatus::Active
        } else {
            settled
        }
    }

    pub fn current_status(&self) -> StepStatus {
        self.status_at(self.cursor)
    }

    /// Marks the current step finished and moves forward. Returns `true` once
    /// the cursor has passed the last step.
    pub fn advance(&mut self, skipped: bool) -> bool {
        self.set_current(if skipped {
            StepStatus::Skipped
        } else {
            StepStatus::Done
        });
        self.cursor += 1;
        self.is_complete()
    }

    /// Moves back one step. Never goes below `START_STEP`. The step being
    /// left keeps its status.
    pub fn retreat(&mut self) -> bool {
        if !self.has_back() {
            return false;
        }
        self.cursor -= 1;
        true
    }

    pub fn cancel_current(&mut self) {
        self.set_current(StepStatus::Cancelled);
    }

    fn set_current(&mut self, status: StepStatus) {
        if let Some(slot) = self
            .cursor
            .checked_sub(START_STEP)
            .and_then(|i| self.statuses.get_mut(i))
        {
            *slot = status;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Flow, START_STEP, StepIndicator, StepStatus};
    use crate::core::error::WizardError;

    #[test]
    fn starts_at_first_step_without_back() {
        let flow = Flow::new(3);
        assert_eq!(flow.cursor(), START_STEP);
        assert_eq!(flow.index(), 0);
        assert!(!flow.has_back());
        assert_eq!(flow.indicator(), None);
        assert_eq!(flow.current_status(), StepStatus::Active);
        assert!(flow.check().is_ok());
    }

    #[test]
    fn advance_and_retreat_update_statuses() {
        let mut flow = Flow::new(3);
        assert!(!flow.advance(false));
        assert_eq!(flow.status_at(1), StepStatus::Done);
        assert_eq!(flow.current_status(), StepStatus::Active);
        assert_eq!(flow.indicator(), Some(StepIndicator { step: 2, total: 3 }));

        assert!(flow.retreat());
        assert_eq!(flow.cursor(), 1);
        assert_eq!(flow.status_at(2), StepStatus::Pending);
        assert!(!flow.retreat());
        assert_eq!(flow.cursor(), 1);
    }

    #[test]
    fn retreat_keeps_progress_of_steps_left_behind() {
        let mut flow = Flow::new(3);
        flow.advance(false);
        flow.advance(true);
        assert_eq!(flow.current_status(), StepStatus::Active);

        assert!(flow.retreat());
        assert_eq!(flow.status_at(3), StepStatus::Pending);
        assert_eq!(flow.status_at(2), StepStatus::Active);

        assert!(flow.retreat());
        assert_eq!(flow.status_at(2), StepStatus::Skipped);
        assert_eq!(flow.status_at(1), StepStatus::Active);

        assert!(!flow.advance(false));
        assert_eq!(flow.status_at(1), StepStatus::Done);
        assert_eq!(flow.status_at(2), StepStatus::Active);
    }

    #[test]
    fn advancing_past_last_step_completes() {
        let mut flow = Flow::new(2);
        assert!(!flow.advance(true));
        assert_eq!(flow.status_at(1), StepStatus::Skipped);
        assert!(flow.advance(false));
        assert!(flow.is_complete());
        assert_eq!(flow.status_at(2), StepStatus::Done);
    }

    #[test]
    fn check_rejects_out_of_range_cursor() {
        let flow = Flow::starting_at(2, 0);
        assert!(matches!(
            flow.check(),
            Err(WizardError::StepOutOfRange { step: 0, total: 2 })
        ));
        let flow = Flow::starting_at(2, 3);
        assert!(flow.check().is_err());
    }

    #[test]
    fn cancel_marks_current() {
        let mut flow = Flow::new(1);
        flow.cancel_current();
        assert_eq!(flow.current_status(), StepStatus::Cancelled);
    }
}
