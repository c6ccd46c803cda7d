use tracing::{debug, error, info};

use crate::core::error::WizardResult;
use crate::core::result::{StepResult, assemble};
use crate::runtime::outcome::{StepOutcome, StepPosition};
use crate::runtime::select::show_select_step;
use crate::runtime::text::show_text_step;
use crate::state::flow::{Flow, START_STEP};
use crate::state::step::Step;
use crate::view::ViewHost;

/// Drives a list of steps one visit at a time.
///
/// Steps stay owned by the caller; their result slots are updated in place.
pub struct StepRunner<'a, H: ViewHost> {
    host: &'a mut H,
    steps: &'a mut [Step],
    flow: Flow,
}

impl<'a, H: ViewHost> StepRunner<'a, H> {
    pub fn new(host: &'a mut H, steps: &'a mut [Step]) -> Self {
        let flow = Flow::new(steps.len());
        Self { host, steps, flow }
    }

    pub fn flow(&self) -> &Flow {
        &self.flow
    }

    /// `Ok(None)` when the list is empty or the user dismissed a step.
    pub async fn run(&mut self) -> WizardResult<Option<Vec<StepResult>>> {
        if self.steps.is_empty() {
            error!("invalid steps: the step list is empty");
            return Ok(None);
        }
        self.step_through(START_STEP).await
    }

    pub(crate) async fn step_through(
        &mut self,
        start: usize,
    ) -> WizardResult<Option<Vec<StepResult>>> {
        self.flow = Flow::starting_at(self.steps.len(), start);

        loop {
            self.flow.check()?;

            let cursor = self.flow.cursor();
            let outcome = self.step().await?;
            debug!(step = cursor, total = self.flow.total(), ?outcome, "step finished");

            match outcome {
                StepOutcome::Accepted | StepOutcome::Skipped => {
                    if self.flow.advance(outcome == StepOutcome::Skipped) {
                        info!(steps = self.steps.len(), "all steps completed");
                        return Ok(Some(assemble(self.steps)));
                    }
                }
                StepOutcome::Back => {
                    self.flow.retreat();
                }
                StepOutcome::Dismissed => {
                    self.flow.cancel_current();
                    info!(step = cursor, "cancel step");
                    return Ok(None);
                }
            }
        }
    }

    async fn step(&mut self) -> WizardResult<StepOutcome> {
        let position = StepPosition::of(&self.flow);
        let step = &mut self.steps[self.flow.index()];
        debug!(
            step = self.flow.cursor(),
            kind = step.kind(),
            title = step.title(),
            "showing step"
        );

        match step {
            Step::Select(select) => show_select_step(&mut *self.host, select, position).await,
            Step::Text(text) => show_text_step(&mut *self.host, text, position).await,
        }
    }
}

/// Runs `steps` to completion against `host`.
pub async fn run<H: ViewHost>(
    host: &mut H,
    steps: &mut [Step],
) -> WizardResult<Option<Vec<StepResult>>> {
    StepRunner::new(host, steps).run().await
}

#[cfg(test)]
mod tests {
    use super::{StepRunner, run};
    use crate::core::error::WizardError;
    use crate::host::scripted::{ScriptedAction, ScriptedHost};
    use crate::state::step::{Step, TextStep};

    #[tokio::test]
    async fn empty_step_list_resolves_to_none_without_views() {
        let mut host = ScriptedHost::new(Vec::new());
        let result = run(&mut host, &mut []).await.expect("no defect");
        assert_eq!(result, None);
        assert_eq!(host.log().created(), 0);
    }

    #[tokio::test]
    async fn out_of_range_start_is_a_defect() {
        let mut host = ScriptedHost::new(vec![ScriptedAction::Accept]);
        let mut steps = vec![Step::Text(TextStep::new("name"))];
        let mut runner = StepRunner::new(&mut host, &mut steps);

        let err = runner.step_through(0).await.expect_err("cursor 0 is invalid");
        assert!(matches!(err, WizardError::StepOutOfRange { step: 0, total: 1 }));
        let err = runner.step_through(2).await.expect_err("cursor 2 is invalid");
        assert!(matches!(err, WizardError::StepOutOfRange { step: 2, total: 1 }));
        drop(runner);

        assert_eq!(host.log().created(), 0);
    }

    #[tokio::test]
    async fn flow_reflects_final_statuses() {
        use crate::state::flow::StepStatus;

        let mut host = ScriptedHost::new(vec![
            ScriptedAction::Type("a".to_string()),
            ScriptedAction::Accept,
            ScriptedAction::Hide,
        ]);
        let mut steps = vec![Step::text("first"), Step::text("second")];
        let mut runner = StepRunner::new(&mut host, &mut steps);

        assert_eq!(runner.run().await.expect("no defect"), None);
        assert_eq!(runner.flow().status_at(1), StepStatus::Done);
        assert_eq!(runner.flow().status_at(2), StepStatus::Cancelled);
    }
}
