use tracing::debug;

use crate::core::error::WizardResult;
use crate::runtime::outcome::{StepOutcome, StepPosition};
use crate::state::step::TextStep;
use crate::view::{StepView, TextView, ViewEvent, ViewGuard, ViewHost};

pub async fn show_text_step<H: ViewHost>(
    host: &mut H,
    step: &mut TextStep,
    position: StepPosition,
) -> WizardResult<StepOutcome> {
    let mut view = ViewGuard::new(host.create_text_view()?);

    view.set_title(&step.title);
    view.set_value(step.display_value());
    view.set_placeholder(step.placeholder.as_deref());
    view.set_prompt(step.prompt.as_deref());
    view.set_password(step.password);
    view.set_step_indicator(position.indicator);
    view.set_ignore_focus_out(true);
    view.set_buttons(position.buttons(&step.buttons));

    view.show()?;

    loop {
        match view.next_event().await? {
            ViewEvent::ValueChanged(value) => {
                let message = (!step.is_valid(&value)).then(|| step.validation_message());
                view.set_validation_message(message);
                step.value = Some(value);
            }
            ViewEvent::Accept => {
                let value = view.value();
                if step.is_valid(&value) {
                    step.value = Some(value);
                    return Ok(StepOutcome::Accepted);
                }
                debug!(step = %step.title, "accept ignored, value is invalid");
                view.set_validation_message(Some(step.validation_message()));
            }
            ViewEvent::ButtonTriggered(button) => {
                if let Some(outcome) = position.button_outcome(button) {
                    return Ok(outcome);
                }
            }
            ViewEvent::Hide => return Ok(StepOutcome::Dismissed),
        }
    }
}
