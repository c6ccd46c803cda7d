use tracing::debug;

use crate::core::error::WizardResult;
use crate::core::item::{matching_items, picked_items};
use crate::runtime::outcome::{StepOutcome, StepPosition};
use crate::state::step::{ItemSource, SelectStep};
use crate::view::{SelectView, StepView, ViewEvent, ViewGuard, ViewHost};

pub async fn show_select_step<H: ViewHost>(
    host: &mut H,
    step: &mut SelectStep,
    position: StepPosition,
) -> WizardResult<StepOutcome> {
    let mut view = ViewGuard::new(host.create_select_view()?);

    view.set_title(&step.title);
    view.set_placeholder(step.placeholder.as_deref());
    view.set_can_select_many(step.can_select_many);
    view.set_step_indicator(position.indicator);
    view.set_ignore_focus_out(true);
    view.set_buttons(position.buttons(&step.buttons));
    view.set_enabled(false);
    view.set_selected_items(step.selected_items.clone());

    view.show()?;
    populate(&mut *view, step).await;

    loop {
        match view.next_event().await? {
            ViewEvent::Accept => {
                let selected = view.selected_items();
                if selected.is_empty() {
                    debug!(step = %step.title, "accept ignored, nothing selected");
                    continue;
                }
                step.selected_items = selected;
                return Ok(StepOutcome::Accepted);
            }
            ViewEvent::ButtonTriggered(button) => {
                if let Some(outcome) = position.button_outcome(button) {
                    return Ok(outcome);
                }
            }
            ViewEvent::Hide => return Ok(StepOutcome::Dismissed),
            ViewEvent::ValueChanged(_) => {}
        }
    }
}

async fn populate<V: SelectView>(view: &mut V, step: &SelectStep) {
    let items = match &step.items {
        ItemSource::Static(items) => {
            view.set_items(items.clone());
            view.set_enabled(true);
            items.clone()
        }
        ItemSource::Producer(produce) => {
            view.set_busy(true);
            let items = produce().await;
            debug!(step = %step.title, count = items.len(), "items loaded");
            view.set_items(items.clone());
            view.set_enabled(true);
            view.set_busy(false);
            items
        }
    };

    if step.selected_items.is_empty() {
        let picked = picked_items(&items);
        if step.can_select_many && !picked.is_empty() {
            view.set_selected_items(picked.clone());
        }
        view.set_active_items(picked);
    } else {
        view.set_active_items(matching_items(&items, &step.selected_items));
    }
}
