use std::time::Duration;

use crate::core::item::SelectItem;
use crate::state::step::{SelectStep, Step, TextStep};
use crate::widgets::validators;

pub const DEMO_ITEM_DELAY: Duration = Duration::from_secs(1);

pub fn demo_steps() -> Vec<Step> {
    demo_steps_with_delay(DEMO_ITEM_DELAY)
}

/// Item picker with slow-loading items, then username and password.
pub fn demo_steps_with_delay(delay: Duration) -> Vec<Step> {
    vec![
        SelectStep::with_producer("Pick an item", move || async move {
            tokio::time::sleep(delay).await;
            vec![SelectItem::new("1"), SelectItem::new("2")]
        })
        .with_placeholder("Choose one")
        .into(),
        TextStep::new("Username")
            .with_placeholder("Enter your username")
            .with_validator(validators::non_empty())
            .with_validation_message("Please enter a username")
            .into(),
        TextStep::new("Password")
            .with_placeholder("Enter your password")
            .with_password(true)
            .with_validator(validators::non_empty())
            .with_validation_message("Please enter a password")
            .into(),
    ]
}
