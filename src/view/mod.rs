//! The boundary between the step runner and whatever draws the steps.
//!
//! A host creates one view per step visit. The runner configures it, calls
//! [`StepView::show`], reads events with [`StepView::next_event`] until one of
//! them ends the visit, and finally calls [`StepView::dispose`] (through
//! [`ViewGuard`]) before creating the next view.

pub mod guard;

use std::io;

use async_trait::async_trait;

use crate::core::item::SelectItem;
use crate::state::flow::StepIndicator;

pub use guard::ViewGuard;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewButton {
    Back,
    Custom(String),
}

impl ViewButton {
    pub fn label(&self) -> &str {
        match self {
            Self::Back => "Back",
            Self::Custom(label) => label.as_str(),
        }
    }
}

/// Events a view reports to the runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    /// The accept gesture (enter). The runner decides whether it counts.
    Accept,
    ButtonTriggered(ViewButton),
    /// The view was closed without accepting.
    Hide,
    /// Text views only: the edited value changed.
    ValueChanged(String),
}

#[async_trait]
pub trait StepView: Send {
    fn set_title(&mut self, title: &str);

    fn set_step_indicator(&mut self, indicator: Option<StepIndicator>);

    fn set_buttons(&mut self, buttons: Vec<ViewButton>);

    /// Keep the view open when it loses focus.
    fn set_ignore_focus_out(&mut self, ignore: bool);

    fn show(&mut self) -> io::Result<()>;

    /// Waits for the next user event. A closed event source reports `Hide`.
    async fn next_event(&mut self) -> io::Result<ViewEvent>;

    fn dispose(&mut self);
}

pub trait SelectView: StepView {
    fn set_placeholder(&mut self, placeholder: Option<&str>);

    fn set_can_select_many(&mut self, can_select_many: bool);

    fn set_enabled(&mut self, enabled: bool);

    fn set_busy(&mut self, busy: bool);

    fn set_items(&mut self, items: Vec<SelectItem>);

    fn set_selected_items(&mut self, items: Vec<SelectItem>);

    /// Items to highlight; used to restore a previous selection.
    fn set_active_items(&mut self, items: Vec<SelectItem>);

    fn selected_items(&self) -> Vec<SelectItem>;
}

pub trait TextView: StepView {
    fn set_value(&mut self, value: &str);

    fn set_placeholder(&mut self, placeholder: Option<&str>);

    fn set_prompt(&mut self, prompt: Option<&str>);

    fn set_password(&mut self, password: bool);

    /// `None` clears the message.
    fn set_validation_message(&mut self, message: Option<&str>);

    fn value(&self) -> String;
}

/// Creates views. Every created view is disposed before the next is created.
pub trait ViewHost: Send {
    type Select: SelectView;
    type Text: TextView;

    fn create_select_view(&mut self) -> io::Result<Self::Select>;

    fn create_text_view(&mut self) -> io::Result<Self::Text>;
}
