//! A host that replays a fixed list of user gestures.
//!
//! Every view created by the host pulls from one shared queue, so a script
//! reads as the sequence of things a user would do across the whole run. When
//! the queue runs dry the live view reports `Hide`.

use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::item::SelectItem;
use crate::state::flow::StepIndicator;
use crate::view::{SelectView, StepView, TextView, ViewButton, ViewEvent, ViewHost};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptedAction {
    /// Select the items with these labels (select views only).
    Pick(Vec<String>),
    /// Replace the text and report the change (text views only).
    Type(String),
    Accept,
    Back,
    Button(String),
    Hide,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Select,
    Text,
}

/// What a single view was configured with and went through.
#[derive(Debug, Clone)]
pub struct ViewRecord {
    pub kind: ViewKind,
    pub title: String,
    pub indicator: Option<StepIndicator>,
    pub buttons: Vec<ViewButton>,
    pub ignore_focus_out: bool,
    pub shown: bool,
    pub disposed: bool,
    pub placeholder: Option<String>,
    pub can_select_many: bool,
    pub enabled: bool,
    pub busy_seen: bool,
    pub busy: bool,
    pub items: Vec<String>,
    /// Selection handed to the view before it was shown.
    pub initial_selected: Vec<String>,
    pub active: Vec<String>,
    /// Value handed to the view before it was shown.
    pub initial_value: Option<String>,
    pub prompt: Option<String>,
    pub password: bool,
    /// Every call to `set_validation_message`, in order.
    pub validation_messages: Vec<Option<String>>,
}

impl ViewRecord {
    fn new(kind: ViewKind) -> Self {
        Self {
            kind,
            title: String::new(),
            indicator: None,
            buttons: Vec::new(),
            ignore_focus_out: false,
            shown: false,
            disposed: false,
            placeholder: None,
            can_select_many: false,
            enabled: true,
            busy_seen: false,
            busy: false,
            items: Vec::new(),
            initial_selected: Vec::new(),
            active: Vec::new(),
            initial_value: None,
            prompt: None,
            password: false,
            validation_messages: Vec::new(),
        }
    }

    pub fn current_validation_message(&self) -> Option<&str> {
        self.validation_messages
            .last()
            .and_then(|message| message.as_deref())
    }
}

#[derive(Debug, Default)]
struct Shared {
    actions: VecDeque<ScriptedAction>,
    records: Vec<ViewRecord>,
    live: usize,
    max_live: usize,
}

fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Read access to what the views of a [`ScriptedHost`] recorded.
#[derive(Debug, Clone)]
pub struct ScriptLog {
    shared: Arc<Mutex<Shared>>,
}

impl ScriptLog {
    pub fn records(&self) -> Vec<ViewRecord> {
        lock(&self.shared).records.clone()
    }

    pub fn record(&self, index: usize) -> Option<ViewRecord> {
        lock(&self.shared).records.get(index).cloned()
    }

    pub fn titles(&self) -> Vec<String> {
        lock(&self.shared)
            .records
            .iter()
            .map(|record| record.title.clone())
            .collect()
    }

    pub fn created(&self) -> usize {
        lock(&self.shared).records.len()
    }

    pub fn live(&self) -> usize {
        lock(&self.shared).live
    }

    /// Highest number of undisposed views seen at once.
    pub fn max_live(&self) -> usize {
        lock(&self.shared).max_live
    }

    pub fn remaining_actions(&self) -> usize {
        lock(&self.shared).actions.len()
    }
}

pub struct ScriptedHost {
    shared: Arc<Mutex<Shared>>,
}

impl ScriptedHost {
    pub fn new(actions: impl IntoIterator<Item = ScriptedAction>) -> Self {
        let shared = Shared {
            actions: actions.into_iter().collect(),
            ..Shared::default()
        };
        Self {
            shared: Arc::new(Mutex::new(shared)),
        }
    }

    pub fn log(&self) -> ScriptLog {
        ScriptLog {
            shared: Arc::clone(&self.shared),
        }
    }

    fn open(&self, kind: ViewKind) -> Handle {
        let mut shared = lock(&self.shared);
        shared.records.push(ViewRecord::new(kind));
        shared.live += 1;
        shared.max_live = shared.max_live.max(shared.live);
        Handle {
            shared: Arc::clone(&self.shared),
            index: shared.records.len() - 1,
            disposed: false,
        }
    }
}

impl ViewHost for ScriptedHost {
    type Select = ScriptedSelectView;
    type Text = ScriptedTextView;

    fn create_select_view(&mut self) -> io::Result<Self::Select> {
        Ok(ScriptedSelectView {
            handle: self.open(ViewKind::Select),
            items: Vec::new(),
            selected: Vec::new(),
            active: Vec::new(),
            can_select_many: false,
        })
    }

    fn create_text_view(&mut self) -> io::Result<Self::Text> {
        Ok(ScriptedTextView {
            handle: self.open(ViewKind::Text),
            value: String::new(),
        })
    }
}

/// One view's link back into the shared script state.
struct Handle {
    shared: Arc<Mutex<Shared>>,
    index: usize,
    disposed: bool,
}

impl Handle {
    fn update(&self, f: impl FnOnce(&mut ViewRecord)) {
        let mut shared = lock(&self.shared);
        if let Some(record) = shared.records.get_mut(self.index) {
            f(record);
        }
    }

    fn next_action(&self) -> Option<ScriptedAction> {
        let action = lock(&self.shared).actions.pop_front();
        trace!(view = self.index, ?action, "scripted action");
        action
    }

    fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        let mut shared = lock(&self.shared);
        shared.live = shared.live.saturating_sub(1);
        if let Some(record) = shared.records.get_mut(self.index) {
            record.disposed = true;
        }
    }

    /// Maps the actions every view kind treats the same way.
    fn common_event(action: &ScriptedAction) -> Option<ViewEvent> {
        match action {
            ScriptedAction::Back => Some(ViewEvent::ButtonTriggered(ViewButton::Back)),
            ScriptedAction::Button(label) => {
                Some(ViewEvent::ButtonTriggered(ViewButton::Custom(label.clone())))
            }
            ScriptedAction::Hide => Some(ViewEvent::Hide),
            _ => None,
        }
    }
}

pub struct ScriptedSelectView {
    handle: Handle,
    items: Vec<SelectItem>,
    selected: Vec<SelectItem>,
    active: Vec<SelectItem>,
    can_select_many: bool,
}

fn labels(items: &[SelectItem]) -> Vec<String> {
    items.iter().map(|item| item.label.clone()).collect()
}

#[async_trait]
impl StepView for ScriptedSelectView {
    fn set_title(&mut self, title: &str) {
        self.handle.update(|record| record.title = title.to_string());
    }

    fn set_step_indicator(&mut self, indicator: Option<StepIndicator>) {
        self.handle.update(|record| record.indicator = indicator);
    }

    fn set_buttons(&mut self, buttons: Vec<ViewButton>) {
        self.handle.update(|record| record.buttons = buttons);
    }

    fn set_ignore_focus_out(&mut self, ignore: bool) {
        self.handle.update(|record| record.ignore_focus_out = ignore);
    }

    fn show(&mut self) -> io::Result<()> {
        let selected = labels(&self.selected);
        self.handle.update(|record| {
            record.shown = true;
            record.initial_selected = selected;
        });
        Ok(())
    }

    async fn next_event(&mut self) -> io::Result<ViewEvent> {
        loop {
            let Some(action) = self.handle.next_action() else {
                return Ok(ViewEvent::Hide);
            };
            if let Some(event) = Handle::common_event(&action) {
                return Ok(event);
            }
            match action {
                ScriptedAction::Pick(wanted) => {
                    let mut picked: Vec<SelectItem> = self
                        .items
                        .iter()
                        .filter(|item| wanted.iter().any(|label| *label == item.label))
                        .cloned()
                        .collect();
                    if !self.can_select_many {
                        picked.truncate(1);
                    }
                    self.selected = picked;
                }
                ScriptedAction::Accept => {
                    if self.selected.is_empty() && !self.can_select_many {
                        self.selected = self.active.iter().take(1).cloned().collect();
                    }
                    return Ok(ViewEvent::Accept);
                }
                ScriptedAction::Type(text) => return Ok(ViewEvent::ValueChanged(text)),
                _ => {}
            }
        }
    }

    fn dispose(&mut self) {
        self.handle.dispose();
    }
}

impl SelectView for ScriptedSelectView {
    fn set_placeholder(&mut self, placeholder: Option<&str>) {
        let placeholder = placeholder.map(str::to_string);
        self.handle.update(|record| record.placeholder = placeholder);
    }

    fn set_can_select_many(&mut self, can_select_many: bool) {
        self.can_select_many = can_select_many;
        self.handle
            .update(|record| record.can_select_many = can_select_many);
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.handle.update(|record| record.enabled = enabled);
    }

    fn set_busy(&mut self, busy: bool) {
        self.handle.update(|record| {
            record.busy = busy;
            record.busy_seen |= busy;
        });
    }

    fn set_items(&mut self, items: Vec<SelectItem>) {
        let item_labels = labels(&items);
        self.items = items;
        self.handle.update(|record| record.items = item_labels);
    }

    fn set_selected_items(&mut self, items: Vec<SelectItem>) {
        self.selected = items;
    }

    fn set_active_items(&mut self, items: Vec<SelectItem>) {
        let active = labels(&items);
        self.active = items;
        self.handle.update(|record| record.active = active);
    }

    fn selected_items(&self) -> Vec<SelectItem> {
        self.selected.clone()
    }
}

pub struct ScriptedTextView {
    handle: Handle,
    value: String,
}

#[async_trait]
impl StepView for ScriptedTextView {
    fn set_title(&mut self, title: &str) {
        self.handle.update(|record| record.title = title.to_string());
    }

    fn set_step_indicator(&mut self, indicator: Option<StepIndicator>) {
        self.handle.update(|record| record.indicator = indicator);
    }

    fn set_buttons(&mut self, buttons: Vec<ViewButton>) {
        self.handle.update(|record| record.buttons = buttons);
    }

    fn set_ignore_focus_out(&mut self, ignore: bool) {
        self.handle.update(|record| record.ignore_focus_out = ignore);
    }

    fn show(&mut self) -> io::Result<()> {
        let value = self.value.clone();
        self.handle.update(|record| {
            record.shown = true;
            record.initial_value = Some(value);
        });
        Ok(())
    }

    async fn next_event(&mut self) -> io::Result<ViewEvent> {
        loop {
            let Some(action) = self.handle.next_action() else {
                return Ok(ViewEvent::Hide);
            };
            if let Some(event) = Handle::common_event(&action) {
                return Ok(event);
            }
            match action {
                ScriptedAction::Type(text) => {
                    self.value = text.clone();
                    return Ok(ViewEvent::ValueChanged(text));
                }
                ScriptedAction::Accept => return Ok(ViewEvent::Accept),
                _ => {}
            }
        }
    }

    fn dispose(&mut self) {
        self.handle.dispose();
    }
}

impl TextView for ScriptedTextView {
    fn set_value(&mut self, value: &str) {
        self.value = value.to_string();
    }

    fn set_placeholder(&mut self, placeholder: Option<&str>) {
        let placeholder = placeholder.map(str::to_string);
        self.handle.update(|record| record.placeholder = placeholder);
    }

    fn set_prompt(&mut self, prompt: Option<&str>) {
        let prompt = prompt.map(str::to_string);
        self.handle.update(|record| record.prompt = prompt);
    }

    fn set_password(&mut self, password: bool) {
        self.handle.update(|record| record.password = password);
    }

    fn set_validation_message(&mut self, message: Option<&str>) {
        let message = message.map(str::to_string);
        self.handle
            .update(|record| record.validation_messages.push(message));
    }

    fn value(&self) -> String {
        self.value.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::{ScriptedAction, ScriptedHost};
    use crate::config::parse_script;
    use crate::view::{SelectView, StepView, ViewEvent, ViewHost};

    #[tokio::test]
    async fn exhausted_script_hides() {
        let mut host = ScriptedHost::new(Vec::new());
        let mut view = host.create_text_view().expect("view");
        assert_eq!(view.next_event().await.expect("event"), ViewEvent::Hide);
    }

    #[tokio::test]
    async fn single_select_accept_falls_back_to_active_item() {
        let mut host = ScriptedHost::new(vec![ScriptedAction::Accept]);
        let mut view = host.create_select_view().expect("view");
        view.set_items(vec!["a".into(), "b".into()]);
        view.set_active_items(vec!["b".into()]);

        assert_eq!(view.next_event().await.expect("event"), ViewEvent::Accept);
        assert_eq!(view.selected_items(), vec!["b".into()]);
    }

    #[test]
    fn dispose_is_counted_once() {
        let mut host = ScriptedHost::new(Vec::new());
        let log = host.log();
        let mut view = host.create_text_view().expect("view");
        assert_eq!(log.live(), 1);
        view.dispose();
        view.dispose();
        assert_eq!(log.live(), 0);
        assert_eq!(log.max_live(), 1);
        assert!(log.records()[0].disposed);
    }

    #[test]
    fn actions_parse_from_yaml() {
        let yaml = "- pick: [red]\n- accept\n- type: Ann\n- back\n- button: Skip\n- hide\n";
        let actions = parse_script(yaml).expect("yaml");
        assert_eq!(
            actions,
            vec![
                ScriptedAction::Pick(vec!["red".to_string()]),
                ScriptedAction::Accept,
                ScriptedAction::Type("Ann".to_string()),
                ScriptedAction::Back,
                ScriptedAction::Button("Skip".to_string()),
                ScriptedAction::Hide,
            ]
        );
    }
}
