use std::fmt;
use std::future::Future;

use futures::FutureExt;
use futures::future::BoxFuture;

use crate::core::item::SelectItem;
use crate::widgets::validators::{self, DEFAULT_VALIDATION_MESSAGE, Validator};

pub type ItemProducer = Box<dyn Fn() -> BoxFuture<'static, Vec<SelectItem>> + Send + Sync>;

/// Where a select step gets its items from.
pub enum ItemSource {
    Static(Vec<SelectItem>),
    /// Called on every visit; the view shows busy until it resolves.
    Producer(ItemProducer),
}

impl ItemSource {
    pub fn producer<F, Fut>(f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Vec<SelectItem>> + Send + 'static,
    {
        Self::Producer(Box::new(move || f().boxed()))
    }

    pub fn is_async(&self) -> bool {
        matches!(self, Self::Producer(_))
    }
}

impl fmt::Debug for ItemSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(items) => f.debug_tuple("Static").field(items).finish(),
            Self::Producer(_) => f.write_str("Producer(..)"),
        }
    }
}

impl From<Vec<SelectItem>> for ItemSource {
    fn from(items: Vec<SelectItem>) -> Self {
        Self::Static(items)
    }
}

#[derive(Debug)]
pub struct SelectStep {
    pub title: String,
    pub placeholder: Option<String>,
    pub can_select_many: bool,
    pub items: ItemSource,
    /// Last accepted selection; survives back/forward navigation.
    pub selected_items: Vec<SelectItem>,
    /// Extra buttons; triggering one advances without touching the selection.
    pub buttons: Vec<String>,
}

impl SelectStep {
    pub fn new(title: impl Into<String>, items: impl Into<ItemSource>) -> Self {
        Self {
            title: title.into(),
            placeholder: None,
            can_select_many: false,
            items: items.into(),
            selected_items: Vec::new(),
            buttons: Vec::new(),
        }
    }

    pub fn with_producer<F, Fut>(title: impl Into<String>, f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Vec<SelectItem>> + Send + 'static,
    {
        Self::new(title, ItemSource::producer(f))
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn with_can_select_many(mut self, can_select_many: bool) -> Self {
        self.can_select_many = can_select_many;
        self
    }

    pub fn with_selected(mut self, selected: impl IntoIterator<Item = SelectItem>) -> Self {
        self.selected_items = selected.into_iter().collect();
        self
    }

    pub fn with_button(mut self, label: impl Into<String>) -> Self {
        self.buttons.push(label.into());
        self
    }
}

pub struct TextStep {
    pub title: String,
    /// Current text; tracks edits and survives back/forward navigation.
    pub value: Option<String>,
    pub placeholder: Option<String>,
    pub prompt: Option<String>,
    pub password: bool,
    pub validator: Option<Validator>,
    pub validation_message: Option<String>,
    pub buttons: Vec<String>,
}

impl TextStep {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            value: None,
            placeholder: None,
            prompt: None,
            password: false,
            validator: None,
            validation_message: None,
            buttons: Vec::new(),
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    pub fn with_password(mut self, password: bool) -> Self {
        self.password = password;
        self
    }

    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }

    pub fn validate(mut self, f: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        self.validator = Some(Box::new(f));
        self
    }

    pub fn with_validation_message(mut self, message: impl Into<String>) -> Self {
        self.validation_message = Some(message.into());
        self
    }

    pub fn with_button(mut self, label: impl Into<String>) -> Self {
        self.buttons.push(label.into());
        self
    }

    pub fn is_valid(&self, value: &str) -> bool {
        validators::is_valid(self.validator.as_ref(), value)
    }

    pub fn validation_message(&self) -> &str {
        self.validation_message
            .as_deref()
            .unwrap_or(DEFAULT_VALIDATION_MESSAGE)
    }

    pub fn display_value(&self) -> &str {
        self.value.as_deref().unwrap_or("")
    }
}

impl fmt::Debug for TextStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextStep")
            .field("title", &self.title)
            .field("value", &self.value)
            .field("placeholder", &self.placeholder)
            .field("prompt", &self.prompt)
            .field("password", &self.password)
            .field("validator", &self.validator.as_ref().map(|_| ".."))
            .field("validation_message", &self.validation_message)
            .field("buttons", &self.buttons)
            .finish()
    }
}

#[derive(Debug)]
pub enum Step {
    Select(SelectStep),
    Text(TextStep),
}

impl Step {
    pub fn select(title: impl Into<String>, items: impl Into<ItemSource>) -> Self {
        Self::Select(SelectStep::new(title, items))
    }

    pub fn text(title: impl Into<String>) -> Self {
        Self::Text(TextStep::new(title))
    }

    pub fn title(&self) -> &str {
        match self {
            Self::Select(step) => step.title.as_str(),
            Self::Text(step) => step.title.as_str(),
        }
    }

    pub fn is_select(&self) -> bool {
        matches!(self, Self::Select(_))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Select(_) => "select",
            Self::Text(_) => "text",
        }
    }
}

impl From<SelectStep> for Step {
    fn from(step: SelectStep) -> Self {
        Self::Select(step)
    }
}

impl From<TextStep> for Step {
    fn from(step: TextStep) -> Self {
        Self::Text(step)
    }
}

#[cfg(test)]
mod tests {
    use super::{ItemSource, SelectStep, Step, TextStep};
    use crate::core::item::SelectItem;
    use crate::widgets::validators;

    #[test]
    fn text_step_without_validator_accepts_empty() {
        let step = TextStep::new("name");
        assert!(step.is_valid(""));
        assert_eq!(step.validation_message(), "Invalid Value.");
        assert_eq!(step.display_value(), "");
    }

    #[test]
    fn text_step_uses_configured_message() {
        let step = TextStep::new("name")
            .with_validator(validators::non_empty())
            .with_validation_message("Please enter a name");
        assert!(!step.is_valid(""));
        assert!(step.is_valid("Ann"));
        assert_eq!(step.validation_message(), "Please enter a name");
    }

    #[test]
    fn select_step_builders() {
        let step = SelectStep::new("color", vec![SelectItem::new("red")])
            .with_placeholder("pick one")
            .with_can_select_many(true)
            .with_selected([SelectItem::new("red")])
            .with_button("Skip");
        assert!(step.can_select_many);
        assert_eq!(step.selected_items, vec![SelectItem::new("red")]);
        assert!(!step.items.is_async());
        assert_eq!(step.buttons, vec!["Skip".to_string()]);
    }

    #[tokio::test]
    async fn producer_source_yields_items() {
        let source = ItemSource::producer(|| async { vec![SelectItem::new("1")] });
        assert!(source.is_async());
        let ItemSource::Producer(produce) = source else {
            panic!("expected producer");
        };
        assert_eq!(produce().await, vec![SelectItem::new("1")]);
    }

    #[test]
    fn step_kind_and_title() {
        let select = Step::select("color", vec![SelectItem::new("red")]);
        let text: Step = TextStep::new("name").into();
        assert!(select.is_select());
        assert_eq!(select.kind(), "select");
        assert_eq!(text.kind(), "text");
        assert_eq!(text.title(), "name");
    }
}
