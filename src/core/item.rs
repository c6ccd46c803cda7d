use serde::{Deserialize, Serialize};

/// One entry of a select step.
///
/// Two items are the same item iff their labels match; the secondary text is
/// display-only and never takes part in equality.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelectItem {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Pre-marked the first time the step is shown.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub picked: bool,
}

impl SelectItem {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_picked(mut self, picked: bool) -> Self {
        self.picked = picked;
        self
    }

    pub fn label(&self) -> &str {
        self.label.as_str()
    }

    pub fn same_as(&self, other: &SelectItem) -> bool {
        self.label == other.label
    }
}

impl PartialEq for SelectItem {
    fn eq(&self, other: &Self) -> bool {
        self.same_as(other)
    }
}

impl Eq for SelectItem {}

impl From<&str> for SelectItem {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for SelectItem {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Items carrying the `picked` hint, in `items` order.
pub fn picked_items(items: &[SelectItem]) -> Vec<SelectItem> {
    items.iter().filter(|item| item.picked).cloned().collect()
}

/// Items of `items` whose label appears in `previous`, in `items` order.
pub fn matching_items(items: &[SelectItem], previous: &[SelectItem]) -> Vec<SelectItem> {
    items
        .iter()
        .filter(|item| previous.iter().any(|prev| prev.same_as(item)))
        .cloned()
        .collect()
}
