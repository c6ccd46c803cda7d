//! YAML flow files and replay scripts.
//!
//! ```yaml
//! steps:
//!   - kind: select
//!     title: Color
//!     items: [red, { label: blue, description: cold }]
//!   - kind: text
//!     title: Name
//!     validate: { required: true, max_length: 20 }
//!     validation_message: Please enter a name
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::core::item::SelectItem;
use crate::host::scripted::ScriptedAction;
use crate::state::step::{SelectStep, Step, TextStep};
use crate::widgets::validators::{self, Validator};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("step '{title}': invalid pattern: {source}")]
    Pattern {
        title: String,
        #[source]
        source: regex::Error,
    },

    #[error("step '{title}': a select step needs at least one item")]
    NoItems { title: String },
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlowFile {
    pub steps: Vec<StepConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepConfig {
    Select {
        title: String,
        #[serde(default)]
        placeholder: Option<String>,
        #[serde(default)]
        can_select_many: bool,
        items: Vec<ItemConfig>,
        #[serde(default)]
        selected: Vec<String>,
        #[serde(default)]
        buttons: Vec<String>,
    },
    Text {
        title: String,
        #[serde(default)]
        value: Option<String>,
        #[serde(default)]
        placeholder: Option<String>,
        #[serde(default)]
        prompt: Option<String>,
        #[serde(default)]
        password: bool,
        #[serde(default)]
        validate: Option<ValidationConfig>,
        #[serde(default)]
        validation_message: Option<String>,
        #[serde(default)]
        buttons: Vec<String>,
    },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ItemConfig {
    Label(String),
    Item(SelectItem),
}

impl From<ItemConfig> for SelectItem {
    fn from(config: ItemConfig) -> Self {
        match config {
            ItemConfig::Label(label) => SelectItem::new(label),
            ItemConfig::Item(item) => item,
        }
    }
}

/// Rules for a text step; every rule that is set must pass.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidationConfig {
    pub required: bool,
    pub non_empty: bool,
    pub email: bool,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<String>,
}

impl ValidationConfig {
    fn build(&self, title: &str) -> Result<Option<Validator>, ConfigError> {
        let mut rules: Vec<Validator> = Vec::new();
        if self.required {
            rules.push(validators::required());
        }
        if self.non_empty {
            rules.push(validators::non_empty());
        }
        if self.email {
            rules.push(validators::email());
        }
        if let Some(min) = self.min_length {
            rules.push(validators::min_length(min));
        }
        if let Some(max) = self.max_length {
            rules.push(validators::max_length(max));
        }
        if let Some(pattern) = &self.pattern {
            let rule = validators::pattern(pattern).map_err(|source| ConfigError::Pattern {
                title: title.to_string(),
                source,
            })?;
            rules.push(rule);
        }

        Ok(match rules.len() {
            0 => None,
            1 => rules.pop(),
            _ => Some(validators::all(rules)),
        })
    }
}

impl StepConfig {
    pub fn into_step(self) -> Result<Step, ConfigError> {
        match self {
            Self::Select {
                title,
                placeholder,
                can_select_many,
                items,
                selected,
                buttons,
            } => {
                if items.is_empty() {
                    return Err(ConfigError::NoItems { title });
                }
                let items: Vec<SelectItem> = items.into_iter().map(SelectItem::from).collect();
                let mut step = SelectStep::new(title, items)
                    .with_can_select_many(can_select_many)
                    .with_selected(selected.into_iter().map(SelectItem::new));
                step.placeholder = placeholder;
                step.buttons = buttons;
                Ok(Step::Select(step))
            }
            Self::Text {
                title,
                value,
                placeholder,
                prompt,
                password,
                validate,
                validation_message,
                buttons,
            } => {
                let validator = match &validate {
                    Some(rules) => rules.build(&title)?,
                    None => None,
                };
                let mut step = TextStep::new(title).with_password(password);
                step.value = value;
                step.placeholder = placeholder;
                step.prompt = prompt;
                step.validator = validator;
                step.validation_message = validation_message;
                step.buttons = buttons;
                Ok(Step::Text(step))
            }
        }
    }
}

pub fn parse_flow(yaml: &str) -> Result<Vec<Step>, ConfigError> {
    let file: FlowFile = serde_yaml::from_str(yaml)?;
    file.steps.into_iter().map(StepConfig::into_step).collect()
}

pub fn load_flow(path: &Path) -> Result<Vec<Step>, ConfigError> {
    let yaml = read(path)?;
    let steps = parse_flow(&yaml)?;
    debug!(path = %path.display(), steps = steps.len(), "flow loaded");
    Ok(steps)
}

/// Actions with a payload are one-key maps (`- pick: [red]`), the rest are
/// plain strings (`- accept`).
pub fn parse_script(yaml: &str) -> Result<Vec<ScriptedAction>, ConfigError> {
    let deserializer = serde_yaml::Deserializer::from_str(yaml);
    Ok(serde_yaml::with::singleton_map_recursive::deserialize(
        deserializer,
    )?)
}

pub fn load_script(path: &Path) -> Result<Vec<ScriptedAction>, ConfigError> {
    let actions = parse_script(&read(path)?)?;
    debug!(path = %path.display(), actions = actions.len(), "script loaded");
    Ok(actions)
}

fn read(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })
}
