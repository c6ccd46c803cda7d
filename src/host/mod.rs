pub mod console;
pub mod scripted;
pub mod theme;

pub use console::ConsoleHost;
pub use scripted::{ScriptLog, ScriptedAction, ScriptedHost};
pub use theme::Theme;
