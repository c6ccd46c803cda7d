use crossterm::style::{ContentStyle, Stylize};

#[derive(Debug, Clone)]
pub struct Theme {
    pub title: ContentStyle,
    pub indicator: ContentStyle,
    pub hint: ContentStyle,
    pub error: ContentStyle,
    pub placeholder: ContentStyle,
    pub active: ContentStyle,
}

impl Theme {
    pub fn default_theme() -> Self {
        Self {
            title: ContentStyle::new().bold(),
            indicator: ContentStyle::new().cyan(),
            hint: ContentStyle::new().dark_grey(),
            error: ContentStyle::new().red().bold(),
            placeholder: ContentStyle::new().dark_grey(),
            active: ContentStyle::new().green().bold(),
        }
    }

    /// No colors or attributes; for pipes and tests.
    pub fn plain() -> Self {
        Self {
            title: ContentStyle::new(),
            indicator: ContentStyle::new(),
            hint: ContentStyle::new(),
            error: ContentStyle::new(),
            placeholder: ContentStyle::new(),
            active: ContentStyle::new(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::default_theme()
    }
}
