//! Line-oriented views on a plain terminal.
//!
//! Each view prints its title, choices and hints, then reads whole lines.
//! Lines starting with `:` are commands (`:back`, `:quit`, or the label of an
//! extra button); `::` escapes a literal leading colon.

use std::collections::VecDeque;
use std::io::{self, Stdout, Write};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use crossterm::queue;
use crossterm::style::{Print, PrintStyledContent};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex as AsyncMutex;
use tracing::{trace, warn};
use unicode_width::UnicodeWidthStr;

use crate::core::item::SelectItem;
use crate::host::theme::Theme;
use crate::state::flow::StepIndicator;
use crate::view::{SelectView, StepView, TextView, ViewButton, ViewEvent, ViewHost};

// ── Shared terminal handles ───────────────────────────────────────────────────

struct Console<R, W> {
    input: Arc<AsyncMutex<Lines<R>>>,
    output: Arc<Mutex<W>>,
    theme: Theme,
}

impl<R, W> Clone for Console<R, W> {
    fn clone(&self) -> Self {
        Self {
            input: Arc::clone(&self.input),
            output: Arc::clone(&self.output),
            theme: self.theme.clone(),
        }
    }
}

impl<R, W> Console<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: Write + Send,
{
    fn write(&self, f: impl FnOnce(&mut W, &Theme) -> io::Result<()>) -> io::Result<()> {
        let mut out = self.output.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut *out, &self.theme)?;
        out.flush()
    }

    async fn read_line(&self) -> io::Result<Option<String>> {
        let mut lines = self.input.lock().await;
        let line = lines.next_line().await?;
        Ok(line.map(|line| line.trim_end_matches('\r').to_string()))
    }
}

pub struct ConsoleHost<R, W> {
    console: Console<R, W>,
}

impl ConsoleHost<BufReader<Stdin>, Stdout> {
    pub fn stdio() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), io::stdout())
    }
}

impl<R, W> ConsoleHost<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: Write + Send,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            console: Console {
                input: Arc::new(AsyncMutex::new(reader.lines())),
                output: Arc::new(Mutex::new(writer)),
                theme: Theme::default_theme(),
            },
        }
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.console.theme = theme;
        self
    }

    /// Returns the writer once every view has been dropped.
    pub fn into_writer(self) -> Option<W> {
        Arc::try_unwrap(self.console.output)
            .ok()
            .map(|output| output.into_inner().unwrap_or_else(PoisonError::into_inner))
    }
}

impl<R, W> ViewHost for ConsoleHost<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: Write + Send,
{
    type Select = ConsoleSelectView<R, W>;
    type Text = ConsoleTextView<R, W>;

    fn create_select_view(&mut self) -> io::Result<Self::Select> {
        Ok(ConsoleSelectView {
            base: ViewBase::new(self.console.clone()),
            placeholder: None,
            can_select_many: false,
            enabled: true,
            busy: false,
            items: Vec::new(),
            selected: Vec::new(),
            active: Vec::new(),
        })
    }

    fn create_text_view(&mut self) -> io::Result<Self::Text> {
        Ok(ConsoleTextView {
            base: ViewBase::new(self.console.clone()),
            value: String::new(),
            placeholder: None,
            prompt: None,
            password: false,
            validation_message: None,
            pending: VecDeque::new(),
        })
    }
}

// ── Common view state ─────────────────────────────────────────────────────────

struct ViewBase<R, W> {
    console: Console<R, W>,
    title: String,
    indicator: Option<StepIndicator>,
    buttons: Vec<ViewButton>,
    shown: bool,
    dirty: bool,
}

impl<R, W> ViewBase<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: Write + Send,
{
    fn new(console: Console<R, W>) -> Self {
        Self {
            console,
            title: String::new(),
            indicator: None,
            buttons: Vec::new(),
            shown: false,
            dirty: true,
        }
    }

    fn write_header(&self) -> io::Result<()> {
        self.console.write(|out, theme| {
            queue!(
                out,
                Print("? "),
                PrintStyledContent(theme.title.apply(self.title.as_str()))
            )?;
            if let Some(indicator) = self.indicator {
                let text = format!("  [{}/{}]", indicator.step, indicator.total);
                queue!(out, PrintStyledContent(theme.indicator.apply(text)))?;
            }
            queue!(out, Print("\n"))
        })
    }

    fn write_hint(&self, hint: &str) -> io::Result<()> {
        let commands = self
            .buttons
            .iter()
            .map(|button| format!(":{}", button.label().to_lowercase()))
            .chain(std::iter::once(":quit".to_string()))
            .collect::<Vec<_>>()
            .join("  ");
        self.console.write(|out, theme| {
            let text = format!("  {hint}  ({commands})");
            queue!(out, PrintStyledContent(theme.hint.apply(text)), Print("\n"))
        })
    }

    fn notice(&self, message: &str) -> io::Result<()> {
        self.console.write(|out, theme| {
            let text = format!("  ! {message}");
            queue!(out, PrintStyledContent(theme.error.apply(text)), Print("\n"))
        })
    }

    fn write_prompt(&self) -> io::Result<()> {
        self.console.write(|out, _| queue!(out, Print("> ")))
    }

    /// `None` when the line is not a command.
    fn command(&self, line: &str) -> Option<Result<ViewEvent, String>> {
        let name = line.trim().strip_prefix(':')?;
        if name.starts_with(':') {
            return None;
        }
        let name = name.trim();
        if name.eq_ignore_ascii_case("quit") || name.eq_ignore_ascii_case("q") {
            return Some(Ok(ViewEvent::Hide));
        }
        if let Some(button) = self
            .buttons
            .iter()
            .find(|button| button.label().eq_ignore_ascii_case(name))
        {
            return Some(Ok(ViewEvent::ButtonTriggered(button.clone())));
        }
        if name.eq_ignore_ascii_case("back") {
            return Some(Err("there is no previous step".to_string()));
        }
        Some(Err(format!("unknown command :{name}")))
    }
}

fn unescape(line: &str) -> &str {
    if line.starts_with("::") { &line[1..] } else { line }
}

// ── Select view ───────────────────────────────────────────────────────────────

pub struct ConsoleSelectView<R, W> {
    base: ViewBase<R, W>,
    placeholder: Option<String>,
    can_select_many: bool,
    enabled: bool,
    busy: bool,
    items: Vec<SelectItem>,
    selected: Vec<SelectItem>,
    active: Vec<SelectItem>,
}

impl<R, W> ConsoleSelectView<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: Write + Send,
{
    fn render(&self) -> io::Result<()> {
        let width = self
            .items
            .iter()
            .map(|item| item.label.width())
            .max()
            .unwrap_or(0);

        self.base.console.write(|out, theme| {
            if let Some(placeholder) = &self.placeholder {
                queue!(
                    out,
                    Print("  "),
                    PrintStyledContent(theme.placeholder.apply(placeholder.as_str())),
                    Print("\n")
                )?;
            }
            for (index, item) in self.items.iter().enumerate() {
                let marked = self.selected.contains(item) || self.active.contains(item);
                let marker = if marked { "*" } else { " " };
                queue!(out, Print(format!(" {marker} {:>2}) ", index + 1)))?;
                if marked {
                    queue!(out, PrintStyledContent(theme.active.apply(item.label.as_str())))?;
                } else {
                    queue!(out, Print(item.label.as_str()))?;
                }
                if let Some(description) = &item.description {
                    let pad = " ".repeat(width.saturating_sub(item.label.width()) + 2);
                    queue!(
                        out,
                        Print(pad),
                        PrintStyledContent(theme.hint.apply(description.as_str()))
                    )?;
                }
                queue!(out, Print("\n"))?;
                if let Some(detail) = &item.detail {
                    queue!(
                        out,
                        Print("       "),
                        PrintStyledContent(theme.hint.apply(detail.as_str())),
                        Print("\n")
                    )?;
                }
            }
            Ok(())
        })?;

        let hint = if self.can_select_many {
            "item numbers separated by commas, enter keeps the marked items"
        } else {
            "an item number or label, enter keeps the marked item"
        };
        self.base.write_hint(hint)
    }

    fn choose(&self, line: &str) -> Result<Vec<SelectItem>, String> {
        if self.items.is_empty() {
            return Err("there is nothing to choose from".to_string());
        }
        if let Some(item) = self.items.iter().find(|item| item.label == line.trim()) {
            return Ok(vec![item.clone()]);
        }

        let mut chosen: Vec<SelectItem> = Vec::new();
        for part in line
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|part| !part.is_empty())
        {
            let number: usize = part
                .parse()
                .map_err(|_| format!("'{part}' is not an item number"))?;
            let item = number
                .checked_sub(1)
                .and_then(|index| self.items.get(index))
                .ok_or_else(|| format!("choose a number between 1 and {}", self.items.len()))?;
            if !chosen.contains(item) {
                chosen.push(item.clone());
            }
        }
        if !self.can_select_many {
            chosen.truncate(1);
        }
        Ok(chosen)
    }
}

#[async_trait]
impl<R, W> StepView for ConsoleSelectView<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: Write + Send,
{
    fn set_title(&mut self, title: &str) {
        self.base.title = title.to_string();
    }

    fn set_step_indicator(&mut self, indicator: Option<StepIndicator>) {
        self.base.indicator = indicator;
    }

    fn set_buttons(&mut self, buttons: Vec<ViewButton>) {
        self.base.buttons = buttons;
    }

    fn set_ignore_focus_out(&mut self, _ignore: bool) {}

    fn show(&mut self) -> io::Result<()> {
        self.base.shown = true;
        self.base.write_header()
    }

    async fn next_event(&mut self) -> io::Result<ViewEvent> {
        loop {
            if self.base.dirty && self.enabled {
                self.render()?;
                self.base.dirty = false;
            }
            self.base.write_prompt()?;

            let Some(line) = self.base.console.read_line().await? else {
                return Ok(ViewEvent::Hide);
            };
            match self.base.command(&line) {
                Some(Ok(event)) => return Ok(event),
                Some(Err(message)) => {
                    self.base.notice(&message)?;
                    continue;
                }
                None => {}
            }

            let line = unescape(&line);
            if line.trim().is_empty() {
                if self.selected.is_empty() && !self.can_select_many {
                    self.selected = self.active.iter().take(1).cloned().collect();
                }
                if self.selected.is_empty() {
                    self.base.notice("nothing is selected")?;
                }
                return Ok(ViewEvent::Accept);
            }

            match self.choose(line) {
                Ok(chosen) => {
                    self.selected = chosen;
                    return Ok(ViewEvent::Accept);
                }
                Err(message) => self.base.notice(&message)?,
            }
        }
    }

    fn dispose(&mut self) {
        trace!(title = %self.base.title, "select view disposed");
    }
}

impl<R, W> SelectView for ConsoleSelectView<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: Write + Send,
{
    fn set_placeholder(&mut self, placeholder: Option<&str>) {
        self.placeholder = placeholder.map(str::to_string);
    }

    fn set_can_select_many(&mut self, can_select_many: bool) {
        self.can_select_many = can_select_many;
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn set_busy(&mut self, busy: bool) {
        if busy && !self.busy && self.base.shown {
            let written = self.base.console.write(|out, theme| {
                queue!(
                    out,
                    PrintStyledContent(theme.hint.apply("  loading…")),
                    Print("\n")
                )
            });
            if let Err(err) = written {
                warn!("failed to write loading indicator: {}", err);
            }
        }
        self.busy = busy;
    }

    fn set_items(&mut self, items: Vec<SelectItem>) {
        self.items = items;
        self.base.dirty = true;
    }

    fn set_selected_items(&mut self, items: Vec<SelectItem>) {
        self.selected = items;
        self.base.dirty = true;
    }

    fn set_active_items(&mut self, items: Vec<SelectItem>) {
        self.active = items;
        self.base.dirty = true;
    }

    fn selected_items(&self) -> Vec<SelectItem> {
        self.selected.clone()
    }
}

// ── Text view ─────────────────────────────────────────────────────────────────

pub struct ConsoleTextView<R, W> {
    base: ViewBase<R, W>,
    value: String,
    placeholder: Option<String>,
    prompt: Option<String>,
    password: bool,
    validation_message: Option<String>,
    pending: VecDeque<ViewEvent>,
}

impl<R, W> ConsoleTextView<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: Write + Send,
{
    fn shown_value(&self) -> String {
        if self.password {
            "•".repeat(self.value.chars().count())
        } else {
            self.value.clone()
        }
    }

    fn render(&self) -> io::Result<()> {
        self.base.console.write(|out, theme| {
            if let Some(prompt) = &self.prompt {
                queue!(
                    out,
                    Print("  "),
                    PrintStyledContent(theme.hint.apply(prompt.as_str())),
                    Print("\n")
                )?;
            }
            if self.value.is_empty() {
                if let Some(placeholder) = &self.placeholder {
                    queue!(
                        out,
                        Print("  "),
                        PrintStyledContent(theme.placeholder.apply(placeholder.as_str())),
                        Print("\n")
                    )?;
                }
            } else {
                queue!(
                    out,
                    Print("  current: "),
                    PrintStyledContent(theme.active.apply(self.shown_value())),
                    Print("\n")
                )?;
            }
            if let Some(message) = &self.validation_message {
                let text = format!("  ! {message}");
                queue!(out, PrintStyledContent(theme.error.apply(text)), Print("\n"))?;
            }
            Ok(())
        })?;
        self.base
            .write_hint("type a value, enter keeps the current one")
    }
}

#[async_trait]
impl<R, W> StepView for ConsoleTextView<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: Write + Send,
{
    fn set_title(&mut self, title: &str) {
        self.base.title = title.to_string();
    }

    fn set_step_indicator(&mut self, indicator: Option<StepIndicator>) {
        self.base.indicator = indicator;
    }

    fn set_buttons(&mut self, buttons: Vec<ViewButton>) {
        self.base.buttons = buttons;
    }

    fn set_ignore_focus_out(&mut self, _ignore: bool) {}

    fn show(&mut self) -> io::Result<()> {
        self.base.shown = true;
        self.base.write_header()
    }

    async fn next_event(&mut self) -> io::Result<ViewEvent> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Ok(event);
            }
            if self.base.dirty {
                self.render()?;
                self.base.dirty = false;
            }
            self.base.write_prompt()?;

            let Some(line) = self.base.console.read_line().await? else {
                return Ok(ViewEvent::Hide);
            };
            match self.base.command(&line) {
                Some(Ok(event)) => return Ok(event),
                Some(Err(message)) => {
                    self.base.notice(&message)?;
                    continue;
                }
                None => {}
            }

            if line.is_empty() {
                self.base.dirty = true;
                return Ok(ViewEvent::Accept);
            }

            self.value = unescape(&line).to_string();
            self.base.dirty = true;
            self.pending.push_back(ViewEvent::Accept);
            return Ok(ViewEvent::ValueChanged(self.value.clone()));
        }
    }

    fn dispose(&mut self) {
        self.pending.clear();
        trace!(title = %self.base.title, "text view disposed");
    }
}

impl<R, W> TextView for ConsoleTextView<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: Write + Send,
{
    fn set_value(&mut self, value: &str) {
        self.value = value.to_string();
    }

    fn set_placeholder(&mut self, placeholder: Option<&str>) {
        self.placeholder = placeholder.map(str::to_string);
    }

    fn set_prompt(&mut self, prompt: Option<&str>) {
        self.prompt = prompt.map(str::to_string);
    }

    fn set_password(&mut self, password: bool) {
        self.password = password;
    }

    fn set_validation_message(&mut self, message: Option<&str>) {
        self.validation_message = message.map(str::to_string);
        self.base.dirty = true;
    }

    fn value(&self) -> String {
        self.value.clone()
    }
}
