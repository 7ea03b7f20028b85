//! Browser-style URL bar: a single-line input with an inline, highlighted
//! completion suggestion.
//!
//! `UrlBar` is the terminal front end of
//! [`InlineCompletion`](crate::inline_completion::InlineCompletion). It
//! translates key presses into edit operations and renders the entered text
//! and the suggestion as two distinct spans. The suggestion is drawn like a
//! selection after the caret; Tab, Right or End accept it, Backspace rejects
//! it, and Enter submits the entry with the suggestion folded in.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use omnibar_core::command::Command;
use omnibar_core::component::Component;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use ratatui::Frame;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::completion::{CompletionProvider, DomainCompletion};
use crate::inline_completion::{EditOutcome, InlineCompletion};
use crate::key::UrlBarKeyMap;

/// Style configuration for the URL bar.
#[derive(Debug, Clone)]
pub struct UrlBarStyle {
    /// Style applied to the prompt string.
    pub prompt: Style,
    /// Style applied to the entered text.
    pub text: Style,
    /// Style applied to the placeholder text.
    pub placeholder: Style,
    /// Style applied to the cursor cell.
    pub cursor: Style,
    /// Style applied to the inline suggestion.
    pub suggestion: Style,
    /// Style applied to entered text while it is all selected.
    pub selection: Style,
}

impl Default for UrlBarStyle {
    fn default() -> Self {
        Self {
            prompt: Style::default().fg(Color::Cyan),
            text: Style::default(),
            placeholder: Style::default().fg(Color::DarkGray),
            cursor: Style::default().add_modifier(Modifier::REVERSED),
            suggestion: Style::default().fg(Color::Black).bg(Color::LightBlue),
            selection: Style::default().fg(Color::Black).bg(Color::Gray),
        }
    }
}

/// Messages for the URL bar.
#[derive(Debug, Clone)]
pub enum Message {
    /// A keyboard event to process.
    KeyPress(KeyEvent),
    /// Bracketed paste content, inserted at the caret.
    Paste(String),
    /// The terminal lost focus; any suggestion is accepted.
    FocusLost,
    /// An input method started composing text.
    CompositionStarted,
    /// The input method finished composing.
    CompositionEnded,
    /// Emitted with the entered text whenever it changes.
    Changed(String),
    /// Emitted with the full text when a suggestion is accepted.
    Committed(String),
    /// Emitted with the final text when Enter is pressed.
    Submit(String),
    /// Emitted when Esc is pressed.
    Cancelled,
}

/// A URL bar with inline domain completion.
///
/// # Example
///
/// ```ignore
/// let mut bar = UrlBar::new("Search or enter address")
///     .with_prompt("> ")
///     .with_select_on_focus(true);
/// bar.focus();
///
/// // In the parent's update:
/// // let cmd = bar.update(msg).map(Msg::UrlBar);
///
/// // In the parent's view:
/// // bar.view(frame, area);
/// ```
pub struct UrlBar<P = DomainCompletion> {
    field: InlineCompletion<P>,
    focus: bool,
    select_on_focus: bool,
    placeholder: String,
    prompt: String,
    style: UrlBarStyle,
    keys: UrlBarKeyMap,
    block: Option<Block<'static>>,
}

impl UrlBar<DomainCompletion> {
    /// Create a URL bar completing from the built-in domain lists.
    pub fn new(placeholder: impl Into<String>) -> Self {
        UrlBar::with_provider(DomainCompletion::new(), placeholder)
    }
}

impl<P: CompletionProvider + Send + 'static> UrlBar<P> {
    /// Create a URL bar completing from `provider`.
    pub fn with_provider(provider: P, placeholder: impl Into<String>) -> Self {
        Self {
            field: InlineCompletion::new(provider),
            focus: false,
            select_on_focus: false,
            placeholder: placeholder.into(),
            prompt: String::new(),
            style: UrlBarStyle::default(),
            keys: UrlBarKeyMap::default(),
            block: None,
        }
    }

    /// Set a prompt string displayed before the input.
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Set custom styles.
    pub fn with_style(mut self, style: UrlBarStyle) -> Self {
        self.style = style;
        self
    }

    /// Replace the command key bindings.
    pub fn with_keys(mut self, keys: UrlBarKeyMap) -> Self {
        self.keys = keys;
        self
    }

    /// Wrap the input in the given block (border/title).
    pub fn with_block(mut self, block: Block<'static>) -> Self {
        self.block = Some(block);
        self
    }

    /// Select the whole entry whenever the bar gains focus, so typing
    /// replaces the current address.
    pub fn with_select_on_focus(mut self, select: bool) -> Self {
        self.select_on_focus = select;
        self
    }

    /// Suppress suggestions while `probe` reports a composition-heavy input
    /// method.
    pub fn with_composition_probe(mut self, probe: impl Fn() -> bool + Send + 'static) -> Self {
        self.field.set_composition_probe(probe);
        self
    }

    /// The underlying editing state.
    pub fn field(&self) -> &InlineCompletion<P> {
        &self.field
    }

    /// Mutable access to the editing state, e.g. to update the provider.
    pub fn field_mut(&mut self) -> &mut InlineCompletion<P> {
        &mut self.field
    }

    /// The key bindings.
    pub fn keys(&self) -> &UrlBarKeyMap {
        &self.keys
    }

    /// The entered text, without any suggestion.
    pub fn value(&self) -> String {
        self.field.entered_text()
    }

    /// Programmatically replace the entry. Never produces a suggestion.
    pub fn set_value(&mut self, value: &str) {
        let _ = self.field.set_text(value);
    }

    /// Give the bar keyboard focus.
    pub fn focus(&mut self) {
        self.focus = true;
        if self.select_on_focus {
            let _ = self.field.select_all();
        }
    }

    /// Remove keyboard focus, accepting any displayed suggestion.
    pub fn blur(&mut self) -> Command<Message> {
        self.focus = false;
        let outcome = self.field.commit();
        self.outcome_command(outcome)
    }

    fn outcome_command(&self, outcome: EditOutcome) -> Command<Message> {
        let mut cmds = Vec::new();
        if outcome.text_changed {
            cmds.push(Command::message(Message::Changed(self.field.entered_text())));
        }
        if outcome.committed {
            cmds.push(Command::message(Message::Committed(
                self.field.entered_text(),
            )));
        }
        Command::batch(cmds)
    }

    fn handle_key(&mut self, key: KeyEvent) -> Command<Message> {
        if self.keys.submit.matches(&key) {
            let outcome = self.field.submit();
            let submit = Command::message(Message::Submit(self.field.entered_text()));
            return Command::batch([self.outcome_command(outcome), submit]);
        }
        if self.keys.accept.matches(&key) {
            let outcome = self.field.commit();
            return self.outcome_command(outcome);
        }
        if self.keys.cancel.matches(&key) {
            let _ = self.field.reject_suggestion();
            return Command::message(Message::Cancelled);
        }
        if self.keys.clear.matches(&key) {
            let outcome = self.field.clear();
            return self.outcome_command(outcome);
        }
        if self.keys.select_all.matches(&key) {
            let _ = self.field.select_all();
            return Command::none();
        }

        let suggesting = self.field.state().is_active();
        let caret = self.field.caret();
        let outcome = match (key.code, key.modifiers) {
            (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
                let mut buf = [0u8; 4];
                self.field.insert_characters(c.encode_utf8(&mut buf))
            }
            (KeyCode::Backspace, _) => self.field.delete_backward(),
            (KeyCode::Left, _) => self.field.move_caret(caret.saturating_sub(1)),
            (KeyCode::Right, _) | (KeyCode::End, _) if suggesting => self.field.commit(),
            (KeyCode::Right, _) => self.field.move_caret(caret + 1),
            (KeyCode::Home, _) => self.field.move_caret(0),
            (KeyCode::End, _) => self.field.move_caret(self.field.len()),
            _ => return Command::none(),
        };
        self.outcome_command(outcome)
    }

    /// Cells to draw: each displayed character with its style.
    fn styled_chars(&self) -> Vec<(char, Style)> {
        let entered = self.field.entered_chars();
        let suggesting = self.field.state().is_active();
        let all_selected = self.field.is_all_selected();
        let caret = self.field.caret();

        let mut cells: Vec<(char, Style)> = entered
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                let style = if all_selected {
                    self.style.selection
                } else if self.focus && !suggesting && i == caret {
                    self.style.cursor
                } else {
                    self.style.text
                };
                (c, style)
            })
            .collect();
        if let Some(suffix) = self.field.suggestion_suffix() {
            cells.extend(suffix.chars().map(|c| (c, self.style.suggestion)));
        }
        if self.focus && !suggesting && !all_selected && caret == entered.len() {
            cells.push((' ', self.style.cursor));
        }
        cells
    }
}

impl<P: CompletionProvider + Send + 'static> Component for UrlBar<P> {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Command<Message> {
        match msg {
            Message::KeyPress(key) => {
                if !self.focus {
                    return Command::none();
                }
                self.handle_key(key)
            }
            Message::Paste(text) => {
                if !self.focus {
                    return Command::none();
                }
                let line: String = text.chars().filter(|c| !c.is_control()).collect();
                let outcome = self.field.insert_characters(&line);
                self.outcome_command(outcome)
            }
            Message::FocusLost => {
                let outcome = self.field.commit();
                self.outcome_command(outcome)
            }
            Message::CompositionStarted => {
                let outcome = self.field.begin_composition();
                self.outcome_command(outcome)
            }
            Message::CompositionEnded => {
                self.field.end_composition();
                Command::none()
            }
            Message::Changed(_)
            | Message::Committed(_)
            | Message::Submit(_)
            | Message::Cancelled => Command::none(),
        }
    }

    fn view(&self, frame: &mut Frame, area: Rect) {
        let inner = if let Some(ref block) = self.block {
            let inner = block.inner(area);
            frame.render_widget(block.clone(), area);
            inner
        } else {
            area
        };

        let mut spans = Vec::new();
        if !self.prompt.is_empty() {
            spans.push(Span::styled(self.prompt.as_str(), self.style.prompt));
        }

        if self.field.is_empty() && !self.focus {
            spans.push(Span::styled(
                self.placeholder.as_str(),
                self.style.placeholder,
            ));
            frame.render_widget(Paragraph::new(Line::from(spans)), inner);
            return;
        }

        let available = (inner.width as usize).saturating_sub(self.prompt.width());
        let cells = self.styled_chars();
        let anchor = self.field.caret().min(cells.len().saturating_sub(1));
        let offset = scroll_offset(&cells, anchor, available);

        // Merge runs of equally styled characters into spans.
        let mut used = 0;
        let mut run = String::new();
        let mut run_style: Option<Style> = None;
        for &(c, style) in &cells[offset..] {
            let w = c.width().unwrap_or(0);
            if used + w > available {
                break;
            }
            used += w;
            if run_style != Some(style) {
                if let Some(prev) = run_style {
                    spans.push(Span::styled(std::mem::take(&mut run), prev));
                }
                run_style = Some(style);
            }
            run.push(c);
        }
        if let Some(style) = run_style {
            spans.push(Span::styled(run, style));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), inner);
    }

    fn focused(&self) -> bool {
        self.focus
    }
}

/// First visible cell so that the cell at `anchor` fits within `available` columns.
fn scroll_offset(cells: &[(char, Style)], anchor: usize, available: usize) -> usize {
    if cells.is_empty() || available == 0 {
        return 0;
    }
    let width = |i: usize| cells[i].0.width().unwrap_or(0);
    let mut offset = 0;
    let mut used: usize = (0..=anchor).map(width).sum();
    while used > available && offset < anchor {
        used -= width(offset);
        offset += 1;
    }
    offset
}
