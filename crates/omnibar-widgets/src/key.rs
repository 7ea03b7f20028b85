//! Key bindings for the URL bar and a key map trait for rendering help lines.

use std::fmt;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// A key binding that maps one or more key combinations to a described action.
#[derive(Debug, Clone)]
pub struct Binding {
    /// The set of key combinations that trigger this binding.
    pub keys: Vec<KeyCombination>,
    /// A human-readable description of the action this binding performs.
    pub description: String,
    /// Whether this binding is currently active. Disabled bindings never match.
    pub enabled: bool,
}

/// A single key press with optional modifier keys (Ctrl, Alt, Shift).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCombination {
    /// The base key code.
    pub code: KeyCode,
    /// Modifier keys that must be held alongside the base key.
    pub modifiers: KeyModifiers,
}

impl Binding {
    /// Create a new binding for a single key combination.
    pub fn new(key: KeyCombination, description: impl Into<String>) -> Self {
        Self::with_keys(vec![key], description)
    }

    /// Create a new binding for several key combinations.
    pub fn with_keys(keys: Vec<KeyCombination>, description: impl Into<String>) -> Self {
        Self {
            keys,
            description: description.into(),
            enabled: true,
        }
    }

    /// Whether `event` matches any of this binding's combinations.
    /// Always `false` when the binding is disabled.
    pub fn matches(&self, event: &KeyEvent) -> bool {
        self.enabled
            && self
                .keys
                .iter()
                .any(|k| k.code == event.code && event.modifiers.contains(k.modifiers))
    }

    /// Enable or disable the binding.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Label of the first key, for help lines.
    pub fn key_label(&self) -> String {
        self.keys.first().map(|k| k.to_string()).unwrap_or_default()
    }
}

impl KeyCombination {
    /// A key with no modifiers.
    pub fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::NONE,
        }
    }

    /// A key with the Ctrl modifier.
    pub fn ctrl(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::CONTROL,
        }
    }
}

impl fmt::Display for KeyCombination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            f.write_str("Ctrl+")?;
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            f.write_str("Alt+")?;
        }
        match self.code {
            KeyCode::Char(c) => write!(f, "{}", c.to_ascii_uppercase()),
            KeyCode::Enter => f.write_str("Enter"),
            KeyCode::Esc => f.write_str("Esc"),
            KeyCode::Tab => f.write_str("Tab"),
            KeyCode::Backspace => f.write_str("Backspace"),
            KeyCode::Right => f.write_str("Right"),
            KeyCode::End => f.write_str("End"),
            other => write!(f, "{other:?}"),
        }
    }
}

/// Types that expose their key bindings for a help line.
pub trait KeyMap {
    /// The most important bindings, in display order.
    fn short_help(&self) -> Vec<&Binding>;
}

/// Rebindable keys of the [`UrlBar`](crate::url_bar::UrlBar).
///
/// Character insertion, Backspace and caret movement are fixed; these are the
/// command keys layered on top.
#[derive(Debug, Clone)]
pub struct UrlBarKeyMap {
    /// Accept the displayed suggestion.
    pub accept: Binding,
    /// Submit the entry.
    pub submit: Binding,
    /// Cancel editing.
    pub cancel: Binding,
    /// Clear the field.
    pub clear: Binding,
    /// Select the whole entry.
    pub select_all: Binding,
}

impl Default for UrlBarKeyMap {
    fn default() -> Self {
        Self {
            accept: Binding::new(KeyCombination::new(KeyCode::Tab), "accept"),
            submit: Binding::new(KeyCombination::new(KeyCode::Enter), "go"),
            cancel: Binding::new(KeyCombination::new(KeyCode::Esc), "cancel"),
            clear: Binding::new(KeyCombination::ctrl(KeyCode::Char('u')), "clear"),
            select_all: Binding::new(KeyCombination::ctrl(KeyCode::Char('a')), "select all"),
        }
    }
}

impl KeyMap for UrlBarKeyMap {
    fn short_help(&self) -> Vec<&Binding> {
        [
            &self.accept,
            &self.submit,
            &self.clear,
            &self.select_all,
            &self.cancel,
        ]
        .into_iter()
        .filter(|b| b.enabled)
        .collect()
    }
}
