//! Inline completion editing state.
//!
//! `InlineCompletion` keeps the text the user actually typed (the *entered*
//! text) apart from a provider-supplied *suggestion* that is displayed right
//! after it. The suggestion is ephemeral: it only appears as the result of a
//! live insertion that leaves the caret at the end, and it is thrown away as
//! soon as the user deletes, moves the caret into the text, starts an IME
//! composition, or the text is replaced programmatically. [`commit`] folds it
//! into the entered text.
//!
//! The state is independent of any rendering toolkit. Used by
//! [`UrlBar`](crate::url_bar::UrlBar), which draws the entered text and the
//! suggestion as two differently styled spans.
//!
//! # Example
//!
//! ```
//! use omnibar_widgets::inline_completion::InlineCompletion;
//!
//! let provider = |text: &str| {
//!     "google.com".starts_with(text).then(|| "google.com".to_string())
//! };
//! let mut field = InlineCompletion::new(provider);
//!
//! let _ = field.insert_characters("goo");
//! assert_eq!(field.display_text(), "google.com");
//! assert_eq!(field.suggestion_suffix(), Some("gle.com"));
//!
//! // The first backspace only rejects the suggestion.
//! let _ = field.delete_backward();
//! assert_eq!(field.display_text(), "goo");
//! ```
//!
//! [`commit`]: InlineCompletion::commit

use std::fmt;
use std::ops::Range;

use tracing::{debug, trace};

use crate::completion::CompletionProvider;

/// Whether a suggestion is currently shown after the entered text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CompletionState {
    /// No suggestion is displayed.
    #[default]
    Inactive,
    /// A suggestion is displayed after the entered text.
    Active {
        /// The highlighted, not yet committed tail.
        suffix: String,
        /// The full string the provider returned.
        source: String,
    },
}

impl CompletionState {
    /// Whether a suggestion is displayed.
    pub fn is_active(&self) -> bool {
        matches!(self, CompletionState::Active { .. })
    }

    /// The suggested tail, if any.
    pub fn suffix(&self) -> Option<&str> {
        match self {
            CompletionState::Active { suffix, .. } => Some(suffix),
            CompletionState::Inactive => None,
        }
    }
}

/// What an edit operation changed.
///
/// Every mutating method on [`InlineCompletion`] returns one of these so a
/// host that does not install callbacks can still react to the edit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[must_use]
pub struct EditOutcome {
    /// The entered text changed.
    pub text_changed: bool,
    /// A suggestion was installed, replaced or removed.
    pub suggestion_changed: bool,
    /// A suggestion was folded into the entered text.
    pub committed: bool,
}

impl EditOutcome {
    /// Whether the operation had no visible effect.
    pub fn is_noop(&self) -> bool {
        !self.text_changed && !self.suggestion_changed && !self.committed
    }
}

type TextCallback = Box<dyn FnMut(&str) + Send>;

#[derive(Default)]
struct Callbacks {
    on_text_changed: Option<TextCallback>,
    on_completion_committed: Option<TextCallback>,
}

/// Editable text with an inline, uncommitted completion suggestion.
///
/// The caret is a character index into the displayed text. While a
/// suggestion is active it sits exactly at the end of the entered text, so it
/// never lands inside the suggestion.
pub struct InlineCompletion<P> {
    entered: Vec<char>,
    caret: usize,
    state: CompletionState,
    provider: P,
    composing: bool,
    all_selected: bool,
    composition_heavy: Option<Box<dyn Fn() -> bool + Send>>,
    callbacks: Callbacks,
}

impl<P: CompletionProvider> InlineCompletion<P> {
    /// Create an empty field that asks `provider` for completions.
    pub fn new(provider: P) -> Self {
        Self {
            entered: Vec::new(),
            caret: 0,
            state: CompletionState::Inactive,
            provider,
            composing: false,
            all_selected: false,
            composition_heavy: None,
            callbacks: Callbacks::default(),
        }
    }

    /// Call `f` with the entered text after every edit that changes it.
    pub fn with_on_text_changed(mut self, f: impl FnMut(&str) + Send + 'static) -> Self {
        self.callbacks.on_text_changed = Some(Box::new(f));
        self
    }

    /// Call `f` with the full text whenever a suggestion is committed, and
    /// on every [`submit`](Self::submit) whether or not one was active.
    pub fn with_on_completion_committed(mut self, f: impl FnMut(&str) + Send + 'static) -> Self {
        self.callbacks.on_completion_committed = Some(Box::new(f));
        self
    }

    /// Install a predicate reporting whether the active input method composes
    /// every character (e.g. CJK input). While it returns `true` no
    /// suggestion is offered.
    pub fn with_composition_probe(mut self, probe: impl Fn() -> bool + Send + 'static) -> Self {
        self.composition_heavy = Some(Box::new(probe));
        self
    }

    /// Replace the composition probe installed with
    /// [`with_composition_probe`](Self::with_composition_probe).
    pub fn set_composition_probe(&mut self, probe: impl Fn() -> bool + Send + 'static) {
        self.composition_heavy = Some(Box::new(probe));
    }

    /// The completion provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Mutable access to the completion provider.
    pub fn provider_mut(&mut self) -> &mut P {
        &mut self.provider
    }

    /// The text the user has typed or confirmed, without the suggestion.
    pub fn entered_text(&self) -> String {
        self.entered.iter().collect()
    }

    /// The entered text as characters.
    pub fn entered_chars(&self) -> &[char] {
        &self.entered
    }

    /// The highlighted suggestion tail, if one is active.
    pub fn suggestion_suffix(&self) -> Option<&str> {
        self.state.suffix()
    }

    /// Entered text followed by the suggestion, as displayed.
    pub fn display_text(&self) -> String {
        let mut text = self.entered_text();
        if let Some(suffix) = self.state.suffix() {
            text.push_str(suffix);
        }
        text
    }

    /// Character range of the suggestion within [`display_text`](Self::display_text).
    pub fn suggestion_range(&self) -> Option<Range<usize>> {
        self.state.suffix().map(|suffix| {
            let start = self.entered.len();
            start..start + suffix.chars().count()
        })
    }

    /// Caret position as a character index into the displayed text.
    pub fn caret(&self) -> usize {
        self.caret
    }

    /// Current completion state.
    pub fn state(&self) -> &CompletionState {
        &self.state
    }

    /// Whether an IME composition is in progress.
    pub fn is_composing(&self) -> bool {
        self.composing
    }

    /// Whether the whole entered text is selected.
    pub fn is_all_selected(&self) -> bool {
        self.all_selected
    }

    /// Number of entered characters.
    pub fn len(&self) -> usize {
        self.entered.len()
    }

    /// Whether the entered text is empty.
    pub fn is_empty(&self) -> bool {
        self.entered.is_empty()
    }

    /// Insert `s` at the caret, replacing the whole text if it is selected.
    ///
    /// Any displayed suggestion is dropped first, so insertion always works
    /// on the entered text. If the caret ends up at the end of the text the
    /// provider is asked for a new suggestion.
    pub fn insert_characters(&mut self, s: &str) -> EditOutcome {
        if s.is_empty() {
            return EditOutcome::default();
        }
        let mut outcome = EditOutcome {
            suggestion_changed: self.discard_suggestion(),
            ..EditOutcome::default()
        };

        if self.all_selected {
            self.all_selected = false;
            self.entered.clear();
            self.caret = 0;
        }

        let inserted: Vec<char> = s.chars().collect();
        let count = inserted.len();
        self.entered.splice(self.caret..self.caret, inserted);
        self.caret += count;
        outcome.text_changed = true;

        if self.caret == self.entered.len() && self.request_completion() {
            outcome.suggestion_changed = true;
        }

        self.notify_text_changed();
        outcome
    }

    /// Delete backward from the caret.
    ///
    /// An active suggestion absorbs the whole keystroke: it is removed and no
    /// entered character is lost. Otherwise the character before the caret
    /// is removed, or everything when the text is selected.
    pub fn delete_backward(&mut self) -> EditOutcome {
        if self.discard_suggestion() {
            return EditOutcome {
                suggestion_changed: true,
                ..EditOutcome::default()
            };
        }

        if self.all_selected {
            self.all_selected = false;
            if self.entered.is_empty() {
                return EditOutcome::default();
            }
            self.entered.clear();
            self.caret = 0;
        } else if self.caret == 0 {
            return EditOutcome::default();
        } else {
            self.caret -= 1;
            self.entered.remove(self.caret);
        }

        self.notify_text_changed();
        EditOutcome {
            text_changed: true,
            ..EditOutcome::default()
        }
    }

    /// Signal that a multi-stage (IME) composition is starting.
    ///
    /// Composition can insert anywhere in the text, so the suggestion is
    /// dropped and none is offered until [`end_composition`](Self::end_composition).
    pub fn begin_composition(&mut self) -> EditOutcome {
        let discarded = self.discard_suggestion();
        if !self.composing {
            trace!("composition started");
        }
        self.composing = true;
        EditOutcome {
            suggestion_changed: discarded,
            ..EditOutcome::default()
        }
    }

    /// Signal that the composition finished. Later insertions may suggest again.
    pub fn end_composition(&mut self) {
        if self.composing {
            trace!("composition ended");
        }
        self.composing = false;
    }

    /// Fold an active suggestion into the entered text.
    ///
    /// The caret moves to the new end. Does nothing without an active
    /// suggestion, so calling it repeatedly is safe.
    pub fn commit(&mut self) -> EditOutcome {
        let CompletionState::Active { suffix, .. } = std::mem::take(&mut self.state) else {
            return EditOutcome::default();
        };

        self.entered.extend(suffix.chars());
        self.caret = self.entered.len();
        self.all_selected = false;
        debug!(text = %self.entered_text(), "suggestion committed");

        self.notify_text_changed();
        self.notify_committed();
        EditOutcome {
            text_changed: true,
            suggestion_changed: true,
            committed: true,
        }
    }

    /// Finalize the entry on a return-key press.
    ///
    /// Folds any active suggestion in like [`commit`](Self::commit), then
    /// reports the entered text to the committed callback even when there
    /// was nothing to fold. The callback fires exactly once per call.
    pub fn submit(&mut self) -> EditOutcome {
        let outcome = self.commit();
        if !outcome.committed {
            debug!(text = %self.entered_text(), "entry submitted");
            self.notify_committed();
        }
        outcome
    }

    /// Drop an active suggestion, leaving the entered text as typed.
    pub fn reject_suggestion(&mut self) -> EditOutcome {
        EditOutcome {
            suggestion_changed: self.discard_suggestion(),
            ..EditOutcome::default()
        }
    }

    /// Replace the entered text programmatically.
    ///
    /// Drops any suggestion and does not ask the provider: suggestions only
    /// come from live typing.
    pub fn set_text(&mut self, s: &str) -> EditOutcome {
        let discarded = self.discard_suggestion();
        self.all_selected = false;

        let text: Vec<char> = s.chars().collect();
        let changed = text != self.entered;
        self.entered = text;
        self.caret = self.entered.len();

        if changed {
            self.notify_text_changed();
        }
        EditOutcome {
            text_changed: changed,
            suggestion_changed: discarded,
            committed: false,
        }
    }

    /// Clear the entered text.
    pub fn clear(&mut self) -> EditOutcome {
        self.set_text("")
    }

    /// Select the whole entered text so the next edit replaces it.
    pub fn select_all(&mut self) -> EditOutcome {
        let discarded = self.discard_suggestion();
        self.all_selected = !self.entered.is_empty();
        self.caret = self.entered.len();
        EditOutcome {
            suggestion_changed: discarded,
            ..EditOutcome::default()
        }
    }

    /// Move the caret in response to something other than this field's own
    /// edits, such as a tap or an arrow key.
    ///
    /// With a suggestion active, a position at or past the end of the
    /// displayed text accepts it (the trailing-edge gesture); any other
    /// position away from the end of the entered text drops it before the
    /// caret is placed. Positions are clamped to the entered text.
    pub fn move_caret(&mut self, pos: usize) -> EditOutcome {
        self.all_selected = false;

        if let Some(range) = self.suggestion_range() {
            if pos >= range.end {
                return self.commit();
            }
            if pos == range.start {
                return EditOutcome::default();
            }
            self.discard_suggestion();
            self.caret = pos.min(self.entered.len());
            return EditOutcome {
                suggestion_changed: true,
                ..EditOutcome::default()
            };
        }

        self.caret = pos.min(self.entered.len());
        EditOutcome::default()
    }

    fn is_composition_heavy_input_active(&self) -> bool {
        self.composition_heavy.as_ref().is_some_and(|probe| probe())
    }

    fn request_completion(&mut self) -> bool {
        self.state = CompletionState::Inactive;
        if self.composing {
            trace!("composition in progress, not suggesting");
            return false;
        }
        if self.is_composition_heavy_input_active() {
            trace!("composition-heavy input method active, not suggesting");
            return false;
        }

        let entered = self.entered_text();
        let Some(candidate) = self.provider.completion(&entered) else {
            return false;
        };
        match eligible_suffix(&entered, &candidate) {
            Some(suffix) => {
                debug!(%entered, %suffix, "suggestion installed");
                self.state = CompletionState::Active {
                    suffix,
                    source: candidate,
                };
                true
            }
            None => {
                trace!(%entered, %candidate, "candidate rejected");
                false
            }
        }
    }

    fn discard_suggestion(&mut self) -> bool {
        if !self.state.is_active() {
            return false;
        }
        self.state = CompletionState::Inactive;
        self.caret = self.entered.len();
        trace!("suggestion discarded");
        true
    }

    fn notify_text_changed(&mut self) {
        if let Some(ref mut cb) = self.callbacks.on_text_changed {
            let text: String = self.entered.iter().collect();
            cb(&text);
        }
    }

    fn notify_committed(&mut self) {
        if let Some(ref mut cb) = self.callbacks.on_completion_committed {
            let text: String = self.entered.iter().collect();
            cb(&text);
        }
    }
}

impl<P> fmt::Debug for InlineCompletion<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InlineCompletion")
            .field("entered", &self.entered.iter().collect::<String>())
            .field("caret", &self.caret)
            .field("state", &self.state)
            .field("composing", &self.composing)
            .field("all_selected", &self.all_selected)
            .finish_non_exhaustive()
    }
}

/// The part of `candidate` that would be shown after `entered`.
///
/// A candidate qualifies when it is non-empty, starts with `entered`
/// ignoring case, and is strictly longer. The returned tail keeps the
/// candidate's own casing.
pub fn eligible_suffix(entered: &str, candidate: &str) -> Option<String> {
    if candidate.is_empty() {
        return None;
    }
    // Both sides fold per char so context rules like final sigma agree.
    let target: String = entered.chars().flat_map(char::to_lowercase).collect();
    let mut folded = String::with_capacity(target.len());
    let mut split = 0;
    for (idx, c) in candidate.char_indices() {
        if folded.len() >= target.len() {
            break;
        }
        folded.extend(c.to_lowercase());
        split = idx + c.len_utf8();
    }
    if folded != target {
        return None;
    }
    let suffix = &candidate[split..];
    (!suffix.is_empty()).then(|| suffix.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::sync::{Arc, Mutex};

    fn fixed(completion: &'static str) -> impl Fn(&str) -> Option<String> {
        move |_: &str| Some(completion.to_string())
    }

    fn domains(text: &str) -> Option<String> {
        ["google.com", "mozilla.org", "GitHub.com"]
            .iter()
            .find(|d| d.to_lowercase().starts_with(&text.to_lowercase()))
            .map(|d| d.to_string())
    }

    fn type_chars<P: CompletionProvider>(field: &mut InlineCompletion<P>, text: &str) {
        for c in text.chars() {
            let _ = field.insert_characters(&c.to_string());
        }
    }

    #[test]
    fn eligible_completion_is_appended_as_suggestion() {
        let mut field = InlineCompletion::new(domains);
        type_chars(&mut field, "goo");

        assert_eq!(field.entered_text(), "goo");
        assert_eq!(field.display_text(), "google.com");
        assert_eq!(field.suggestion_suffix(), Some("gle.com"));
        assert_eq!(field.suggestion_range(), Some(3..10));
        assert_eq!(field.caret(), 3);
    }

    #[test]
    fn commit_folds_suggestion_into_entered_text() {
        let mut field = InlineCompletion::new(domains);
        type_chars(&mut field, "goo");

        let outcome = field.commit();
        assert!(outcome.committed);
        assert_eq!(field.entered_text(), "google.com");
        assert_eq!(field.caret(), 10);
        assert_eq!(field.state(), &CompletionState::Inactive);
    }

    #[test]
    fn commit_twice_is_noop() {
        let mut field = InlineCompletion::new(domains);
        type_chars(&mut field, "goo");
        let _ = field.commit();

        let outcome = field.commit();
        assert!(outcome.is_noop());
        assert_eq!(field.entered_text(), "google.com");
    }

    #[test]
    fn same_length_completion_is_rejected() {
        let mut field = InlineCompletion::new(fixed("go"));
        type_chars(&mut field, "go");
        assert_eq!(field.state(), &CompletionState::Inactive);
        assert_eq!(field.display_text(), "go");
    }

    #[test]
    fn non_prefix_completion_is_rejected() {
        let mut field = InlineCompletion::new(fixed("mozilla.org"));
        type_chars(&mut field, "go");
        assert!(!field.state().is_active());
    }

    #[test]
    fn empty_completion_is_rejected() {
        let mut field = InlineCompletion::new(fixed(""));
        type_chars(&mut field, "g");
        assert!(!field.state().is_active());
    }

    #[test]
    fn prefix_match_ignores_case_and_keeps_typed_prefix() {
        let mut field = InlineCompletion::new(domains);
        type_chars(&mut field, "gIT");

        assert_eq!(field.entered_text(), "gIT");
        assert_eq!(field.suggestion_suffix(), Some("Hub.com"));
        assert_eq!(field.display_text(), "gITHub.com");
        match field.state() {
            CompletionState::Active { source, .. } => assert_eq!(source, "GitHub.com"),
            other => panic!("expected active suggestion, got {other:?}"),
        }
    }

    #[test]
    fn first_backspace_only_rejects_suggestion() {
        let mut field = InlineCompletion::new(domains);
        type_chars(&mut field, "goo");

        let outcome = field.delete_backward();
        assert!(outcome.suggestion_changed);
        assert!(!outcome.text_changed);
        assert_eq!(field.display_text(), "goo");
        assert_eq!(field.caret(), 3);

        let outcome = field.delete_backward();
        assert!(outcome.text_changed);
        assert_eq!(field.entered_text(), "go");
        assert!(!field.state().is_active());
    }

    #[test]
    fn backspace_at_start_does_nothing() {
        let mut field = InlineCompletion::new(fixed(""));
        assert!(field.delete_backward().is_noop());
        assert_eq!(field.entered_text(), "");
    }

    #[test]
    fn begin_composition_discards_suggestion() {
        let mut field = InlineCompletion::new(fixed("google.com"));
        type_chars(&mut field, "go");
        assert_eq!(field.suggestion_suffix(), Some("ogle.com"));

        let outcome = field.begin_composition();
        assert!(outcome.suggestion_changed);
        assert_eq!(field.display_text(), "go");
        assert!(field.is_composing());
    }

    #[test]
    fn no_suggestion_while_composing() {
        let mut field = InlineCompletion::new(fixed("google.com"));
        let _ = field.begin_composition();
        type_chars(&mut field, "go");
        assert!(!field.state().is_active());

        field.end_composition();
        type_chars(&mut field, "o");
        assert_eq!(field.suggestion_suffix(), Some("gle.com"));
    }

    #[test]
    fn set_text_discards_suggestion_without_querying_provider() {
        let calls = Arc::new(Mutex::new(0usize));
        let counter = calls.clone();
        let provider = move |_: &str| {
            *counter.lock().unwrap() += 1;
            Some("google.com".to_string())
        };
        let mut field = InlineCompletion::new(provider);
        type_chars(&mut field, "go");
        assert!(field.state().is_active());
        let before = *calls.lock().unwrap();

        let _ = field.set_text("mozilla.org");
        assert_eq!(field.entered_text(), "mozilla.org");
        assert_eq!(field.state(), &CompletionState::Inactive);
        assert_eq!(field.caret(), 11);
        assert_eq!(*calls.lock().unwrap(), before);
    }

    #[test]
    fn insertion_in_middle_does_not_suggest() {
        let mut field = InlineCompletion::new(fixed("gxoogle.com"));
        let _ = field.set_text("goo");
        let _ = field.move_caret(1);
        let _ = field.insert_characters("x");
        assert_eq!(field.entered_text(), "gxoo");
        assert_eq!(field.caret(), 2);
        assert!(!field.state().is_active());
    }

    #[test]
    fn caret_move_into_text_discards_suggestion() {
        let mut field = InlineCompletion::new(domains);
        type_chars(&mut field, "goo");

        let outcome = field.move_caret(1);
        assert!(outcome.suggestion_changed);
        assert_eq!(field.display_text(), "goo");
        assert_eq!(field.caret(), 1);
    }

    #[test]
    fn caret_move_inside_suggestion_discards_and_clamps() {
        let mut field = InlineCompletion::new(domains);
        type_chars(&mut field, "goo");

        let _ = field.move_caret(6);
        assert!(!field.state().is_active());
        assert_eq!(field.caret(), 3);
    }

    #[test]
    fn caret_move_to_trailing_edge_accepts_suggestion() {
        let mut field = InlineCompletion::new(domains);
        type_chars(&mut field, "goo");

        let outcome = field.move_caret(10);
        assert!(outcome.committed);
        assert_eq!(field.entered_text(), "google.com");
        assert_eq!(field.caret(), 10);
    }

    #[test]
    fn caret_move_to_entered_end_keeps_suggestion() {
        let mut field = InlineCompletion::new(domains);
        type_chars(&mut field, "goo");
        assert!(field.move_caret(3).is_noop());
        assert!(field.state().is_active());
    }

    #[test]
    fn caret_never_inside_suggestion() {
        enum Step {
            Type(&'static str),
            Caret(usize),
            Backspace,
            Compose,
        }

        let mut field = InlineCompletion::new(domains);
        let steps = [
            Step::Type("mo"),
            Step::Caret(7),
            Step::Type("z"),
            Step::Backspace,
            Step::Type("zi"),
            Step::Caret(20),
            Step::Caret(0),
            Step::Type("x"),
            Step::Compose,
        ];
        for step in steps {
            match step {
                Step::Type(text) => type_chars(&mut field, text),
                Step::Caret(pos) => {
                    let _ = field.move_caret(pos);
                }
                Step::Backspace => {
                    let _ = field.delete_backward();
                }
                Step::Compose => {
                    let _ = field.begin_composition();
                }
            }
            if let Some(range) = field.suggestion_range() {
                assert_eq!(field.caret(), range.start);
            }
            assert!(field.caret() <= field.len());
        }
    }

    #[test]
    fn typing_through_suggestion_regenerates_it() {
        let mut field = InlineCompletion::new(domains);
        type_chars(&mut field, "g");
        assert_eq!(field.suggestion_suffix(), Some("oogle.com"));
        type_chars(&mut field, "o");
        assert_eq!(field.suggestion_suffix(), Some("ogle.com"));
        type_chars(&mut field, "x");
        assert_eq!(field.display_text(), "gox");
        assert!(!field.state().is_active());
    }

    #[test]
    fn composition_heavy_input_suppresses_suggestions() {
        let mut field = InlineCompletion::new(domains).with_composition_probe(|| true);
        type_chars(&mut field, "goo");
        assert!(!field.state().is_active());
        assert_eq!(field.display_text(), "goo");
    }

    #[test]
    fn select_all_then_typing_replaces_text() {
        let mut field = InlineCompletion::new(domains);
        let _ = field.set_text("example.org");
        let _ = field.select_all();
        assert!(field.is_all_selected());

        type_chars(&mut field, "m");
        assert_eq!(field.entered_text(), "m");
        assert_eq!(field.suggestion_suffix(), Some("ozilla.org"));
        assert!(!field.is_all_selected());
    }

    #[test]
    fn select_all_then_backspace_clears() {
        let mut field = InlineCompletion::new(domains);
        let _ = field.set_text("example.org");
        let _ = field.select_all();
        let outcome = field.delete_backward();
        assert!(outcome.text_changed);
        assert!(field.is_empty());
    }

    #[test]
    fn select_all_on_empty_text_selects_nothing() {
        let mut field = InlineCompletion::new(domains);
        let _ = field.select_all();
        assert!(!field.is_all_selected());
    }

    #[test]
    fn callbacks_report_entered_text_and_commits() {
        let changes = Arc::new(Mutex::new(Vec::new()));
        let commits = Arc::new(Mutex::new(Vec::new()));
        let changes_sink = changes.clone();
        let commits_sink = commits.clone();

        let mut field = InlineCompletion::new(domains)
            .with_on_text_changed(move |t| changes_sink.lock().unwrap().push(t.to_string()))
            .with_on_completion_committed(move |t| {
                commits_sink.lock().unwrap().push(t.to_string())
            });

        type_chars(&mut field, "go");
        let _ = field.delete_backward(); // rejects suggestion only
        let _ = field.delete_backward();
        type_chars(&mut field, "o");
        let _ = field.commit();
        let _ = field.commit();

        assert_eq!(
            *changes.lock().unwrap(),
            vec!["g", "go", "g", "go", "google.com"]
        );
        assert_eq!(*commits.lock().unwrap(), vec!["google.com"]);
    }

    #[test]
    fn set_text_to_same_value_reports_no_change() {
        let fired = Arc::new(Mutex::new(0));
        let sink = fired.clone();
        let mut field =
            InlineCompletion::new(domains).with_on_text_changed(move |_| *sink.lock().unwrap() += 1);
        let _ = field.set_text("abc");
        let outcome = field.set_text("abc");
        assert!(!outcome.text_changed);
        assert_eq!(*fired.lock().unwrap(), 1);
    }

    #[test]
    fn provider_called_once_per_insertion() {
        let calls = Cell::new(0);
        let provider = |_: &str| {
            calls.set(calls.get() + 1);
            None
        };
        let mut field = InlineCompletion::new(provider);
        let _ = field.insert_characters("abc");
        let _ = field.insert_characters("d");
        let _ = field.delete_backward();
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn multibyte_text_uses_char_positions() {
        let mut field = InlineCompletion::new(fixed("café.fr"));
        type_chars(&mut field, "caf");
        assert_eq!(field.suggestion_suffix(), Some("é.fr"));
        assert_eq!(field.suggestion_range(), Some(3..7));

        type_chars(&mut field, "É");
        assert_eq!(field.display_text(), "cafÉ.fr");
        assert_eq!(field.caret(), 4);
    }

    #[test]
    fn eligible_suffix_rules() {
        assert_eq!(eligible_suffix("goo", "google.com").as_deref(), Some("gle.com"));
        assert_eq!(eligible_suffix("GOO", "google.com").as_deref(), Some("gle.com"));
        assert_eq!(eligible_suffix("", "a").as_deref(), Some("a"));
        assert_eq!(eligible_suffix("go", "go"), None);
        assert_eq!(eligible_suffix("goo", "go"), None);
        assert_eq!(eligible_suffix("x", "google.com"), None);
        assert_eq!(eligible_suffix("x", ""), None);
    }

    #[test]
    fn prefix_match_folds_whole_strings() {
        // "İ" lowercases to two chars, "i" plus a combining dot.
        assert_eq!(
            eligible_suffix("İ", "i\u{307}stanbul.com").as_deref(),
            Some("stanbul.com")
        );
        assert_eq!(
            eligible_suffix("i\u{307}s", "İstanbul.com").as_deref(),
            Some("tanbul.com")
        );
        assert_eq!(eligible_suffix("i", "İstanbul.com"), None);
        assert_eq!(eligible_suffix("ΟΔΟΣ", "οδοσ.gr").as_deref(), Some(".gr"));

        let mut field = InlineCompletion::new(fixed("i\u{307}stanbul.com"));
        let _ = field.insert_characters("İ");
        assert!(field.state().is_active());
        assert_eq!(field.display_text(), "İstanbul.com");
    }

    #[test]
    fn submit_reports_entered_text_without_suggestion() {
        let commits = Arc::new(Mutex::new(Vec::new()));
        let sink = commits.clone();
        let mut field = InlineCompletion::new(|_: &str| -> Option<String> { None })
            .with_on_completion_committed(move |t| sink.lock().unwrap().push(t.to_string()));

        let _ = field.insert_characters("example.org");
        let outcome = field.submit();
        assert!(!outcome.committed);
        assert_eq!(*commits.lock().unwrap(), vec!["example.org"]);
    }

    #[test]
    fn submit_with_suggestion_reports_once() {
        let commits = Arc::new(Mutex::new(Vec::new()));
        let sink = commits.clone();
        let mut field = InlineCompletion::new(domains)
            .with_on_completion_committed(move |t| sink.lock().unwrap().push(t.to_string()));

        type_chars(&mut field, "moz");
        let outcome = field.submit();
        assert!(outcome.committed);
        assert_eq!(field.entered_text(), "mozilla.org");
        assert_eq!(*commits.lock().unwrap(), vec!["mozilla.org"]);
    }
}
