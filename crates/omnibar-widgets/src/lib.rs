//! Inline URL completion for the **omnibar** URL bar.
//!
//! The editing core, [`InlineCompletion`](inline_completion::InlineCompletion),
//! knows nothing about terminals: it tracks what the user typed, where the
//! caret is, and which completion suffix (if any) is shown after the caret.
//! [`UrlBar`](url_bar::UrlBar) wires it to crossterm key events and renders
//! it with ratatui.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`inline_completion`] | Editing state machine for entered text plus suggestion |
//! | [`completion`] | [`CompletionProvider`](completion::CompletionProvider) trait and the domain-list provider |
//! | [`url_bar`] | Terminal URL bar component |
//! | [`url_fixup`] | Resolve a submitted entry into a URL or a search |
//! | [`key`] | Rebindable command keys and help-line support |

pub mod completion;
pub mod inline_completion;
pub mod key;
pub mod url_bar;
pub mod url_fixup;

pub use completion::{CompletionConfig, CompletionProvider, DomainCompletion, DomainListError};
pub use inline_completion::{CompletionState, EditOutcome, InlineCompletion};
pub use url_bar::{UrlBar, UrlBarStyle};
