//! **omnibar** -- a privacy-browser style URL bar for the terminal, with
//! inline domain autocompletion.
//!
//! This is the umbrella crate:
//!
//! * Everything from [`omnibar_core`] is available at the crate root
//!   ([`Model`], [`Component`], [`Command`], [`Program`], [`run`], ...).
//! * The [`widgets`] module re-exports [`omnibar_widgets`]: the
//!   [`InlineCompletion`](widgets::InlineCompletion) state machine, the
//!   [`DomainCompletion`](widgets::DomainCompletion) provider and the
//!   [`UrlBar`](widgets::UrlBar) component.
//! * [`ratatui`], [`crossterm`], and [`tokio`] are re-exported so downstream
//!   crates do not need to depend on them directly.
//!
//! # Quick start
//!
//! ```ignore
//! use omnibar::widgets::url_bar::{self, UrlBar};
//! use omnibar::{Command, Component, Model, TerminalEvent};
//! use ratatui::Frame;
//!
//! struct Browser { bar: UrlBar }
//!
//! enum Msg { Bar(url_bar::Message) }
//!
//! impl Model for Browser {
//!     type Message = Msg;
//!     type Flags = ();
//!
//!     fn init(_: ()) -> (Self, Command<Msg>) {
//!         let mut bar = UrlBar::new("Search or enter address");
//!         bar.focus();
//!         (Browser { bar }, Command::none())
//!     }
//!
//!     fn update(&mut self, msg: Msg) -> Command<Msg> {
//!         match msg {
//!             Msg::Bar(url_bar::Message::Submit(_)) => Command::quit(),
//!             Msg::Bar(m) => self.bar.update(m).map(Msg::Bar),
//!         }
//!     }
//!
//!     fn view(&self, frame: &mut Frame) {
//!         self.bar.view(frame, frame.area());
//!     }
//!
//!     fn on_event(&self, event: TerminalEvent) -> Option<Msg> {
//!         match event {
//!             TerminalEvent::Key(k) => Some(Msg::Bar(url_bar::Message::KeyPress(k))),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), omnibar::ProgramError> {
//!     omnibar::run::<Browser>(()).await?;
//!     Ok(())
//! }
//! ```

pub use omnibar_core::*;
pub mod widgets {
    pub use omnibar_widgets::*;
}

// Re-export dependencies for use in demos and downstream crates
pub use crossterm;
pub use ratatui;
pub use tokio;
