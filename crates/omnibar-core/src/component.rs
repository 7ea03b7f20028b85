use crate::command::Command;
use ratatui::{layout::Rect, Frame};

/// A reusable sub-model that renders into a given [`Rect`] area.
///
/// `Component` mirrors [`Model`](crate::Model) except that its
/// [`view`](Component::view) receives the area to draw in, so a parent decides
/// where each child goes.
///
/// # Composition pattern
///
/// Wrap the component's message type in a variant of the parent message and
/// lift the returned command with [`Command::map`]:
///
/// ```rust,ignore
/// use omnibar_core::{Command, Component, Model};
/// use omnibar_widgets::url_bar::{self, UrlBar};
///
/// struct Browser { bar: UrlBar }
///
/// enum Msg { Bar(url_bar::Message) }
///
/// impl Model for Browser {
///     type Message = Msg;
///     type Flags = ();
///
///     fn init(_: ()) -> (Self, Command<Msg>) {
///         let mut bar = UrlBar::new("Search or enter address");
///         bar.focus();
///         (Browser { bar }, Command::none())
///     }
///
///     fn update(&mut self, msg: Msg) -> Command<Msg> {
///         match msg {
///             Msg::Bar(m) => self.bar.update(m).map(Msg::Bar),
///         }
///     }
///
///     fn view(&self, frame: &mut Frame) {
///         self.bar.view(frame, frame.area());
///     }
/// }
/// ```
pub trait Component: Send + 'static {
    /// The component's internal message type.
    type Message: Send + 'static;

    /// Process a message, mutate state, and return a [`Command`] for side effects.
    ///
    /// The parent should call [`.map()`](Command::map) to lift the result
    /// into its own message type.
    fn update(&mut self, msg: Self::Message) -> Command<Self::Message>;

    /// Render into `area` of the [`Frame`]. Implementations must stay inside
    /// the given rectangle.
    fn view(&self, frame: &mut Frame, area: Rect);

    /// Whether this component currently has focus.
    ///
    /// A hint for input routing. The default implementation returns `false`.
    fn focused(&self) -> bool {
        false
    }
}
