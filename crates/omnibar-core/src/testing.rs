//! Headless test helpers: drive a [`Model`] or render a component without a
//! terminal.

use crate::command::{Command, CommandInner, TerminalCommand};
use crate::event::TerminalEvent;
use crate::model::Model;
use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;
use ratatui::{Frame, Terminal};

/// A headless test harness that drives a [`Model`] without a real terminal.
///
/// `TestProgram` exercises the init/update/view cycle in a plain `#[test]`
/// function; no tokio runtime or TTY required. Immediate messages
/// ([`Command::message`]) are queued and flushed with
/// [`drain_messages`](TestProgram::drain_messages). Async commands are
/// dropped; quit and terminal requests are recorded for assertions.
///
/// # Example
///
/// ```rust,ignore
/// use omnibar_core::testing::TestProgram;
///
/// let mut prog = TestProgram::<Browser>::new(());
/// prog.send_event(TerminalEvent::Paste("mozilla".into()));
/// prog.drain_messages();
/// assert!(prog.render_string(40, 3).contains("mozilla.org"));
/// ```
pub struct TestProgram<M: Model> {
    model: M,
    pending_messages: Vec<M::Message>,
    quit_requested: bool,
    terminal_commands: Vec<TerminalCommand>,
}

impl<M: Model> TestProgram<M> {
    /// Create a test program by calling [`Model::init`] with the given flags.
    ///
    /// Immediate messages produced by `init` are queued, not processed.
    pub fn new(flags: M::Flags) -> Self {
        let (model, init_cmd) = M::init(flags);
        let mut program = Self {
            model,
            pending_messages: Vec::new(),
            quit_requested: false,
            terminal_commands: Vec::new(),
        };
        program.collect(init_cmd);
        program
    }

    /// Send a message, triggering a single update cycle.
    pub fn send(&mut self, msg: M::Message) {
        let cmd = self.model.update(msg);
        self.collect(cmd);
    }

    /// Route a terminal event through [`Model::on_event`] and, if it maps to
    /// a message, send it. Returns whether a message was produced.
    pub fn send_event(&mut self, event: TerminalEvent) -> bool {
        match self.model.on_event(event) {
            Some(msg) => {
                self.send(msg);
                true
            }
            None => false,
        }
    }

    /// Process queued immediate messages until none are left.
    pub fn drain_messages(&mut self) {
        while !self.pending_messages.is_empty() {
            let messages: Vec<_> = self.pending_messages.drain(..).collect();
            for msg in messages {
                let cmd = self.model.update(msg);
                self.collect(cmd);
            }
        }
    }

    /// Get a shared reference to the model for assertions.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Get a mutable reference to the model for direct test setup.
    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    /// Whether any processed command asked the program to quit.
    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// Terminal requests issued so far, in order.
    pub fn terminal_commands(&self) -> &[TerminalCommand] {
        &self.terminal_commands
    }

    /// Render the model to a [`Buffer`] of the given dimensions.
    pub fn render(&self, width: u16, height: u16) -> Buffer {
        render_to_buffer(width, height, |frame| self.model.view(frame))
    }

    /// Render the model and return the visible content as a plain string,
    /// one line per row.
    pub fn render_string(&self, width: u16, height: u16) -> String {
        buffer_to_string(&self.render(width, height))
    }

    fn collect(&mut self, cmd: Command<M::Message>) {
        match cmd.inner {
            CommandInner::None => {}
            CommandInner::Message(msg) => self.pending_messages.push(msg),
            CommandInner::Quit => self.quit_requested = true,
            CommandInner::Batch(cmds) => {
                for cmd in cmds {
                    self.collect(cmd);
                }
            }
            // Async commands can't be executed synchronously in tests
            CommandInner::Future(_) => {}
            CommandInner::Terminal(tcmd) => self.terminal_commands.push(tcmd),
        }
    }
}

/// Flatten a command into the immediate messages it carries, in order.
///
/// Handy for asserting what a [`Component`](crate::Component) emitted.
pub fn collect_messages<Msg: Send + 'static>(cmd: Command<Msg>) -> Vec<Msg> {
    let mut out = Vec::new();
    push_messages(cmd, &mut out);
    out
}

fn push_messages<Msg: Send + 'static>(cmd: Command<Msg>, out: &mut Vec<Msg>) {
    match cmd.inner {
        CommandInner::Message(msg) => out.push(msg),
        CommandInner::Batch(cmds) => {
            for cmd in cmds {
                push_messages(cmd, out);
            }
        }
        CommandInner::None
        | CommandInner::Quit
        | CommandInner::Future(_)
        | CommandInner::Terminal(_) => {}
    }
}

/// Draw with `draw` on a [`TestBackend`] of the given size and return the
/// resulting buffer.
///
/// # Panics
///
/// Panics if the test backend fails to draw, which only happens on
/// programming errors in the draw closure.
pub fn render_to_buffer(width: u16, height: u16, draw: impl FnOnce(&mut Frame)) -> Buffer {
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).expect("test backend");
    terminal.draw(draw).expect("test backend draw");
    terminal.backend().buffer().clone()
}

/// Like [`render_to_buffer`], returning the visible content as a string.
pub fn render_to_string(width: u16, height: u16, draw: impl FnOnce(&mut Frame)) -> String {
    buffer_to_string(&render_to_buffer(width, height, draw))
}

fn buffer_to_string(buf: &Buffer) -> String {
    let area = buf.area;
    let mut output = String::new();
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            output.push_str(buf[(x, y)].symbol());
        }
        if y + 1 < area.bottom() {
            output.push('\n');
        }
    }
    output
}
