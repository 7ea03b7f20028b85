use crate::command::{Command, CommandInner, TerminalCommand};
use crate::event::TerminalEvent;
use crate::model::Model;
use crossterm::{
    cursor,
    event::{
        DisableBracketedPaste, DisableFocusChange, EnableBracketedPaste, EnableFocusChange, Event,
        EventStream,
    },
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
    },
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, stderr, stdout, Stderr, Stdout, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tokio_stream::StreamExt;
use tracing::{debug, info, trace, warn};
use tracing_subscriber::EnvFilter;

/// Environment variable read for the log filter when
/// [`ProgramOptions::log_filter`] is unset.
pub const LOG_ENV: &str = "OMNIBAR_LOG";

/// Output target for the terminal UI.
///
/// By default the TUI renders to **stdout**. When stdout is piped, switch to
/// [`Stderr`](OutputTarget::Stderr) so the UI still reaches the terminal.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum OutputTarget {
    /// Write to stdout (default).
    #[default]
    Stdout,
    /// Write to stderr.
    Stderr,
}

enum Output {
    Stdout(Stdout),
    Stderr(Stderr),
}

impl Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::Stdout(w) => w.write(buf),
            Output::Stderr(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::Stdout(w) => w.flush(),
            Output::Stderr(w) => w.flush(),
        }
    }
}

impl Output {
    fn new(target: OutputTarget) -> Self {
        match target {
            OutputTarget::Stdout => Output::Stdout(stdout()),
            OutputTarget::Stderr => Output::Stderr(stderr()),
        }
    }
}

/// Errors that can occur while initializing or running a [`Program`].
#[derive(Debug, thiserror::Error)]
pub enum ProgramError {
    /// An I/O error from terminal setup, rendering, input, or teardown.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The log filter was invalid or a global subscriber was already set.
    #[error("logging setup failed: {0}")]
    Logging(String),
}

/// Configuration options for a [`Program`].
///
/// Use struct update syntax to override only what you need:
///
/// ```rust,ignore
/// let opts = ProgramOptions {
///     title: Some("omnibar".into()),
///     log_file: Some("omnibar.log".into()),
///     ..ProgramOptions::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct ProgramOptions {
    /// Target frames per second (default: 60, clamped to 1..=120).
    pub fps: u32,
    /// Start in alternate screen (default: true).
    pub alt_screen: bool,
    /// Enable bracketed paste (default: true).
    pub bracketed_paste: bool,
    /// Enable focus reporting (default: true). Needed for
    /// [`TerminalEvent::FocusLost`].
    pub focus_reporting: bool,
    /// Set terminal title.
    pub title: Option<String>,
    /// Whether to restore the terminal from a panic hook (default: true).
    pub catch_panics: bool,
    /// Quit on SIGINT (default: true).
    pub handle_signals: bool,
    /// Write `tracing` output to this file. The TUI owns the terminal, so
    /// logging is off unless a file is given.
    pub log_file: Option<PathBuf>,
    /// `EnvFilter` directives for the log file. Falls back to
    /// [`LOG_ENV`], then `info`.
    pub log_filter: Option<String>,
    /// Output target: stdout (default) or stderr.
    pub output: OutputTarget,
}

impl Default for ProgramOptions {
    fn default() -> Self {
        Self {
            fps: 60,
            alt_screen: true,
            bracketed_paste: true,
            focus_reporting: true,
            title: None,
            catch_panics: true,
            handle_signals: true,
            log_file: None,
            log_filter: None,
            output: OutputTarget::default(),
        }
    }
}

/// Everything the event loop waits on, merged into one stream.
enum Incoming<Msg> {
    Terminal(io::Result<Event>),
    Message(Msg),
}

/// The program runtime. Manages terminal setup, the event loop, and the
/// full [`Model`] lifecycle.
///
/// Terminal input and messages produced by commands are merged into a single
/// stream and applied to the model one at a time, in arrival order, on the
/// task that calls [`run`](Program::run). Async commands run on spawned
/// tasks and re-enter through the message channel.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::main]
/// async fn main() -> Result<(), ProgramError> {
///     let model = Program::<Browser>::new(())?.run().await?;
///     Ok(())
/// }
/// ```
pub struct Program<M: Model> {
    model: M,
    terminal: Terminal<CrosstermBackend<Output>>,
    msg_tx: mpsc::UnboundedSender<M::Message>,
    msg_rx: Option<mpsc::UnboundedReceiver<M::Message>>,
    options: ProgramOptions,
    needs_redraw: bool,
    should_quit: bool,
}

impl<M: Model> Program<M> {
    /// Create a new program with default options.
    pub fn new(flags: M::Flags) -> Result<Self, ProgramError> {
        Self::with_options(flags, ProgramOptions::default())
    }

    /// Create a new program with custom options.
    ///
    /// Installs file logging first (if configured) so that terminal setup is
    /// already traced.
    pub fn with_options(flags: M::Flags, options: ProgramOptions) -> Result<Self, ProgramError> {
        if let Some(ref path) = options.log_file {
            init_file_logging(path, options.log_filter.as_deref())?;
        }

        let (msg_tx, msg_rx) = mpsc::unbounded_channel();
        let (model, init_cmd) = M::init(flags);
        let terminal = init_terminal(&options)?;

        let mut program = Self {
            model,
            terminal,
            msg_tx,
            msg_rx: Some(msg_rx),
            options,
            needs_redraw: true,
            should_quit: false,
        };
        info!("program initialized");

        program.execute_command(init_cmd);
        Ok(program)
    }

    /// A sender for injecting messages from outside the event loop.
    pub fn sender(&self) -> mpsc::UnboundedSender<M::Message> {
        self.msg_tx.clone()
    }

    /// Run the program until a quit command or SIGINT. Returns the final
    /// model. The terminal is restored even when the loop fails.
    pub async fn run(mut self) -> Result<M, ProgramError> {
        let result = self.event_loop().await;
        info!("shutting down");
        let restored = restore_terminal(&self.options);
        result?;
        restored?;
        Ok(self.model)
    }

    async fn event_loop(&mut self) -> Result<(), ProgramError> {
        self.render()?;

        let Some(msg_rx) = self.msg_rx.take() else {
            return Ok(());
        };
        let terminal_events = EventStream::new().map(Incoming::Terminal);
        let messages = UnboundedReceiverStream::new(msg_rx).map(Incoming::Message);
        let mut incoming = Box::pin(terminal_events.merge(messages));

        let fps = self.options.fps.clamp(1, 120);
        let mut frame_interval = tokio::time::interval(Duration::from_secs_f64(1.0 / fps as f64));
        frame_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let handle_signals = self.options.handle_signals;

        while !self.should_quit {
            tokio::select! {
                biased;

                _ = tokio::signal::ctrl_c(), if handle_signals => {
                    debug!("received ctrl+c signal");
                    return Ok(());
                }

                item = incoming.next() => match item {
                    Some(Incoming::Terminal(Ok(event))) => self.handle_terminal_event(event),
                    Some(Incoming::Terminal(Err(err))) => {
                        warn!(error = %err, "terminal input failed");
                        return Err(err.into());
                    }
                    Some(Incoming::Message(msg)) => self.process_message(msg),
                    None => return Ok(()),
                },

                _ = frame_interval.tick() => {
                    if self.needs_redraw {
                        self.render()?;
                        self.needs_redraw = false;
                    }
                }
            }
        }
        Ok(())
    }

    fn handle_terminal_event(&mut self, event: Event) {
        let Some(event) = TerminalEvent::from_crossterm(event) else {
            return;
        };
        trace!(?event, "terminal event");
        if matches!(event, TerminalEvent::Resize(..)) {
            self.needs_redraw = true;
        }
        if let Some(msg) = self.model.on_event(event) {
            self.process_message(msg);
        }
    }

    fn process_message(&mut self, msg: M::Message) {
        let cmd = self.model.update(msg);
        self.execute_command(cmd);
        self.needs_redraw = true;
    }

    fn execute_command(&mut self, cmd: Command<M::Message>) {
        match cmd.inner {
            CommandInner::None => {}
            CommandInner::Message(msg) => {
                let _ = self.msg_tx.send(msg);
            }
            CommandInner::Quit => {
                debug!("quit requested");
                self.should_quit = true;
            }
            CommandInner::Future(fut) => {
                let tx = self.msg_tx.clone();
                tokio::spawn(async move {
                    let msg = fut.await;
                    let _ = tx.send(msg);
                });
            }
            CommandInner::Batch(cmds) => {
                for cmd in cmds {
                    self.execute_command(cmd);
                }
            }
            CommandInner::Terminal(tcmd) => self.execute_terminal_command(tcmd),
        }
    }

    fn execute_terminal_command(&mut self, cmd: TerminalCommand) {
        let mut writer = Output::new(self.options.output);
        let result = match &cmd {
            TerminalCommand::SetTitle(title) => execute!(writer, SetTitle(title)),
            TerminalCommand::ShowCursor => execute!(writer, cursor::Show),
            TerminalCommand::HideCursor => execute!(writer, cursor::Hide),
        };
        if let Err(err) = result {
            warn!(?cmd, error = %err, "terminal command failed");
        }
    }

    fn render(&mut self) -> Result<(), ProgramError> {
        self.terminal.draw(|frame| {
            self.model.view(frame);
        })?;
        Ok(())
    }
}

fn init_terminal(
    options: &ProgramOptions,
) -> Result<Terminal<CrosstermBackend<Output>>, ProgramError> {
    // Install panic hook that restores terminal (only once to avoid stacking)
    if options.catch_panics {
        use std::sync::Once;
        static HOOK_INSTALLED: Once = Once::new();
        let alt_screen = options.alt_screen;
        let output_target = options.output;
        HOOK_INSTALLED.call_once(|| {
            let original_hook = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                let _ = restore_terminal_minimal(alt_screen, output_target);
                original_hook(info);
            }));
        });
    }

    enable_raw_mode()?;
    let mut writer = Output::new(options.output);

    if options.alt_screen {
        execute!(writer, EnterAlternateScreen)?;
    }
    if options.bracketed_paste {
        execute!(writer, EnableBracketedPaste)?;
    }
    if options.focus_reporting {
        execute!(writer, EnableFocusChange)?;
    }
    if let Some(ref title) = options.title {
        execute!(writer, SetTitle(title))?;
    }
    execute!(writer, cursor::Hide)?;

    let terminal = Terminal::new(CrosstermBackend::new(writer))?;
    debug!(alt_screen = options.alt_screen, "terminal initialized");
    Ok(terminal)
}

fn restore_terminal(options: &ProgramOptions) -> Result<(), ProgramError> {
    restore_terminal_minimal(options.alt_screen, options.output)?;
    Ok(())
}

// Best-effort: keep going when a step fails so as much state as possible is
// restored; only the raw mode error is reported.
fn restore_terminal_minimal(alt_screen: bool, output_target: OutputTarget) -> io::Result<()> {
    let raw = disable_raw_mode();
    let mut writer = Output::new(output_target);
    execute!(writer, DisableBracketedPaste).ok();
    execute!(writer, DisableFocusChange).ok();
    execute!(writer, cursor::Show).ok();
    if alt_screen {
        execute!(writer, LeaveAlternateScreen).ok();
    }
    raw
}

/// Open a log file in append mode, creating it if needed.
///
/// ```no_run
/// use omnibar_core::runtime::log_to_file;
/// use std::io::Write;
///
/// let mut f = log_to_file("omnibar.log")?;
/// writeln!(f, "session started")?;
/// # Ok::<(), std::io::Error>(())
/// ```
pub fn log_to_file(path: impl AsRef<Path>) -> Result<std::fs::File, io::Error> {
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
}

/// Install a global `tracing` subscriber writing plain text to `path`.
///
/// `filter` takes `EnvFilter` directives (e.g. `"omnibar_widgets=trace"`);
/// when `None`, [`LOG_ENV`] is consulted, then `info`.
pub fn init_file_logging(path: impl AsRef<Path>, filter: Option<&str>) -> Result<(), ProgramError> {
    let file = log_to_file(path)?;
    let filter = log_filter(filter)?;
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_env_filter(filter)
        .try_init()
        .map_err(|err| ProgramError::Logging(err.to_string()))
}

fn log_filter(directives: Option<&str>) -> Result<EnvFilter, ProgramError> {
    match directives {
        Some(directives) => {
            EnvFilter::try_new(directives).map_err(|err| ProgramError::Logging(err.to_string()))
        }
        None => Ok(EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"))),
    }
}
