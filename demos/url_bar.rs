//! # URL bar demo
//!
//! A browser-style address bar with inline domain completion. Type the start
//! of a domain and the rest appears highlighted after the caret; Tab, Right
//! or End accept it, Backspace rejects it, Enter opens the entry.
//!
//! Run with: `cargo run -p omnibar --example url_bar [DOMAIN_LIST]`
//!
//! `DOMAIN_LIST` is an optional file of custom domains, one per line (`#`
//! starts a comment). Set `OMNIBAR_LOG_FILE=omnibar.log` to write logs, and
//! `OMNIBAR_LOG=omnibar_widgets=trace` to see every edit.

use std::path::{Path, PathBuf};

use omnibar::crossterm::event::{KeyCode, KeyModifiers};
use omnibar::ratatui::layout::{Constraint, Layout};
use omnibar::ratatui::style::{Color, Modifier, Style};
use omnibar::ratatui::text::{Line, Span};
use omnibar::ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use omnibar::ratatui::Frame;
use omnibar::widgets::completion::DomainCompletion;
use omnibar::widgets::key::KeyMap;
use omnibar::widgets::url_bar::{self, UrlBar};
use omnibar::widgets::url_fixup::{resolve_entry, Resolved, DEFAULT_SEARCH_TEMPLATE};
use omnibar::{Command, Component, Model, ProgramOptions, TerminalEvent};
use tracing::{info, warn};

const MAX_HISTORY: usize = 8;

struct Browser {
    bar: UrlBar,
    history: Vec<Resolved>,
    status: Option<String>,
}

#[derive(Debug)]
enum Msg {
    Bar(url_bar::Message),
    DomainsLoaded(PathBuf, Result<String, String>),
    Quit,
}

impl Browser {
    fn load_custom_domains(&mut self, path: &Path, text: &str) {
        let domains = match DomainCompletion::parse_domain_list(text) {
            Ok(domains) => domains,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "rejected domain list");
                self.status = Some(format!("{}: {err}", path.display()));
                return;
            }
        };
        let provider = self.bar.field_mut().provider_mut();
        let mut added = 0;
        for domain in &domains {
            match provider.add_custom_domain(domain) {
                Ok(()) => added += 1,
                Err(err) => warn!(%domain, error = %err, "skipped custom domain"),
            }
        }
        info!(added, path = %path.display(), "loaded custom domains");
        self.status = Some(format!("{added} custom domains from {}", path.display()));
    }

    fn open(&mut self, entry: &str) {
        let Some(resolved) = resolve_entry(entry, DEFAULT_SEARCH_TEMPLATE) else {
            return;
        };
        info!(url = resolved.as_str(), "open");
        self.history.insert(0, resolved);
        self.history.truncate(MAX_HISTORY);
        self.bar.set_value("");
    }
}

impl Model for Browser {
    type Message = Msg;
    type Flags = Option<PathBuf>;

    fn init(domain_list: Option<PathBuf>) -> (Self, Command<Msg>) {
        let mut bar = UrlBar::new("Search or enter address")
            .with_prompt("  ")
            .with_select_on_focus(true);
        bar.focus();

        let mut cmds = vec![Command::set_title("omnibar")];
        if let Some(path) = domain_list {
            cmds.push(Command::perform(
                {
                    let path = path.clone();
                    async move { tokio::fs::read_to_string(path).await }
                },
                move |result| Msg::DomainsLoaded(path, result.map_err(|e| e.to_string())),
            ));
        }

        let browser = Browser {
            bar,
            history: Vec::new(),
            status: None,
        };
        (browser, Command::batch(cmds))
    }

    fn update(&mut self, msg: Msg) -> Command<Msg> {
        match msg {
            Msg::Bar(url_bar::Message::Submit(entry)) => {
                self.open(&entry);
                Command::none()
            }
            Msg::Bar(url_bar::Message::Cancelled) => Command::quit(),
            Msg::Bar(m) => self.bar.update(m).map(Msg::Bar),
            Msg::DomainsLoaded(path, Ok(text)) => {
                self.load_custom_domains(&path, &text);
                Command::none()
            }
            Msg::DomainsLoaded(path, Err(err)) => {
                warn!(path = %path.display(), error = %err, "could not read domain list");
                self.status = Some(format!("{}: {err}", path.display()));
                Command::none()
            }
            Msg::Quit => Command::quit(),
        }
    }

    fn view(&self, frame: &mut Frame) {
        let [bar_area, history_area, status_area, help_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        let border = if self.bar.focused() {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border)
            .title(" omnibar ");
        let inner = block.inner(bar_area);
        frame.render_widget(block, bar_area);
        self.bar.view(frame, inner);

        let lines: Vec<Line> = self
            .history
            .iter()
            .map(|entry| {
                let (label, color) = match entry {
                    Resolved::Url(_) => ("open  ", Color::Green),
                    Resolved::Search(_) => ("search", Color::Yellow),
                };
                Line::from(vec![
                    Span::styled(format!(" {label} "), Style::default().fg(color)),
                    Span::raw(entry.as_str()),
                ])
            })
            .collect();
        frame.render_widget(Paragraph::new(lines), history_area);

        if let Some(ref status) = self.status {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    format!(" {status}"),
                    Style::default().add_modifier(Modifier::ITALIC),
                )),
                status_area,
            );
        }

        let mut help = vec![Span::raw(" ")];
        for binding in self.bar.keys().short_help() {
            help.push(Span::styled(
                binding.key_label(),
                Style::default().fg(Color::DarkGray),
            ));
            help.push(Span::raw(format!(" {}  ", binding.description)));
        }
        frame.render_widget(Paragraph::new(Line::from(help)), help_area);
    }

    fn on_event(&self, event: TerminalEvent) -> Option<Msg> {
        match event {
            TerminalEvent::Key(key)
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) =>
            {
                Some(Msg::Quit)
            }
            TerminalEvent::Key(key) => Some(Msg::Bar(url_bar::Message::KeyPress(key))),
            TerminalEvent::Paste(text) => Some(Msg::Bar(url_bar::Message::Paste(text))),
            TerminalEvent::FocusLost => Some(Msg::Bar(url_bar::Message::FocusLost)),
            TerminalEvent::FocusGained | TerminalEvent::Resize(..) => None,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), omnibar::ProgramError> {
    let domain_list = std::env::args_os().nth(1).map(PathBuf::from);
    let options = ProgramOptions {
        log_file: std::env::var_os("OMNIBAR_LOG_FILE").map(PathBuf::from),
        ..ProgramOptions::default()
    };
    let browser = omnibar::run_with::<Browser>(domain_list, options).await?;
    for entry in browser.history.iter().rev() {
        println!("{}", entry.as_str());
    }
    Ok(())
}
