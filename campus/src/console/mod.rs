//! Line-oriented admin console.
//!
//! Reads one command per line, applies it to the current screen and
//! prints the screen again. Active filters are saved per screen whenever
//! they change, when remembering filters is enabled.

mod command;
pub mod render;

pub use command::{Command, HELP, ParseError, parse};

use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::backend::{BackendError, Store};
use crate::config::{self, CampusConfig};
use crate::screens::{AnyScreen, ScreenError, ScreenKind, Submitted};
use crate::session::Session;
use crate::settings::{SettingsError, SettingsProvider};

/// Width the screen is rendered to.
pub const DEFAULT_WIDTH: usize = 100;

#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Screen(#[from] ScreenError),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Table(#[from] tabula::TableError),

    #[error("settings: {0}")]
    Settings(#[from] SettingsError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// What the driver does after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Keep going, showing the message when not empty.
    Continue(String),
    Quit,
}

impl Outcome {
    fn message(text: impl Into<String>) -> Self {
        Outcome::Continue(text.into())
    }

    fn silent() -> Self {
        Outcome::Continue(String::new())
    }
}

pub struct Console {
    store: Store,
    settings: SettingsProvider,
    config: CampusConfig,
    session: Session,
    kind: ScreenKind,
    screen: Box<dyn AnyScreen>,
    /// Filter version last written to the settings.
    saved_filters: u64,
    width: usize,
}

impl std::fmt::Debug for Console {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Console")
            .field("session", &self.session)
            .field("screen", &self.kind)
            .finish_non_exhaustive()
    }
}

impl Console {
    /// Open the console on `kind`, restoring its saved filters.
    pub async fn open(
        store: Store,
        settings: SettingsProvider,
        config: CampusConfig,
        session: Session,
        kind: ScreenKind,
    ) -> Result<Self, ConsoleError> {
        let screen = Self::build(&store, &settings, &config, &session, kind).await?;
        let saved_filters = screen.filters_version();
        Ok(Self {
            store,
            settings,
            config,
            session,
            kind,
            screen,
            saved_filters,
            width: DEFAULT_WIDTH,
        })
    }

    async fn build(
        store: &Store,
        settings: &SettingsProvider,
        config: &CampusConfig,
        session: &Session,
        kind: ScreenKind,
    ) -> Result<Box<dyn AnyScreen>, ConsoleError> {
        let filters = if config.remember_filters {
            config::load_filters(settings, kind.name()).await?
        } else {
            Vec::new()
        };
        let screen = kind.open(store, session.clone(), config, filters)?;
        let count = screen.reload().await?;
        log::info!(
            "opened {} as {} ({} records)",
            kind,
            session.role,
            count
        );
        Ok(screen)
    }

    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn screen_kind(&self) -> ScreenKind {
        self.kind
    }

    pub fn render(&self) -> String {
        self.screen.render(self.width)
    }

    /// Save the current screen's filters if they changed.
    async fn persist_filters(&mut self) -> Result<(), SettingsError> {
        let version = self.screen.filters_version();
        if !self.config.remember_filters || version == self.saved_filters {
            return Ok(());
        }
        config::save_filters(&self.settings, self.kind.name(), &self.screen.active_filters())
            .await?;
        self.saved_filters = version;
        Ok(())
    }

    /// Replace the current screen, keeping its filters saved.
    async fn switch(&mut self, kind: ScreenKind) -> Result<(), ConsoleError> {
        self.persist_filters().await?;
        let screen = Self::build(&self.store, &self.settings, &self.config, &self.session, kind)
            .await?;
        self.saved_filters = screen.filters_version();
        self.screen = screen;
        self.kind = kind;
        Ok(())
    }

    /// Run one input line.
    pub async fn execute(&mut self, line: &str) -> Result<Outcome, ConsoleError> {
        let outcome = match parse(line)? {
            Command::Help => Outcome::message(HELP),
            Command::Quit => {
                self.persist_filters().await?;
                return Ok(Outcome::Quit);
            }
            Command::Reload => {
                let count = self.screen.reload().await?;
                Outcome::message(format!("{} records", count))
            }
            Command::Forget => {
                let count = config::forget_filters(&self.settings).await?;
                self.saved_filters = self.screen.filters_version();
                Outcome::message(format!("forgot saved filters of {} screens", count))
            }
            Command::Screen(kind) => {
                self.switch(kind).await?;
                Outcome::silent()
            }
            Command::Role(role) => {
                self.session.role = role;
                // Available actions are fixed per table, so rebuild it
                self.switch(self.kind).await?;
                Outcome::message(format!("now acting as {}", role))
            }
            Command::Table(event) => {
                log::debug!("{}: {:?}", self.kind, event);
                if self.screen.dispatch(event).is_consumed() {
                    Outcome::silent()
                } else {
                    Outcome::message("nothing to do")
                }
            }
            Command::Set { field, value } => {
                self.screen.set_field(&field, &value)?;
                Outcome::silent()
            }
            Command::Submit => match self.screen.submit().await? {
                Submitted::Saved => Outcome::message("saved"),
                Submitted::Invalid(result) => Outcome::message(format!(
                    "{} fields need attention",
                    result.errors().len()
                )),
                Submitted::Rejected(err) => Outcome::message(err.to_string()),
                Submitted::Reloaded(count) => {
                    Outcome::message(format!("saved; reloaded {} records", count))
                }
            },
        };

        self.persist_filters().await?;
        Ok(outcome)
    }

    /// Read commands from `input` until it ends or `quit`, writing the
    /// screen after every command. Command errors are reported to the
    /// user and do not stop the loop.
    pub async fn run<I, O>(&mut self, input: I, mut output: O) -> Result<(), ConsoleError>
    where
        I: AsyncBufRead + Unpin,
        O: AsyncWrite + Unpin,
    {
        let mut lines = input.lines();
        output
            .write_all(format!("{}\n> ", self.render()).as_bytes())
            .await?;
        output.flush().await?;

        while let Some(line) = lines.next_line().await? {
            let message = match self.execute(&line).await {
                Ok(Outcome::Quit) => break,
                Ok(Outcome::Continue(message)) => message,
                Err(err) => {
                    log::warn!("'{}' failed: {}", line.trim(), err);
                    format!("error: {}", err)
                }
            };

            let mut text = self.render();
            if !message.is_empty() {
                text = format!("{}\n{}", text, message);
            }
            output.write_all(format!("{}\n> ", text).as_bytes()).await?;
            output.flush().await?;
        }

        self.persist_filters().await?;
        Ok(())
    }
}
