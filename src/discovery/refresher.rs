//! Background Refresher
//!
//! Runs discovery and player-list refreshes on a dedicated thread with its
//! own RCON connection, publishing results into a [`CompletionState`].
//!
//! ```text
//! spawn ──▶ authenticate ──▶ players ──▶ discovery ──▶ publish + save
//!                                                          │
//!            ┌─────────────────────────────────────────────┘
//!            ▼
//!        wait(interval) ──▶ players (+ discovery until it succeeds) ──▶ ...
//!            │
//!            └── shutdown ──▶ close connection, exit
//! ```
//!
//! A rejected password stops the thread. Any other login failure is retried
//! on the next interval.
//!
//! The interactive connection is never touched from this thread.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender, TryRecvError, TrySendError};
use parking_lot::Mutex;

use crate::cache::{CacheStore, ServerKey};
use crate::config::Config;
use crate::error::{RconError, Result};
use crate::network::{CommandExecutor, Connection};

use super::pipeline::{fetch_player_list, Discovery};
use super::snapshot::CompletionState;

/// Events kept for a slow reader; newer events are dropped once full
pub const EVENT_CAPACITY: usize = 64;

/// Progress reports from the background thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshEvent {
    /// A new player list was published with this many players
    PlayersUpdated(usize),
    /// Discovery finished with this many commands
    CommandsUpdated(usize),
    /// A player-list refresh failed; the previous list stays published
    PlayersFailed(String),
    /// Login or discovery failed; the previous model stays published.
    /// Discovery is retried on the next refresh unless the password was
    /// rejected.
    DiscoveryFailed(String),
}

/// Handle to the background refresh thread
///
/// Dropping the handle stops the thread and waits for it.
pub struct BackgroundRefresher {
    /// Dropping the sender is the shutdown signal
    shutdown_tx: Mutex<Option<Sender<()>>>,
    events_rx: Receiver<RefreshEvent>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl BackgroundRefresher {
    /// Start the refresh thread
    ///
    /// `cache`, when given, receives every non-empty discovered model.
    pub fn spawn(
        config: &Config,
        password: impl Into<String>,
        state: Arc<CompletionState>,
        cache: Option<CacheStore>,
    ) -> Result<Self> {
        let (shutdown_tx, shutdown_rx) = channel::bounded::<()>(1);
        let (events_tx, events_rx) = channel::bounded::<RefreshEvent>(EVENT_CAPACITY);

        let worker = Worker {
            connection: Connection::from_config(config),
            password: password.into(),
            discovery: Discovery::from_config(config),
            player_list_command: config.player_list_command.clone(),
            interval: config.player_refresh_interval,
            server_key: config.server_key(),
            state,
            cache,
            discovered: false,
            shutdown_rx,
            events_tx,
        };

        let handle = thread::Builder::new()
            .name("mcrcon-refresh".to_string())
            .spawn(move || worker.run())?;

        tracing::debug!("Background refresher started");

        Ok(Self {
            shutdown_tx: Mutex::new(Some(shutdown_tx)),
            events_rx,
            handle: Mutex::new(Some(handle)),
        })
    }

    /// Progress events, in the order they happened
    ///
    /// At most [`EVENT_CAPACITY`] are queued; the worker never blocks on a
    /// full queue.
    pub fn events(&self) -> &Receiver<RefreshEvent> {
        &self.events_rx
    }

    /// Whether the thread is still running
    pub fn is_running(&self) -> bool {
        self.handle
            .lock()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Signal the thread to stop and wait for it
    ///
    /// An in-flight command finishes (bounded by the socket timeout); no
    /// further commands are issued after the signal. Safe to call twice.
    pub fn shutdown(&self) {
        drop(self.shutdown_tx.lock().take());

        if let Some(handle) = self.handle.lock().take() {
            if handle.join().is_err() {
                tracing::warn!("Background refresher panicked");
            } else {
                tracing::debug!("Background refresher stopped");
            }
        }
    }
}

impl Drop for BackgroundRefresher {
    fn drop(&mut self) {
        self.shutdown();
    }
}

// =============================================================================
// Worker Thread
// =============================================================================

struct Worker {
    connection: Connection,
    password: String,
    discovery: Discovery,
    player_list_command: String,
    interval: Duration,
    server_key: ServerKey,
    state: Arc<CompletionState>,
    cache: Option<CacheStore>,
    discovered: bool,
    shutdown_rx: Receiver<()>,
    events_tx: Sender<RefreshEvent>,
}

impl Worker {
    fn run(mut self) {
        if self.refresh() {
            loop {
                match self.shutdown_rx.recv_timeout(self.interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        if !self.refresh() {
                            break;
                        }
                    }
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }
        }

        self.connection.close();
    }

    /// One pass: log in if needed, refresh players, discover until it succeeds
    ///
    /// Returns false when the worker should stop.
    fn refresh(&mut self) -> bool {
        if !self.connection.is_authenticated() {
            match self.connection.authenticate(&self.password) {
                Ok(()) => {}
                Err(e @ RconError::AuthenticationFailed) => {
                    tracing::warn!("Background login rejected; completions will not refresh");
                    self.emit(RefreshEvent::DiscoveryFailed(e.to_string()));
                    return false;
                }
                Err(e) => {
                    tracing::warn!("Background login failed: {}", e);
                    let message = e.to_string();
                    self.emit(if self.discovered {
                        RefreshEvent::PlayersFailed(message)
                    } else {
                        RefreshEvent::DiscoveryFailed(message)
                    });
                    return true;
                }
            }
        }

        self.refresh_players();
        if !self.discovered && self.connection.is_authenticated() && !self.shutdown_requested() {
            self.discover();
        }
        true
    }

    fn discover(&mut self) {
        let result = {
            let mut executor = Cancellable {
                inner: &mut self.connection,
                shutdown_rx: &self.shutdown_rx,
            };
            self.discovery.run(&mut executor)
        };

        match result {
            Ok(model) => {
                let count = model.len();
                if model.is_empty() {
                    tracing::info!("Server listed no commands; keeping previous completions");
                } else {
                    if let Some(cache) = &self.cache {
                        if let Err(e) = cache.save(&self.server_key, &model) {
                            tracing::warn!("Failed to save command cache: {}", e);
                        }
                    }
                    self.state.publish_commands(model);
                    tracing::info!("Discovered {} commands", count);
                }
                self.discovered = true;
                self.emit(RefreshEvent::CommandsUpdated(count));
            }
            Err(RconError::Cancelled) => {
                tracing::debug!("Discovery cancelled by shutdown");
            }
            // A read cut short by the socket timeout after shutdown
            Err(e) if self.shutdown_requested() => {
                tracing::debug!("Discovery interrupted by shutdown: {}", e);
            }
            Err(e) => {
                tracing::warn!("Command discovery failed: {}", e);
                self.emit(RefreshEvent::DiscoveryFailed(e.to_string()));
            }
        }
    }

    fn refresh_players(&mut self) {
        match fetch_player_list(&mut self.connection, &self.player_list_command) {
            Ok(players) => {
                let count = players.len();
                self.state.publish_players(players);
                self.emit(RefreshEvent::PlayersUpdated(count));
            }
            Err(e) => {
                tracing::debug!("Player list refresh failed: {}", e);
                self.emit(RefreshEvent::PlayersFailed(e.to_string()));
            }
        }
    }

    fn shutdown_requested(&self) -> bool {
        shutdown_signalled(&self.shutdown_rx)
    }

    fn emit(&self, event: RefreshEvent) {
        match self.events_tx.try_send(event) {
            Ok(()) | Err(TrySendError::Disconnected(_)) => {}
            Err(TrySendError::Full(event)) => {
                tracing::trace!("Event queue full; dropped {:?}", event);
            }
        }
    }
}

fn shutdown_signalled(shutdown_rx: &Receiver<()>) -> bool {
    matches!(
        shutdown_rx.try_recv(),
        Ok(()) | Err(TryRecvError::Disconnected)
    )
}

/// Executor that refuses new commands once shutdown is signalled
struct Cancellable<'a, E: CommandExecutor> {
    inner: &'a mut E,
    shutdown_rx: &'a Receiver<()>,
}

impl<E: CommandExecutor> CommandExecutor for Cancellable<'_, E> {
    fn execute(&mut self, command: &str) -> Result<String> {
        if shutdown_signalled(self.shutdown_rx) {
            return Err(RconError::Cancelled);
        }
        self.inner.execute(command)
    }
}
