//! Reconnect Policy
//!
//! Wraps a [`Connection`] so transport failures are retried with
//! exponential backoff and a fresh login.

use std::thread;
use std::time::Duration;

use crate::config::Backoff;
use crate::error::{RconError, Result};

use super::connection::{CommandExecutor, Connection};

type Sleeper = Box<dyn FnMut(Duration) + Send>;

/// A connection that re-establishes itself after transport failures
///
/// ## Retry rules
/// - `Connection` errors (and a socket found closed) trigger [`reconnect`]
///   and the original operation is retried once.
/// - `AuthenticationFailed` is terminal for the stored password and is
///   never retried.
/// - Command-level errors (timeouts on a live server, encoding) are
///   returned as-is.
///
/// [`reconnect`]: ReconnectingConnection::reconnect
pub struct ReconnectingConnection {
    /// The wrapped session
    connection: Connection,

    /// Password replayed on every reconnect
    password: String,

    /// Retry schedule
    backoff: Backoff,

    /// Waits between attempts (`thread::sleep` unless overridden)
    sleeper: Sleeper,
}

impl ReconnectingConnection {
    /// Wrap a connection; nothing is sent until the first call
    pub fn new(connection: Connection, password: impl Into<String>, backoff: Backoff) -> Self {
        Self {
            connection,
            password: password.into(),
            backoff,
            sleeper: Box::new(thread::sleep),
        }
    }

    /// Replace the function used to wait between attempts
    pub fn with_sleeper(mut self, sleeper: impl FnMut(Duration) + Send + 'static) -> Self {
        self.sleeper = Box::new(sleeper);
        self
    }

    /// Connect and log in, reconnecting on transport failure
    pub fn authenticate(&mut self) -> Result<()> {
        match self.connection.authenticate(&self.password) {
            Err(e) if e.is_connection_lost() => {
                tracing::warn!("Login to {} failed: {}", self.connection.address(), e);
                self.reconnect()
            }
            other => other,
        }
    }

    /// Run a command, reconnecting and retrying once if the link drops
    pub fn execute(&mut self, command: &str) -> Result<String> {
        if !self.connection.is_authenticated() {
            tracing::info!("Connection to {} is down, reconnecting", self.connection.address());
            self.reconnect()?;
        }

        match self.connection.execute(command) {
            Err(e) if e.is_connection_lost() => {
                tracing::warn!("Connection lost during command: {}", e);
                self.reconnect()?;
                self.connection.execute(command)
            }
            other => other,
        }
    }

    /// Close and re-open the connection, following the backoff schedule
    ///
    /// Also serves as the manual trigger: it runs regardless of the
    /// current state. Exhausting the schedule leaves the connection closed.
    pub fn reconnect(&mut self) -> Result<()> {
        self.connection.close();
        let address = self.connection.address();
        let backoff = self.backoff;

        for (attempt, delay) in backoff.delays().enumerate() {
            let attempt = attempt as u32 + 1;
            tracing::info!(
                "Reconnecting to {} in {:?} (attempt {}/{})",
                address,
                delay,
                attempt,
                backoff.max_attempts
            );
            (self.sleeper)(delay);

            match self.connection.authenticate(&self.password) {
                Ok(()) => {
                    tracing::info!("Reconnected to {}", address);
                    return Ok(());
                }
                Err(RconError::AuthenticationFailed) => {
                    self.connection.close();
                    return Err(RconError::AuthenticationFailed);
                }
                Err(e) => {
                    tracing::warn!("Reconnect attempt {} to {} failed: {}", attempt, address, e);
                    self.connection.close();
                }
            }
        }

        Err(RconError::ReconnectExhausted {
            attempts: backoff.max_attempts,
        })
    }

    /// Close the underlying socket
    pub fn close(&mut self) {
        self.connection.close();
    }

    /// Whether the wrapped connection is open and logged in
    pub fn is_authenticated(&self) -> bool {
        self.connection.is_authenticated()
    }

    /// The wrapped connection
    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    /// The retry schedule
    pub fn backoff(&self) -> Backoff {
        self.backoff
    }
}

impl CommandExecutor for ReconnectingConnection {
    fn execute(&mut self, command: &str) -> Result<String> {
        ReconnectingConnection::execute(self, command)
    }
}
