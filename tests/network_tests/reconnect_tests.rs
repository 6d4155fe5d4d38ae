//! Reconnect Tests
//!
//! Backoff schedule and retry behavior of the reconnecting wrapper.

#[path = "../support/mod.rs"]
mod support;

use std::sync::Arc;
use std::time::Duration;

use mcrcon::{Backoff, Connection, RconError, ReconnectingConnection};
use parking_lot::Mutex;
use support::{unused_port, FakeServer, Script, PASSWORD};

fn backoff(max_attempts: u32) -> Backoff {
    Backoff {
        max_attempts,
        initial_delay: Duration::from_millis(100),
        max_delay: Duration::from_secs(30),
    }
}

/// Wrap a connection with a sleeper that records instead of sleeping
fn recording(
    port: u16,
    password: &str,
    backoff: Backoff,
) -> (ReconnectingConnection, Arc<Mutex<Vec<Duration>>>) {
    let slept = Arc::new(Mutex::new(Vec::new()));
    let record = Arc::clone(&slept);
    let conn = Connection::new("127.0.0.1", port, Duration::from_millis(500));
    let rcon = ReconnectingConnection::new(conn, password, backoff)
        .with_sleeper(move |delay| record.lock().push(delay));
    (rcon, slept)
}

// =============================================================================
// Backoff Tests
// =============================================================================

#[test]
fn test_exhausted_after_doubling_delays() {
    let (mut rcon, slept) = recording(unused_port(), PASSWORD, backoff(3));

    let result = rcon.reconnect();

    assert!(matches!(result, Err(RconError::ReconnectExhausted { attempts: 3 })));
    assert_eq!(
        *slept.lock(),
        vec![
            Duration::from_millis(100),
            Duration::from_millis(200),
            Duration::from_millis(400),
        ]
    );
    assert!(!rcon.is_authenticated());
    assert!(!rcon.connection().is_connected());
}

#[test]
fn test_delays_capped_at_max() {
    let schedule = Backoff {
        max_attempts: 4,
        initial_delay: Duration::from_millis(100),
        max_delay: Duration::from_millis(250),
    };
    let (mut rcon, slept) = recording(unused_port(), PASSWORD, schedule);

    let _ = rcon.reconnect();

    assert_eq!(
        *slept.lock(),
        vec![
            Duration::from_millis(100),
            Duration::from_millis(200),
            Duration::from_millis(250),
            Duration::from_millis(250),
        ]
    );
}

#[test]
fn test_authenticate_on_dead_port_falls_back_to_reconnect() {
    let (mut rcon, slept) = recording(unused_port(), PASSWORD, backoff(2));

    let result = rcon.authenticate();

    assert!(matches!(result, Err(RconError::ReconnectExhausted { attempts: 2 })));
    assert_eq!(slept.lock().len(), 2);
}

// =============================================================================
// Retry Tests
// =============================================================================

#[test]
fn test_reconnect_succeeds_on_first_attempt() {
    let server = FakeServer::start(Script::default());
    let (mut rcon, slept) = recording(server.port(), PASSWORD, backoff(3));

    rcon.reconnect().unwrap();

    assert!(rcon.is_authenticated());
    assert_eq!(*slept.lock(), vec![Duration::from_millis(100)]);
}

#[test]
fn test_wrong_password_is_not_retried() {
    let server = FakeServer::start(Script::default());
    let (mut rcon, slept) = recording(server.port(), "wrong", backoff(3));

    let result = rcon.reconnect();

    assert!(matches!(result, Err(RconError::AuthenticationFailed)));
    assert_eq!(slept.lock().len(), 1);
    assert_eq!(server.logins(), 1);
}

#[test]
fn test_execute_retries_once_after_drop() {
    let server = FakeServer::start(
        Script::default()
            .respond("list", "There are 1 of a max of 20 players online: Steve")
            .drop_connection_once("list"),
    );
    let (mut rcon, slept) = recording(server.port(), PASSWORD, backoff(3));
    rcon.authenticate().unwrap();

    let response = rcon.execute("list").unwrap();

    assert_eq!(response, "There are 1 of a max of 20 players online: Steve");
    assert_eq!(server.received(), vec!["list", "list"]);
    assert_eq!(server.logins(), 2);
    assert_eq!(slept.lock().len(), 1);
}

#[test]
fn test_execute_reconnects_when_not_authenticated() {
    let server = FakeServer::start(Script::default().respond("seed", "Seed: [7]"));
    let (mut rcon, _slept) = recording(server.port(), PASSWORD, backoff(3));

    assert_eq!(rcon.execute("seed").unwrap(), "Seed: [7]");
    assert!(rcon.is_authenticated());
}

#[test]
fn test_command_errors_are_not_retried() {
    let server = FakeServer::start(Script::default());
    let (mut rcon, slept) = recording(server.port(), PASSWORD, backoff(3));
    rcon.authenticate().unwrap();

    let result = rcon.execute("say \0");

    assert!(matches!(result, Err(RconError::Encoding(_))));
    assert!(slept.lock().is_empty());
    assert_eq!(server.logins(), 1);
}
