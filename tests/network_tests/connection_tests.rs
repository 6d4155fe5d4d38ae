//! Connection Tests
//!
//! Login and command exchanges against a scripted server.

#[path = "../support/mod.rs"]
mod support;

use std::time::Duration;

use mcrcon::{Connection, RconError};
use support::{unused_port, FakeServer, Script, PASSWORD};

fn connection_to(server: &FakeServer) -> Connection {
    Connection::new("127.0.0.1", server.port(), Duration::from_secs(2))
}

// =============================================================================
// Authentication Tests
// =============================================================================

#[test]
fn test_authenticate_success() {
    let server = FakeServer::start(Script::default());
    let mut conn = connection_to(&server);

    conn.authenticate(PASSWORD).unwrap();

    assert!(conn.is_connected());
    assert!(conn.is_authenticated());
    assert_eq!(server.logins(), 1);
}

#[test]
fn test_authenticate_wrong_password_closes() {
    let server = FakeServer::start(Script::default());
    let mut conn = connection_to(&server);

    let result = conn.authenticate("wrong");

    assert!(matches!(result, Err(RconError::AuthenticationFailed)));
    assert!(!conn.is_connected());
    assert!(!conn.is_authenticated());
}

#[test]
fn test_authenticate_refused_port() {
    let mut conn = Connection::new("127.0.0.1", unused_port(), Duration::from_millis(500));

    let result = conn.authenticate(PASSWORD);

    assert!(matches!(result, Err(RconError::Connection(_))));
    assert!(!conn.is_connected());
}

#[test]
fn test_execute_before_authenticate_fails() {
    let server = FakeServer::start(Script::default());
    let mut conn = connection_to(&server);

    assert!(matches!(conn.execute("list"), Err(RconError::Command(_))));
    assert!(server.received().is_empty());
}

// =============================================================================
// Command Tests
// =============================================================================

#[test]
fn test_execute_single_packet_response() {
    let server = FakeServer::start(Script::default().respond("list", "There are 0 of a max of 20 players online: "));
    let mut conn = connection_to(&server);
    conn.authenticate(PASSWORD).unwrap();

    let response = conn.execute("list").unwrap();

    assert_eq!(response, "There are 0 of a max of 20 players online: ");
    assert_eq!(server.received(), vec!["list"]);
}

#[test]
fn test_execute_reassembles_fragments_in_order() {
    let fragments = vec![b"Hello, ".to_vec(), b"world".to_vec(), b"!".to_vec()];
    let server = FakeServer::start(Script::default().respond_fragments("banlist", fragments));
    let mut conn = connection_to(&server);
    conn.authenticate(PASSWORD).unwrap();

    assert_eq!(conn.execute("banlist").unwrap(), "Hello, world!");
}

#[test]
fn test_execute_joins_multibyte_character_split_across_packets() {
    let text = "caf\u{e9} \u{2603}".as_bytes().to_vec();
    // Split inside the three-byte snowman
    let split = text.len() - 2;
    let fragments = vec![text[..split].to_vec(), text[split..].to_vec()];
    let server = FakeServer::start(Script::default().respond_fragments("motd", fragments));
    let mut conn = connection_to(&server);
    conn.authenticate(PASSWORD).unwrap();

    assert_eq!(conn.execute("motd").unwrap(), "caf\u{e9} \u{2603}");
}

#[test]
fn test_execute_empty_response() {
    let server = FakeServer::start(Script::default().respond("save-all", ""));
    let mut conn = connection_to(&server);
    conn.authenticate(PASSWORD).unwrap();

    assert_eq!(conn.execute("save-all").unwrap(), "");
}

#[test]
fn test_sequential_commands_stay_in_step() {
    let server = FakeServer::start(
        Script::default()
            .respond_fragments("one", vec![b"1a".to_vec(), b"1b".to_vec()])
            .respond("two", "2"),
    );
    let mut conn = connection_to(&server);
    conn.authenticate(PASSWORD).unwrap();

    assert_eq!(conn.execute("one").unwrap(), "1a1b");
    assert_eq!(conn.execute("two").unwrap(), "2");
    assert_eq!(conn.execute("one").unwrap(), "1a1b");
}

#[test]
fn test_execute_rejects_nul_without_sending() {
    let server = FakeServer::start(Script::default());
    let mut conn = connection_to(&server);
    conn.authenticate(PASSWORD).unwrap();

    assert!(matches!(conn.execute("say \0"), Err(RconError::Encoding(_))));
    assert!(conn.is_authenticated());
    assert!(server.received().is_empty());
}

// =============================================================================
// Failure Tests
// =============================================================================

#[test]
fn test_server_disconnect_is_connection_error() {
    let server = FakeServer::start(Script::default().drop_connection_once("stop"));
    let mut conn = connection_to(&server);
    conn.authenticate(PASSWORD).unwrap();

    let error = conn.execute("stop").unwrap_err();

    assert!(error.is_connection_lost(), "unexpected error: {error}");
    assert!(!conn.is_connected());
    assert!(!conn.is_authenticated());
}

#[test]
fn test_timeout_closes_connection() {
    let server = FakeServer::start(Script::default().silent("hang"));
    let mut conn = Connection::new("127.0.0.1", server.port(), Duration::from_millis(200));
    conn.authenticate(PASSWORD).unwrap();

    let result = conn.execute("hang");

    assert!(matches!(result, Err(RconError::Command(_))));
    assert!(!conn.is_connected());
}

#[test]
fn test_close_is_idempotent() {
    let server = FakeServer::start(Script::default());
    let mut conn = connection_to(&server);
    conn.authenticate(PASSWORD).unwrap();

    conn.close();
    conn.close();

    assert!(!conn.is_connected());
    assert!(matches!(conn.execute("list"), Err(RconError::Command(_))));
}

#[test]
fn test_reauthenticate_after_close() {
    let server = FakeServer::start(Script::default().respond("seed", "Seed: [42]"));
    let mut conn = connection_to(&server);
    conn.authenticate(PASSWORD).unwrap();
    conn.close();

    conn.authenticate(PASSWORD).unwrap();

    assert_eq!(conn.execute("seed").unwrap(), "Seed: [42]");
    assert_eq!(server.logins(), 2);
}
