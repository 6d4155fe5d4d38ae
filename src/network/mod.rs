//! Network Module
//!
//! TCP client side of the RCON protocol.
//!
//! ## Architecture
//! - `Connection`: one socket, login, sentinel-terminated commands
//! - `ResponseAssembler`: collect-until-sentinel state machine
//! - `ReconnectingConnection`: backoff + re-login around a Connection

mod assembler;
mod connection;
mod reconnect;

pub use assembler::{Progress, ResponseAssembler};
pub use connection::{CommandExecutor, Connection};
pub use reconnect::ReconnectingConnection;
