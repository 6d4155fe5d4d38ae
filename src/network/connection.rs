//! RCON Connection
//!
//! Owns one TCP socket to the server and runs the login and command
//! exchanges on it.

use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::config::Config;
use crate::error::{RconError, Result};
use crate::protocol::{
    encode, read_packet, Packet, PacketType, AUTH_FAILURE_REQUEST_ID, SENTINEL_REQUEST_ID,
};

use super::assembler::{Progress, ResponseAssembler};

/// Anything that can run a command and hand back its full text response
///
/// The discovery pipeline runs against this so it works the same over a
/// plain [`Connection`], a reconnecting one, or a scripted test double.
pub trait CommandExecutor {
    fn execute(&mut self, command: &str) -> Result<String>;
}

/// Buffered halves of one TCP stream
struct Stream {
    reader: BufReader<TcpStream>,
    writer: BufWriter<TcpStream>,
}

/// A single RCON session
///
/// Not meant to be shared: the sentinel requests of two interleaved callers
/// would end each other's responses. Each caller opens its own Connection.
pub struct Connection {
    /// Server host
    host: String,

    /// Server port
    port: u16,

    /// Connect/read/write timeout
    timeout: Duration,

    /// Open socket, if any
    stream: Option<Stream>,

    /// Whether the server accepted our password on this socket
    authenticated: bool,

    /// Next request id to hand out (never the sentinel)
    next_request_id: i32,
}

impl Connection {
    /// Create an unconnected connection
    pub fn new(host: impl Into<String>, port: u16, timeout: Duration) -> Self {
        Self {
            host: host.into(),
            port,
            timeout,
            stream: None,
            authenticated: false,
            next_request_id: 1,
        }
    }

    /// Create an unconnected connection from config
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.host.clone(), config.port, config.timeout())
    }

    /// Open the TCP socket
    ///
    /// Tries each resolved address in turn. Any previous socket is closed.
    pub fn connect(&mut self) -> Result<()> {
        self.close();

        let addrs = (self.host.as_str(), self.port).to_socket_addrs().map_err(|e| {
            RconError::Connection(format!("Failed to resolve {}: {}", self.address(), e))
        })?;

        let mut last_error = None;
        for addr in addrs {
            match TcpStream::connect_timeout(&addr, self.timeout) {
                Ok(stream) => {
                    self.stream = Some(self.configure(stream)?);
                    tracing::debug!("Connected to {}", addr);
                    return Ok(());
                }
                Err(e) => last_error = Some(e),
            }
        }

        Err(RconError::Connection(match last_error {
            Some(e) => format!("Failed to connect to {}: {}", self.address(), e),
            None => format!("No addresses found for {}", self.address()),
        }))
    }

    /// Set timeouts and split the stream into buffered halves
    fn configure(&self, stream: TcpStream) -> Result<Stream> {
        // Disable Nagle's algorithm: command and sentinel go out together
        stream.set_nodelay(true)?;
        stream.set_read_timeout(Some(self.timeout))?;
        stream.set_write_timeout(Some(self.timeout))?;

        let read_stream = stream.try_clone()?;
        Ok(Stream {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(stream),
        })
    }

    /// Log in with the RCON password
    ///
    /// Connects first when no socket is open. A rejected password closes
    /// the socket.
    pub fn authenticate(&mut self, password: &str) -> Result<()> {
        if self.stream.is_none() {
            self.connect()?;
        }
        self.authenticated = false;

        let request_id = self.next_request_id();
        let login = encode(request_id, PacketType::Login, password.as_bytes())?;

        let result = {
            let stream = self.stream_mut()?;
            Self::login_exchange(stream, &login)
        };
        let response = match result {
            Ok(packet) => packet,
            Err(e) => return Err(self.fail(e)),
        };

        if response.request_id == AUTH_FAILURE_REQUEST_ID {
            tracing::warn!("Server {} rejected the RCON password", self.address());
            self.close();
            return Err(RconError::AuthenticationFailed);
        }

        self.authenticated = true;
        tracing::info!("Authenticated to {}", self.address());
        Ok(())
    }

    /// Run a command and return its complete response text
    ///
    /// Sends the command, then an empty request under the sentinel id, and
    /// collects fragments for the command until the sentinel answer arrives.
    pub fn execute(&mut self, command: &str) -> Result<String> {
        if !self.authenticated {
            return Err(RconError::Command(format!(
                "Not authenticated to {}",
                self.address()
            )));
        }

        let request_id = self.next_request_id();
        let mut message = encode(request_id, PacketType::Command, command.as_bytes())?;
        message.extend_from_slice(&encode(SENTINEL_REQUEST_ID, PacketType::Command, b"")?);

        let result = {
            let stream = self.stream_mut()?;
            Self::exchange(stream, &message, request_id)
        };

        match result {
            Ok(text) => {
                tracing::trace!("Request {} returned {} bytes", request_id, text.len());
                Ok(text)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Write the login packet and read the single answer
    fn login_exchange(stream: &mut Stream, login: &[u8]) -> Result<Packet> {
        stream.writer.write_all(login)?;
        stream.writer.flush()?;
        read_packet(&mut stream.reader)
    }

    /// Write the request bytes and drive the assembler until complete
    fn exchange(stream: &mut Stream, message: &[u8], request_id: i32) -> Result<String> {
        stream.writer.write_all(message)?;
        stream.writer.flush()?;

        let mut assembler = ResponseAssembler::new(request_id);
        loop {
            let packet = read_packet(&mut stream.reader)?;
            if assembler.accept(packet) == Progress::Complete {
                return Ok(assembler.finish());
            }
        }
    }

    /// Close the socket; safe to call repeatedly
    pub fn close(&mut self) {
        if let Some(stream) = self.stream.take() {
            let _ = stream.writer.get_ref().shutdown(Shutdown::Both);
            tracing::debug!("Closed connection to {}", self.address());
        }
        self.authenticated = false;
    }

    /// Whether a socket is open
    pub fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    /// Whether the socket is open and logged in
    pub fn is_authenticated(&self) -> bool {
        self.stream.is_some() && self.authenticated
    }

    /// `host:port` of the server
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Server host
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Server port
    pub fn port(&self) -> u16 {
        self.port
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn stream_mut(&mut self) -> Result<&mut Stream> {
        let address = self.address();
        self.stream
            .as_mut()
            .ok_or_else(|| RconError::Connection(format!("Not connected to {}", address)))
    }

    /// Hand out the next request id, skipping the sentinel and wrapping
    /// before overflow
    fn next_request_id(&mut self) -> i32 {
        let id = self.next_request_id;
        self.next_request_id = match id.checked_add(1) {
            Some(SENTINEL_REQUEST_ID) => SENTINEL_REQUEST_ID + 1,
            Some(next) => next,
            None => 1,
        };
        id
    }

    /// Close after an I/O failure and classify the error
    ///
    /// A read timeout leaves the socket alive but out of step with the
    /// server (the sentinel answer may still be in flight), so it is closed
    /// as well and reported as a command failure rather than a lost link.
    fn fail(&mut self, error: RconError) -> RconError {
        let address = self.address();
        self.close();

        match error {
            RconError::Io(ref e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
                tracing::warn!("Timed out waiting for {}", address);
                RconError::Command(format!("Timed out waiting for response from {}", address))
            }
            RconError::Io(ref e) if e.kind() == ErrorKind::UnexpectedEof => {
                tracing::debug!("Server {} closed the connection", address);
                RconError::Connection(format!("Connection closed by server {}", address))
            }
            RconError::Io(e) => {
                tracing::debug!("Connection to {} lost: {}", address, e);
                RconError::Connection(format!("Connection to {} lost: {}", address, e))
            }
            other => other,
        }
    }
}

impl CommandExecutor for Connection {
    fn execute(&mut self, command: &str) -> Result<String> {
        Connection::execute(self, command)
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.close();
    }
}
