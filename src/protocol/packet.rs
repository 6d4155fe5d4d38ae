//! Packet definitions
//!
//! A single RCON packet and its type tag.

use bytes::Bytes;

/// Request id reserved for the end-of-response marker
pub const SENTINEL_REQUEST_ID: i32 = 9999;

/// Request id a server answers a rejected login with
pub const AUTH_FAILURE_REQUEST_ID: i32 = -1;

/// Packet types
///
/// A server answers a login with type 2, which shares its value with
/// `Command`; callers only look at the request id of that answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum PacketType {
    Response = 0,
    Command = 2,
    Login = 3,
}

impl PacketType {
    /// Map a wire value back to a packet type
    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            0 => Some(PacketType::Response),
            2 => Some(PacketType::Command),
            3 => Some(PacketType::Login),
            _ => None,
        }
    }
}

/// A decoded packet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    /// Correlates a response with its request
    pub request_id: i32,

    /// Packet type
    pub packet_type: PacketType,

    /// Payload without the two trailing NUL bytes
    pub payload: Bytes,
}

impl Packet {
    /// Create a packet
    pub fn new(request_id: i32, packet_type: PacketType, payload: impl Into<Bytes>) -> Self {
        Self {
            request_id,
            packet_type,
            payload: payload.into(),
        }
    }

    /// Payload as text, replacing invalid UTF-8
    pub fn payload_str(&self) -> String {
        String::from_utf8_lossy(&self.payload).into_owned()
    }
}
