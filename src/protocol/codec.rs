//! Protocol codec
//!
//! Encoding and decoding functions for the wire protocol.
//!
//! ## Wire Format
//!
//! ```text
//! ┌──────────┬──────────┬──────────┬─────────────────────┬────────┐
//! │ Len (4)  │  Id (4)  │ Type (4) │       Payload       │ 00 00  │
//! └──────────┴──────────┴──────────┴─────────────────────┴────────┘
//! ```
//!
//! All integers are little-endian `i32`. `Len` counts everything after
//! itself: `4 + 4 + payload.len() + 2`.

use std::io::{Read, Write};

use bytes::{Buf, Bytes, BytesMut};

use super::{Packet, PacketType};
use crate::error::{RconError, Result};

/// Size of the length prefix
pub const LENGTH_PREFIX_SIZE: usize = 4;

/// Request id + type
pub const HEADER_SIZE: usize = 8;

/// Two NUL bytes after the payload
pub const TERMINATOR_SIZE: usize = 2;

/// Smallest legal value of the length field (empty payload)
pub const MIN_PACKET_LENGTH: usize = HEADER_SIZE + TERMINATOR_SIZE;

/// Largest length field accepted from a peer (1 MB)
pub const MAX_PACKET_LENGTH: usize = 1024 * 1024;

/// Largest payload a client may send in one request
pub const MAX_REQUEST_PAYLOAD: usize = 4096;

// =============================================================================
// Encoding
// =============================================================================

/// Encode a packet to bytes
///
/// Format: length (4) + request_id (4) + type (4) + payload + 00 00
pub fn encode(request_id: i32, packet_type: PacketType, payload: &[u8]) -> Result<Vec<u8>> {
    if let Some(position) = payload.iter().position(|&b| b == 0) {
        return Err(RconError::Encoding(format!(
            "Payload contains a NUL byte at offset {}",
            position
        )));
    }

    if payload.len() > MAX_REQUEST_PAYLOAD {
        return Err(RconError::Encoding(format!(
            "Payload too large: {} bytes (max {})",
            payload.len(),
            MAX_REQUEST_PAYLOAD
        )));
    }

    let length = HEADER_SIZE + payload.len() + TERMINATOR_SIZE;

    let mut message = Vec::with_capacity(LENGTH_PREFIX_SIZE + length);
    message.extend_from_slice(&(length as i32).to_le_bytes());
    message.extend_from_slice(&request_id.to_le_bytes());
    message.extend_from_slice(&(packet_type as i32).to_le_bytes());
    message.extend_from_slice(payload);
    message.extend_from_slice(&[0, 0]);

    Ok(message)
}

/// Encode an already-built packet
pub fn encode_packet(packet: &Packet) -> Result<Vec<u8>> {
    encode(packet.request_id, packet.packet_type, &packet.payload)
}

// =============================================================================
// Decoding
// =============================================================================

/// Decode exactly one packet from bytes
///
/// The buffer must hold one complete frame and nothing else; use
/// [`decode_frame`] when several packets may be buffered.
pub fn decode(bytes: &[u8]) -> Result<Packet> {
    if bytes.len() < LENGTH_PREFIX_SIZE {
        return Err(RconError::Decoding(format!(
            "Incomplete length prefix: expected {} bytes, got {}",
            LENGTH_PREFIX_SIZE,
            bytes.len()
        )));
    }

    let length = validate_length(read_length(bytes))?;
    let total_len = LENGTH_PREFIX_SIZE + length;

    if bytes.len() < total_len {
        return Err(RconError::Decoding(format!(
            "Incomplete packet: expected {} bytes, got {}",
            total_len,
            bytes.len()
        )));
    }
    if bytes.len() > total_len {
        return Err(RconError::Decoding(format!(
            "Declared length {} leaves {} trailing bytes",
            length,
            bytes.len() - total_len
        )));
    }

    decode_body(Bytes::copy_from_slice(&bytes[LENGTH_PREFIX_SIZE..]))
}

/// Slice one packet off the front of a stream buffer
///
/// Returns `Ok(None)` when the buffer does not yet hold a complete frame;
/// the buffer is left untouched in that case.
pub fn decode_frame(buffer: &mut BytesMut) -> Result<Option<Packet>> {
    if buffer.len() < LENGTH_PREFIX_SIZE {
        return Ok(None);
    }

    let length = validate_length(read_length(buffer))?;
    let total_len = LENGTH_PREFIX_SIZE + length;

    if buffer.len() < total_len {
        buffer.reserve(total_len - buffer.len());
        return Ok(None);
    }

    let mut frame = buffer.split_to(total_len).freeze();
    frame.advance(LENGTH_PREFIX_SIZE);
    decode_body(frame).map(Some)
}

/// Decode the bytes following the length prefix
fn decode_body(body: Bytes) -> Result<Packet> {
    let mut cursor = &body[..];
    let request_id = cursor.get_i32_le();
    let raw_type = cursor.get_i32_le();

    let packet_type = PacketType::from_i32(raw_type).ok_or_else(|| {
        RconError::Decoding(format!("Unknown packet type: {}", raw_type))
    })?;

    let payload_end = body.len() - TERMINATOR_SIZE;
    if body[payload_end..] != [0, 0] {
        return Err(RconError::Decoding(format!(
            "Malformed terminator: expected 00 00, got {:02x} {:02x}",
            body[payload_end],
            body[payload_end + 1]
        )));
    }

    Ok(Packet {
        request_id,
        packet_type,
        payload: body.slice(HEADER_SIZE..payload_end),
    })
}

fn read_length(bytes: &[u8]) -> i32 {
    i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

/// Check a declared length against protocol bounds
fn validate_length(length: i32) -> Result<usize> {
    let length = usize::try_from(length)
        .map_err(|_| RconError::Decoding(format!("Negative packet length: {}", length)))?;

    if length < MIN_PACKET_LENGTH {
        return Err(RconError::Decoding(format!(
            "Packet length {} below minimum {}",
            length, MIN_PACKET_LENGTH
        )));
    }
    if length > MAX_PACKET_LENGTH {
        return Err(RconError::Decoding(format!(
            "Packet too large: {} bytes (max {})",
            length, MAX_PACKET_LENGTH
        )));
    }

    Ok(length)
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Read a complete packet from a stream
///
/// Blocks until a complete packet is received or an error occurs
pub fn read_packet<R: Read>(reader: &mut R) -> Result<Packet> {
    // Read length prefix first
    let mut prefix = [0u8; LENGTH_PREFIX_SIZE];
    reader.read_exact(&mut prefix)?;

    let length = validate_length(i32::from_le_bytes(prefix))?;

    // Read the rest of the frame
    let mut body = vec![0u8; length];
    reader.read_exact(&mut body)?;

    decode_body(Bytes::from(body))
}

/// Write a packet to a stream
pub fn write_packet<W: Write>(writer: &mut W, packet: &Packet) -> Result<()> {
    let bytes = encode_packet(packet)?;
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}
