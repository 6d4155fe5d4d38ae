//! Protocol Module
//!
//! Defines the RCON wire protocol.
//!
//! ## Packet Format
//! ```text
//! ┌──────────┬──────────┬──────────┬─────────────────────┬────────┐
//! │ Len (4)  │  Id (4)  │ Type (4) │       Payload       │ 00 00  │
//! └──────────┴──────────┴──────────┴─────────────────────┴────────┘
//! ```
//!
//! ### Packet Types
//! - 3: LOGIN    - Payload: password
//! - 2: COMMAND  - Payload: command text (also the login answer)
//! - 0: RESPONSE - Payload: one fragment of command output
//!
//! ### Special Request Ids
//! - -1:   login rejected
//! - 9999: end-of-response sentinel

mod packet;
mod codec;

pub use packet::{Packet, PacketType, AUTH_FAILURE_REQUEST_ID, SENTINEL_REQUEST_ID};
pub use codec::{
    decode, decode_frame, encode, encode_packet, read_packet, write_packet,
    HEADER_SIZE, LENGTH_PREFIX_SIZE, MAX_PACKET_LENGTH, MAX_REQUEST_PAYLOAD, MIN_PACKET_LENGTH,
    TERMINATOR_SIZE,
};
