//! Response reassembly
//!
//! The protocol has no "more data" flag. After each command the client sends
//! an empty sentinel request under [`SENTINEL_REQUEST_ID`]; the server answers packets in
//! order, so the sentinel answer marks the end of the command's output.

use bytes::BytesMut;

use crate::protocol::{Packet, SENTINEL_REQUEST_ID};

/// Outcome of feeding one packet to the assembler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// More packets are needed
    Pending,

    /// The sentinel arrived; the response is complete
    Complete,
}

/// Collect-until-sentinel state machine for one command
#[derive(Debug)]
pub struct ResponseAssembler {
    /// Id of the command whose fragments we keep
    request_id: i32,

    /// Fragments concatenated in receipt order
    body: BytesMut,

    /// Number of fragments accepted
    fragments: usize,

    /// Set once the sentinel has been seen
    complete: bool,
}

impl ResponseAssembler {
    /// Start collecting fragments for `request_id`
    pub fn new(request_id: i32) -> Self {
        Self {
            request_id,
            body: BytesMut::new(),
            fragments: 0,
            complete: false,
        }
    }

    /// Feed the next packet read from the socket
    pub fn accept(&mut self, packet: Packet) -> Progress {
        if self.complete {
            return Progress::Complete;
        }

        match packet.request_id {
            SENTINEL_REQUEST_ID => {
                self.complete = true;
                Progress::Complete
            }
            id if id == self.request_id => {
                self.body.extend_from_slice(&packet.payload);
                self.fragments += 1;
                Progress::Pending
            }
            id => {
                tracing::trace!(
                    "Dropping packet for request {} while waiting on {}",
                    id,
                    self.request_id
                );
                Progress::Pending
            }
        }
    }

    /// Whether the sentinel has been seen
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Number of fragments collected so far
    pub fn fragment_count(&self) -> usize {
        self.fragments
    }

    /// The reassembled response text
    ///
    /// Bytes are joined before UTF-8 decoding so characters split across
    /// fragments survive.
    pub fn finish(self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}
