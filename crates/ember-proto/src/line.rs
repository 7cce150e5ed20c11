//! CR-LF line codec for tokio.
//!
//! Decoding extracts the first complete CR-LF terminated line from the
//! buffer and leaves any trailing partial line in place for the next read.
//! Encoding normalizes every outbound line to end with CR-LF.

use bytes::{BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::error::{self, ProtocolError};

const CRLF: &[u8] = b"\r\n";

/// Line-based codec that handles CR-LF terminated messages.
///
/// No cap is placed on complete lines. An optional cap bounds how many
/// bytes may sit in the buffer without a terminator.
#[derive(Debug, Default, Clone)]
pub struct LineCodec {
    /// Index of next byte to check for the terminator
    next_index: usize,
    /// Maximum unterminated bytes, if any
    max_pending: Option<usize>,
}

impl LineCodec {
    /// Create a codec without an input cap.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a codec that rejects more than `max_pending` unterminated bytes.
    pub fn with_max_pending(max_pending: usize) -> Self {
        Self {
            next_index: 0,
            max_pending: Some(max_pending),
        }
    }

    fn find_crlf(&self, src: &[u8]) -> Option<usize> {
        // A CR may have been the last byte of the previous scan.
        let start = self.next_index.saturating_sub(1);
        src.get(start..)?
            .windows(CRLF.len())
            .position(|w| w == CRLF)
            .map(|offset| start + offset)
    }
}

impl Decoder for LineCodec {
    type Item = String;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> error::Result<Option<String>> {
        if let Some(end) = self.find_crlf(src) {
            let line = src.split_to(end + CRLF.len());
            self.next_index = 0;
            let body = &line[..end];
            return Ok(Some(String::from_utf8_lossy(body).into_owned()));
        }

        self.next_index = src.len();

        match self.max_pending {
            Some(limit) if src.len() > limit => Err(ProtocolError::MessageTooLong {
                actual: src.len(),
                limit,
            }),
            _ => Ok(None),
        }
    }
}

impl Encoder<String> for LineCodec {
    type Error = ProtocolError;

    fn encode(&mut self, msg: String, dst: &mut BytesMut) -> error::Result<()> {
        dst.reserve(msg.len() + CRLF.len());
        dst.put_slice(msg.as_bytes());
        if !msg.ends_with("\r\n") {
            dst.put_slice(CRLF);
        }
        Ok(())
    }
}
