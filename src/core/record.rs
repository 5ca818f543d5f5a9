//! Log record structure

use serde::{Deserialize, Serialize};
use std::fmt;

/// One discrete log message with its sequence number and producer identity.
///
/// Records are immutable after creation: the producer renders the message
/// text once (including the elapsed-time stamp) and the record is then moved
/// through the hand-off channel and consumed exactly once by the writer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Index of the producer that created this record
    pub producer_id: usize,
    /// Sequence number claimed or counted by the producer
    pub sequence: u64,
    /// Rendered message text, capped at the configured length
    pub message: String,
}

impl Record {
    /// Render a record for the given producer and sequence number.
    ///
    /// The message format is part of the external output contract:
    /// `"<elapsed_seconds with 6 decimal digits> | Thread <producer_id> | Logging message <sequence>"`.
    /// The rendered text is truncated to `max_len` bytes at a char boundary.
    pub fn new(producer_id: usize, sequence: u64, elapsed_seconds: f64, max_len: usize) -> Self {
        let mut message = format!(
            "{:.6} | Thread {} | Logging message {}",
            elapsed_seconds, producer_id, sequence
        );
        truncate_at_boundary(&mut message, max_len);

        Self {
            producer_id,
            sequence,
            message,
        }
    }

    /// Bytes this record occupies in the write buffer (message + newline)
    #[inline]
    pub fn line_len(&self) -> usize {
        self.message.len() + 1
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Truncate `s` to at most `max_len` bytes without splitting a char.
fn truncate_at_boundary(s: &mut String, max_len: usize) {
    if s.len() <= max_len {
        return;
    }
    let mut end = max_len;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    s.truncate(end);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_format() {
        let record = Record::new(3, 7, 1.5, 256);
        assert_eq!(record.message, "1.500000 | Thread 3 | Logging message 7");
        assert_eq!(record.producer_id, 3);
        assert_eq!(record.sequence, 7);
    }

    #[test]
    fn test_display_matches_message() {
        let record = Record::new(0, 42, 0.000123, 256);
        assert_eq!(record.to_string(), record.message);
        assert!(record.message.starts_with("0.000123 | "));
    }

    #[test]
    fn test_line_len_counts_newline() {
        let record = Record::new(1, 1, 0.0, 256);
        assert_eq!(record.line_len(), record.message.len() + 1);
    }

    #[test]
    fn test_truncation_to_cap() {
        let record = Record::new(9, 123_456, 12345.678901, 20);
        assert!(record.message.len() <= 20);
        assert!(record.message.starts_with("12345.678901"));
    }

    #[test]
    fn test_truncation_respects_char_boundary() {
        let mut s = String::from("ab\u{00e9}cd");
        // 'é' is two bytes; cutting at 3 would split it
        truncate_at_boundary(&mut s, 3);
        assert_eq!(s, "ab");
    }

    #[test]
    fn test_zero_cap_yields_empty_message() {
        let record = Record::new(0, 1, 0.5, 0);
        assert!(record.message.is_empty());
        assert_eq!(record.line_len(), 1);
    }
}
