//! Stateful UTF-8 decoding across chunk boundaries.

/// Incremental UTF-8 decoder.
///
/// Transport chunks can end in the middle of a multi-byte character. The
/// decoder holds those trailing bytes back and prepends them to the next
/// chunk. Invalid sequences are replaced with U+FFFD and decoding carries on.
#[derive(Debug, Default)]
pub struct Utf8Decoder {
    /// Bytes of an incomplete character from the previous chunk (at most 3)
    pending: Vec<u8>,
}

impl Utf8Decoder {
    /// Create a new decoder
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode the next chunk, returning all text that is complete so far.
    pub fn decode(&mut self, chunk: &[u8]) -> String {
        if self.pending.is_empty() {
            return self.decode_bytes(chunk);
        }

        let mut bytes = std::mem::take(&mut self.pending);
        bytes.extend_from_slice(chunk);
        self.decode_bytes(&bytes)
    }

    /// Number of bytes held back waiting for the rest of a character.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Drop any held-back bytes.
    pub fn reset(&mut self) {
        self.pending.clear();
    }

    fn decode_bytes(&mut self, bytes: &[u8]) -> String {
        let mut out = String::with_capacity(bytes.len());
        let mut rest = bytes;

        loop {
            match std::str::from_utf8(rest) {
                Ok(text) => {
                    out.push_str(text);
                    break;
                }
                Err(e) => {
                    let (valid, tail) = rest.split_at(e.valid_up_to());
                    out.push_str(&String::from_utf8_lossy(valid));

                    match e.error_len() {
                        Some(len) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            rest = &tail[len..];
                        }
                        None => {
                            // Incomplete character at the end of the input
                            self.pending = tail.to_vec();
                            break;
                        }
                    }
                }
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_passthrough() {
        let mut decoder = Utf8Decoder::new();
        assert_eq!(decoder.decode(b"data: hello"), "data: hello");
        assert_eq!(decoder.pending_len(), 0);
    }

    #[test]
    fn test_two_byte_char_split() {
        // "é" = C3 A9
        let mut decoder = Utf8Decoder::new();
        assert_eq!(decoder.decode(&[b'a', 0xC3]), "a");
        assert_eq!(decoder.pending_len(), 1);
        assert_eq!(decoder.decode(&[0xA9, b'b']), "éb");
        assert_eq!(decoder.pending_len(), 0);
    }

    #[test]
    fn test_four_byte_char_split_across_three_chunks() {
        let bytes = "🦀".as_bytes();
        assert_eq!(bytes.len(), 4);

        let mut decoder = Utf8Decoder::new();
        assert_eq!(decoder.decode(&bytes[..1]), "");
        assert_eq!(decoder.decode(&bytes[1..3]), "");
        assert_eq!(decoder.decode(&bytes[3..]), "🦀");
    }

    #[test]
    fn test_every_split_point_decodes_correctly() {
        let text = "data: {\"msg\":\"héllo 世界 🦀\"}\n\n";
        let bytes = text.as_bytes();

        for split in 0..=bytes.len() {
            let mut decoder = Utf8Decoder::new();
            let mut out = decoder.decode(&bytes[..split]);
            out.push_str(&decoder.decode(&bytes[split..]));
            assert_eq!(out, text, "split at byte {}", split);
        }
    }

    #[test]
    fn test_invalid_byte_is_replaced() {
        let mut decoder = Utf8Decoder::new();
        assert_eq!(decoder.decode(&[b'a', 0xFF, b'b']), "a\u{FFFD}b");
        assert_eq!(decoder.pending_len(), 0);
    }

    #[test]
    fn test_reset_drops_pending() {
        let mut decoder = Utf8Decoder::new();
        decoder.decode(&[0xE4, 0xB8]);
        assert_eq!(decoder.pending_len(), 2);
        decoder.reset();
        assert_eq!(decoder.pending_len(), 0);
        assert_eq!(decoder.decode(b"ok"), "ok");
    }
}
