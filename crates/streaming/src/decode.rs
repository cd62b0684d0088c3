/// Incremental UTF-8 decoder for a byte stream split at arbitrary points.
///
/// A multi-byte sequence cut by a chunk boundary is held back until the next
/// chunk completes it. Invalid sequences decode to U+FFFD.
#[derive(Debug, Default, Clone)]
pub struct Utf8StreamDecoder {
    pending: Vec<u8>,
}

impl Utf8StreamDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Decode as much of `chunk` (prefixed by any held-back bytes) as forms
    /// complete characters.
    pub fn decode(&mut self, chunk: &[u8]) -> String {
        let mut input = std::mem::take(&mut self.pending);
        input.extend_from_slice(chunk);

        let mut out = String::with_capacity(input.len());
        let mut rest = input.as_slice();
        loop {
            match std::str::from_utf8(rest) {
                Ok(valid) => {
                    out.push_str(valid);
                    break;
                }
                Err(err) => {
                    let (valid, tail) = rest.split_at(err.valid_up_to());
                    if let Ok(valid) = std::str::from_utf8(valid) {
                        out.push_str(valid);
                    }
                    match err.error_len() {
                        Some(len) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            rest = &tail[len..];
                        }
                        None => {
                            // Incomplete sequence at the end: wait for more bytes.
                            self.pending = tail.to_vec();
                            break;
                        }
                    }
                }
            }
        }
        out
    }

    /// End of stream. A dangling partial sequence becomes one U+FFFD.
    pub fn finish(&mut self) -> String {
        if self.pending.is_empty() {
            String::new()
        } else {
            self.pending.clear();
            char::REPLACEMENT_CHARACTER.to_string()
        }
    }

    /// Drop held-back bytes without emitting anything.
    pub fn reset(&mut self) {
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::Utf8StreamDecoder;
    use proptest::prelude::*;

    #[test]
    fn passes_ascii_through() {
        let mut d = Utf8StreamDecoder::new();
        assert_eq!(d.decode(b"Hel"), "Hel");
        assert_eq!(d.decode(b"lo"), "lo");
        assert_eq!(d.finish(), "");
    }

    #[test]
    fn joins_sequences_split_across_chunks() {
        let bytes = "日本".as_bytes();
        let mut d = Utf8StreamDecoder::new();
        assert_eq!(d.decode(&bytes[..2]), "");
        assert!(d.has_pending());
        assert_eq!(d.decode(&bytes[2..4]), "日");
        assert_eq!(d.decode(&bytes[4..]), "本");
        assert!(!d.has_pending());
    }

    #[test]
    fn replaces_invalid_bytes() {
        let mut d = Utf8StreamDecoder::new();
        assert_eq!(d.decode(b"a\xffb"), "a\u{FFFD}b");
    }

    #[test]
    fn dangling_sequence_is_flushed_as_replacement() {
        let mut d = Utf8StreamDecoder::new();
        assert_eq!(d.decode(&"é".as_bytes()[..1]), "");
        assert_eq!(d.finish(), "\u{FFFD}");
        assert_eq!(d.finish(), "");
    }

    proptest! {
        #[test]
        fn any_split_reassembles(text in "\\PC{0,40}", cuts in prop::collection::vec(0usize..200, 0..6)) {
            let bytes = text.as_bytes();
            let mut points: Vec<usize> = cuts.into_iter().map(|c| c % (bytes.len() + 1)).collect();
            points.sort_unstable();

            let mut d = Utf8StreamDecoder::new();
            let mut out = String::new();
            let mut start = 0;
            for p in points {
                out.push_str(&d.decode(&bytes[start..p]));
                start = p;
            }
            out.push_str(&d.decode(&bytes[start..]));
            out.push_str(&d.finish());
            prop_assert_eq!(out, text);
        }
    }
}
