//! Text buffer that cuts decoded stream text into frames.

/// Separator between two frames.
pub const FRAME_SEPARATOR: &str = "\n\n";

/// Accumulates decoded text and hands out complete frames.
///
/// Frame boundaries only depend on the `\n\n` separator, never on how the
/// transport chunked the bytes: a frame may span many pushes and one push
/// may complete several frames.
#[derive(Debug, Default)]
pub struct FrameBuffer {
    text: String,
}

impl FrameBuffer {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Append decoded text and return every frame completed by it, in order.
    ///
    /// Frames are trimmed of surrounding whitespace and empty frames are
    /// dropped. Whatever follows the last separator stays buffered.
    pub fn push(&mut self, text: &str) -> Vec<String> {
        // Only the newly appended region (plus one byte for a separator that
        // straddles the old and new text) can contain a new separator.
        let search_from = self.text.len().saturating_sub(1);
        self.text.push_str(text);

        let has_separator = self.text.as_bytes()[search_from..]
            .windows(FRAME_SEPARATOR.len())
            .any(|window| window == FRAME_SEPARATOR.as_bytes());
        if !has_separator {
            return Vec::new();
        }

        let mut segments: Vec<&str> = self.text.split(FRAME_SEPARATOR).collect();
        let remainder = segments.pop().unwrap_or_default().to_string();
        let frames = segments
            .into_iter()
            .map(str::trim)
            .filter(|frame| !frame.is_empty())
            .map(str::to_string)
            .collect();

        self.text = remainder;
        frames
    }

    /// Text received after the last complete frame.
    pub fn pending(&self) -> &str {
        &self.text
    }

    /// Length in bytes of the unresolved text.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Whether there is no unresolved text.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Discard any unresolved text.
    pub fn clear(&mut self) {
        self.text.clear();
    }
}
