//! Bounded capture buffer for response bodies.
//!
//! The probe matches against whatever the server sends, and the server is
//! untrusted: the body may be arbitrarily large or deliberately endless.
//! Accumulation is therefore capped at a fixed capacity, and crossing the
//! cap is a permanent overflow signal rather than silent truncation — a
//! truncated body could produce ambiguous partial matches.

/// Maximum number of response bytes captured per probe (16 KiB).
///
/// Monitoring targets are status pages and small JSON/XML endpoints; the
/// value of interest sits well within the first few kilobytes. Anything
/// larger is treated as an overflow, not buffered.
pub const MAX_CAPTURE_BYTES: usize = 16 * 1024;

/// Outcome of a single [`CaptureBuffer::append`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    /// The whole chunk was stored.
    Accepted,
    /// The chunk was rejected and nothing was written. Sticky: every later
    /// append on this buffer also returns `Overflow`.
    Overflow,
}

/// Fixed-capacity byte store with a sticky overflow flag.
///
/// Appends are all-or-nothing per chunk: a chunk that does not fit in the
/// remaining capacity is rejected in full, leaving previously accepted
/// bytes untouched. One buffer is created per probe invocation and owned
/// by the fetch orchestrator; there is no reuse.
#[derive(Debug)]
pub struct CaptureBuffer {
    data: Vec<u8>,
    capacity: usize,
    overflowed: bool,
}

impl CaptureBuffer {
    /// Create a buffer with the default [`MAX_CAPTURE_BYTES`] capacity.
    pub fn new() -> Self {
        Self::with_capacity(MAX_CAPTURE_BYTES)
    }

    /// Create a buffer with a custom capacity. Used by boundary tests;
    /// production code goes through [`CaptureBuffer::new`].
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            capacity,
            overflowed: false,
        }
    }

    /// Append a chunk, all-or-nothing.
    ///
    /// Returns [`AppendOutcome::Overflow`] without writing if the chunk
    /// does not fit or if the buffer has overflowed before.
    pub fn append(&mut self, chunk: &[u8]) -> AppendOutcome {
        if self.overflowed {
            return AppendOutcome::Overflow;
        }
        if self.data.len() + chunk.len() > self.capacity {
            self.overflowed = true;
            return AppendOutcome::Overflow;
        }
        self.data.extend_from_slice(chunk);
        AppendOutcome::Accepted
    }

    /// The valid captured region `[0, len)`.
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// Number of bytes captured so far.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether nothing has been captured.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Whether an append has ever been rejected.
    pub fn overflowed(&self) -> bool {
        self.overflowed
    }

    /// The fixed capacity this buffer was created with.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for CaptureBuffer {
    fn default() -> Self {
        Self::new()
    }
}
