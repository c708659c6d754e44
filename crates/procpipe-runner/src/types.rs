//! Types shared across the runner modules

/// Default initial capacity of the stdout buffer (32 KiB).
pub const DEFAULT_INITIAL_BUFFER_BYTES: usize = 32 * 1024;

/// Default headroom below which the stdout buffer doubles.
pub const DEFAULT_GROWTH_THRESHOLD_BYTES: usize = 256;

/// Invocation phase a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Building the argument vector or flattened command line
    Quoting,
    /// Pipe creation, handle configuration and spawn
    Launch,
    /// Delivering the stdin payload
    Write,
    /// Draining the child's stdout
    Read,
    /// Reaping the child and retrieving its exit status
    Wait,
    /// Decoding stdout bytes as text
    Decode,
}

impl Phase {
    /// Stable lowercase name for diagnostics.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Quoting => "quoting",
            Self::Launch => "launch",
            Self::Write => "write",
            Self::Read => "read",
            Self::Wait => "wait",
            Self::Decode => "decode",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stdout buffering configuration.
///
/// The buffer starts at `initial_bytes` and doubles whenever fewer than
/// `growth_threshold_bytes` of headroom remain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferConfig {
    /// Initial buffer capacity in bytes
    pub initial_bytes: usize,
    /// Remaining headroom that triggers doubling
    pub growth_threshold_bytes: usize,
}

impl BufferConfig {
    /// Create a buffer configuration, clamping degenerate values.
    ///
    /// A zero initial size becomes one byte. The threshold is kept between
    /// one byte and the initial size, so a full buffer always grows before
    /// the next read and growth never outruns the data actually read.
    #[must_use]
    pub fn new(initial_bytes: usize, growth_threshold_bytes: usize) -> Self {
        let initial_bytes = initial_bytes.max(1);
        Self {
            initial_bytes,
            growth_threshold_bytes: growth_threshold_bytes.clamp(1, initial_bytes),
        }
    }
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            initial_bytes: DEFAULT_INITIAL_BUFFER_BYTES,
            growth_threshold_bytes: DEFAULT_GROWTH_THRESHOLD_BYTES,
        }
    }
}
