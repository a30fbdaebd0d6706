/// Strictness and size knobs for a parser instance.
///
/// The defaults are the strict readings: obsolete line folding and bare-LF
/// line endings are rejected, duplicate identical `Content-Length` fields
/// are tolerated. The lenient options exist because real traffic contains
/// all of these, but each one is a request-smuggling-adjacent relaxation
/// and must be an explicit opt-in.
///
/// ```
/// use h1_wire::Config;
///
/// let config = Config::new()
///     .max_header_len(16 * 1024)
///     .allow_bare_lf(true);
/// # let _ = config;
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Config {
    pub(crate) max_header_len: usize,
    pub(crate) max_chunk_size_digits: usize,
    pub(crate) allow_obs_fold: bool,
    pub(crate) allow_bare_lf: bool,
    pub(crate) reject_duplicate_content_length: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_header_len: 64 * 1024,
            max_chunk_size_digits: 16,
            allow_obs_fold: false,
            allow_bare_lf: false,
            reject_duplicate_content_length: false,
        }
    }
}

impl Config {
    /// Same as `Config::default()`.
    pub fn new() -> Self {
        Config::default()
    }

    /// Cap on the total size of the header section, start line and line
    /// terminators included. Exceeding it is [`Error::HeaderTooLarge`].
    ///
    /// Defaults to 64 KiB.
    ///
    /// [`Error::HeaderTooLarge`]: crate::Error::HeaderTooLarge
    pub fn max_header_len(mut self, v: usize) -> Self {
        self.max_header_len = v;
        self
    }

    /// Cap on the number of hex digits in a chunk size. Exceeding it is
    /// [`Error::ChunkSizeTooLarge`].
    ///
    /// Defaults to 16, the most a u64 can hold.
    ///
    /// [`Error::ChunkSizeTooLarge`]: crate::Error::ChunkSizeTooLarge
    pub fn max_chunk_size_digits(mut self, v: usize) -> Self {
        self.max_chunk_size_digits = v;
        self
    }

    /// Accept obsolete line folding, joining continuation lines into the
    /// preceding field value with a single space.
    ///
    /// Defaults to `false`, making a folded header [`Error::BadFieldValue`].
    ///
    /// [`Error::BadFieldValue`]: crate::Error::BadFieldValue
    pub fn allow_obs_fold(mut self, v: bool) -> Self {
        self.allow_obs_fold = v;
        self
    }

    /// Accept a lone LF as a line terminator.
    ///
    /// Defaults to `false`.
    pub fn allow_bare_lf(mut self, v: bool) -> Self {
        self.allow_bare_lf = v;
        self
    }

    /// Reject repeated `Content-Length` fields even when their values are
    /// identical.
    ///
    /// Defaults to `false`: identical duplicates collapse to one value, and
    /// only *conflicting* values are [`Error::BadContentLength`]. HTTP
    /// implementations disagree here, so the choice is a knob rather than a
    /// hard-coded reading.
    ///
    /// [`Error::BadContentLength`]: crate::Error::BadContentLength
    pub fn reject_duplicate_content_length(mut self, v: bool) -> Self {
        self.reject_duplicate_content_length = v;
        self
    }
}
