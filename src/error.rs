use std::fmt;

/// Error type for h1-wire.
///
/// Every parse error is terminal for the parser instance that produced it:
/// once errored, further `consume` calls return the same error and consume
/// no input. Malformed framing is never skipped or repaired, since a
/// repaired parse could disagree with a downstream peer about where the
/// message ends.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(missing_docs)]
#[non_exhaustive]
pub enum Error {
    BadStartLine,
    BadFieldName,
    BadFieldValue,
    BadVersion,
    BadNumber,
    BadContentLength,
    HeaderTooLarge,
    ChunkSizeTooLarge,
    ChunkExpectedCrLf,
    UnexpectedBodyEnd,
    SinkRejected(String),
    BodyIsChunked,
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BadStartLine => write!(f, "malformed start line"),
            Error::BadFieldName => write!(f, "field name is not a token"),
            Error::BadFieldValue => write!(f, "malformed field value"),
            Error::BadVersion => write!(f, "unrecognized http version"),
            Error::BadNumber => write!(f, "content-length or chunk size is not a number"),
            Error::BadContentLength => write!(f, "conflicting content-length headers"),
            Error::HeaderTooLarge => write!(f, "header section exceeds configured size"),
            Error::ChunkSizeTooLarge => write!(f, "chunk size has too many digits"),
            Error::ChunkExpectedCrLf => write!(f, "chunk expected crlf as next character"),
            Error::UnexpectedBodyEnd => write!(f, "stream ended before the body was complete"),
            Error::SinkRejected(v) => write!(f, "body sink rejected input: {}", v),
            Error::BodyIsChunked => write!(f, "body is chunked"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_carries_sink_reason() {
        let err = Error::SinkRejected("over limit".into());
        assert_eq!(err.to_string(), "body sink rejected input: over limit");
    }
}
