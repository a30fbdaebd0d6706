//! h1-wire is an incremental parser for the HTTP/1.1 wire format, written
//! in sans-IO style. It performs no I/O and allocates nothing for message
//! payload; the caller owns the buffers on both sides.
//!
//! # The window contract
//!
//! Input arrives as a window `&[u8]` of whatever bytes the caller
//! currently holds. Each `consume` call reports how many bytes it used;
//! the caller keeps the unconsumed tail and re-presents it later with
//! more bytes appended. The parser itself buffers nothing between calls
//! (header folding being the one documented exception), so any
//! fragmentation of the stream produces the same parse.
//!
//! An `end_of_stream` flag on `consume` tells the parser the peer closed
//! the connection, which is itself syntax: it terminates close-delimited
//! bodies and turns truncation anywhere else into an error.
//!
//! # Parse surfaces
//!
//! Three layers, lowest first:
//!
//! * [`Engine`] with a [`Hooks`] impl: every syntactic production is
//!   reported as a borrowed-slice callback, nothing is stored.
//! * [`HeaderParser`]: collects the start line and fields into a
//!   [`Head`] and stops at the end of the header, leaving the body to
//!   the caller.
//! * [`MessageParser`]: parses the entire message, streaming dechunked
//!   body payload into a [`BodySink`] such as [`VecSink`].
//!
//! # Example
//!
//! ```
//! use h1_wire::{Config, MessageParser, Outcome, VecSink};
//!
//! let mut parser = MessageParser::response(Config::default(), VecSink::new());
//!
//! let input = b"HTTP/1.1 200 OK\r\n\
//!     Transfer-Encoding: chunked\r\n\
//!     \r\n\
//!     4\r\nWiki\r\n5\r\npedia\r\n0\r\n\r\n";
//!
//! let (used, outcome) = parser.consume(input, false)?;
//! assert_eq!(used, input.len());
//! assert_eq!(outcome, Outcome::MessageComplete);
//!
//! let message = parser.release();
//! assert_eq!(message.head.status(), Some(h1_wire::http::StatusCode::OK));
//! assert_eq!(message.body.body(), b"Wikipedia");
//! # Ok::<(), h1_wire::Error>(())
//! ```
//!
//! # Strictness
//!
//! Parsing is strict by default: CRLF line endings, no header folding,
//! one `Content-Length` value. [`Config`] has opt-in knobs for the
//! lenient behaviors RFC 9112 permits a recipient to apply, and caps for
//! header size and chunk-size digits.
//!
//! This crate deliberately stops at wire syntax. Connection handling,
//! message semantics (`Connection`, `Expect`, upgrades), URI parsing and
//! serialization belong to the layer above.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

#[macro_use]
extern crate log;

mod config;
mod engine;
mod error;
mod head;
mod message;
mod scan;

pub use config::Config;
pub use engine::{Engine, Framing, Hooks, Outcome};
pub use error::Error;
pub use head::{FieldMap, Head, HeaderParser, StartLine};
pub use message::{BodySink, Message, MessageParser, VecSink};

// Re-export the http crate since it appears in the public API.
pub use http;
