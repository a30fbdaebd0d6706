//! Header accumulation: turning engine hooks into a structured [`Head`].

use http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Version};

use crate::engine::{Engine, Hooks, Outcome};
use crate::{Config, Error, Framing};

/// The ordered multimap a [`Head`] accumulates its fields into.
///
/// The engine and parsers never assume a storage layout; anything that can
/// append `(name, value)` pairs in wire order works. [`http::HeaderMap`]
/// is the default implementation.
pub trait FieldMap {
    /// Construct with room for roughly `capacity` fields.
    fn with_capacity(capacity: usize) -> Self;

    /// Append a field, preserving insertion order. Names compare
    /// case-insensitively on lookup.
    fn append(&mut self, name: &[u8], value: &[u8]) -> Result<(), Error>;
}

impl FieldMap for HeaderMap {
    fn with_capacity(capacity: usize) -> Self {
        HeaderMap::with_capacity(capacity)
    }

    fn append(&mut self, name: &[u8], value: &[u8]) -> Result<(), Error> {
        // The engine has already validated the byte classes, so these only
        // fail if a FieldMap is fed outside a parser.
        let name = HeaderName::from_bytes(name).map_err(|_| Error::BadFieldName)?;
        let value = HeaderValue::from_bytes(value).map_err(|_| Error::BadFieldValue)?;
        HeaderMap::append(self, name, value);
        Ok(())
    }
}

/// The parsed start line of a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartLine {
    /// `method SP target SP version`.
    Request {
        #[allow(missing_docs)]
        method: Method,
        #[allow(missing_docs)]
        target: String,
        #[allow(missing_docs)]
        version: Version,
    },
    /// `version SP status SP reason`.
    Response {
        #[allow(missing_docs)]
        status: StatusCode,
        #[allow(missing_docs)]
        reason: String,
        #[allow(missing_docs)]
        version: Version,
    },
}

/// Start line plus fields. Immutable once the header section completes;
/// trailer fields of a chunked body are appended after the body.
#[derive(Debug)]
pub struct Head<F = HeaderMap> {
    line: Option<StartLine>,
    fields: F,
}

impl<F: FieldMap> Head<F> {
    pub(crate) fn new(field_capacity: usize) -> Self {
        Head {
            line: None,
            fields: F::with_capacity(field_capacity),
        }
    }

    /// The start line, present once it has been parsed.
    pub fn start_line(&self) -> Option<&StartLine> {
        self.line.as_ref()
    }

    /// The accumulated fields.
    pub fn fields(&self) -> &F {
        &self.fields
    }

    /// Request method, if this is a request head.
    pub fn method(&self) -> Option<&Method> {
        match &self.line {
            Some(StartLine::Request { method, .. }) => Some(method),
            _ => None,
        }
    }

    /// Request target, if this is a request head.
    pub fn target(&self) -> Option<&str> {
        match &self.line {
            Some(StartLine::Request { target, .. }) => Some(target),
            _ => None,
        }
    }

    /// Response status, if this is a response head.
    pub fn status(&self) -> Option<StatusCode> {
        match &self.line {
            Some(StartLine::Response { status, .. }) => Some(*status),
            _ => None,
        }
    }

    /// HTTP version from the start line.
    pub fn version(&self) -> Option<Version> {
        match &self.line {
            Some(StartLine::Request { version, .. }) => Some(*version),
            Some(StartLine::Response { version, .. }) => Some(*version),
            None => None,
        }
    }
}

/// Hook target filling in a [`Head`]. Body hooks keep their no-op
/// defaults.
pub(crate) struct HeadHooks<'a, F> {
    pub head: &'a mut Head<F>,
}

impl<F: FieldMap> Hooks for HeadHooks<'_, F> {
    fn on_request_line(
        &mut self,
        method: Method,
        target: &str,
        version: Version,
    ) -> Result<(), Error> {
        self.head.line = Some(StartLine::Request {
            method,
            target: target.to_string(),
            version,
        });
        Ok(())
    }

    fn on_status_line(
        &mut self,
        status: StatusCode,
        reason: &[u8],
        version: Version,
    ) -> Result<(), Error> {
        // Reason bytes may contain obs-text; keep what is valid utf8 and
        // replace the rest rather than fail the parse over a vanity field.
        self.head.line = Some(StartLine::Response {
            status,
            reason: String::from_utf8_lossy(reason).into_owned(),
            version,
        });
        Ok(())
    }

    fn on_field(&mut self, name: &[u8], value: &[u8]) -> Result<(), Error> {
        self.head.fields.append(name, value)
    }
}

/// Parses a start line and header section, stopping at the header/body
/// boundary with the body unconsumed.
///
/// Useful when the caller wants to route the body somewhere the header
/// decides, or hand the parse over to a [`MessageParser`].
///
/// ```
/// use h1_wire::{Config, HeaderParser, Outcome};
///
/// let mut parser = HeaderParser::request(Config::default());
///
/// let input = b"GET /here HTTP/1.1\r\nHost: x.test\r\n\r\nbody bytes";
/// let (used, outcome) = parser.consume(input, false).unwrap();
///
/// assert_eq!(outcome, Outcome::HeaderComplete);
/// assert_eq!(&input[used..], b"body bytes");
/// assert_eq!(parser.get().target(), Some("/here"));
/// ```
///
/// [`MessageParser`]: crate::MessageParser
#[derive(Debug)]
pub struct HeaderParser<F = HeaderMap> {
    engine: Engine,
    head: Head<F>,
}

impl HeaderParser {
    /// A parser expecting a request head.
    pub fn request(config: Config) -> Self {
        HeaderParser::request_with(config)
    }

    /// A parser expecting a response head.
    pub fn response(config: Config) -> Self {
        HeaderParser::response_with(config)
    }
}

impl<F: FieldMap> HeaderParser<F> {
    /// Like [`HeaderParser::request`], with a custom field container.
    pub fn request_with(config: Config) -> Self {
        HeaderParser {
            engine: Engine::request(config),
            head: Head::new(0),
        }
    }

    /// Like [`HeaderParser::response`], with a custom field container.
    pub fn response_with(config: Config) -> Self {
        HeaderParser {
            engine: Engine::response(config),
            head: Head::new(0),
        }
    }

    /// Preallocate the field container for roughly `n` fields.
    pub fn with_field_capacity(mut self, n: usize) -> Self {
        self.head = Head::new(n);
        self
    }

    /// Feed a window of input. See [`Engine::consume`] for the window
    /// contract. Stops at [`Outcome::HeaderComplete`]; calls after that
    /// consume nothing and report `HeaderComplete` again.
    pub fn consume(&mut self, input: &[u8], end_of_stream: bool) -> Result<(usize, Outcome), Error> {
        if self.engine.is_header_complete() {
            return Ok((0, Outcome::HeaderComplete));
        }

        let mut hooks = HeadHooks {
            head: &mut self.head,
        };
        let (used, outcome) = self.engine.consume(&mut hooks, input, end_of_stream)?;

        let outcome = match outcome {
            Outcome::NeedMoreData if used > 0 => Outcome::Progress,
            other => other,
        };
        Ok((used, outcome))
    }

    /// True once the header section has been fully parsed.
    pub fn is_complete(&self) -> bool {
        self.engine.is_header_complete()
    }

    /// The body framing derived from the header, once complete.
    pub fn framing(&self) -> Option<Framing> {
        self.engine.framing()
    }

    /// The head parsed so far. Partial until [`is_complete`][Self::is_complete].
    pub fn get(&self) -> &Head<F> {
        &self.head
    }

    /// Transfer ownership of the parsed head to the caller.
    pub fn release(self) -> Head<F> {
        self.head
    }

    pub(crate) fn into_parts(self) -> (Engine, Head<F>) {
        (self.engine, self.head)
    }
}
