//! The message parser: engine + head + a caller-supplied body sink.

use http::HeaderMap;

use crate::engine::{Engine, Hooks, Outcome};
use crate::head::{FieldMap, Head, HeadHooks, HeaderParser};
use crate::{Config, Error, Framing};

/// Receives body bytes incrementally and assembles them into whatever the
/// application considers a body.
///
/// The parser never owns body storage; it only decides how many bytes to
/// hand over at a time. Calls arrive strictly in the order `init`, then
/// any number of `prepare`/`commit` pairs, then `finish` exactly once.
/// Any `Err` a sink returns ends the parse for good.
///
/// The sink must not re-enter the parser that is calling it.
pub trait BodySink {
    /// The body phase is starting. The hint is the exact body length when
    /// known up front (content-length framing), `None` otherwise.
    fn init(&mut self, length_hint: Option<u64>) -> Result<(), Error>;

    /// Hand out a writable window of at least `n` bytes. The caller
    /// writes the first `n` and then commits them.
    fn prepare(&mut self, n: usize) -> Result<&mut [u8], Error>;

    /// The first `n` bytes of the last prepared window are now body
    /// content.
    fn commit(&mut self, n: usize) -> Result<(), Error>;

    /// The body reached its natural end; no further bytes will arrive.
    fn finish(&mut self) -> Result<(), Error>;

    /// The largest window this sink wants per `prepare`/`commit` pair.
    /// The parser clamps its handovers to this.
    fn preferred_chunk_len(&self) -> usize {
        usize::MAX
    }
}

/// A [`BodySink`] accumulating the body into a `Vec<u8>`, optionally
/// enforcing an application body-size cap.
#[derive(Debug, Default)]
pub struct VecSink {
    buf: Vec<u8>,
    committed: usize,
    limit: Option<usize>,
    finished: bool,
}

impl VecSink {
    /// A sink with no size cap.
    pub fn new() -> Self {
        VecSink::default()
    }

    /// A sink rejecting bodies larger than `limit` bytes with
    /// [`Error::SinkRejected`].
    pub fn with_limit(limit: usize) -> Self {
        VecSink {
            limit: Some(limit),
            ..VecSink::default()
        }
    }

    /// The body bytes committed so far.
    pub fn body(&self) -> &[u8] {
        &self.buf[..self.committed]
    }

    /// True once `finish` has been called.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// The accumulated body.
    pub fn into_vec(mut self) -> Vec<u8> {
        self.buf.truncate(self.committed);
        self.buf
    }

    fn over_limit(&self, total: usize) -> bool {
        matches!(self.limit, Some(limit) if total > limit)
    }
}

impl BodySink for VecSink {
    fn init(&mut self, length_hint: Option<u64>) -> Result<(), Error> {
        if let Some(hint) = length_hint {
            // Compare in u64: a hint above usize::MAX must not wrap past
            // the limit check on 32-bit targets.
            if matches!(self.limit, Some(limit) if hint > limit as u64) {
                return Err(Error::SinkRejected("body exceeds configured limit".into()));
            }
            // The hint is peer-controlled; preallocate only a bounded
            // amount of it.
            self.buf.reserve(hint.min(64 * 1024) as usize);
        }
        Ok(())
    }

    fn prepare(&mut self, n: usize) -> Result<&mut [u8], Error> {
        if self.over_limit(self.committed + n) {
            return Err(Error::SinkRejected("body exceeds configured limit".into()));
        }
        self.buf.resize(self.committed + n, 0);
        Ok(&mut self.buf[self.committed..])
    }

    fn commit(&mut self, n: usize) -> Result<(), Error> {
        assert!(self.committed + n <= self.buf.len(), "commit exceeds prepared window");
        self.committed += n;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), Error> {
        self.buf.truncate(self.committed);
        self.finished = true;
        Ok(())
    }
}

/// A complete (or as-complete-as-parsed) message: head plus the sink that
/// accumulated its body.
#[derive(Debug)]
pub struct Message<S, F = HeaderMap> {
    /// Start line and fields, trailers included.
    pub head: Head<F>,
    /// The body sink, holding whatever body bytes were committed.
    pub body: S,
}

/// Hook target bridging the engine to a [`Head`] and a [`BodySink`].
struct MessageHooks<'a, F, S> {
    head: &'a mut Head<F>,
    sink: &'a mut S,
    sink_started: &'a mut bool,
}

impl<F: FieldMap, S: BodySink> Hooks for MessageHooks<'_, F, S> {
    fn on_request_line(
        &mut self,
        method: http::Method,
        target: &str,
        version: http::Version,
    ) -> Result<(), Error> {
        HeadHooks { head: self.head }.on_request_line(method, target, version)
    }

    fn on_status_line(
        &mut self,
        status: http::StatusCode,
        reason: &[u8],
        version: http::Version,
    ) -> Result<(), Error> {
        HeadHooks { head: self.head }.on_status_line(status, reason, version)
    }

    fn on_field(&mut self, name: &[u8], value: &[u8]) -> Result<(), Error> {
        HeadHooks { head: self.head }.on_field(name, value)
    }

    fn on_body_begin(&mut self, length_hint: Option<u64>) -> Result<(), Error> {
        if !*self.sink_started {
            self.sink.init(length_hint)?;
            *self.sink_started = true;
        }
        Ok(())
    }

    fn on_body_chunk(&mut self, data: &[u8]) -> Result<(), Error> {
        let mut rest = data;
        while !rest.is_empty() {
            let n = rest.len().min(self.sink.preferred_chunk_len()).max(1);
            let window = self.sink.prepare(n)?;
            window[..n].copy_from_slice(&rest[..n]);
            self.sink.commit(n)?;
            rest = &rest[n..];
        }
        Ok(())
    }

    fn on_body_end(&mut self) -> Result<(), Error> {
        self.sink.finish()
    }
}

/// Parses one complete message, feeding body payload into a [`BodySink`].
///
/// A single `consume` call drives through as many phases as the window
/// allows: start line, fields, framing decision, body, trailers. The sink
/// sees dechunked payload only; framing bytes never reach it.
///
/// One instance parses exactly one message. Terminal states (complete or
/// errored) accept no further input.
#[derive(Debug)]
pub struct MessageParser<S, F = HeaderMap> {
    engine: Engine,
    head: Head<F>,
    sink: S,
    sink_started: bool,
    failed: Option<Error>,
}

impl<S: BodySink> MessageParser<S> {
    /// A parser expecting a request, with the sink its body goes to.
    pub fn request(config: Config, sink: S) -> Self {
        MessageParser::wrap(Engine::request(config), Head::new(0), sink)
    }

    /// A parser expecting a response, with the sink its body goes to.
    pub fn response(config: Config, sink: S) -> Self {
        MessageParser::wrap(Engine::response(config), Head::new(0), sink)
    }
}

impl<S: BodySink, F: FieldMap> MessageParser<S, F> {
    /// Continue a parse a [`HeaderParser`] started, typically after the
    /// caller inspected the head to pick a sink.
    pub fn from_header_parser(parser: HeaderParser<F>, sink: S) -> Self {
        let (engine, head) = parser.into_parts();
        MessageParser::wrap(engine, head, sink)
    }

    fn wrap(engine: Engine, head: Head<F>, sink: S) -> Self {
        MessageParser {
            engine,
            head,
            sink,
            sink_started: false,
            failed: None,
        }
    }

    /// Feed a window of input. See [`Engine::consume`] for the window
    /// contract.
    ///
    /// Returns [`Outcome::MessageComplete`] when the message ended inside
    /// this window, [`Outcome::Progress`] when input was consumed but more
    /// is needed, and [`Outcome::NeedMoreData`] when nothing could be
    /// consumed at all.
    pub fn consume(&mut self, input: &[u8], end_of_stream: bool) -> Result<(usize, Outcome), Error> {
        if let Some(e) = self.latched() {
            return Err(e);
        }

        let mut used = 0;
        loop {
            let mut hooks = MessageHooks {
                head: &mut self.head,
                sink: &mut self.sink,
                sink_started: &mut self.sink_started,
            };
            let (n, outcome) = self.engine.consume(&mut hooks, &input[used..], end_of_stream)?;
            used += n;

            match outcome {
                Outcome::HeaderComplete | Outcome::BodyComplete | Outcome::Progress => continue,
                Outcome::MessageComplete => return Ok((used, Outcome::MessageComplete)),
                Outcome::NeedMoreData => {
                    let outcome = if used > 0 {
                        Outcome::Progress
                    } else {
                        Outcome::NeedMoreData
                    };
                    return Ok((used, outcome));
                }
            }
        }
    }

    /// True once the header section has been fully parsed.
    pub fn is_header_complete(&self) -> bool {
        self.engine.is_header_complete()
    }

    /// True once the whole message has been consumed.
    pub fn is_complete(&self) -> bool {
        self.engine.is_complete()
    }

    /// The body framing derived from the header, once complete.
    pub fn framing(&self) -> Option<Framing> {
        self.engine.framing()
    }

    /// The head parsed so far. Partial until
    /// [`is_header_complete`][Self::is_header_complete].
    pub fn head(&self) -> &Head<F> {
        &self.head
    }

    /// The sink, with however much body it has received.
    pub fn body(&self) -> &S {
        &self.sink
    }

    /// Transfer ownership of the accumulated message to the caller. Body
    /// content is only as complete as the parse.
    pub fn release(self) -> Message<S, F> {
        Message {
            head: self.head,
            body: self.sink,
        }
    }

    /// Fast path: a writable window of sink storage, at most `limit`
    /// bytes, for the caller to receive socket bytes directly into. This
    /// skips the copy through `consume` for bodies the wire carries raw;
    /// chunked framing needs dechunking and is rejected with
    /// [`Error::BodyIsChunked`].
    ///
    /// Only meaningful once the header is complete.
    pub fn prepare(&mut self, limit: usize) -> Result<&mut [u8], Error> {
        assert!(limit > 0, "prepare with an empty limit");
        assert!(
            self.engine.is_header_complete(),
            "prepare before header completion"
        );

        if let Some(e) = self.latched() {
            return Err(e);
        }
        if self.engine.framing() == Some(Framing::Chunked) {
            return Err(Error::BodyIsChunked);
        }
        self.maybe_begin_body()?;

        let n = match self.engine.body_remaining() {
            Some(remain) => remain.min(limit as u64) as usize,
            // Close delimited: the sink caps us, not the framing.
            None => limit,
        };
        match self.sink.prepare(n) {
            Ok(window) => Ok(window),
            Err(e) => {
                self.failed = Some(e.clone());
                Err(e)
            }
        }
    }

    /// Account for `n` bytes the caller wrote into the last
    /// [`prepare`][Self::prepare] window. Completing a fixed-length body
    /// this way finishes the sink and the message.
    pub fn commit(&mut self, n: usize) -> Result<(), Error> {
        if let Some(e) = self.latched() {
            return Err(e);
        }

        let result: Result<(), Error> = (|| {
            self.sink.commit(n)?;
            if self.engine.advance_body_external(n as u64) {
                self.sink.finish()?;
            }
            Ok(())
        })();

        if let Err(e) = &result {
            self.failed = Some(e.clone());
        }
        result
    }

    /// The terminal error, whether it was latched by the engine during
    /// `consume` or by the fast path on a sink failure. Errored is an
    /// absorbing state for every entry point.
    fn latched(&self) -> Option<Error> {
        self.failed
            .clone()
            .or_else(|| self.engine.failed().cloned())
    }

    fn maybe_begin_body(&mut self) -> Result<(), Error> {
        if !self.sink_started {
            if let Err(e) = self.sink.init(self.engine.length_hint()) {
                self.failed = Some(e.clone());
                return Err(e);
            }
            self.sink_started = true;
        }
        self.engine.begin_body_external();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{Method, StatusCode, Version};

    fn request(input: &[u8]) -> MessageParser<VecSink> {
        let mut parser = MessageParser::request(Config::default(), VecSink::new());
        let (used, outcome) = parser.consume(input, false).unwrap();
        assert_eq!(used, input.len());
        assert_eq!(outcome, Outcome::MessageComplete);
        parser
    }

    #[test]
    fn end_to_end_get() {
        let parser = request(b"GET /x HTTP/1.1\r\nHost: a\r\nContent-Length: 0\r\n\r\n");

        assert!(parser.is_complete());
        let msg = parser.release();
        assert_eq!(msg.head.method(), Some(&Method::GET));
        assert_eq!(msg.head.target(), Some("/x"));
        assert_eq!(msg.head.version(), Some(Version::HTTP_11));
        assert_eq!(msg.head.fields().get("host").unwrap(), "a");
        assert_eq!(msg.head.fields().get("content-length").unwrap(), "0");
        assert!(msg.body.is_finished());
        assert!(msg.body.body().is_empty());
    }

    #[test]
    fn zero_length_body_still_finishes_the_sink() {
        // No content-length at all: a request body defaults to empty.
        let parser = request(b"GET / HTTP/1.1\r\nHost: a\r\n\r\n");
        assert_eq!(parser.framing(), Some(Framing::Length(0)));
        assert!(parser.body().is_finished());
    }

    #[test]
    fn content_length_exact() {
        let mut parser = MessageParser::request(Config::default(), VecSink::new());

        let (_, outcome) = parser
            .consume(b"PUT /u HTTP/1.1\r\nContent-Length: 9\r\n\r\nhi ", false)
            .unwrap();
        assert_eq!(outcome, Outcome::Progress);
        assert!(!parser.body().is_finished());

        let (used, outcome) = parser.consume(b"there!done", false).unwrap();
        // Exactly the six remaining body bytes, nothing past them.
        assert_eq!(used, 6);
        assert_eq!(outcome, Outcome::MessageComplete);

        let body = parser.body();
        assert_eq!(body.body(), b"hi there!");
        assert!(body.is_finished());
    }

    #[test]
    fn short_body_at_end_of_stream() {
        let mut parser = MessageParser::request(Config::default(), VecSink::new());

        let err = parser
            .consume(b"PUT /u HTTP/1.1\r\nContent-Length: 9\r\n\r\nhi", true)
            .unwrap_err();
        assert_eq!(err, Error::UnexpectedBodyEnd);
    }

    #[test]
    fn chunked_round_trip() {
        let mut parser = MessageParser::response(Config::default(), VecSink::new());

        let (used, outcome) = parser
            .consume(
                b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n\
                  4\r\nWiki\r\n5\r\npedia\r\n0\r\n\r\n",
                false,
            )
            .unwrap();
        assert_eq!(outcome, Outcome::MessageComplete);
        assert_eq!(used, 71);

        // Dechunked payload only; zero framing bytes reach the sink.
        assert_eq!(parser.body().body(), b"Wikipedia");
        assert!(parser.body().is_finished());
    }

    #[test]
    fn chunked_trailers_land_in_the_head() {
        let mut parser = MessageParser::response(Config::default(), VecSink::new());

        let (_, outcome) = parser
            .consume(
                b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n\
                  3\r\nabc\r\n0\r\nExpires: never\r\n\r\n",
                false,
            )
            .unwrap();
        assert_eq!(outcome, Outcome::MessageComplete);

        assert_eq!(parser.body().body(), b"abc");
        assert_eq!(parser.head().fields().get("expires").unwrap(), "never");
    }

    #[test]
    fn conflicting_content_length() {
        let mut parser = MessageParser::request(Config::default(), VecSink::new());

        let err = parser
            .consume(
                b"PUT / HTTP/1.1\r\nContent-Length: 5\r\nContent-Length: 6\r\n\r\n",
                false,
            )
            .unwrap_err();
        assert_eq!(err, Error::BadContentLength);
    }

    #[test]
    fn duplicate_identical_content_length_lenient() {
        let mut parser = MessageParser::request(Config::default(), VecSink::new());

        let (_, outcome) = parser
            .consume(
                b"PUT / HTTP/1.1\r\nContent-Length: 2\r\nContent-Length: 2\r\n\r\nok",
                false,
            )
            .unwrap();
        assert_eq!(outcome, Outcome::MessageComplete);
        assert_eq!(parser.body().body(), b"ok");
    }

    #[test]
    fn duplicate_identical_content_length_strict() {
        let config = Config::new().reject_duplicate_content_length(true);
        let mut parser = MessageParser::request(config, VecSink::new());

        let err = parser
            .consume(
                b"PUT / HTTP/1.1\r\nContent-Length: 2\r\nContent-Length: 2\r\n\r\nok",
                false,
            )
            .unwrap_err();
        assert_eq!(err, Error::BadContentLength);
    }

    #[test]
    fn errored_stays_errored() {
        let mut parser = MessageParser::request(Config::default(), VecSink::new());

        let err = parser.consume(b"nonsense\r\n", false).unwrap_err();
        assert_eq!(err, Error::BadStartLine);

        // Same error, nothing consumed, forever.
        for _ in 0..3 {
            let err = parser
                .consume(b"GET / HTTP/1.1\r\n\r\n", false)
                .unwrap_err();
            assert_eq!(err, Error::BadStartLine);
        }
    }

    #[test]
    fn fast_path_refuses_after_error() {
        let mut parser = MessageParser::response(Config::default(), VecSink::new());

        let err = parser
            .consume(b"HTTP/1.1 200 OK\r\nContent-Length: 9\r\n\r\nhi", true)
            .unwrap_err();
        assert_eq!(err, Error::UnexpectedBodyEnd);

        // Errored is absorbing for the direct path too: no sink storage is
        // handed out and nothing can drive the body to completion.
        let err = parser.prepare(7).unwrap_err();
        assert_eq!(err, Error::UnexpectedBodyEnd);
        let err = parser.commit(7).unwrap_err();
        assert_eq!(err, Error::UnexpectedBodyEnd);

        assert!(!parser.is_complete());
        assert_eq!(parser.body().body(), b"hi");
    }

    #[test]
    fn sink_limit_rejects_huge_length_hint() {
        // A hint far above usize range on 32-bit targets still trips the
        // limit check up front.
        let mut sink = VecSink::with_limit(4);
        let err = sink.init(Some(1 << 33)).unwrap_err();
        assert!(matches!(err, Error::SinkRejected(_)));
    }

    #[test]
    fn close_delimited_until_end_of_stream() {
        let mut parser = MessageParser::response(Config::default(), VecSink::new());

        let (_, outcome) = parser
            .consume(b"HTTP/1.0 200 OK\r\n\r\nsome ", false)
            .unwrap();
        assert_eq!(outcome, Outcome::Progress);

        let (_, outcome) = parser.consume(b"bytes", false).unwrap();
        assert_eq!(outcome, Outcome::Progress);
        assert!(!parser.body().is_finished());

        let (used, outcome) = parser.consume(&[], true).unwrap();
        assert_eq!((used, outcome), (0, Outcome::MessageComplete));
        assert_eq!(parser.body().body(), b"some bytes");
        assert!(parser.body().is_finished());
    }

    #[test]
    fn fragmentation_invariance() {
        const INPUT: &[u8] = b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\nX-One: 1\r\n\r\n\
              4\r\nWiki\r\n5\r\npedia\r\n0\r\nX-Two: 2\r\n\r\n";

        // Reference: one shot.
        let mut whole = MessageParser::response(Config::default(), VecSink::new());
        let (used, outcome) = whole.consume(INPUT, false).unwrap();
        assert_eq!((used, outcome), (INPUT.len(), Outcome::MessageComplete));

        for split in 0..=INPUT.len() {
            let mut parser = MessageParser::response(Config::default(), VecSink::new());

            let (a, _) = parser.consume(&INPUT[..split], false).unwrap();
            // The unconsumed tail is retained and re-presented with the
            // rest appended, exactly as a socket loop would.
            let mut tail = INPUT[a..split].to_vec();
            tail.extend_from_slice(&INPUT[split..]);
            let (b, outcome) = parser.consume(&tail, false).unwrap();

            assert_eq!(a + b, INPUT.len(), "split at {}", split);
            assert_eq!(outcome, Outcome::MessageComplete, "split at {}", split);
            assert_eq!(parser.body().body(), b"Wikipedia", "split at {}", split);
            assert_eq!(parser.head().fields().get("x-one").unwrap(), "1");
            assert_eq!(parser.head().fields().get("x-two").unwrap(), "2");
            assert_eq!(parser.head().status(), whole.head().status());
        }
    }

    #[test]
    fn direct_prepare_commit() {
        let mut parser = MessageParser::response(Config::default(), VecSink::new());

        let header = b"HTTP/1.1 200 OK\r\nContent-Length: 9\r\n\r\n";
        let (used, outcome) = parser.consume(header, false).unwrap();
        assert_eq!(used, header.len());
        assert_eq!(outcome, Outcome::Progress);

        // Receive "socket" bytes straight into sink storage.
        let window = parser.prepare(4).unwrap();
        window[..4].copy_from_slice(b"Wiki");
        parser.commit(4).unwrap();
        assert!(!parser.is_complete());

        let window = parser.prepare(64).unwrap();
        // Clamped to the remaining body length.
        assert_eq!(window.len(), 5);
        window.copy_from_slice(b"pedia");
        parser.commit(5).unwrap();

        assert!(parser.is_complete());
        let msg = parser.release();
        assert_eq!(msg.body.body(), b"Wikipedia");
        assert!(msg.body.is_finished());
    }

    #[test]
    fn direct_path_rejects_chunked() {
        let mut parser = MessageParser::response(Config::default(), VecSink::new());

        parser
            .consume(b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n", false)
            .unwrap();

        let err = parser.prepare(64).unwrap_err();
        assert_eq!(err, Error::BodyIsChunked);
    }

    #[test]
    fn sink_limit_rejects_long_body() {
        let mut parser = MessageParser::response(Config::default(), VecSink::with_limit(4));

        let err = parser
            .consume(b"HTTP/1.1 200 OK\r\nContent-Length: 10\r\n\r\n0123456789", false)
            .unwrap_err();
        assert_eq!(
            err,
            Error::SinkRejected("body exceeds configured limit".into())
        );

        // The rejection is terminal like any other error.
        let err = parser.consume(b"89", false).unwrap_err();
        assert!(matches!(err, Error::SinkRejected(_)));
    }

    #[test]
    fn header_parser_upgrade() {
        let mut header: HeaderParser = HeaderParser::response(Config::default());

        let input = b"HTTP/1.1 200 OK\r\nContent-Length: 5\r\n\r\nhello";
        let (used, outcome) = header.consume(input, false).unwrap();
        assert_eq!(outcome, Outcome::HeaderComplete);
        assert_eq!(header.get().status(), Some(StatusCode::OK));

        // Pick a sink based on the head, then continue where it stopped.
        let mut parser = MessageParser::from_header_parser(header, VecSink::new());
        let (n, outcome) = parser.consume(&input[used..], false).unwrap();
        assert_eq!(n, 5);
        assert_eq!(outcome, Outcome::MessageComplete);
        assert_eq!(parser.body().body(), b"hello");
    }

    #[test]
    fn preferred_chunk_len_paces_handover() {
        /// Sink that records each commit size.
        #[derive(Default)]
        struct Paced {
            inner: VecSink,
            commits: Vec<usize>,
        }

        impl BodySink for Paced {
            fn init(&mut self, hint: Option<u64>) -> Result<(), Error> {
                self.inner.init(hint)
            }
            fn prepare(&mut self, n: usize) -> Result<&mut [u8], Error> {
                self.inner.prepare(n)
            }
            fn commit(&mut self, n: usize) -> Result<(), Error> {
                self.commits.push(n);
                self.inner.commit(n)
            }
            fn finish(&mut self) -> Result<(), Error> {
                self.inner.finish()
            }
            fn preferred_chunk_len(&self) -> usize {
                3
            }
        }

        let mut parser = MessageParser::request(Config::default(), Paced::default());
        parser
            .consume(b"PUT / HTTP/1.1\r\nContent-Length: 8\r\n\r\nabcdefgh", false)
            .unwrap();

        assert_eq!(parser.body().commits, vec![3, 3, 2]);
        assert_eq!(parser.body().inner.body(), b"abcdefgh");
    }
}
