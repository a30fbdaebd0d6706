//! The HTTP/1 wire format state machine.
//!
//! [`Engine`] tokenizes start lines, field lines and body framing from byte
//! windows the caller supplies, and reports each recognized production to a
//! [`Hooks`] implementation. It owns no storage for the message: the header
//! and message layers react to the hooks and decide what to keep.
//!
//! The states are:
//!
//! ```text
//! ┌──────────────────┐   ┌──────────────────┐   ┌──────────────────┐
//! │    StartLine     │──▶│      Fields      │──▶│       Body       │
//! └──────────────────┘   └──────────────────┘   └──────────────────┘
//!                                                        │
//!                                 (chunked only)         ▼
//!                        ┌──────────────────┐   ┌──────────────────┐
//!                        │     Complete     │◀──│     Trailers     │
//!                        └──────────────────┘   └──────────────────┘
//! ```
//!
//! with an absorbing errored state reachable from everywhere. A single
//! engine instance parses exactly one message; parse a second message by
//! constructing a new instance.

use http::{Method, StatusCode, Version};

use crate::scan;
use crate::{Config, Error};

/// Hook points the engine invokes as it recognizes grammar productions.
///
/// All hooks run synchronously inside `consume`, before it returns. A hook
/// returning `Err` aborts the current call and latches the engine in the
/// errored state with that error.
///
/// Every method has a no-op default so an implementation only overrides the
/// transitions it cares about.
pub trait Hooks {
    /// Request start line was recognized.
    fn on_request_line(
        &mut self,
        method: Method,
        target: &str,
        version: Version,
    ) -> Result<(), Error> {
        let _ = (method, target, version);
        Ok(())
    }

    /// Response start line was recognized.
    fn on_status_line(
        &mut self,
        status: StatusCode,
        reason: &[u8],
        version: Version,
    ) -> Result<(), Error> {
        let _ = (status, reason, version);
        Ok(())
    }

    /// A header field (or, after the terminal chunk, a trailer field).
    ///
    /// The value has optional whitespace already stripped.
    fn on_field(&mut self, name: &[u8], value: &[u8]) -> Result<(), Error> {
        let _ = (name, value);
        Ok(())
    }

    /// The bare CRLF ending the header section.
    fn on_header_end(&mut self) -> Result<(), Error> {
        Ok(())
    }

    /// Entering the body phase. The hint is the fixed body length, or
    /// `None` for chunked and close-delimited framing.
    fn on_body_begin(&mut self, length_hint: Option<u64>) -> Result<(), Error> {
        let _ = length_hint;
        Ok(())
    }

    /// A chunk-size line was recognized. Fires once per chunk, including
    /// the terminal zero-size chunk; the extension may be empty.
    fn on_chunk_extension(&mut self, size: u64, extension: &[u8]) -> Result<(), Error> {
        let _ = (size, extension);
        Ok(())
    }

    /// A window of body payload. For chunked framing this is dechunked
    /// payload; framing bytes never appear here.
    fn on_body_chunk(&mut self, data: &[u8]) -> Result<(), Error> {
        let _ = data;
        Ok(())
    }

    /// The body reached its natural end. For chunked framing, trailer
    /// fields may still follow.
    fn on_body_end(&mut self) -> Result<(), Error> {
        Ok(())
    }

    /// The entire message, trailers included, has been consumed.
    fn on_message_end(&mut self) -> Result<(), Error> {
        Ok(())
    }
}

/// What a `consume` call achieved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The window ended inside a grammar token. Nothing past the consumed
    /// count was touched; retain the tail and call again with more input.
    NeedMoreData,
    /// Input was consumed but the message is not complete. Produced by the
    /// message-level parsers, not by [`Engine`] itself.
    Progress,
    /// The header section just ended. Body bytes are still unconsumed;
    /// call again to continue into the body.
    HeaderComplete,
    /// The body payload ended but trailer fields may remain (chunked
    /// framing). Call again to consume them.
    BodyComplete,
    /// Terminal. No further input will be consumed.
    MessageComplete,
}

/// How the end of the message body is determined.
///
/// Decided once, when the header section completes, and never re-evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Framing {
    /// A fixed number of body bytes. Zero for bodyless messages.
    Length(u64),
    /// Chunked transfer-coding.
    Chunked,
    /// The body runs until the peer closes the connection. Responses only.
    CloseDelimited,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Request,
    Response,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    StartLine,
    Fields,
    BodyBegin,
    Body,
    Trailers,
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyProgress {
    Length { remain: u64 },
    Chunked(ChunkPhase),
    CloseDelimited,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChunkPhase {
    Size,
    Data { remain: u64 },
    DataEnd,
}

/// A field held back because obsolete folding may continue its value.
///
/// The only place the engine copies bytes, and only with `allow_obs_fold`.
#[derive(Debug)]
struct FoldedField {
    name: Vec<u8>,
    value: Vec<u8>,
}

/// The wire format state machine. See the [module docs][self].
#[derive(Debug)]
pub struct Engine {
    kind: Kind,
    config: Config,
    phase: Phase,
    failed: Option<Error>,
    header_len: usize,

    // Framing inputs sniffed off the field lines as they stream through,
    // so the decision never depends on the hook target.
    content_length: Option<u64>,
    content_length_err: Option<Error>,
    chunked: bool,

    framing: Option<Framing>,
    body: Option<BodyProgress>,
    fold: Option<FoldedField>,
}

impl Engine {
    /// An engine expecting a request.
    pub fn request(config: Config) -> Self {
        Engine::new(Kind::Request, config)
    }

    /// An engine expecting a response.
    pub fn response(config: Config) -> Self {
        Engine::new(Kind::Response, config)
    }

    fn new(kind: Kind, config: Config) -> Self {
        Engine {
            kind,
            config,
            phase: Phase::StartLine,
            failed: None,
            header_len: 0,
            content_length: None,
            content_length_err: None,
            chunked: false,
            framing: None,
            body: None,
            fold: None,
        }
    }

    /// Consume as much of `input` as the present grammar tokens allow.
    ///
    /// `end_of_stream` tells the engine no bytes will ever follow this
    /// window. Returns how many bytes were consumed and an [`Outcome`]; the
    /// consumed count can be short of the window when a token spans its
    /// end, in which case the caller retains the tail and re-invokes with
    /// more bytes appended. No byte is consumed before it is fully
    /// classified, so retained tails never need re-parsing.
    pub fn consume<H: Hooks>(
        &mut self,
        hooks: &mut H,
        input: &[u8],
        end_of_stream: bool,
    ) -> Result<(usize, Outcome), Error> {
        if let Some(e) = &self.failed {
            return Err(e.clone());
        }
        match self.drive(hooks, input, end_of_stream) {
            Ok(v) => Ok(v),
            Err(e) => {
                self.failed = Some(e.clone());
                Err(e)
            }
        }
    }

    fn drive<H: Hooks>(
        &mut self,
        h: &mut H,
        input: &[u8],
        eos: bool,
    ) -> Result<(usize, Outcome), Error> {
        let mut used = 0;

        loop {
            let rest = &input[used..];

            match self.phase {
                Phase::StartLine => {
                    let Some(line) = self.take_header_line(rest, Error::BadStartLine)? else {
                        return Ok((used, Outcome::NeedMoreData));
                    };
                    match self.kind {
                        Kind::Request => {
                            let (method, target, version) = parse_request_line(line.text)?;
                            trace!("request line: {} {} {:?}", method, target, version);
                            h.on_request_line(method, target, version)?;
                        }
                        Kind::Response => {
                            let (status, reason, version) = parse_status_line(line.text)?;
                            trace!("status line: {:?} {}", version, status);
                            h.on_status_line(status, reason, version)?;
                        }
                    }
                    self.header_len += line.used;
                    used += line.used;
                    self.phase = Phase::Fields;
                }

                Phase::Fields | Phase::Trailers => {
                    let trailers = self.phase == Phase::Trailers;

                    let Some(line) = self.take_header_line(rest, Error::BadFieldValue)? else {
                        if eos && trailers {
                            return Err(Error::UnexpectedBodyEnd);
                        }
                        return Ok((used, Outcome::NeedMoreData));
                    };

                    // A line starting with SP/HTAB is obsolete folding: it
                    // continues the previous field's value.
                    if let [b' ' | b'\t', ..] = line.text {
                        if !self.config.allow_obs_fold {
                            return Err(Error::BadFieldValue);
                        }
                        let Some(fold) = &mut self.fold else {
                            // Continuation with no field to continue.
                            return Err(Error::BadFieldValue);
                        };
                        let cont = scan::trim_ows(line.text);
                        if !cont.iter().all(|&b| scan::is_field_value_byte(b)) {
                            return Err(Error::BadFieldValue);
                        }
                        if !cont.is_empty() {
                            fold.value.push(b' ');
                            fold.value.extend_from_slice(cont);
                        }
                        self.header_len += line.used;
                        used += line.used;
                        continue;
                    }

                    // The current line does not fold, so a held-back field
                    // is finished and can be reported.
                    if let Some(fold) = self.fold.take() {
                        h.on_field(&fold.name, &fold.value)?;
                        if !trailers {
                            self.sniff_field(&fold.name, &fold.value);
                        }
                    }

                    if line.text.is_empty() {
                        self.header_len += line.used;
                        used += line.used;

                        if trailers {
                            h.on_message_end()?;
                            self.phase = Phase::Complete;
                            debug!("message complete");
                            return Ok((used, Outcome::MessageComplete));
                        }

                        let framing = self.decide_framing()?;
                        self.framing = Some(framing);
                        self.body = Some(match framing {
                            Framing::Length(n) => BodyProgress::Length { remain: n },
                            Framing::Chunked => BodyProgress::Chunked(ChunkPhase::Size),
                            Framing::CloseDelimited => BodyProgress::CloseDelimited,
                        });
                        h.on_header_end()?;
                        self.phase = Phase::BodyBegin;
                        debug!("header complete, framing: {:?}", framing);
                        return Ok((used, Outcome::HeaderComplete));
                    }

                    let (name, value) = parse_field_line(line.text)?;

                    if self.config.allow_obs_fold {
                        // One byte of lookahead decides whether this value
                        // continues on the next line. Until that byte is
                        // visible the field cannot be committed.
                        if line.used == rest.len() && !eos {
                            return Ok((used, Outcome::NeedMoreData));
                        }
                        if matches!(rest.get(line.used), Some(b' ') | Some(b'\t')) {
                            self.fold = Some(FoldedField {
                                name: name.to_vec(),
                                value: value.to_vec(),
                            });
                            self.header_len += line.used;
                            used += line.used;
                            continue;
                        }
                    }

                    h.on_field(name, value)?;
                    if !trailers {
                        self.sniff_field(name, value);
                    }
                    self.header_len += line.used;
                    used += line.used;
                }

                Phase::BodyBegin => {
                    h.on_body_begin(self.length_hint())?;
                    self.phase = Phase::Body;
                }

                Phase::Body => match self.body {
                    Some(BodyProgress::Length { remain: 0 }) => {
                        h.on_body_end()?;
                        h.on_message_end()?;
                        self.phase = Phase::Complete;
                        debug!("message complete");
                        return Ok((used, Outcome::MessageComplete));
                    }
                    Some(BodyProgress::Length { remain }) => {
                        if rest.is_empty() {
                            if eos {
                                return Err(Error::UnexpectedBodyEnd);
                            }
                            return Ok((used, Outcome::NeedMoreData));
                        }
                        let n = clamp(remain, rest.len());
                        h.on_body_chunk(&rest[..n])?;
                        self.body = Some(BodyProgress::Length {
                            remain: remain - n as u64,
                        });
                        used += n;
                    }
                    Some(BodyProgress::CloseDelimited) => {
                        if !rest.is_empty() {
                            h.on_body_chunk(rest)?;
                            used += rest.len();
                        } else if eos {
                            h.on_body_end()?;
                            h.on_message_end()?;
                            self.phase = Phase::Complete;
                            debug!("message complete");
                            return Ok((used, Outcome::MessageComplete));
                        } else {
                            return Ok((used, Outcome::NeedMoreData));
                        }
                    }
                    Some(BodyProgress::Chunked(ChunkPhase::Size)) => {
                        // The digit cap can trip before the terminator is
                        // even in sight.
                        let digits = rest
                            .iter()
                            .take_while(|b| scan::hex_digit(**b).is_some())
                            .count();
                        if digits > self.config.max_chunk_size_digits {
                            return Err(Error::ChunkSizeTooLarge);
                        }

                        let line = match scan::split_line(rest, self.config.allow_bare_lf) {
                            Ok(v) => v,
                            Err(scan::BareLf) => return Err(Error::BadNumber),
                        };
                        let Some(line) = line else {
                            if eos {
                                return Err(Error::UnexpectedBodyEnd);
                            }
                            return Ok((used, Outcome::NeedMoreData));
                        };

                        let (size, ext) =
                            parse_chunk_size(line.text, self.config.max_chunk_size_digits)?;
                        h.on_chunk_extension(size, ext)?;
                        used += line.used;

                        if size == 0 {
                            h.on_body_end()?;
                            self.phase = Phase::Trailers;
                            // The trailer section gets its own size budget.
                            self.header_len = 0;
                            return Ok((used, Outcome::BodyComplete));
                        }
                        self.body =
                            Some(BodyProgress::Chunked(ChunkPhase::Data { remain: size }));
                    }
                    Some(BodyProgress::Chunked(ChunkPhase::Data { remain: 0 })) => {
                        self.body = Some(BodyProgress::Chunked(ChunkPhase::DataEnd));
                    }
                    Some(BodyProgress::Chunked(ChunkPhase::Data { remain })) => {
                        if rest.is_empty() {
                            if eos {
                                return Err(Error::UnexpectedBodyEnd);
                            }
                            return Ok((used, Outcome::NeedMoreData));
                        }
                        let n = clamp(remain, rest.len());
                        h.on_body_chunk(&rest[..n])?;
                        self.body = Some(BodyProgress::Chunked(ChunkPhase::Data {
                            remain: remain - n as u64,
                        }));
                        used += n;
                    }
                    Some(BodyProgress::Chunked(ChunkPhase::DataEnd)) => {
                        if rest.is_empty() {
                            if eos {
                                return Err(Error::UnexpectedBodyEnd);
                            }
                            return Ok((used, Outcome::NeedMoreData));
                        }
                        if rest[0] == b'\r' {
                            if rest.len() < 2 {
                                if eos {
                                    return Err(Error::UnexpectedBodyEnd);
                                }
                                return Ok((used, Outcome::NeedMoreData));
                            }
                            if rest[1] != b'\n' {
                                return Err(Error::ChunkExpectedCrLf);
                            }
                            used += 2;
                        } else if rest[0] == b'\n' && self.config.allow_bare_lf {
                            used += 1;
                        } else {
                            return Err(Error::ChunkExpectedCrLf);
                        }
                        self.body = Some(BodyProgress::Chunked(ChunkPhase::Size));
                    }
                    None => unreachable!("body phase without framing"),
                },

                Phase::Complete => return Ok((used, Outcome::MessageComplete)),
            }
        }
    }

    /// Locate the next header/trailer line, enforcing the section size cap.
    ///
    /// `bare_err` is the error a lone LF maps to in the current state.
    fn take_header_line<'a>(
        &self,
        buf: &'a [u8],
        bare_err: Error,
    ) -> Result<Option<scan::Line<'a>>, Error> {
        let line = match scan::split_line(buf, self.config.allow_bare_lf) {
            Ok(v) => v,
            Err(scan::BareLf) => return Err(bare_err),
        };
        let pending = match &line {
            Some(l) => l.used,
            None => buf.len(),
        };
        if self.header_len + pending > self.config.max_header_len {
            return Err(Error::HeaderTooLarge);
        }
        Ok(line)
    }

    /// Track the fields that feed the framing decision. Any problem found
    /// here is deferred: chunked framing takes precedence over a bad
    /// `Content-Length`, and precedence is only known at header end.
    fn sniff_field(&mut self, name: &[u8], value: &[u8]) {
        if name.eq_ignore_ascii_case(b"transfer-encoding") {
            // The last coding token across all TE fields decides.
            let mut last = None;
            for tok in value.split(|&b| b == b',') {
                let tok = scan::trim_ows(tok);
                if !tok.is_empty() {
                    last = Some(tok);
                }
            }
            if let Some(tok) = last {
                self.chunked = tok.eq_ignore_ascii_case(b"chunked");
            }
        } else if name.eq_ignore_ascii_case(b"content-length") {
            match parse_content_length(value) {
                Err(e) => self.note_content_length_err(e),
                Ok(v) => match self.content_length {
                    None => self.content_length = Some(v),
                    Some(prev) if prev != v => {
                        self.note_content_length_err(Error::BadContentLength)
                    }
                    Some(_) => {
                        if self.config.reject_duplicate_content_length {
                            self.note_content_length_err(Error::BadContentLength);
                        }
                    }
                },
            }
        }
    }

    fn note_content_length_err(&mut self, e: Error) {
        if self.content_length_err.is_none() {
            self.content_length_err = Some(e);
        }
    }

    fn decide_framing(&mut self) -> Result<Framing, Error> {
        if self.chunked {
            // Chunked wins; a declared content-length is ignored.
            return Ok(Framing::Chunked);
        }
        if let Some(e) = self.content_length_err.take() {
            return Err(e);
        }
        if let Some(n) = self.content_length {
            return Ok(Framing::Length(n));
        }
        Ok(match self.kind {
            // A request with no declared length has no body.
            Kind::Request => Framing::Length(0),
            Kind::Response => Framing::CloseDelimited,
        })
    }

    /// True once the header/body boundary has been crossed.
    pub fn is_header_complete(&self) -> bool {
        !matches!(self.phase, Phase::StartLine | Phase::Fields)
    }

    /// True once the message has been fully consumed.
    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Complete
    }

    /// The latched error, if the engine is in the errored state.
    pub fn failed(&self) -> Option<&Error> {
        self.failed.as_ref()
    }

    /// The framing decision, available from header completion on.
    pub fn framing(&self) -> Option<Framing> {
        self.framing
    }

    /// The fixed body length, or `None` when the length is not known up
    /// front (chunked, close-delimited) or the header is not complete.
    pub fn length_hint(&self) -> Option<u64> {
        match self.framing {
            Some(Framing::Length(n)) => Some(n),
            _ => None,
        }
    }

    /// Bytes still expected for a fixed-length body. `None` when the
    /// remaining length is unbounded or not yet known.
    pub fn body_remaining(&self) -> Option<u64> {
        match self.body {
            Some(BodyProgress::Length { remain }) => Some(remain),
            _ => None,
        }
    }

    /// Enter the body phase without firing `on_body_begin`, for callers
    /// that route body bytes around the hooks (the direct sink path).
    pub fn begin_body_external(&mut self) {
        assert!(self.is_header_complete(), "body begun before header end");
        if self.phase == Phase::BodyBegin {
            self.phase = Phase::Body;
        }
    }

    /// Account for `n` body bytes delivered around the hooks. Returns true
    /// when that completed a fixed-length body, making the engine terminal.
    pub fn advance_body_external(&mut self, n: u64) -> bool {
        assert!(self.phase == Phase::Body, "body bytes outside body phase");
        match self.body {
            Some(BodyProgress::Length { remain }) => {
                assert!(n <= remain, "commit past the remaining body length");
                let remain = remain - n;
                self.body = Some(BodyProgress::Length { remain });
                if remain == 0 {
                    self.phase = Phase::Complete;
                    debug!("message complete");
                    true
                } else {
                    false
                }
            }
            Some(BodyProgress::CloseDelimited) => false,
            _ => panic!("direct body writes on a chunked body"),
        }
    }
}

fn clamp(remain: u64, avail: usize) -> usize {
    if remain < avail as u64 {
        remain as usize
    } else {
        avail
    }
}

fn parse_request_line(line: &[u8]) -> Result<(Method, &str, Version), Error> {
    let sp1 = line
        .iter()
        .position(|&b| b == b' ')
        .ok_or(Error::BadStartLine)?;
    let (method, rest) = line.split_at(sp1);
    let rest = &rest[1..];

    if method.is_empty() || !method.iter().all(|&b| scan::is_token_byte(b)) {
        return Err(Error::BadStartLine);
    }

    let sp2 = rest
        .iter()
        .position(|&b| b == b' ')
        .ok_or(Error::BadStartLine)?;
    let (target, version) = rest.split_at(sp2);
    let version = &version[1..];

    if target.is_empty() || !target.iter().all(|&b| scan::is_target_byte(b)) {
        return Err(Error::BadStartLine);
    }

    let method = Method::from_bytes(method).map_err(|_| Error::BadStartLine)?;
    // Target bytes are visible ASCII, so this cannot fail, but the parser
    // never panics on input.
    let target = std::str::from_utf8(target).map_err(|_| Error::BadStartLine)?;
    let version = parse_version(version)?;

    Ok((method, target, version))
}

fn parse_status_line(line: &[u8]) -> Result<(StatusCode, &[u8], Version), Error> {
    // "HTTP/x.y" SP 3DIGIT is the shortest acceptable line.
    if line.len() < 12 {
        return Err(Error::BadStartLine);
    }
    let version = parse_version(&line[..8])?;
    if line[8] != b' ' {
        return Err(Error::BadStartLine);
    }

    let digits = &line[9..12];
    if !digits.iter().all(|b| b.is_ascii_digit()) {
        return Err(Error::BadStartLine);
    }
    let code = (digits[0] - b'0') as u16 * 100
        + (digits[1] - b'0') as u16 * 10
        + (digits[2] - b'0') as u16;
    let status = StatusCode::from_u16(code).map_err(|_| Error::BadStartLine)?;

    // The reason phrase is optional, as is the space introducing it.
    let reason: &[u8] = match line.get(12) {
        None => &[],
        Some(b' ') => &line[13..],
        Some(_) => return Err(Error::BadStartLine),
    };
    if !reason.iter().all(|&b| scan::is_reason_byte(b)) {
        return Err(Error::BadStartLine);
    }

    Ok((status, reason, version))
}

fn parse_version(v: &[u8]) -> Result<Version, Error> {
    let &[b'H', b'T', b'T', b'P', b'/', major, b'.', minor] = v else {
        return Err(Error::BadVersion);
    };
    match (major, minor) {
        (b'1', b'1') => Ok(Version::HTTP_11),
        (b'1', b'0') => Ok(Version::HTTP_10),
        _ => Err(Error::BadVersion),
    }
}

fn parse_field_line(line: &[u8]) -> Result<(&[u8], &[u8]), Error> {
    let colon = line
        .iter()
        .position(|&b| b == b':')
        .ok_or(Error::BadFieldName)?;
    let (name, value) = line.split_at(colon);
    let value = scan::trim_ows(&value[1..]);

    // Token characters only: a name with embedded whitespace is exactly the
    // kind of ambiguity downstream parsers disagree over.
    if name.is_empty() || !name.iter().all(|&b| scan::is_token_byte(b)) {
        return Err(Error::BadFieldName);
    }
    if !value.iter().all(|&b| scan::is_field_value_byte(b)) {
        return Err(Error::BadFieldValue);
    }

    Ok((name, value))
}

fn parse_content_length(value: &[u8]) -> Result<u64, Error> {
    if value.is_empty() {
        return Err(Error::BadNumber);
    }
    let mut n: u64 = 0;
    for &b in value {
        if !b.is_ascii_digit() {
            return Err(Error::BadNumber);
        }
        n = n
            .checked_mul(10)
            .and_then(|n| n.checked_add((b - b'0') as u64))
            .ok_or(Error::BadNumber)?;
    }
    Ok(n)
}

/// Parse `chunk-size [ ";" chunk-ext ]`, the line terminator removed.
fn parse_chunk_size(line: &[u8], max_digits: usize) -> Result<(u64, &[u8]), Error> {
    let mut size: u64 = 0;
    let mut digits = 0;

    while digits < line.len() {
        let Some(v) = scan::hex_digit(line[digits]) else {
            break;
        };
        digits += 1;
        if digits > max_digits {
            return Err(Error::ChunkSizeTooLarge);
        }
        size = size
            .checked_mul(16)
            .and_then(|n| n.checked_add(v as u64))
            .ok_or(Error::BadNumber)?;
    }
    if digits == 0 {
        return Err(Error::BadNumber);
    }

    let rest = scan::trim_ows(&line[digits..]);
    if rest.is_empty() {
        return Ok((size, &[]));
    }
    let [b';', ext @ ..] = rest else {
        return Err(Error::BadNumber);
    };
    let ext = scan::trim_ows(ext);
    if !ext.iter().all(|&b| scan::is_field_value_byte(b)) {
        return Err(Error::BadFieldValue);
    }

    Ok((size, ext))
}
