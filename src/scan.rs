//! Byte classification and line scanning over a borrowed window.
//!
//! Everything in here is stateless and copy-free. The engine decides what a
//! byte class violation means in its current state; these helpers only
//! classify and locate.

/// Token characters per the HTTP grammar (RFC 9110 `tchar`).
///
/// These are the only bytes allowed in methods and field names.
pub(crate) fn is_token_byte(b: u8) -> bool {
    matches!(
        b,
        b'!' | b'#'
            | b'$'
            | b'%'
            | b'&'
            | b'\''
            | b'*'
            | b'+'
            | b'-'
            | b'.'
            | b'^'
            | b'_'
            | b'`'
            | b'|'
            | b'~'
    ) || b.is_ascii_alphanumeric()
}

/// Bytes allowed in a request target: visible ASCII, no whitespace.
pub(crate) fn is_target_byte(b: u8) -> bool {
    (0x21..=0x7e).contains(&b)
}

/// Bytes allowed in a response reason phrase: SP, HTAB, vchar and obs-text.
pub(crate) fn is_reason_byte(b: u8) -> bool {
    b == b' ' || b == b'\t' || (b >= 0x21 && b != 0x7f)
}

/// Bytes allowed inside a field value: SP, HTAB, vchar and obs-text.
///
/// CR and LF are notably excluded, which is what catches a stray CR in the
/// middle of a line.
pub(crate) fn is_field_value_byte(b: u8) -> bool {
    b == b' ' || b == b'\t' || (b >= 0x21 && b != 0x7f)
}

pub(crate) fn hex_digit(b: u8) -> Option<u32> {
    match b {
        b'0'..=b'9' => Some((b - b'0') as u32),
        b'a'..=b'f' => Some((b - b'a' + 10) as u32),
        b'A'..=b'F' => Some((b - b'A' + 10) as u32),
        _ => None,
    }
}

/// Strip optional whitespace (SP / HTAB) from both ends.
pub(crate) fn trim_ows(mut b: &[u8]) -> &[u8] {
    while let [b' ' | b'\t', rest @ ..] = b {
        b = rest;
    }
    while let [rest @ .., b' ' | b'\t'] = b {
        b = rest;
    }
    b
}

/// One complete line located inside a window.
pub(crate) struct Line<'a> {
    /// Line contents, line terminator excluded.
    pub text: &'a [u8],
    /// Bytes the line occupies in the window, terminator included.
    pub used: usize,
}

/// A lone LF was found and bare-LF tolerance is off.
///
/// The caller maps this to the error kind of whatever grammar production it
/// was scanning.
pub(crate) struct BareLf;

/// Locate the next CRLF-terminated line.
///
/// Returns `Ok(None)` when no line terminator is present yet, which the
/// engine reports as needing more data without consuming anything.
pub(crate) fn split_line(buf: &[u8], allow_bare_lf: bool) -> Result<Option<Line>, BareLf> {
    let Some(lf) = buf.iter().position(|&b| b == b'\n') else {
        return Ok(None);
    };

    if lf > 0 && buf[lf - 1] == b'\r' {
        return Ok(Some(Line {
            text: &buf[..lf - 1],
            used: lf + 1,
        }));
    }

    if !allow_bare_lf {
        return Err(BareLf);
    }

    Ok(Some(Line {
        text: &buf[..lf],
        used: lf + 1,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_bytes() {
        assert!(is_token_byte(b'a'));
        assert!(is_token_byte(b'Z'));
        assert!(is_token_byte(b'0'));
        assert!(is_token_byte(b'-'));
        assert!(is_token_byte(b'!'));
        assert!(!is_token_byte(b' '));
        assert!(!is_token_byte(b':'));
        assert!(!is_token_byte(b'('));
        assert!(!is_token_byte(b'\r'));
        assert!(!is_token_byte(0x7f));
    }

    #[test]
    fn field_value_bytes() {
        assert!(is_field_value_byte(b' '));
        assert!(is_field_value_byte(b'\t'));
        assert!(is_field_value_byte(0x80));
        assert!(!is_field_value_byte(b'\r'));
        assert!(!is_field_value_byte(b'\n'));
        assert!(!is_field_value_byte(0x7f));
    }

    #[test]
    fn trim_ows_both_ends() {
        assert_eq!(trim_ows(b"  a b\t "), b"a b");
        assert_eq!(trim_ows(b""), b"");
        assert_eq!(trim_ows(b" \t "), b"");
    }

    #[test]
    fn split_crlf_line() {
        let line = split_line(b"abc\r\ndef", false).ok().flatten().unwrap();
        assert_eq!(line.text, b"abc");
        assert_eq!(line.used, 5);
    }

    #[test]
    fn split_incomplete() {
        assert!(matches!(split_line(b"abc", false), Ok(None)));
        // A trailing CR could still become CRLF with more input.
        assert!(matches!(split_line(b"abc\r", false), Ok(None)));
    }

    #[test]
    fn bare_lf_strict_and_lenient() {
        assert!(split_line(b"abc\ndef", false).is_err());

        let line = split_line(b"abc\ndef", true).ok().flatten().unwrap();
        assert_eq!(line.text, b"abc");
        assert_eq!(line.used, 4);
    }

    #[test]
    fn hex_digits() {
        assert_eq!(hex_digit(b'0'), Some(0));
        assert_eq!(hex_digit(b'f'), Some(15));
        assert_eq!(hex_digit(b'A'), Some(10));
        assert_eq!(hex_digit(b'g'), None);
    }
}
