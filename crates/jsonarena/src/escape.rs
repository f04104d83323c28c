//! Escaping, unescaping and number-grammar helpers.
//!
//! Strings and keys are stored in their escaped (on-the-wire) form. These
//! helpers convert between that form and plain text.

use std::borrow::Cow;

/// Append the JSON-escaped form of `s` (without quotes) to `out`.
///
/// Quote, backslash and all control characters below U+0020 are escaped.
/// The solidus and non-ASCII characters pass through unchanged.
pub fn escape_into(s: &str, out: &mut String) {
    let bytes = s.as_bytes();
    let mut run_start = 0;
    for (i, &b) in bytes.iter().enumerate() {
        let replacement = match b {
            b'"' => "\\\"",
            b'\\' => "\\\\",
            b'\n' => "\\n",
            b'\r' => "\\r",
            b'\t' => "\\t",
            0x08 => "\\b",
            0x0C => "\\f",
            0x00..=0x1F => "",
            _ => continue,
        };
        out.push_str(&s[run_start..i]);
        if replacement.is_empty() {
            out.push_str(&format!("\\u{:04x}", b));
        } else {
            out.push_str(replacement);
        }
        run_start = i + 1;
    }
    out.push_str(&s[run_start..]);
}

/// Return the JSON-escaped form of `s`, borrowing when nothing needs escaping.
pub fn escape(s: &str) -> Cow<'_, str> {
    if s.bytes().any(|b| b == b'"' || b == b'\\' || b < 0x20) {
        let mut out = String::with_capacity(s.len() + 8);
        escape_into(s, &mut out);
        Cow::Owned(out)
    } else {
        Cow::Borrowed(s)
    }
}

/// Decode backslash sequences in an escaped string.
///
/// Total over any input: text stored through the unchecked setters may hold
/// malformed sequences, which are passed through literally. Unpaired
/// surrogates decode to U+FFFD.
pub fn unescape(s: &str) -> Cow<'_, str> {
    if !s.contains('\\') {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(pos) = rest.find('\\') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        let consumed = match rest.as_bytes().get(1) {
            Some(b'"') => push(&mut out, '"'),
            Some(b'\\') => push(&mut out, '\\'),
            Some(b'/') => push(&mut out, '/'),
            Some(b'b') => push(&mut out, '\u{08}'),
            Some(b'f') => push(&mut out, '\u{0C}'),
            Some(b'n') => push(&mut out, '\n'),
            Some(b'r') => push(&mut out, '\r'),
            Some(b't') => push(&mut out, '\t'),
            Some(b'u') => unescape_unicode(rest, &mut out),
            _ => None,
        };
        match consumed {
            Some(n) => rest = &rest[n..],
            None => {
                out.push('\\');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

fn push(out: &mut String, c: char) -> Option<usize> {
    out.push(c);
    Some(2)
}

/// Decode `\uXXXX` (and a following low surrogate) at the start of `s`.
/// Returns the number of bytes consumed, or `None` if the sequence is not
/// four hex digits.
fn unescape_unicode(s: &str, out: &mut String) -> Option<usize> {
    let high = hex4(s.as_bytes().get(2..6)?)?;
    if (0xD800..=0xDBFF).contains(&high) {
        let low = s
            .as_bytes()
            .get(6..12)
            .filter(|b| b[0] == b'\\' && b[1] == b'u')
            .and_then(|b| hex4(&b[2..]))
            .filter(|low| (0xDC00..=0xDFFF).contains(low));
        if let Some(low) = low {
            let combined = 0x10000 + ((u32::from(high) - 0xD800) << 10) + (u32::from(low) - 0xDC00);
            out.push(char::from_u32(combined).unwrap_or(char::REPLACEMENT_CHARACTER));
            return Some(12);
        }
    }
    out.push(char::from_u32(u32::from(high)).unwrap_or(char::REPLACEMENT_CHARACTER));
    Some(6)
}

pub(crate) fn hex4(bytes: &[u8]) -> Option<u16> {
    if bytes.len() != 4 {
        return None;
    }
    bytes.iter().try_fold(0u16, |acc, &b| {
        let digit = match b {
            b'0'..=b'9' => b - b'0',
            b'a'..=b'f' => b - b'a' + 10,
            b'A'..=b'F' => b - b'A' + 10,
            _ => return None,
        };
        Some((acc << 4) | u16::from(digit))
    })
}

/// Length of the longest prefix of `bytes` that matches the JSON number
/// grammar `-?(0|[1-9][0-9]*)(\.[0-9]+)?([eE][+-]?[0-9]+)?`.
///
/// Returns `None` when no valid number starts at `bytes[0]`, or when a
/// fraction or exponent marker is present but not followed by digits.
pub(crate) fn scan_number(bytes: &[u8]) -> Option<usize> {
    let digits = |from: usize| {
        bytes[from..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count()
    };
    let mut i = usize::from(bytes.first() == Some(&b'-'));
    match bytes.get(i) {
        Some(b'0') => i += 1,
        Some(b'1'..=b'9') => i += digits(i),
        _ => return None,
    }
    if bytes.get(i) == Some(&b'.') {
        let n = digits(i + 1);
        if n == 0 {
            return None;
        }
        i += 1 + n;
    }
    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        i += 1;
        if matches!(bytes.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        let n = digits(i);
        if n == 0 {
            return None;
        }
        i += n;
    }
    Some(i)
}

/// Whether `s` is exactly one JSON number.
pub fn is_valid_number(s: &str) -> bool {
    scan_number(s.as_bytes()) == Some(s.len())
}
