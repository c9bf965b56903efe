//! Properties codec: flat `key=value` text files.
//!
//! Files are read leniently (comments, blank lines and lines without `=` are
//! dropped) and always written back sorted by key, one entry per line, with a
//! trailing newline after the last entry.
//!
//! The module also owns the value escape rules used for locales that must be
//! stored as ASCII (`\uXXXX` escapes, as Java `.properties` files expect).

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::Path;

/// Parsed contents of one properties file, ordered by key.
pub type Properties = BTreeMap<String, String>;

/// Parse properties text into a key/value mapping.
///
/// Never fails: malformed lines are skipped. A key that appears more than
/// once keeps its last value.
pub fn parse(text: &str) -> Properties {
    let mut properties = Properties::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            continue;
        };

        properties.insert(key.trim().to_string(), value.trim().to_string());
    }

    properties
}

/// Serialize a mapping as sorted `key=value` lines.
///
/// Every line, including the last, ends with `\n`. An empty mapping
/// serializes to an empty string.
pub fn serialize(properties: &Properties) -> String {
    let mut out = String::new();
    for (key, value) in properties {
        // Writing into a String cannot fail
        let _ = writeln!(out, "{}={}", key, value);
    }
    out
}

/// Write `content` to `path` atomically.
///
/// The content goes to a sibling temporary file which is then renamed over
/// the target, so readers see either the old or the new file, never a torn
/// one.
pub fn write_atomic(path: &Path, content: &str) -> io::Result<()> {
    replace_via_temp(
        path,
        content,
        |temp, content| fs::write(temp, content),
        |temp, target| fs::rename(temp, target),
    )
}

/// Temp-file-then-rename with the two I/O steps supplied by the caller.
///
/// On any failure the temporary file is removed and the target is left as
/// it was.
fn replace_via_temp<W, R>(path: &Path, content: &str, write: W, rename: R) -> io::Result<()>
where
    W: FnOnce(&Path, &str) -> io::Result<()>,
    R: FnOnce(&Path, &Path) -> io::Result<()>,
{
    let mut temp_name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    let result = write(&temp_path, content).and_then(|()| rename(&temp_path, path));
    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

// ==================== Value Escaping ====================

/// Escape a value into pure ASCII.
///
/// Non-ASCII characters become `\uXXXX` (surrogate pairs outside the BMP),
/// backslashes are doubled, and control characters are escaped so the value
/// always stays on one line.
pub fn escape_unicode(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_ascii_control() => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c if c.is_ascii() => out.push(c),
            c => {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    let _ = write!(out, "\\u{:04x}", unit);
                }
            }
        }
    }
    out
}

/// Escape backslashes and line breaks, leaving everything else untouched.
///
/// Used for locales stored as plain UTF-8. Backslashes are doubled first so
/// literal text such as `C:\new` reads back unchanged.
pub fn escape_line_breaks(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('\r', "\\r")
        .replace('\n', "\\n")
}

/// Reverse [`escape_unicode`] (and [`escape_line_breaks`]) for display.
///
/// Unknown or malformed escape sequences are kept as written. Unpaired
/// surrogates decode to U+FFFD.
pub fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }

        match chars.peek().copied() {
            Some('\\') => {
                chars.next();
                out.push('\\');
            }
            Some('n') => {
                chars.next();
                out.push('\n');
            }
            Some('r') => {
                chars.next();
                out.push('\r');
            }
            Some('t') => {
                chars.next();
                out.push('\t');
            }
            Some('u') => {
                let lookahead: String = chars.clone().skip(1).take(4).collect();
                match parse_hex4(&lookahead) {
                    Some(unit) => {
                        // Consume 'u' and the four hex digits
                        for _ in 0..5 {
                            chars.next();
                        }
                        out.push_str(&decode_unit(unit, &mut chars));
                    }
                    None => out.push('\\'),
                }
            }
            _ => out.push('\\'),
        }
    }

    out
}

fn parse_hex4(digits: &str) -> Option<u16> {
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    u16::from_str_radix(digits, 16).ok()
}

/// Decode one UTF-16 unit, pulling a trailing `\uXXXX` low surrogate from
/// the input when `unit` is a high surrogate.
fn decode_unit(unit: u16, chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    if (0xD800..0xDC00).contains(&unit) {
        let lookahead: String = chars.clone().take(6).collect();
        if let Some(low) = lookahead
            .strip_prefix("\\u")
            .and_then(parse_hex4)
            .filter(|low| (0xDC00..0xE000).contains(low))
        {
            for _ in 0..6 {
                chars.next();
            }
            return String::from_utf16_lossy(&[unit, low]);
        }
    }
    String::from_utf16_lossy(&[unit])
}
