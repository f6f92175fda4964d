//! Minimal PEM (RFC 7468) framing.
//!
//! Only what the certificate codecs need: find the first well-formed block,
//! hand back whatever follows it, and write a block back out in the
//! canonical 64-column layout.

use std::collections::BTreeMap;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

const BEGIN: &str = "-----BEGIN ";
const END: &str = "-----END ";
const DASHES: &str = "-----";
const LINE_WIDTH: usize = 64;

/// A decoded PEM block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// The label between `BEGIN` and the dashes, e.g. `CERTIFICATE`.
    pub label: String,
    /// RFC 1421 style headers (`Proc-Type: ...`), rarely present.
    pub headers: BTreeMap<String, String>,
    /// The decoded payload.
    pub contents: Vec<u8>,
}

/// Splits off one line, trimming trailing spaces, tabs and carriage returns.
fn get_line(data: &str) -> (&str, &str) {
    let (line, rest) = match data.find('\n') {
        Some(i) => (&data[..i], &data[i + 1..]),
        None => (data, ""),
    };
    (line.trim_end_matches([' ', '\t', '\r']), rest)
}

/// Finds the first PEM block in `data`.
///
/// Returns the block and the input remaining after its `END` line, or `None`
/// when no well-formed block exists. Malformed candidates are skipped and
/// the search continues after their `BEGIN` marker.
#[must_use]
pub fn decode(data: &str) -> Option<(Block, &str)> {
    let mut rest = data;
    loop {
        if let Some(after) = rest.strip_prefix(BEGIN) {
            rest = after;
        } else if let Some(i) = rest.find("\n-----BEGIN ") {
            rest = &rest[i + 1 + BEGIN.len()..];
        } else {
            return None;
        }

        let (type_line, after_type) = get_line(rest);
        rest = after_type;
        let Some(label) = type_line.strip_suffix(DASHES) else {
            continue;
        };

        let mut headers = BTreeMap::new();
        loop {
            if rest.is_empty() {
                return None;
            }
            let (line, next) = get_line(rest);
            let Some((key, value)) = line.split_once(':') else {
                break;
            };
            headers.insert(key.trim().to_string(), value.trim().to_string());
            rest = next;
        }

        let (end_index, trailer_index) = if headers.is_empty() && rest.starts_with(END) {
            (0, END.len())
        } else {
            match rest.find("\n-----END ") {
                Some(i) => (i, i + 1 + END.len()),
                None => continue,
            }
        };

        // The END line must repeat the label and close with dashes.
        let trailer = &rest[trailer_index..];
        let trailer_len = label.len() + DASHES.len();
        if trailer.len() < trailer_len || !trailer.is_char_boundary(trailer_len) {
            continue;
        }
        let (end_label, rest_of_end) = trailer.split_at(trailer_len);
        if !end_label.starts_with(label) || !end_label.ends_with(DASHES) {
            continue;
        }
        let (garbage, after_end) = get_line(rest_of_end);
        if !garbage.is_empty() {
            continue;
        }

        let body: String = rest[..end_index]
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect();
        let Ok(contents) = STANDARD.decode(body.as_bytes()) else {
            continue;
        };

        return Some((
            Block {
                label: label.to_string(),
                headers,
                contents,
            },
            after_end,
        ));
    }
}

/// Encodes `contents` as a PEM block with the given label.
///
/// The output always ends with a newline.
#[must_use]
pub fn encode(label: &str, contents: &[u8]) -> String {
    let body = STANDARD.encode(contents);
    let mut out = String::with_capacity(body.len() + body.len() / LINE_WIDTH + 2 * label.len() + 40);
    out.push_str(BEGIN);
    out.push_str(label);
    out.push_str(DASHES);
    out.push('\n');

    let mut remaining = body.as_str();
    while !remaining.is_empty() {
        let (line, tail) = remaining.split_at(remaining.len().min(LINE_WIDTH));
        out.push_str(line);
        out.push('\n');
        remaining = tail;
    }

    out.push_str(END);
    out.push_str(label);
    out.push_str(DASHES);
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_wraps_at_64_columns() {
        let data = vec![0xAB; 100];
        let pem = encode("TEST", &data);
        let lines: Vec<&str> = pem.lines().collect();
        assert_eq!(lines[0], "-----BEGIN TEST-----");
        assert_eq!(lines[1].len(), 64);
        assert_eq!(*lines.last().unwrap(), "-----END TEST-----");
        assert!(pem.ends_with('\n'));
    }

    #[test]
    fn test_decode_returns_rest() {
        let pem = encode("TEST", b"hello world");
        let input = format!("preamble\n{pem}trailing");
        let (block, rest) = decode(&input).unwrap();
        assert_eq!(block.label, "TEST");
        assert_eq!(block.contents, b"hello world");
        assert_eq!(rest, "trailing");
    }

    #[test]
    fn test_decode_skips_malformed_candidates() {
        let good = encode("GOOD", b"payload");
        let input = format!("-----BEGIN BAD-----\nnot base64!\n-----END OTHER-----\n{good}");
        let (block, rest) = decode(&input).unwrap();
        assert_eq!(block.label, "GOOD");
        assert!(rest.is_empty());
    }

    #[test]
    fn test_decode_headers() {
        let input = "-----BEGIN X-----\nProc-Type: 4,ENCRYPTED\n\naGk=\n-----END X-----\n";
        let (block, _) = decode(input).unwrap();
        assert_eq!(block.headers.get("Proc-Type").map(String::as_str), Some("4,ENCRYPTED"));
        assert_eq!(block.contents, b"hi");
    }

    #[test]
    fn test_decode_no_block() {
        assert!(decode("-----HELLO WORLD-----\n").is_none());
        assert!(decode("").is_none());
        assert!(decode("-----BEGIN X-----\naGk=\n").is_none());
    }
}
