// SPDX-License-Identifier: PMPL-1.0-or-later
//! Character encoding detection for raw HTML bytes.
//!
//! Precedence follows the HTML encoding sniffing rules in reduced form:
//! a byte order mark, then a `<meta charset>` or `http-equiv` declaration
//! in the first kilobyte, then UTF-8.

use crate::error::{Result, ZooError};
use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};
use regex::bytes::Regex;
use std::borrow::Cow;
use std::sync::OnceLock;
use tracing::debug;

/// How far into the document a charset declaration is looked for
const PRESCAN_LIMIT: usize = 1024;

fn meta_charset_regex() -> &'static Regex {
    static META: OnceLock<Regex> = OnceLock::new();
    META.get_or_init(|| {
        Regex::new(r#"(?i-u)<meta[^>]*?charset\s*=\s*["']?\s*([a-z0-9_.:\-]+)"#)
            .expect("valid regex")
    })
}

/// The encoding named by a `<meta>` declaration near the top of the document
pub fn declared_encoding(bytes: &[u8]) -> Option<&'static Encoding> {
    let head = &bytes[..bytes.len().min(PRESCAN_LIMIT)];
    let label = meta_charset_regex().captures(head)?.get(1)?.as_bytes();
    let encoding = Encoding::for_label(label)?;

    // A document that can declare itself in ASCII is not UTF-16
    if encoding == UTF_16LE || encoding == UTF_16BE {
        Some(UTF_8)
    } else {
        Some(encoding)
    }
}

/// Decode raw document bytes to text.
///
/// Bytes that are not valid in the detected encoding are a
/// `DocumentParse` error rather than being replaced.
pub fn decode(bytes: &[u8]) -> Result<Cow<'_, str>> {
    let (encoding, body) = match Encoding::for_bom(bytes) {
        Some((encoding, bom_length)) => (encoding, &bytes[bom_length..]),
        None => (declared_encoding(bytes).unwrap_or(UTF_8), bytes),
    };

    debug!("Decoding document as {}", encoding.name());
    encoding
        .decode_without_bom_handling_and_without_replacement(body)
        .ok_or_else(|| {
            ZooError::DocumentParse(format!("input is not valid {}", encoding.name()))
        })
}
