//! Syntactic URL check applied before the throttle sees any input.
//!
//! Accepts absolute URLs with one of the classic schemes (`http`, `https`,
//! `ftp`, `ftps`, `gopher`, `telnet`, `nntp`) or `mailto:` / `news:`, made of
//! unreserved/reserved characters and `%XX` escapes only.

use thiserror::Error;

pub const DEFAULT_MAX_URL_LENGTH: usize = 2000;

const HIERARCHICAL_SCHEMES: &[&str] = &["http", "https", "ftp", "ftps", "gopher", "telnet", "nntp"];
const OPAQUE_PREFIXES: &[&str] = &["mailto:", "news:"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UrlRejection {
    #[error("Error: URL is invalid.")]
    Invalid,
    #[error("Error: URL is too long.")]
    TooLong,
}

/// Check `input`; shape is checked before length.
pub fn validate_url(input: &str, max_len: usize) -> Result<(), UrlRejection> {
    if !has_valid_shape(input) {
        return Err(UrlRejection::Invalid);
    }
    if input.len() > max_len {
        return Err(UrlRejection::TooLong);
    }
    Ok(())
}

fn has_valid_shape(input: &str) -> bool {
    let Some(rest) = strip_scheme(input) else {
        return false;
    };
    if rest.is_empty() || !allowed_chars(rest) {
        return false;
    }
    url::Url::parse(input).is_ok()
}

fn strip_scheme(input: &str) -> Option<&str> {
    for prefix in OPAQUE_PREFIXES {
        if let Some(rest) = strip_prefix_ignore_case(input, prefix) {
            return Some(rest);
        }
    }
    let (scheme, rest) = input.split_once("://")?;
    HIERARCHICAL_SCHEMES
        .iter()
        .any(|s| s.eq_ignore_ascii_case(scheme))
        .then_some(rest)
}

fn strip_prefix_ignore_case<'a>(input: &'a str, prefix: &str) -> Option<&'a str> {
    let head = input.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then(|| &input[prefix.len()..])
}

fn allowed_chars(s: &str) -> bool {
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b == b'%' {
            let escaped = bytes.get(i + 1..i + 3).is_some_and(|h| h.iter().all(u8::is_ascii_hexdigit));
            if !escaped {
                return false;
            }
            i += 3;
            continue;
        }
        if !(b.is_ascii_alphanumeric() || b"-()_.!~*';/?:@&=+$,".contains(&b)) {
            return false;
        }
        i += 1;
    }
    true
}
