//! Percent-encoding filters for the path, query and fragment components.
//!
//! Every byte outside the allow-list is escaped with uppercase hex digits.
//! A `%` that already starts a valid `%XX` triplet is kept as is, any other
//! `%` becomes `%25`, so running a filter over its own output changes nothing.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_encode};

/// Bytes escaped in a path: everything but unreserved, sub-delims, `:`, `@` and `/`.
const PATH_SET: &AsciiSet = &NON_ALPHANUMERIC
    // unreserved
    .remove(b'_')
    .remove(b'-')
    .remove(b'.')
    .remove(b'~')
    // sub-delims
    .remove(b'!')
    .remove(b'$')
    .remove(b'&')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'*')
    .remove(b'+')
    .remove(b',')
    .remove(b';')
    .remove(b'=')
    // pchar extras
    .remove(b':')
    .remove(b'@')
    .remove(b'/');

/// Query and fragment additionally allow `?`.
const QUERY_SET: &AsciiSet = &PATH_SET.remove(b'?');

pub(crate) fn encode_path(path: &str) -> String {
    encode_with(path, PATH_SET)
}

pub(crate) fn encode_query_or_fragment(value: &str) -> String {
    encode_with(value, QUERY_SET)
}

fn encode_with(input: &str, set: &'static AsciiSet) -> String {
    let bytes = input.as_bytes();
    let mut encoded = String::with_capacity(input.len());

    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'%' {
            i += 1;
            continue;
        }

        encoded.extend(percent_encode(&bytes[start..i], set));
        if is_pct_triplet(&bytes[i..]) {
            // the triplet is pure ascii, so slicing stays on char boundaries
            encoded.push_str(&input[i..i + 3]);
            i += 3;
        } else {
            encoded.push_str("%25");
            i += 1;
        }
        start = i;
    }
    encoded.extend(percent_encode(&bytes[start..], set));

    encoded
}

#[inline]
fn is_pct_triplet(bytes: &[u8]) -> bool {
    matches!(bytes, [b'%', hi, lo, ..] if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit())
}
