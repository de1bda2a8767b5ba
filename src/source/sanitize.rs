//! Cleanup for provider-supplied question and answer text.
//!
//! Trivia providers hand back text that may be percent-encoded (sometimes
//! more than once) and HTML-escaped. `clean` turns it into display text:
//! decoded, whitespace-collapsed, capitalized and terminated.

use std::borrow::Cow;

const MAX_DECODE_PASSES: usize = 3;

/// Replaced literally before the general entity pass. `&amp;` must stay
/// last.
const NAMED_ENTITIES: &[(&str, &str)] = &[
    ("&quot;", "\""),
    ("&apos;", "'"),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&nbsp;", " "),
    ("&hellip;", "..."),
    ("&mdash;", "\u{2014}"),
    ("&ndash;", "\u{2013}"),
    ("&amp;", "&"),
];

pub fn clean(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    let decoded = percent_decode(raw);
    let decoded = decode_entities(&decoded);
    let mut cleaned = collapse_whitespace(&decoded);

    if cleaned.is_empty() {
        return cleaned;
    }
    cleaned = capitalize_first(&cleaned);
    if !cleaned.ends_with(['?', '.', '!']) {
        cleaned.push('?');
    }
    cleaned
}

/// Up to three passes, stopping early once a pass changes nothing. A pass
/// that fails keeps the previous value. A pass fails on a `%` without two
/// hex digits after it, or on invalid UTF-8 after decoding.
fn percent_decode(raw: &str) -> String {
    let mut current = raw.to_string();
    for _ in 0..MAX_DECODE_PASSES {
        if has_malformed_escape(&current) {
            break;
        }
        let next = match urlencoding::decode(&current) {
            Ok(Cow::Borrowed(_)) => break,
            Ok(Cow::Owned(decoded)) => decoded,
            Err(_) => break,
        };
        if next == current {
            break;
        }
        current = next;
    }
    current
}

fn has_malformed_escape(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.iter().enumerate().any(|(i, &b)| {
        b == b'%'
            && !matches!(
                (bytes.get(i + 1), bytes.get(i + 2)),
                (Some(hi), Some(lo)) if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit()
            )
    })
}

fn decode_entities(text: &str) -> String {
    let mut decoded = text.to_string();
    for (entity, replacement) in NAMED_ENTITIES {
        if decoded.contains(entity) {
            decoded = decoded.replace(entity, replacement);
        }
    }
    // `&amp;` goes last above, so double-escaped text like `&amp;quot;`
    // surfaces as `&quot;` and is finished off here.
    html_escape::decode_html_entities(&decoded).into_owned()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
