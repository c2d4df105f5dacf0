//! Canonical decoding of genre/category fields into tag tokens.
//!
//! Precedence for string fields: a value starting with `[` is decoded as a
//! bracketed string-literal list and nothing else; if that decode fails
//! the field has no tags. Any other non-empty string is split on commas.
//!
//! Literal lists follow string-literal rules: single or double quotes,
//! backslash escapes (including `\xNN`, `\uNNNN`, `\UNNNNNNNN` and octal) and
//! implicit joining of adjacent literals. Named `\N{...}` escapes and
//! string prefixes such as `r''` or `b''` are not decoded; a prefixed item
//! makes the whole field tagless.

use crate::types::observation::{Observation, RawTags};

pub fn normalize_tags(raw: &RawTags) -> Vec<String> {
    match raw {
        RawTags::List(items) => collect_tokens(items.iter().map(String::as_str)),
        RawTags::Text(text) => {
            let text = text.trim();
            if text.is_empty() {
                Vec::new()
            } else if text.starts_with('[') {
                match parse_literal_list(text) {
                    Some(items) => collect_tokens(items.iter().map(String::as_str)),
                    None => {
                        tracing::debug!(value = text, "malformed tag literal treated as no tags");
                        Vec::new()
                    }
                }
            } else {
                collect_tokens(text.split(','))
            }
        }
        RawTags::Absent => Vec::new(),
        RawTags::Malformed(value) => {
            tracing::debug!(%value, "unsupported tag field treated as no tags");
            Vec::new()
        }
    }
}

/// Genres followed by categories, concatenated without deduplication.
pub fn observation_tags(observation: &Observation) -> Vec<String> {
    let mut tags = normalize_tags(&observation.genres);
    tags.extend(normalize_tags(&observation.categories));
    tags
}

fn collect_tokens<'a>(tokens: impl Iterator<Item = &'a str>) -> Vec<String> {
    tokens
        .map(|token| token.trim().to_lowercase())
        .filter(|token| !token.is_empty())
        .collect()
}

type Chars<'a> = std::iter::Peekable<std::str::Chars<'a>>;

/// Decodes a bracketed list of quoted string literals. Adjacent literals
/// join into one item and a trailing comma is allowed.
fn parse_literal_list(text: &str) -> Option<Vec<String>> {
    let inner = text.strip_prefix('[')?.strip_suffix(']')?;
    let mut chars = inner.chars().peekable();
    let mut items = Vec::new();

    loop {
        skip_whitespace(&mut chars);
        if chars.peek().is_none() {
            break;
        }

        let mut item = String::new();
        let mut literals = 0;
        while let Some(quote) = chars.next_if(|c| matches!(*c, '\'' | '"')) {
            read_literal(&mut chars, quote, &mut item)?;
            literals += 1;
            skip_whitespace(&mut chars);
        }
        if literals == 0 {
            return None;
        }
        items.push(item);

        match chars.next() {
            None => break,
            Some(',') => continue,
            Some(_) => return None,
        }
    }

    Some(items)
}

fn skip_whitespace(chars: &mut Chars<'_>) {
    while chars.next_if(|c| c.is_whitespace()).is_some() {}
}

fn read_literal(chars: &mut Chars<'_>, quote: char, out: &mut String) -> Option<()> {
    loop {
        match chars.next()? {
            '\\' => read_escape(chars, out)?,
            c if c == quote => return Some(()),
            c => out.push(c),
        }
    }
}

fn read_escape(chars: &mut Chars<'_>, out: &mut String) -> Option<()> {
    let escaped = chars.next()?;
    let decoded = match escaped {
        '\n' => return Some(()),
        '\\' | '\'' | '"' => escaped,
        'n' => '\n',
        't' => '\t',
        'r' => '\r',
        'a' => '\x07',
        'b' => '\x08',
        'f' => '\x0c',
        'v' => '\x0b',
        'x' => hex_char(chars, 2)?,
        'u' => hex_char(chars, 4)?,
        'U' => hex_char(chars, 8)?,
        '0'..='7' => {
            let mut value = escaped.to_digit(8)?;
            for _ in 0..2 {
                match chars.next_if(|c| c.is_digit(8)) {
                    Some(digit) => value = value * 8 + digit.to_digit(8)?,
                    None => break,
                }
            }
            char::from_u32(value)?
        }
        // Unrecognized escapes keep their backslash.
        other => {
            out.push('\\');
            other
        }
    };
    out.push(decoded);
    Some(())
}

fn hex_char(chars: &mut Chars<'_>, digits: usize) -> Option<char> {
    let mut value = 0u32;
    for _ in 0..digits {
        value = value * 16 + chars.next()?.to_digit(16)?;
    }
    char::from_u32(value)
}
