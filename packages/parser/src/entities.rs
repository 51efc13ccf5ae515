//! Character reference decoding and escaping.

use std::borrow::Cow;

const NBSP: char = '\u{a0}';

fn named_reference(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some(NBSP),
        _ => None,
    }
}

fn numeric_reference(body: &str) -> Option<char> {
    let code = if let Some(hex) = body.strip_prefix('x').or_else(|| body.strip_prefix('X')) {
        u32::from_str_radix(hex, 16).ok()?
    } else {
        body.parse::<u32>().ok()?
    };
    char::from_u32(code).filter(|c| *c != '\0')
}

/// Decode character references. Unknown or malformed references are kept literally.
pub fn decode_entities(input: &str) -> Cow<'_, str> {
    if !input.contains('&') {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];

        let decoded = after.find(';').and_then(|semi| {
            let body = &after[..semi];
            let c = match body.strip_prefix('#') {
                Some(num) => numeric_reference(num),
                None => named_reference(body),
            }?;
            Some((c, semi + 1))
        });

        match decoded {
            Some((c, consumed)) => {
                out.push(c);
                rest = &after[consumed..];
            }
            None => {
                out.push('&');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    Cow::Owned(out)
}

/// Escape text content the way `innerHTML` serializes it
pub fn escape_text(input: &str) -> Cow<'_, str> {
    if !input.contains(['&', '<', '>', NBSP]) {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len() + 8);
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            NBSP => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Escape a double-quoted attribute value
pub fn escape_attribute(input: &str) -> Cow<'_, str> {
    if !input.contains(['&', '"', NBSP]) {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len() + 8);
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            NBSP => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}
