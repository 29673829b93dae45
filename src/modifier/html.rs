//! HTML tag stripping.
//!
//! A small state machine rather than a parser: a tag is a `<` followed by a
//! letter, `/`, `!` or `?`, and everything up to the next `>` is skipped.
//! Closing a tag leaves a space so words on either side stay apart, and the
//! common named and numeric entities are decoded.
//!
//! Decoding runs once. Any decoded `<` that would open a tag and any `&` that
//! would start a decodable entity is escaped again, so stripping already
//! stripped text changes nothing.

use super::Modifier;

use crate::error::Result;

/// Longest entity name considered, excluding `&` and `;`.
const MAX_ENTITY_LEN: usize = 10;

/// Strips HTML tags and decodes entities.
#[derive(Debug, Clone, Default)]
pub struct HtmlStripper;

impl HtmlStripper {
    pub fn new() -> Self {
        HtmlStripper
    }
}

impl Modifier for HtmlStripper {
    fn modify(&self, text: &str) -> Result<String> {
        Ok(escape_markup(&strip_and_decode(text)))
    }

    fn name(&self) -> &'static str {
        "html_strip"
    }
}

fn strip_and_decode(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut in_tag = false;
    let mut rest = text;

    while let Some(ch) = rest.chars().next() {
        let after = &rest[ch.len_utf8()..];
        rest = after;

        if in_tag {
            if ch == '>' {
                in_tag = false;
                result.push(' ');
            }
            continue;
        }

        match ch {
            '<' if opens_tag(after) => in_tag = true,
            '&' => match parse_entity(after) {
                Some((decoded, consumed)) => {
                    result.push(decoded);
                    rest = &after[consumed..];
                }
                None => result.push('&'),
            },
            _ => result.push(ch),
        }
    }

    result
}

/// Re-escape characters that a second pass would interpret as markup.
fn escape_markup(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for (i, ch) in text.char_indices() {
        let after = &text[i + ch.len_utf8()..];
        match ch {
            '<' if opens_tag(after) => escaped.push_str("&lt;"),
            '&' if parse_entity(after).is_some() => escaped.push_str("&amp;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn opens_tag(after: &str) -> bool {
    after
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || matches!(c, '/' | '!' | '?'))
}

/// Decode the entity following a `&`, returning the character and the number
/// of bytes consumed including the closing `;`.
fn parse_entity(after: &str) -> Option<(char, usize)> {
    let end = after
        .char_indices()
        .take(MAX_ENTITY_LEN + 1)
        .find(|&(_, c)| c == ';')
        .map(|(i, _)| i)?;
    let name = &after[..end];
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '#') {
        return None;
    }

    let decoded = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => ' ',
        _ => {
            let digits = name.strip_prefix('#')?;
            let code_point = match digits.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => digits.parse::<u32>().ok()?,
            };
            char::from_u32(code_point)?
        }
    };
    Some((decoded, end + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip(text: &str) -> String {
        HtmlStripper::new().modify(text).unwrap()
    }

    #[test]
    fn test_strip_tags() {
        let clean = strip("<p>Hello <b>world</b></p>");
        assert!(clean.contains("Hello"));
        assert!(clean.contains("world"));
        assert!(!clean.contains('<'));
    }

    #[test]
    fn test_entities() {
        assert_eq!(strip("Tom &amp; Jerry, 5 &lt; 10"), "Tom & Jerry, 5 < 10");
        assert_eq!(strip("&#65;&#x42;"), "AB");
    }

    #[test]
    fn test_unknown_and_unterminated_entities_kept() {
        assert_eq!(strip("&bogus; & more"), "&bogus; & more");
        assert_eq!(strip("AT&T rocks"), "AT&T rocks");
    }

    #[test]
    fn test_bare_angle_brackets_are_text() {
        assert_eq!(strip("if a < b and c > d"), "if a < b and c > d");
    }

    #[test]
    fn test_decoded_markup_stays_escaped() {
        // Decoding would create a tag, so it is escaped again.
        assert_eq!(strip("x &lt;b&gt; y"), "x &lt;b> y");
        // Double encoded entities decode one level and are escaped back.
        assert_eq!(strip("x &amp;lt;b&amp;gt; y"), "x &amp;lt;b&amp;gt; y");
    }

    #[test]
    fn test_output_is_fixed_point() {
        let inputs = [
            "x &amp;lt;b&amp;gt; y",
            "<div>a &lt;script&gt; tag</div>",
            "&#60;p&#62;numeric&#60;/p&#62;",
            "&amp;amp;amp; and &amp;#65;",
            "5 &lt; 10 &amp;&amp; 7 &gt; 3",
            "<unclosed tag swallows",
            "plain text",
        ];
        for input in inputs {
            let once = strip(input);
            let twice = strip(&once);
            assert_eq!(once, twice, "html stripping must be a fixed point for {input:?}");
        }
    }
}
