//! String transforms used by the sanitizer builders.

use regex::Regex;

/// Trim `chars` from both ends.
pub fn trim_chars(value: &str, chars: &str) -> String {
    value.trim_matches(|c| chars.contains(c)).to_string()
}

/// Escape HTML special characters.
///
/// Replaces:
/// - `&` -> `&amp;`
/// - `<` -> `&lt;`
/// - `>` -> `&gt;`
/// - `"` -> `&quot;`
/// - `'` -> `&#x27;`
/// - `/` -> `&#x2F;`
/// - `\` -> `&#x5C;`
/// - `` ` `` -> `&#96;`
pub fn escape(value: &str) -> String {
    let mut output = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '"' => output.push_str("&quot;"),
            '\'' => output.push_str("&#x27;"),
            '/' => output.push_str("&#x2F;"),
            '\\' => output.push_str("&#x5C;"),
            '`' => output.push_str("&#96;"),
            _ => output.push(c),
        }
    }
    output
}

const ENTITIES: &[(&str, char)] = &[
    ("&quot;", '"'),
    ("&#x27;", '\''),
    ("&lt;", '<'),
    ("&gt;", '>'),
    ("&#x2F;", '/'),
    ("&#x5C;", '\\'),
    ("&#96;", '`'),
    ("&amp;", '&'),
];

/// Reverse of [`escape`].
///
/// Each entity is decoded once, so `&amp;lt;` becomes `&lt;`.
pub fn unescape(value: &str) -> String {
    let mut output = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(pos) = rest.find('&') {
        output.push_str(&rest[..pos]);
        rest = &rest[pos..];
        match ENTITIES.iter().find(|(entity, _)| rest.starts_with(entity)) {
            Some((entity, c)) => {
                output.push(*c);
                rest = &rest[entity.len()..];
            }
            None => {
                output.push('&');
                rest = &rest[1..];
            }
        }
    }
    output.push_str(rest);
    output
}

/// Strip all HTML tags.
pub fn strip_tags(value: &str) -> String {
    let mut output = String::with_capacity(value.len());
    let mut inside_tag = false;

    for c in value.chars() {
        if c == '<' {
            inside_tag = true;
        } else if c == '>' {
            inside_tag = false;
        } else if !inside_tag {
            output.push(c);
        }
    }

    output
}

/// Remove ASCII control characters, optionally keeping `\n` and `\r`.
pub fn strip_low(value: &str, keep_new_lines: bool) -> String {
    value
        .chars()
        .filter(|&c| {
            let low = c <= '\u{1f}' || c == '\u{7f}';
            !low || (keep_new_lines && (c == '\n' || c == '\r'))
        })
        .collect()
}

/// A set of characters compiled from a regex class body such as `a-z0-9`.
///
/// Letters match in either ASCII case. A `[` or `]` in the body is taken
/// literally, and a body that still fails to compile is treated as a literal
/// character set. An empty body matches nothing.
#[derive(Debug, Clone)]
pub struct CharClass {
    set: Option<Regex>,
    negated: bool,
}

impl CharClass {
    pub fn contains(&self, c: char) -> bool {
        let found = self.set.as_ref().is_some_and(|set| {
            let mut buf = [0u8; 4];
            [c, c.to_ascii_lowercase(), c.to_ascii_uppercase()]
                .iter()
                .any(|v| set.is_match(v.encode_utf8(&mut buf)))
        });
        found != self.negated
    }
}

/// Build a [`CharClass`]. With `negated`, it holds every character outside
/// the body.
pub fn char_class(chars: &str, negated: bool) -> CharClass {
    let set = if chars.is_empty() {
        None
    } else {
        Regex::new(&format!("^[{}]$", class_body(chars)))
            .or_else(|_| {
                let literal: String = chars
                    .chars()
                    .map(|c| regex::escape(&c.to_string()))
                    .collect();
                Regex::new(&format!("^[{}]$", literal))
            })
            .ok()
    };
    CharClass { set, negated }
}

// Escapes brackets and set operators so the body stays one class.
fn class_body(chars: &str) -> String {
    let mut body = String::with_capacity(chars.len() * 2);
    let mut iter = chars.chars();
    while let Some(c) = iter.next() {
        match c {
            '\\' => {
                body.push('\\');
                body.push(iter.next().unwrap_or('\\'));
            }
            '[' | ']' | '&' | '~' => {
                body.push('\\');
                body.push(c);
            }
            _ => body.push(c),
        }
    }
    body
}

/// Remove every character in `class`.
pub fn remove_matches(value: &str, class: &CharClass) -> String {
    value.chars().filter(|&c| !class.contains(c)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_custom_chars() {
        assert_eq!(trim_chars("--abc--", "-"), "abc");
        assert_eq!(trim_chars("xyabcyx", "xy"), "abc");
    }

    #[test]
    fn escape_round_trips() {
        let input = "<a href=\"/x\">Tom & 'Jerry'</a>";
        let escaped = escape(input);
        assert_eq!(
            escaped,
            "&lt;a href=&quot;&#x2F;x&quot;&gt;Tom &amp; &#x27;Jerry&#x27;&lt;&#x2F;a&gt;"
        );
        assert_eq!(unescape(&escaped), input);
    }

    #[test]
    fn unescape_decodes_once() {
        assert_eq!(unescape("&amp;lt;"), "&lt;");
        assert_eq!(unescape("a & b &unknown;"), "a & b &unknown;");
    }

    #[test]
    fn strips_tags_and_control_chars() {
        assert_eq!(strip_tags("<p>Hello <b>World</b></p>"), "Hello World");
        assert_eq!(strip_low("a\u{0}b\nc\u{7f}", false), "abc");
        assert_eq!(strip_low("a\u{0}b\r\nc", true), "ab\r\nc");
    }

    #[test]
    fn whitelist_and_blacklist_classes() {
        let keep = char_class("a-z", true);
        assert_eq!(remove_matches("en_US", &keep), "enUS");

        let drop = char_class("0-9", false);
        assert_eq!(remove_matches("a1b2c3", &drop), "abc");
    }

    #[test]
    fn invalid_class_is_literal() {
        let drop = char_class("z-a", false);
        assert_eq!(remove_matches("a-z!", &drop), "!");
    }

    #[test]
    fn brackets_in_the_body_are_members() {
        let drop = char_class("a]b", false);
        assert_eq!(remove_matches("a]b x a b ]", &drop), " x   ");

        let keep = char_class("[x]", true);
        assert_eq!(remove_matches("[x]-y", &keep), "[x]");

        let drop = char_class(r"\d", false);
        assert_eq!(remove_matches("a1b2", &drop), "ab");
    }

    #[test]
    fn case_folding_is_ascii_only() {
        let keep = char_class("a-z", true);
        assert_eq!(remove_matches("K\u{212A}\u{17F}k", &keep), "Kk");

        let drop = char_class("A-Z", false);
        assert_eq!(remove_matches("abc\u{E9}", &drop), "\u{E9}");
    }

    #[test]
    fn empty_class() {
        assert_eq!(remove_matches("abc", &char_class("", false)), "abc");
        assert_eq!(remove_matches("abc", &char_class("", true)), "");
    }
}
