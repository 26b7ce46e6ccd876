//! Splitting free text into tokens for [`Registry::input`](crate::Registry::input).
//!
//! Tokens are whitespace separated. A token that starts with `"` or `'` runs to
//! the matching unescaped quote, so quoted values may contain whitespace. Quotes
//! and escapes are kept in the token; unquoting is up to the value codec.

pub const QUOTE_MARKS: [char; 2] = ['"', '\''];

/// Split `text` into raw tokens.
///
/// An unterminated quote swallows the rest of the input into one token; the
/// string codec reports it when decoding.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        let mut token = String::new();
        if QUOTE_MARKS.contains(&c) {
            token.push(c);
            chars.next();
            let mut escaped = false;
            for ch in chars.by_ref() {
                token.push(ch);
                if escaped {
                    escaped = false;
                } else if ch == '\\' {
                    escaped = true;
                } else if ch == c {
                    break;
                }
            }
        }

        while let Some(&ch) = chars.peek() {
            if ch.is_whitespace() {
                break;
            }
            token.push(ch);
            chars.next();
        }

        tokens.push(token);
    }

    tokens
}
