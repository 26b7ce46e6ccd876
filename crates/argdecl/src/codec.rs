//! Value codecs: how an option's value maps to and from raw tokens.
//!
//! A codec decodes exactly [`ValueCodec::token_width`] tokens into one logical
//! value and encodes a value back into text. Every option owns its codec, so a
//! codec never has to locate the value it serves.
//!
//! Types get a default codec by implementing [`OptionValue`]; this crate does so
//! for the usual std scalars. Any `FromStr + Display` type can use
//! [`FromStrCodec`] instead, and each option may override the decoder or the
//! encoder on its own (see [`crate::decl`]).

use std::fmt::{Display, Write};
use std::marker::PhantomData;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use crate::tokens::QUOTE_MARKS;

/// Decoder override for a single option.
pub type DecodeFn<'a, T> = Box<dyn Fn(&[String]) -> Result<T, String> + 'a>;

/// Encoder override for a single option.
pub type EncodeFn<'a, T> = Box<dyn Fn(&T, &mut String) -> Result<(), String> + 'a>;

/// Strategy for converting a `T` to and from tokens.
///
/// Failures are reported as plain messages; the option layer attaches the key.
pub trait ValueCodec<T> {
    /// Number of raw tokens one value occupies.
    fn token_width(&self) -> usize {
        1
    }

    /// Decode a value from exactly `token_width()` tokens.
    fn decode(&self, tokens: &[String]) -> Result<T, String>;

    /// Append the textual form of `value` to `out`.
    ///
    /// Multi-token values separate their tokens with single spaces.
    fn encode(&self, value: &T, out: &mut String) -> Result<(), String>;
}

/// A type with a natural token representation.
pub trait OptionValue: Sized {
    const TOKEN_WIDTH: usize = 1;

    fn decode_tokens(tokens: &[String]) -> Result<Self, String>;

    fn encode_value(&self, out: &mut String) -> Result<(), String>;
}

/// Codec delegating to the type's [`OptionValue`] impl.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultCodec;

impl<T: OptionValue> ValueCodec<T> for DefaultCodec {
    fn token_width(&self) -> usize {
        T::TOKEN_WIDTH
    }

    fn decode(&self, tokens: &[String]) -> Result<T, String> {
        T::decode_tokens(tokens)
    }

    fn encode(&self, value: &T, out: &mut String) -> Result<(), String> {
        value.encode_value(out)
    }
}

/// Single-token codec for any `FromStr + Display` type.
pub struct FromStrCodec<T>(PhantomData<fn() -> T>);

impl<T> FromStrCodec<T> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for FromStrCodec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ValueCodec<T> for FromStrCodec<T>
where
    T: FromStr + Display,
    T::Err: Display,
{
    fn decode(&self, tokens: &[String]) -> Result<T, String> {
        parse_single(tokens)
    }

    fn encode(&self, value: &T, out: &mut String) -> Result<(), String> {
        write!(out, "{value}").map_err(|e| e.to_string())
    }
}

/// The codec actually installed in an option: a base codec plus optional
/// per-option overrides for either direction or the width.
pub(crate) struct BoundCodec<'a, T> {
    base: Box<dyn ValueCodec<T> + 'a>,
    width: Option<usize>,
    decoder: Option<DecodeFn<'a, T>>,
    encoder: Option<EncodeFn<'a, T>>,
}

impl<'a, T> BoundCodec<'a, T> {
    pub(crate) fn new(
        base: Box<dyn ValueCodec<T> + 'a>,
        width: Option<usize>,
        decoder: Option<DecodeFn<'a, T>>,
        encoder: Option<EncodeFn<'a, T>>,
    ) -> Self {
        Self {
            base,
            width,
            decoder,
            encoder,
        }
    }
}

impl<T> ValueCodec<T> for BoundCodec<'_, T> {
    fn token_width(&self) -> usize {
        self.width.unwrap_or_else(|| self.base.token_width())
    }

    fn decode(&self, tokens: &[String]) -> Result<T, String> {
        match &self.decoder {
            Some(decode) => decode(tokens),
            None => self.base.decode(tokens),
        }
    }

    fn encode(&self, value: &T, out: &mut String) -> Result<(), String> {
        match &self.encoder {
            Some(encode) => encode(value, out),
            None => self.base.encode(value, out),
        }
    }
}

/// Borrow the only token of a single-token value.
pub fn single_token(tokens: &[String]) -> Result<&str, String> {
    match tokens {
        [token] => Ok(token.as_str()),
        _ => Err(format!("expected 1 token, got {}", tokens.len())),
    }
}

/// Parse the only token with `FromStr`.
pub fn parse_single<T>(tokens: &[String]) -> Result<T, String>
where
    T: FromStr,
    T::Err: Display,
{
    let token = single_token(tokens)?;
    token.parse::<T>().map_err(|e| {
        format!(
            "'{token}' is not a valid {}: {e}",
            short_type_name::<T>()
        )
    })
}

fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}

/// Whether `s` has to be quoted to survive tokenization as one value token.
///
/// Text starting with `-` is quoted so it can't be taken for an option key.
pub fn needs_quotes(s: &str) -> bool {
    s.is_empty()
        || s.chars().any(char::is_whitespace)
        || s.starts_with(QUOTE_MARKS)
        || s.starts_with('-')
}

/// Wrap `s` in double quotes, escaping `\` and `"`.
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// Undo [`quote`]. Tokens that don't start with a quote mark are returned as-is.
pub fn unquote(token: &str) -> Result<String, String> {
    let Some(mark) = token.chars().next().filter(|c| QUOTE_MARKS.contains(c)) else {
        return Ok(token.to_string());
    };

    let mut out = String::with_capacity(token.len());
    let mut chars = token[mark.len_utf8()..].chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(next) => out.push(next),
                None => break,
            }
        } else if c == mark {
            let rest: String = chars.by_ref().collect();
            if !rest.is_empty() {
                return Err(format!("unexpected text after closing quote: '{rest}'"));
            }
            return Ok(out);
        } else {
            out.push(c);
        }
    }
    Err(format!("unterminated quoted string: {token}"))
}

fn write_text(s: &str, out: &mut String) {
    if needs_quotes(s) {
        out.push_str(&quote(s));
    } else {
        out.push_str(s);
    }
}

macro_rules! from_str_option_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl OptionValue for $ty {
                fn decode_tokens(tokens: &[String]) -> Result<Self, String> {
                    parse_single(tokens)
                }

                fn encode_value(&self, out: &mut String) -> Result<(), String> {
                    write!(out, "{self}").map_err(|e| e.to_string())
                }
            }
        )*
    };
}

from_str_option_value!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, bool, char,
    IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr,
);

impl OptionValue for String {
    fn decode_tokens(tokens: &[String]) -> Result<Self, String> {
        unquote(single_token(tokens)?)
    }

    fn encode_value(&self, out: &mut String) -> Result<(), String> {
        write_text(self, out);
        Ok(())
    }
}

impl OptionValue for PathBuf {
    fn decode_tokens(tokens: &[String]) -> Result<Self, String> {
        unquote(single_token(tokens)?).map(PathBuf::from)
    }

    fn encode_value(&self, out: &mut String) -> Result<(), String> {
        let Some(s) = self.to_str() else {
            return Err(format!("path is not valid UTF-8: {}", self.display()));
        };
        write_text(s, out);
        Ok(())
    }
}

/// Pairs such as `name value` span the widths of both halves.
impl<A: OptionValue, B: OptionValue> OptionValue for (A, B) {
    const TOKEN_WIDTH: usize = A::TOKEN_WIDTH + B::TOKEN_WIDTH;

    fn decode_tokens(tokens: &[String]) -> Result<Self, String> {
        if tokens.len() != Self::TOKEN_WIDTH {
            return Err(format!(
                "expected {} tokens, got {}",
                Self::TOKEN_WIDTH,
                tokens.len()
            ));
        }
        let (a, b) = tokens.split_at(A::TOKEN_WIDTH);
        Ok((A::decode_tokens(a)?, B::decode_tokens(b)?))
    }

    fn encode_value(&self, out: &mut String) -> Result<(), String> {
        self.0.encode_value(out)?;
        out.push(' ');
        self.1.encode_value(out)
    }
}
