use logos::{Lexer, Logos};
use std::iter::Peekable;
use std::str::Chars;

#[derive(Clone)]
pub struct Extras<'a> {
    pub arena: &'a bumpalo::Bump,
}

#[derive(Logos, Debug, PartialEq)]
#[logos(extras = Extras<'s>)]
pub enum Token<'a> {
    #[token("[")]
    BracketOpen,

    #[token("]")]
    BracketClose,

    #[token("{")]
    BraceOpen,

    #[token("}")]
    BraceClose,

    #[token(":")]
    Colon,

    #[token(",")]
    Comma,

    #[token("null")]
    Null,

    #[token("true")]
    True,

    #[token("false")]
    False,

    #[regex(r"-?(0|[1-9][0-9]*)([.][0-9]+)?([eE][+-]?[0-9]+)?", |lex| lex.slice())]
    Number(&'a str),

    #[token("\"", parse_string)]
    String(&'a str),

    #[error]
    #[regex(r"[ \t\n\r]+", logos::skip)]
    Error,

    /// Token indicates the end of the input
    End,
}

#[derive(Logos, Debug, PartialEq)]
pub(crate) enum StringPart {
    #[regex(r#"[^"\\\x00-\x1F]+"#)]
    Text,

    #[regex(r"\\u[0-9a-fA-F][0-9a-fA-F][0-9a-fA-F][0-9a-fA-F]")]
    EscapedCodepoint,

    #[token(r#"\""#)]
    EscapedQuote,
    #[token(r#"\\"#)]
    EscapedBackslash,
    #[token(r#"\/"#)]
    EscapedSlash,
    #[token(r#"\b"#)]
    EscapedBackspace,
    #[token(r#"\f"#)]
    EscapedFormfeed,
    #[token(r#"\n"#)]
    EscapedNewline,
    #[token(r#"\r"#)]
    EscapedReturn,
    #[token(r#"\t"#)]
    EscapedTab,

    #[token("\"")]
    EndString,

    #[error]
    Error,
}

#[inline]
fn parse_codepoint(hex: &str) -> Option<u32> {
    use lexical_core::*;
    const FORMAT: u128 = NumberFormatBuilder::hexadecimal();
    const OPTIONS: ParseIntegerOptions = ParseIntegerOptions::new();
    parse_with_options::<u32, FORMAT>(hex.as_bytes(), &OPTIONS).ok()
}

#[inline]
fn lex_string<'a>(lex: &mut Lexer<'a, Token<'a>>, mut output: String) -> Option<&'a str> {
    let mut sublex = StringPart::lexer(lex.remainder());
    // A high surrogate waiting for the low surrogate that completes it.
    let mut high_surrogate: Option<u32> = None;
    while let Some(token) = sublex.next() {
        let codepoint = match token {
            StringPart::EscapedCodepoint => Some(parse_codepoint(&sublex.slice()[2..])?),
            _ => None,
        };
        if let Some(high) = high_surrogate.take() {
            match codepoint {
                Some(low @ 0xDC00..=0xDFFF) => {
                    let combined = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
                    output.push(std::char::from_u32(combined).unwrap_or(char::REPLACEMENT_CHARACTER));
                    continue;
                }
                _ => output.push(char::REPLACEMENT_CHARACTER),
            }
        }
        match token {
            StringPart::Error => break,
            StringPart::Text => output.push_str(sublex.slice()),
            StringPart::EscapedQuote => output.push('"'),
            StringPart::EscapedBackslash => output.push('\\'),
            StringPart::EscapedSlash => output.push('/'),
            StringPart::EscapedBackspace => output.push(8 as char),
            StringPart::EscapedFormfeed => output.push(12 as char),
            StringPart::EscapedNewline => output.push('\n'),
            StringPart::EscapedReturn => output.push('\r'),
            StringPart::EscapedTab => output.push('\t'),
            StringPart::EscapedCodepoint => match codepoint? {
                high @ 0xD800..=0xDBFF => high_surrogate = Some(high),
                codepoint => output
                    .push(std::char::from_u32(codepoint).unwrap_or(char::REPLACEMENT_CHARACTER)),
            },
            StringPart::EndString => {
                lex.bump(sublex.span().end);
                let arena: &'a bumpalo::Bump = lex.extras.arena;
                let output: &'a str = arena.alloc_str(&output);
                return Some(output);
            }
        }
    }
    None
}

fn parse_string<'a>(lex: &mut Lexer<'a, Token<'a>>) -> Option<&'a str> {
    // We can optimize lexing strings by avoiding the full StringPart lexer for strings without
    // escape codes, which are borrowed from the source as they are
    let remainder = lex.remainder();
    for (i, c) in remainder.char_indices() {
        match c {
            '\u{0}'..='\u{1F}' => return None,
            '\\' => {
                lex.bump(i);
                return lex_string(lex, remainder[0..i].to_string());
            }
            '"' => {
                lex.bump(i + 1);
                return Some(&remainder[0..i]);
            }
            _ => {}
        }
    }
    None
}

/// Checks whether the input, which has an invalid token at `start`, ended in the middle of a
/// token rather than containing a malformed one.
pub(crate) fn is_truncated(source: &str, start: usize) -> bool {
    let rest = &source[start..];
    if let Some(string) = rest.strip_prefix('"') {
        let mut escaped = false;
        for c in string.chars() {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' | '\u{0}'..='\u{1F}' => return false,
                _ => {}
            }
        }
        true
    } else if ["null", "true", "false"].iter().any(|lit| lit.starts_with(rest)) {
        true
    } else {
        // The lexer may have split a cut-off number, so its start is searched for backwards.
        let number = source[..start]
            .trim_end_matches(|c: char| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
            .len();
        is_number_prefix(&source[number..])
    }
}

/// Checks whether `text` is a JSON number missing only its trailing characters.
fn is_number_prefix(text: &str) -> bool {
    fn digits(chars: &mut Peekable<Chars<'_>>) -> usize {
        let mut count = 0;
        while chars.next_if(|c| c.is_ascii_digit()).is_some() {
            count += 1;
        }
        count
    }

    let mut chars = text.chars().peekable();
    if text.is_empty() {
        return false;
    }
    chars.next_if_eq(&'-');
    if chars.peek().is_none() {
        return true;
    }
    if digits(&mut chars) == 0 {
        return false;
    }
    if chars.next_if_eq(&'.').is_some() {
        digits(&mut chars);
    }
    if chars.next_if(|c| matches!(c, 'e' | 'E')).is_some() {
        chars.next_if(|c| matches!(c, '+' | '-'));
        digits(&mut chars);
    }
    chars.peek().is_none()
}
