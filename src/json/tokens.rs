use super::lexer::{is_truncated, Extras, Token};
use crate::error::{get_location, print_span, Error, ErrorType, Result};
use crate::shape::Scalar;
use logos::{Lexer, Logos};

/// A syntactic JSON token, as yielded by the [TokenReader].
///
/// Commas and colons are consumed by the reader and never yielded.
#[derive(Debug, PartialEq, Clone, Copy)]
pub(crate) enum JsonToken<'a> {
    ObjectStart,
    ObjectEnd,
    ArrayStart,
    ArrayEnd,
    /// The name of an object's property, which is always followed by its value.
    Key(&'a str),
    Null,
    Scalar(Scalar<'a>),
}

#[derive(Debug, PartialEq, Clone, Copy)]
enum Container {
    Object,
    Array,
}

/// What the reader accepts next.
#[derive(Debug, PartialEq, Clone, Copy)]
enum Expect {
    Value,
    ValueOrArrayEnd,
    KeyOrObjectEnd,
    Key,
    Colon,
    CommaOrEnd,
    /// The root value has been closed.
    Done,
}

/// A forward-only reader of JSON tokens which validates the JSON grammar as it goes.
///
/// Tokens are pulled one at a time; nothing is read ahead of the token that's returned.
pub(crate) struct TokenReader<'a> {
    lexer: Lexer<'a, Token<'a>>,
    containers: Vec<Container>,
    expect: Expect,
}

impl<'a> TokenReader<'a> {
    pub(crate) fn new(source: &'a str, arena: &'a bumpalo::Bump) -> Self {
        TokenReader {
            lexer: Token::lexer_with_extras(source, Extras { arena }),
            containers: Vec::new(),
            expect: Expect::Value,
        }
    }

    /// Returns the next token, or `None` once the input has ended after a complete value.
    pub(crate) fn next_token(&mut self) -> Result<Option<JsonToken<'a>>> {
        loop {
            let token = match self.lexer.next() {
                Some(token) => token,
                None if self.expect == Expect::Done => return Ok(None),
                None => return Err(self.end_of_input()),
            };
            match (self.expect, token) {
                (Expect::Done, _) => {
                    return Err(self.error(
                        "JSON data contains extraneous token after the root value",
                        ErrorType::TrailingData,
                    ))
                }
                (_, Token::Error | Token::End) => {
                    let start = self.lexer.span().start;
                    return Err(if is_truncated(self.lexer.source(), start) {
                        self.end_of_input()
                    } else {
                        self.error("Invalid JSON token", ErrorType::MalformedJson)
                    });
                }
                (Expect::Colon, Token::Colon) => self.expect = Expect::Value,
                (Expect::CommaOrEnd, Token::Comma) => {
                    self.expect = match self.containers.last() {
                        Some(Container::Object) => Expect::Key,
                        _ => Expect::Value,
                    }
                }
                (Expect::CommaOrEnd | Expect::KeyOrObjectEnd, Token::BraceClose)
                    if self.containers.last() == Some(&Container::Object) =>
                {
                    self.containers.pop();
                    self.after_value();
                    return Ok(Some(JsonToken::ObjectEnd));
                }
                (Expect::CommaOrEnd | Expect::ValueOrArrayEnd, Token::BracketClose)
                    if self.containers.last() == Some(&Container::Array) =>
                {
                    self.containers.pop();
                    self.after_value();
                    return Ok(Some(JsonToken::ArrayEnd));
                }
                (Expect::KeyOrObjectEnd | Expect::Key, Token::String(key)) => {
                    self.expect = Expect::Colon;
                    return Ok(Some(JsonToken::Key(key)));
                }
                (Expect::Value | Expect::ValueOrArrayEnd, token) => return self.value(token).map(Some),
                _ => return Err(self.error("Unexpected JSON token", ErrorType::MalformedJson)),
            }
        }
    }

    /// Returns the next token, failing if the input has ended.
    pub(crate) fn next_required(&mut self) -> Result<JsonToken<'a>> {
        match self.next_token()? {
            Some(token) => Ok(token),
            None => Err(self.end_of_input()),
        }
    }

    #[inline]
    fn value(&mut self, token: Token<'a>) -> Result<JsonToken<'a>> {
        let token = match token {
            Token::BraceOpen => {
                self.containers.push(Container::Object);
                self.expect = Expect::KeyOrObjectEnd;
                return Ok(JsonToken::ObjectStart);
            }
            Token::BracketOpen => {
                self.containers.push(Container::Array);
                self.expect = Expect::ValueOrArrayEnd;
                return Ok(JsonToken::ArrayStart);
            }
            Token::Null => JsonToken::Null,
            Token::True => JsonToken::Scalar(Scalar::Bool(true)),
            Token::False => JsonToken::Scalar(Scalar::Bool(false)),
            Token::Number(number) => JsonToken::Scalar(Scalar::Number(number)),
            Token::String(string) => JsonToken::Scalar(Scalar::String(string)),
            _ => return Err(self.error("Unexpected JSON token", ErrorType::MalformedJson)),
        };
        self.after_value();
        Ok(token)
    }

    #[inline]
    fn after_value(&mut self) {
        self.expect = if self.containers.is_empty() {
            Expect::Done
        } else {
            Expect::CommaOrEnd
        };
    }

    fn end_of_input(&self) -> Error {
        Error::new("Unexpected end of JSON input", ErrorType::UnexpectedEndOfInput)
    }

    /// Create an error pointing at the last token that was read.
    pub(crate) fn error<S: Into<String>>(&self, message: S, error_type: ErrorType) -> Error {
        self.locate(Error::new(message, error_type))
    }

    /// Attach the location of the last token that was read to an error that has none.
    pub(crate) fn locate(&self, mut error: Error) -> Error {
        let source = self.lexer.source();
        let span = self.lexer.span();
        if error.location.is_none() && span.end <= source.len() && !source.is_empty() {
            error.location = Some(get_location(source, span.clone()));
            error.context = Some(print_span(source, span));
        }
        error
    }
}

#[cfg(test)]
mod tests {
    use super::{JsonToken, TokenReader};
    use crate::error::ErrorType;
    use crate::shape::Scalar;
    use bumpalo::Bump;

    fn read_all(source: &str) -> Result<Vec<String>, ErrorType> {
        let arena = Bump::new();
        let mut reader = TokenReader::new(source, &arena);
        let mut out = Vec::new();
        loop {
            match reader.next_token() {
                Ok(Some(token)) => out.push(format!("{:?}", token)),
                Ok(None) => return Ok(out),
                Err(error) => return Err(error.error_type()),
            }
        }
    }

    #[test]
    fn tokens() {
        let arena = Bump::new();
        let mut reader = TokenReader::new(r#"{"a": [1, "x", true, null], "b": {}}"#, &arena);
        assert_eq!(reader.next_token().unwrap(), Some(JsonToken::ObjectStart));
        assert_eq!(reader.next_token().unwrap(), Some(JsonToken::Key("a")));
        assert_eq!(reader.next_token().unwrap(), Some(JsonToken::ArrayStart));
        assert_eq!(
            reader.next_token().unwrap(),
            Some(JsonToken::Scalar(Scalar::Number("1")))
        );
        assert_eq!(
            reader.next_token().unwrap(),
            Some(JsonToken::Scalar(Scalar::String("x")))
        );
        assert_eq!(
            reader.next_token().unwrap(),
            Some(JsonToken::Scalar(Scalar::Bool(true)))
        );
        assert_eq!(reader.next_token().unwrap(), Some(JsonToken::Null));
        assert_eq!(reader.next_token().unwrap(), Some(JsonToken::ArrayEnd));
        assert_eq!(reader.next_token().unwrap(), Some(JsonToken::Key("b")));
        assert_eq!(reader.next_token().unwrap(), Some(JsonToken::ObjectStart));
        assert_eq!(reader.next_token().unwrap(), Some(JsonToken::ObjectEnd));
        assert_eq!(reader.next_token().unwrap(), Some(JsonToken::ObjectEnd));
        assert_eq!(reader.next_token().unwrap(), None);
    }

    #[test]
    fn grammar() {
        assert!(read_all("[]").is_ok());
        assert!(read_all(" {\n} ").is_ok());
        assert_eq!(read_all(r#"{"a" 1}"#), Err(ErrorType::MalformedJson));
        assert_eq!(read_all(r#"{"a":1,}"#), Err(ErrorType::MalformedJson));
        assert_eq!(read_all(r#"[1 2]"#), Err(ErrorType::MalformedJson));
        assert_eq!(read_all(r#"{1:2}"#), Err(ErrorType::MalformedJson));
        assert_eq!(read_all(r#"[}"#), Err(ErrorType::MalformedJson));
        assert_eq!(read_all(r#"{"a":nope}"#), Err(ErrorType::MalformedJson));
    }

    #[test]
    fn truncated_input() {
        assert_eq!(read_all(""), Err(ErrorType::UnexpectedEndOfInput));
        assert_eq!(read_all(r#"{"a":"#), Err(ErrorType::UnexpectedEndOfInput));
        assert_eq!(read_all(r#"{"a":[1,"#), Err(ErrorType::UnexpectedEndOfInput));
        assert_eq!(read_all(r#"{"a":"unterminated"#), Err(ErrorType::UnexpectedEndOfInput));
        assert_eq!(read_all(r#"{"a":tr"#), Err(ErrorType::UnexpectedEndOfInput));
        assert_eq!(read_all(r#"{"a":1."#), Err(ErrorType::UnexpectedEndOfInput));
        assert_eq!(read_all(r#"{"a":[-1e+"#), Err(ErrorType::UnexpectedEndOfInput));
        assert_eq!(read_all(r#"{"a":1.,"#), Err(ErrorType::MalformedJson));
    }

    #[test]
    fn trailing_data() {
        assert_eq!(read_all("{} {}"), Err(ErrorType::TrailingData));
        assert_eq!(read_all("{}]"), Err(ErrorType::TrailingData));
    }

    #[test]
    fn error_location() {
        let arena = Bump::new();
        let mut reader = TokenReader::new("{\n  \"a\" 1\n}", &arena);
        reader.next_token().unwrap();
        reader.next_token().unwrap();
        let error = reader.next_token().unwrap_err();
        let location = error.location().clone().unwrap();
        assert_eq!((location.line, location.column), (2, 6));
    }
}
