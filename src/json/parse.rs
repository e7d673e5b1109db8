//! Purpose: Recursive-descent JSON parser producing `Value` trees.
//! Exports: `Parser`, `parse_json`, `parse_json_with`.
//! Role: The only path from JSON text to values; errors carry line/column of the failure point.
//! Invariants: A failed parse drops every store it built; callers never see a partial tree.
//! Invariants: String payloads are the raw bytes between quotes; escapes are not decoded.
//! Invariants: Nesting is bounded by `ParseOptions::max_depth`.
//! Notes: The quoted tokens `"nan"` / `"-nan"` parse as NaN numbers unless disabled in options.
use std::collections::HashMap;

use crate::core::error::{Error, ErrorKind, Result};
use crate::core::value::{Kind, Value};
use crate::json::options::ParseOptions;

const NAN_TOKEN: &[u8] = b"\"nan\"";
const NEG_NAN_TOKEN: &[u8] = b"\"-nan\"";
const LITERALS: [&[u8]; 3] = [b"true", b"false", b"null"];

pub fn parse_json(text: &str) -> Result<Value> {
    parse_json_with(text, &ParseOptions::default())
}

pub fn parse_json_with(text: &str, options: &ParseOptions) -> Result<Value> {
    tracing::trace!(len = text.len(), "parsing json");
    let mut parser = Parser::new(text, *options);
    match parser.parse() {
        Ok(value) => {
            tracing::trace!(kind = %value.kind(), consumed = parser.position(), "parsed json");
            Ok(value)
        }
        Err(err) => {
            tracing::debug!(
                kind = err.kind().as_str(),
                line = err.line(),
                column = err.column(),
                "json parse failed"
            );
            Err(err)
        }
    }
}

/// Cursor over a complete JSON text.
#[derive(Debug)]
pub struct Parser<'a> {
    text: &'a str,
    input: &'a [u8],
    pos: usize,
    line: usize,
    column: usize,
    depth: usize,
    options: ParseOptions,
}

impl<'a> Parser<'a> {
    pub fn new(text: &'a str, options: ParseOptions) -> Self {
        Self {
            text,
            input: text.as_bytes(),
            pos: 0,
            line: 1,
            column: 1,
            depth: 0,
            options,
        }
    }

    /// Byte offset of the next unconsumed character.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn column(&self) -> usize {
        self.column
    }

    /// Parses one top-level value. Trailing content is checked only when options forbid it.
    pub fn parse(&mut self) -> Result<Value> {
        let value = self.parse_value()?;
        if !self.options.allow_trailing {
            self.skip_whitespace();
            if self.peek().is_some() {
                return Err(
                    self.error(ErrorKind::TrailingCharacters, "Unexpected trailing characters")
                );
            }
        }
        Ok(value)
    }

    /// Classifies the next character without consuming it. Does not skip whitespace.
    pub fn determine_type(&self) -> Kind {
        match self.peek() {
            Some(b'"') if self.options.nan_strings && self.is_nan_token() => Kind::Number,
            Some(b'"') => Kind::String,
            Some(b'-' | b'0'..=b'9') => Kind::Number,
            Some(b'{') => Kind::Object,
            Some(b'[') => Kind::Array,
            _ if self.looking_at(b"true") || self.looking_at(b"false") => Kind::Bool,
            _ => Kind::Null,
        }
    }

    pub fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\n' | b'\r')) {
            self.bump();
        }
    }

    /// Parses exactly one value, leaving the cursor just past it.
    pub fn parse_value(&mut self) -> Result<Value> {
        self.skip_whitespace();
        match self.determine_type() {
            Kind::String => self.parse_string().map(Value::from_string),
            Kind::Number => self.parse_number(),
            Kind::Bool => self.parse_bool(),
            Kind::Null => self.parse_null(),
            Kind::Object => self.parse_object(),
            Kind::Array => self.parse_array(),
        }
    }

    fn parse_string(&mut self) -> Result<&'a str> {
        self.skip_whitespace();
        self.expect(b'"', "Expected '\"'")?;
        let start = self.pos;
        loop {
            match self.bump() {
                None => return Err(self.eof()),
                Some(b'\\') => {
                    if self.bump().is_none() {
                        return Err(self.eof());
                    }
                }
                Some(b'"') => break,
                Some(_) => {}
            }
        }
        let text = self.text;
        Ok(&text[start..self.pos - 1])
    }

    fn parse_number(&mut self) -> Result<Value> {
        if self.options.nan_strings {
            if self.looking_at(NAN_TOKEN) {
                self.advance(NAN_TOKEN.len());
                return Ok(Value::from_number(f64::NAN));
            }
            if self.looking_at(NEG_NAN_TOKEN) {
                self.advance(NEG_NAN_TOKEN.len());
                return Ok(Value::from_number(-f64::NAN));
            }
        }

        let start = self.pos;
        let invalid = self.error(ErrorKind::InvalidNumber, "Invalid number");
        if self.peek() == Some(b'-') {
            self.bump();
        }
        match self.peek() {
            Some(b'0') => {
                self.bump();
            }
            _ => self.digits(&invalid)?,
        }
        if self.peek() == Some(b'.') {
            self.bump();
            self.digits(&invalid)?;
        }
        if matches!(self.peek(), Some(b'e' | b'E')) {
            self.bump();
            if matches!(self.peek(), Some(b'+' | b'-')) {
                self.bump();
            }
            self.digits(&invalid)?;
        }

        let text = self.text;
        let token = &text[start..self.pos];
        token
            .parse::<f64>()
            .map(Value::from_number)
            .map_err(|_| invalid.with_message(format!("Invalid number '{token}'")))
    }

    /// Consumes one or more ASCII digits.
    fn digits(&mut self, invalid: &Error) -> Result<()> {
        match self.peek() {
            Some(b'0'..=b'9') => {}
            None => return Err(self.eof()),
            Some(_) => return Err(invalid.clone()),
        }
        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.bump();
        }
        Ok(())
    }

    fn parse_bool(&mut self) -> Result<Value> {
        if self.looking_at(b"true") {
            self.advance(4);
            return Ok(Value::from_bool(true));
        }
        if self.looking_at(b"false") {
            self.advance(5);
            return Ok(Value::from_bool(false));
        }
        Err(self.unexpected())
    }

    fn parse_null(&mut self) -> Result<Value> {
        if self.looking_at(b"null") {
            self.advance(4);
            return Ok(Value::new_null());
        }
        Err(self.unexpected())
    }

    fn parse_object(&mut self) -> Result<Value> {
        self.skip_whitespace();
        self.enter(b'{', "Expected '{'")?;
        let mut entries = HashMap::new();

        self.skip_whitespace();
        if self.peek() == Some(b'}') {
            self.bump();
            self.depth -= 1;
            return Ok(Value::from_entries(entries));
        }

        loop {
            self.skip_whitespace();
            let key = self.parse_string()?;
            self.skip_whitespace();
            self.expect(b':', "Expected ':'")?;
            self.skip_whitespace();
            let value = self.parse_value()?;
            entries.insert(key.to_owned(), value);

            self.skip_whitespace();
            match self.peek() {
                Some(b',') => {
                    self.bump();
                }
                Some(b'}') => {
                    self.bump();
                    break;
                }
                None => return Err(self.eof()),
                Some(_) => return Err(self.error(ErrorKind::Syntax, "Expected ',' or '}'")),
            }
        }

        self.depth -= 1;
        Ok(Value::from_entries(entries))
    }

    fn parse_array(&mut self) -> Result<Value> {
        self.skip_whitespace();
        self.enter(b'[', "Expected '['")?;
        let mut elements = Vec::new();

        self.skip_whitespace();
        if self.peek() == Some(b']') {
            self.bump();
            self.depth -= 1;
            return Ok(Value::from_elements(elements));
        }

        loop {
            self.skip_whitespace();
            elements.push(self.parse_value()?);

            self.skip_whitespace();
            match self.peek() {
                Some(b',') => {
                    self.bump();
                }
                Some(b']') => {
                    self.bump();
                    break;
                }
                None => return Err(self.eof()),
                Some(_) => return Err(self.error(ErrorKind::Syntax, "Expected ',' or ']'")),
            }
        }

        self.depth -= 1;
        Ok(Value::from_elements(elements))
    }

    /// Consumes an opening bracket and descends one nesting level.
    fn enter(&mut self, open: u8, message: &str) -> Result<()> {
        if self.depth >= self.options.max_depth && self.peek() == Some(open) {
            let message = format!("Nesting too deep (max depth {})", self.options.max_depth);
            return Err(self.error(ErrorKind::DepthLimit, &message));
        }
        self.expect(open, message)?;
        self.depth += 1;
        Ok(())
    }

    fn expect(&mut self, byte: u8, message: &str) -> Result<()> {
        match self.peek() {
            Some(next) if next == byte => {
                self.bump();
                Ok(())
            }
            Some(_) => Err(self.error(ErrorKind::Syntax, message)),
            None => Err(self.eof()),
        }
    }

    fn is_nan_token(&self) -> bool {
        self.looking_at(NAN_TOKEN) || self.looking_at(NEG_NAN_TOKEN)
    }

    fn looking_at(&self, literal: &[u8]) -> bool {
        self.input[self.pos..].starts_with(literal)
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let byte = *self.input.get(self.pos)?;
        self.pos += 1;
        if byte == b'\n' {
            self.line += 1;
            self.column = 1;
        } else if byte & 0xC0 != 0x80 {
            // UTF-8 continuation bytes stay in the column of their lead byte.
            self.column += 1;
        }
        Some(byte)
    }

    fn advance(&mut self, count: usize) {
        for _ in 0..count {
            self.bump();
        }
    }

    fn error(&self, kind: ErrorKind, message: &str) -> Error {
        Error::new(kind, self.line, self.column)
            .with_message(message)
            .with_offset(self.pos)
    }

    fn eof(&self) -> Error {
        self.error(ErrorKind::UnexpectedEof, "Unexpected EOF")
    }

    /// Error for a token that is not a JSON value; a truncated literal reports EOF.
    fn unexpected(&self) -> Error {
        let rest = &self.input[self.pos..];
        if LITERALS
            .iter()
            .any(|literal| literal.len() > rest.len() && literal.starts_with(rest))
        {
            return self.eof();
        }
        match self.text[self.pos..].chars().next() {
            Some(ch) => self.error(ErrorKind::Syntax, &format!("Unexpected character '{ch}'")),
            None => self.eof(),
        }
    }
}
