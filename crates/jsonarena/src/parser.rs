//! JSON text -> value tree.
//!
//! A single forward pass over the input bytes. Each value is written straight
//! into an arena slot: containers are registered first, then every member is
//! parsed into its own fresh slot and appended to the container's sibling
//! chain. String and number bytes are copied verbatim (escaped form) into the
//! arena text buffer; nothing is decoded to binary.
//!
//! # Key design decisions
//!
//! - **Atomic install**: the document is built under a scratch root and only
//!   moved into the caller's value once the whole input has been accepted. A
//!   failed parse leaves the target untouched; the scratch slots are reclaimed
//!   with the arena.
//! - **Validation without decoding**: escapes and surrogate pairs are checked
//!   during the scan so that every stored string unescapes cleanly later.
//! - **Bounded recursion**: nesting depth is capped by [`ParseOptions`].

use crate::arena::Arena;
use crate::error::{Error, Result, SyntaxError};
use crate::escape::{hex4, scan_number};
use crate::value::{Data, Node, Span, ValueRef};

/// What to do with non-whitespace bytes after the top-level value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrailingContent {
    /// Fail the parse.
    #[default]
    Reject,
    /// Stop after the first complete value and ignore the rest.
    Allow,
}

/// Parser configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Maximum nesting of arrays and objects.
    pub max_depth: usize,
    pub trailing: TrailingContent,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: 512,
            trailing: TrailingContent::Reject,
        }
    }
}

impl Arena {
    /// Parse `input` into `v`, replacing its previous contents.
    ///
    /// The input is UTF-8 JSON text, terminated by its length or by the first
    /// NUL byte. Whitespace (space, tab, CR, LF) is allowed between tokens.
    /// On error `v` keeps its previous contents.
    pub fn parse(&mut self, v: ValueRef, input: impl AsRef<[u8]>) -> Result<()> {
        self.parse_with(v, input, ParseOptions::default())
    }

    /// [`parse`](Self::parse) with explicit options.
    pub fn parse_with(
        &mut self,
        v: ValueRef,
        input: impl AsRef<[u8]>,
        options: ParseOptions,
    ) -> Result<()> {
        let target = self.resolve_mut(v)?;
        let input = input.as_ref();
        let input = match input.iter().position(|&b| b == 0) {
            Some(end) => &input[..end],
            None => input,
        };
        let text = std::str::from_utf8(input).map_err(|e| Error::Parse {
            offset: e.valid_up_to(),
            kind: SyntaxError::InvalidUtf8,
        })?;

        let scratch = self.alloc(Node::new(Data::Null));
        let mut parser = Parser {
            arena: self,
            src: text,
            pos: 0,
            depth: 0,
            options,
        };
        match parser.parse_document(scratch) {
            Ok(()) => {
                let data = self.take_data(scratch);
                self.install(target, data);
                tracing::trace!(bytes = text.len(), "parsed JSON document");
                Ok(())
            }
            Err(err) => {
                self.discard(scratch);
                tracing::debug!(error = %err, "JSON parse failed");
                Err(err)
            }
        }
    }

    /// Create a new root and parse `input` into it.
    pub fn parse_document(&mut self, input: impl AsRef<[u8]>) -> Result<ValueRef> {
        let v = self.new_value();
        self.parse(v, input)?;
        Ok(v)
    }
}

struct Parser<'a, 's> {
    arena: &'a mut Arena,
    src: &'s str,
    pos: usize,
    depth: usize,
    options: ParseOptions,
}

impl Parser<'_, '_> {
    fn parse_document(&mut self, root: usize) -> Result<()> {
        self.skip_whitespace();
        self.parse_value(root)?;
        self.skip_whitespace();
        if self.pos < self.src.len() && self.options.trailing == TrailingContent::Reject {
            return Err(self.fail(SyntaxError::TrailingContent));
        }
        Ok(())
    }

    fn fail(&self, kind: SyntaxError) -> Error {
        Error::Parse {
            offset: self.pos,
            kind,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    fn unexpected(&self) -> Error {
        match self.src[self.pos..].chars().next() {
            Some(c) => self.fail(SyntaxError::UnexpectedChar(c)),
            None => self.fail(SyntaxError::UnexpectedEnd),
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(b' ' | b'\t' | b'\r' | b'\n') = self.peek() {
            self.pos += 1;
        }
    }

    /// Parse one value at the cursor into slot `slot`.
    fn parse_value(&mut self, slot: usize) -> Result<()> {
        let data = match self.peek() {
            Some(b'{') => return self.parse_object(slot),
            Some(b'[') => return self.parse_array(slot),
            Some(b'"') => Data::String(self.parse_string()?),
            Some(b'-' | b'0'..=b'9') => Data::Number(self.parse_number()?),
            Some(b't') => self.parse_literal("true", Data::Bool(true))?,
            Some(b'f') => self.parse_literal("false", Data::Bool(false))?,
            Some(b'n') => self.parse_literal("null", Data::Null)?,
            _ => return Err(self.unexpected()),
        };
        self.arena.install(slot, data);
        Ok(())
    }

    fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > self.options.max_depth {
            return Err(self.fail(SyntaxError::TooDeep(self.options.max_depth)));
        }
        Ok(())
    }

    fn parse_object(&mut self, slot: usize) -> Result<()> {
        self.enter()?;
        self.pos += 1;
        let children = self.arena.new_children(slot);
        self.arena.install(slot, Data::Object(children));

        self.skip_whitespace();
        if self.peek() == Some(b'}') {
            self.pos += 1;
            self.depth -= 1;
            return Ok(());
        }

        loop {
            match self.peek() {
                Some(b'"') => {}
                None => return Err(self.fail(SyntaxError::UnexpectedEnd)),
                Some(_) => return Err(self.fail(SyntaxError::KeyMustBeString)),
            }
            let key = self.parse_string()?;

            self.skip_whitespace();
            match self.peek() {
                Some(b':') => self.pos += 1,
                None => return Err(self.fail(SyntaxError::UnexpectedEnd)),
                Some(_) => return Err(self.fail(SyntaxError::ExpectedColon)),
            }
            self.skip_whitespace();

            let mut member = Node::new(Data::Null);
            member.key = Some(key);
            let child = self.arena.alloc(member);
            self.arena.link_child(slot, child);
            self.parse_value(child)?;

            self.skip_whitespace();
            match self.peek() {
                Some(b',') => {
                    self.pos += 1;
                    self.skip_whitespace();
                    if self.peek() == Some(b'}') {
                        return Err(self.fail(SyntaxError::TrailingComma));
                    }
                }
                Some(b'}') => {
                    self.pos += 1;
                    break;
                }
                None => return Err(self.fail(SyntaxError::UnexpectedEnd)),
                Some(_) => return Err(self.fail(SyntaxError::ExpectedObjectEnd)),
            }
        }

        self.depth -= 1;
        Ok(())
    }

    fn parse_array(&mut self, slot: usize) -> Result<()> {
        self.enter()?;
        self.pos += 1;
        let children = self.arena.new_children(slot);
        self.arena.install(slot, Data::Array(children));

        self.skip_whitespace();
        if self.peek() == Some(b']') {
            self.pos += 1;
            self.depth -= 1;
            return Ok(());
        }

        loop {
            let child = self.arena.alloc(Node::new(Data::Null));
            self.arena.link_child(slot, child);
            self.parse_value(child)?;

            self.skip_whitespace();
            match self.peek() {
                Some(b',') => {
                    self.pos += 1;
                    self.skip_whitespace();
                    if self.peek() == Some(b']') {
                        return Err(self.fail(SyntaxError::TrailingComma));
                    }
                }
                Some(b']') => {
                    self.pos += 1;
                    break;
                }
                None => return Err(self.fail(SyntaxError::UnexpectedEnd)),
                Some(_) => return Err(self.fail(SyntaxError::ExpectedArrayEnd)),
            }
        }

        self.depth -= 1;
        Ok(())
    }

    /// Validate a quoted string at the cursor and copy its escaped body into
    /// the arena.
    fn parse_string(&mut self) -> Result<Span> {
        self.pos += 1;
        let start = self.pos;
        let src = self.src;
        let bytes = src.as_bytes();
        loop {
            match bytes.get(self.pos) {
                None => return Err(self.fail(SyntaxError::UnexpectedEnd)),
                Some(b'"') => break,
                Some(b'\\') => self.validate_escape()?,
                Some(&b) if b < 0x20 => return Err(self.fail(SyntaxError::ControlCharacter)),
                Some(_) => self.pos += 1,
            }
        }
        let body = &src[start..self.pos];
        self.pos += 1;
        Ok(self.arena.alloc_text(body))
    }

    /// Check the escape sequence at the cursor (which sits on the backslash)
    /// and advance past it.
    fn validate_escape(&mut self) -> Result<()> {
        let src = self.src;
        let bytes = src.as_bytes();
        match bytes.get(self.pos + 1) {
            Some(b'"' | b'\\' | b'/' | b'b' | b'f' | b'n' | b'r' | b't') => {
                self.pos += 2;
                Ok(())
            }
            Some(b'u') => {
                let high = self.read_hex4(self.pos + 2)?;
                if (0xDC00..=0xDFFF).contains(&high) {
                    return Err(self.fail(SyntaxError::InvalidUnicodeEscape));
                }
                if !(0xD800..=0xDBFF).contains(&high) {
                    self.pos += 6;
                    return Ok(());
                }
                if bytes.get(self.pos + 6) != Some(&b'\\') || bytes.get(self.pos + 7) != Some(&b'u')
                {
                    return Err(self.fail(SyntaxError::InvalidUnicodeEscape));
                }
                let low = self.read_hex4(self.pos + 8)?;
                if !(0xDC00..=0xDFFF).contains(&low) {
                    return Err(self.fail(SyntaxError::InvalidUnicodeEscape));
                }
                self.pos += 12;
                Ok(())
            }
            None => Err(self.fail(SyntaxError::UnexpectedEnd)),
            Some(_) => Err(self.fail(SyntaxError::InvalidEscape)),
        }
    }

    fn read_hex4(&self, at: usize) -> Result<u16> {
        let bytes = self.src.as_bytes();
        if at + 4 > bytes.len() {
            return Err(self.fail(SyntaxError::UnexpectedEnd));
        }
        hex4(&bytes[at..at + 4]).ok_or_else(|| self.fail(SyntaxError::InvalidUnicodeEscape))
    }

    fn parse_number(&mut self) -> Result<Span> {
        let src = self.src;
        let len = scan_number(&src.as_bytes()[self.pos..])
            .ok_or_else(|| self.fail(SyntaxError::InvalidNumber))?;
        let text = &src[self.pos..self.pos + len];
        self.pos += len;
        Ok(self.arena.alloc_text(text))
    }

    fn parse_literal(&mut self, literal: &str, data: Data) -> Result<Data> {
        let src = self.src;
        let rest = &src[self.pos..];
        if rest.starts_with(literal) {
            self.pos += literal.len();
            Ok(data)
        } else if literal.starts_with(rest) {
            Err(self.fail(SyntaxError::UnexpectedEnd))
        } else {
            Err(self.fail(SyntaxError::InvalidLiteral))
        }
    }
}
