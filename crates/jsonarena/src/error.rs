//! Error types for parsing and tree mutation.

use thiserror::Error;

/// Errors returned by fallible arena operations.
///
/// Parse failures carry the byte offset where scanning stopped. Every other
/// variant describes a structural precondition that was not met; in that case
/// the tree is left exactly as it was before the call.
#[derive(Error, Debug)]
pub enum Error {
    /// The input text was not a valid JSON document.
    #[error("JSON parse error at byte {offset}: {kind}")]
    Parse { offset: usize, kind: SyntaxError },

    /// The handle was minted by another arena, or its slot was vacated by a
    /// move, a delete, or an overwrite of an enclosing container.
    #[error("stale value handle")]
    StaleHandle,

    /// The receiver is not an object.
    #[error("value is not an object")]
    NotAnObject,

    /// The receiver is not an array.
    #[error("value is not an array")]
    NotAnArray,

    /// A value without a key cannot become an object member.
    #[error("value has no key and cannot be added to an object")]
    MissingKey,

    /// No object member matched the requested key.
    #[error("no member with key {0:?}")]
    KeyNotFound(String),

    #[error("index {index} out of bounds for array of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// The text passed to `set_num_str` does not match the JSON number grammar.
    #[error("invalid JSON number: {0:?}")]
    InvalidNumber(String),

    /// The move would place a value inside its own subtree.
    #[error("cannot move a value into its own subtree")]
    CyclicMove,

    /// A stored number could not be represented by `serde_json::Number`.
    #[error("number {0:?} is not representable as serde_json::Number")]
    Number(String),
}

/// Reason a parse stopped.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxError {
    #[error("input is not valid UTF-8")]
    InvalidUtf8,
    #[error("unexpected end of input")]
    UnexpectedEnd,
    #[error("unexpected character {0:?}")]
    UnexpectedChar(char),
    #[error("expected ':' after object key")]
    ExpectedColon,
    #[error("expected ',' or '}}' after object member")]
    ExpectedObjectEnd,
    #[error("expected ',' or ']' after array element")]
    ExpectedArrayEnd,
    #[error("object keys must be strings")]
    KeyMustBeString,
    #[error("trailing comma before closing delimiter")]
    TrailingComma,
    #[error("invalid escape sequence")]
    InvalidEscape,
    #[error("invalid unicode escape")]
    InvalidUnicodeEscape,
    #[error("unescaped control character in string")]
    ControlCharacter,
    #[error("invalid number")]
    InvalidNumber,
    #[error("invalid literal")]
    InvalidLiteral,
    #[error("nesting deeper than {0} levels")]
    TooDeep(usize),
    #[error("trailing content after JSON value")]
    TrailingContent,
}

/// Convenience alias used throughout jsonarena.
pub type Result<T> = std::result::Result<T, Error>;
