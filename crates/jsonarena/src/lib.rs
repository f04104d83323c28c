//! # jsonarena
//!
//! Arena-backed JSON document engine: parse JSON text into a value tree, query
//! and mutate the tree, and serialize it back to minified JSON.
//!
//! All values of a document live in one [`Arena`]. Values are addressed by
//! [`ValueRef`] handles, which are `Copy` and checked on every use: a handle
//! whose value was moved, deleted, or discarded by an overwrite is reported as
//! stale instead of reading unrelated memory. Releasing (or dropping) the
//! arena frees the whole document at once.
//!
//! Strings, keys and numbers are stored as they appear in JSON text. Numbers
//! are never converted to binary; strings keep their escaped form and are
//! unescaped lazily on request.
//!
//! ## Quick start
//!
//! ```rust
//! use jsonarena::{Arena, JsonType};
//!
//! let mut arena = Arena::new();
//! let doc = arena.parse_document(r#"{"a":1,"b":[true,false,null]}"#).unwrap();
//!
//! let a = arena.obj_get(doc, "a").unwrap();
//! assert_eq!(arena.get_num(a), Some("1"));
//!
//! let b = arena.obj_get(doc, "b").unwrap();
//! let second = arena.array_get(b, 1).unwrap();
//! assert_eq!(arena.json_type(second), Some(JsonType::Bool));
//! assert_eq!(arena.get_bool(second), Some(false));
//!
//! let note = arena.new_value();
//! arena.set_key(note, "note").unwrap();
//! arena.set_str_escape(note, "line1\nline2").unwrap();
//! arena.obj_add_fast(doc, note).unwrap();
//!
//! assert_eq!(
//!     arena.stringify(doc).unwrap(),
//!     r#"{"a":1,"b":[true,false,null],"note":"line1\nline2"}"#
//! );
//! ```
//!
//! ## Modules
//!
//! - [`arena`] — slot and text storage, release, stats
//! - [`parser`] — JSON text → tree (`parse`, `parse_with`, [`ParseOptions`])
//! - [`serializer`] — tree → minified JSON (`stringify`)
//! - [`query`] — typed getters, `obj_get`/`array_get`, `begin`/`next`
//! - [`mutate`] — setters, add/delete, copy and move
//! - [`escape`] — escaped ↔ unescaped string conversion
//! - [`interop`] — conversion to and from `serde_json::Value`
//! - [`error`] — error types

pub mod arena;
pub mod error;
pub mod escape;
pub mod interop;
pub mod mutate;
pub mod parser;
pub mod query;
pub mod serializer;
pub mod types;
mod value;

pub use arena::{Arena, ArenaStats};
pub use error::{Error, Result, SyntaxError};
pub use parser::{ParseOptions, TrailingContent};
pub use query::Children;
pub use types::JsonType;
pub use value::ValueRef;
