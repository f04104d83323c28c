//! Public type tags for tree nodes.

use serde::Serialize;
use std::fmt;

/// The active representation of a value. Discriminants match the classic
/// C API numbering so they can cross an FFI boundary unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonType {
    Bool = 1,
    Array = 2,
    Object = 3,
    String = 4,
    Null = 5,
    Number = 6,
}

impl fmt::Display for JsonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JsonType::Bool => "bool",
            JsonType::Array => "array",
            JsonType::Object => "object",
            JsonType::String => "string",
            JsonType::Null => "null",
            JsonType::Number => "number",
        };
        f.write_str(name)
    }
}
