//! Documents and identifiers.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, InvalidInputError};

/// Field map of a document. Values are kept as loosely typed JSON scalars.
pub type Fields = serde_json::Map<String, Value>;

/// Maximum identifier length in bytes.
const MAX_IDENTIFIER_LEN: usize = 1500;

/// A document read from a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Identifier of the document within its collection.
    pub id: String,

    /// The document body.
    pub fields: Fields,
}

impl Document {
    /// Create a document from an id and its fields.
    pub fn new(id: impl Into<String>, fields: Fields) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Get a field value.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Consume the document, returning its body.
    pub fn into_fields(self) -> Fields {
        self.fields
    }
}

/// Validate a collection or document identifier.
///
/// Identifiers must be non-empty, at most 1500 bytes, must not be `.` or
/// `..`, must not contain `/` or `\`, and must not use the reserved
/// `__name__` form.
pub fn validate_identifier(s: &str) -> Result<(), Error> {
    let reason = if s.is_empty() {
        Some("cannot be empty".to_string())
    } else if s.len() > MAX_IDENTIFIER_LEN {
        Some(format!(
            "exceeds maximum length of {} bytes",
            MAX_IDENTIFIER_LEN
        ))
    } else if s == "." || s == ".." {
        Some("cannot be '.' or '..'".to_string())
    } else if s.starts_with("__") && s.ends_with("__") {
        Some("names of the form __x__ are reserved".to_string())
    } else {
        s.chars()
            .find(|c| *c == '/' || *c == '\\' || c.is_control())
            .map(|c| format!("contains invalid character {:?}", c))
    };

    match reason {
        Some(reason) => Err(InvalidInputError::Identifier {
            value: s.to_string(),
            reason,
        }
        .into()),
        None => Ok(()),
    }
}
