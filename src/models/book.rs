//! Book model and the loosely-typed create payload

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

/// Message returned when a create payload lacks a required field
pub const REQUIRED_FIELDS_MESSAGE: &str = "Please include required fields.";

/// Message returned when a create payload reuses an existing id
pub const DUPLICATE_ID_MESSAGE: &str = "Book Id already taken";

/// Book record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Unique key within the store
    pub id: i64,
    pub title: String,
    pub author: String,
    // Config sources lowercase their keys, hence the aliases.
    #[serde(alias = "yearpublished")]
    pub year_published: i64,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "wordcount")]
    pub word_count: Option<i64>,
}

/// Create book request.
///
/// Fields are kept as raw JSON so that presence can be judged by truthiness:
/// `0`, `""`, `false` and `null` count as missing. Only the members of a JSON
/// object are read; any other body yields a candidate with every field missing.
#[derive(Debug, Default, ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct BookCandidate {
    #[schema(value_type = Option<i64>)]
    pub id: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub title: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub author: Option<Value>,
    #[schema(value_type = Option<i64>)]
    pub year_published: Option<Value>,
    #[schema(value_type = Option<i64>)]
    pub word_count: Option<Value>,
}

impl From<Value> for BookCandidate {
    fn from(body: Value) -> Self {
        let Value::Object(mut fields) = body else {
            return Self::default();
        };

        Self {
            id: fields.remove("id"),
            title: fields.remove("title"),
            author: fields.remove("author"),
            year_published: fields.remove("yearPublished"),
            word_count: fields.remove("wordCount"),
        }
    }
}

impl BookCandidate {
    /// Whether `id`, `title`, `author` and `yearPublished` are all truthy
    pub fn has_required_fields(&self) -> bool {
        is_truthy(&self.id)
            && is_truthy(&self.title)
            && is_truthy(&self.author)
            && is_truthy(&self.year_published)
    }

    /// Validate the payload and build the typed record
    pub fn into_book(self) -> AppResult<Book> {
        if !self.has_required_fields() {
            return Err(AppError::BadRequest(REQUIRED_FIELDS_MESSAGE.to_string()));
        }

        let word_count = match self.word_count {
            None | Some(Value::Null) => None,
            Some(value) => Some(integer_field("wordCount", value)?),
        };

        Ok(Book {
            id: integer_field("id", self.id.unwrap_or_default())?,
            title: string_field("title", self.title.unwrap_or_default())?,
            author: string_field("author", self.author.unwrap_or_default())?,
            year_published: integer_field("yearPublished", self.year_published.unwrap_or_default())?,
            word_count,
        })
    }
}

fn is_truthy(value: &Option<Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map_or(true, |f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

fn integer_field(name: &str, value: Value) -> AppResult<i64> {
    match &value {
        Value::Number(n) => as_integer(n),
        _ => None,
    }
    .ok_or_else(|| AppError::Validation(format!("Field '{}' must be an integer", name)))
}

fn as_integer(n: &Number) -> Option<i64> {
    // 2000.0 is accepted as 2000; anything fractional or beyond i64 is not
    n.as_i64().or_else(|| {
        n.as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
            .map(|f| f as i64)
    })
}

fn string_field(name: &str, value: Value) -> AppResult<String> {
    match value {
        Value::String(s) => Ok(s),
        _ => Err(AppError::Validation(format!("Field '{}' must be a string", name))),
    }
}
