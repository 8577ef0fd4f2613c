use serde::{Deserialize, Serialize};

/// A persisted book as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    /// Database-assigned identifier (hex ObjectId)
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub author: String,
    pub year: i64,
    pub number_pages: i64,
    /// Cover image URL
    pub cover: String,
    pub description: String,
    /// Storage version counter; omitted from collection listings
    #[serde(rename = "__v", default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i32>,
}

/// The six user-supplied attributes of a book, already validated and coerced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookFields {
    pub title: String,
    pub author: String,
    pub year: i64,
    pub number_pages: i64,
    pub cover: String,
    pub description: String,
}
