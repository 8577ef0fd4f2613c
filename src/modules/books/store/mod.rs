//! Data access for the `books` collection.

#[cfg(test)]
pub mod memory;

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId},
    options::ReturnDocument,
    Collection, Database,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::models::{Book, BookFields};

/// Name of the collection holding book documents.
pub const COLLECTION: &str = "books";

#[derive(Debug, Error)]
pub enum StoreError {
    /// The identifier does not resolve to a stored book.
    #[error("book not found")]
    NotFound,

    #[error(transparent)]
    Database(#[from] mongodb::error::Error),
}

/// Reads and writes on the book collection.
///
/// Identifiers that are not valid ObjectIds resolve to nothing, so
/// [`update`](BookStore::update) and [`remove`](BookStore::remove) report
/// them as [`StoreError::NotFound`].
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Every book in natural storage order, without the version field.
    async fn list_all(&self) -> Result<Vec<Book>, StoreError>;

    /// Insert a new book and return it with its assigned id.
    async fn create(&self, fields: BookFields) -> Result<Book, StoreError>;

    /// Overwrite all six fields of an existing book.
    async fn update(&self, id: &str, fields: BookFields) -> Result<Book, StoreError>;

    /// Delete a book and return its prior state.
    async fn remove(&self, id: &str) -> Result<Book, StoreError>;
}

/// Storage shape of a book document.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct BookDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    title: String,
    author: String,
    year: i64,
    number_pages: i64,
    cover: String,
    description: String,
    #[serde(rename = "__v", default, skip_serializing_if = "Option::is_none")]
    version: Option<i32>,
}

impl From<BookDocument> for Book {
    fn from(document: BookDocument) -> Self {
        Self {
            id: document.id.to_hex(),
            title: document.title,
            author: document.author,
            year: document.year,
            number_pages: document.number_pages,
            cover: document.cover,
            description: document.description,
            version: document.version,
        }
    }
}

/// [`BookStore`] backed by a MongoDB collection.
#[derive(Clone)]
pub struct MongoBookStore {
    collection: Collection<BookDocument>,
}

impl MongoBookStore {
    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.collection(COLLECTION),
        }
    }
}

#[async_trait]
impl BookStore for MongoBookStore {
    async fn list_all(&self) -> Result<Vec<Book>, StoreError> {
        let documents: Vec<BookDocument> = self
            .collection
            .find(doc! {})
            .projection(doc! { "__v": 0 })
            .await?
            .try_collect()
            .await?;

        Ok(documents.into_iter().map(Book::from).collect())
    }

    async fn create(&self, fields: BookFields) -> Result<Book, StoreError> {
        let document = BookDocument {
            id: ObjectId::new(),
            title: fields.title,
            author: fields.author,
            year: fields.year,
            number_pages: fields.number_pages,
            cover: fields.cover,
            description: fields.description,
            version: Some(0),
        };

        self.collection.insert_one(&document).await?;
        Ok(document.into())
    }

    async fn update(&self, id: &str, fields: BookFields) -> Result<Book, StoreError> {
        let oid = parse_id(id)?;
        let update = doc! {
            "$set": {
                "title": fields.title,
                "author": fields.author,
                "year": fields.year,
                "number_pages": fields.number_pages,
                "cover": fields.cover,
                "description": fields.description,
            }
        };

        self.collection
            .find_one_and_update(doc! { "_id": oid }, update)
            .return_document(ReturnDocument::After)
            .await?
            .map(Book::from)
            .ok_or(StoreError::NotFound)
    }

    async fn remove(&self, id: &str) -> Result<Book, StoreError> {
        let oid = parse_id(id)?;

        self.collection
            .find_one_and_delete(doc! { "_id": oid })
            .await?
            .map(Book::from)
            .ok_or(StoreError::NotFound)
    }
}

fn parse_id(id: &str) -> Result<ObjectId, StoreError> {
    ObjectId::parse_str(id).map_err(|_| StoreError::NotFound)
}
