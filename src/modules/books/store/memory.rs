//! In-process [`BookStore`] with the same observable semantics as the Mongo one.

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use tokio::sync::RwLock;

use super::{BookStore, StoreError};
use crate::modules::books::models::{Book, BookFields};

#[derive(Default)]
pub struct InMemoryBookStore {
    books: RwLock<Vec<Book>>,
}

impl InMemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.books.read().await.len()
    }
}

fn overwrite(book: &mut Book, fields: BookFields) {
    book.title = fields.title;
    book.author = fields.author;
    book.year = fields.year;
    book.number_pages = fields.number_pages;
    book.cover = fields.cover;
    book.description = fields.description;
}

#[async_trait]
impl BookStore for InMemoryBookStore {
    async fn list_all(&self) -> Result<Vec<Book>, StoreError> {
        let books = self.books.read().await;
        Ok(books
            .iter()
            .cloned()
            .map(|book| Book {
                version: None,
                ..book
            })
            .collect())
    }

    async fn create(&self, fields: BookFields) -> Result<Book, StoreError> {
        let book = Book {
            id: ObjectId::new().to_hex(),
            title: fields.title,
            author: fields.author,
            year: fields.year,
            number_pages: fields.number_pages,
            cover: fields.cover,
            description: fields.description,
            version: Some(0),
        };

        self.books.write().await.push(book.clone());
        Ok(book)
    }

    async fn update(&self, id: &str, fields: BookFields) -> Result<Book, StoreError> {
        let mut books = self.books.write().await;
        let book = books
            .iter_mut()
            .find(|book| book.id == id)
            .ok_or(StoreError::NotFound)?;

        overwrite(book, fields);
        Ok(book.clone())
    }

    async fn remove(&self, id: &str) -> Result<Book, StoreError> {
        let mut books = self.books.write().await;
        let index = books
            .iter()
            .position(|book| book.id == id)
            .ok_or(StoreError::NotFound)?;

        Ok(books.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(title: &str) -> BookFields {
        BookFields {
            title: title.to_string(),
            author: "Herbert".to_string(),
            year: 1965,
            number_pages: 412,
            cover: "url".to_string(),
            description: "desc".to_string(),
        }
    }

    #[tokio::test]
    async fn empty_store_lists_nothing() {
        let store = InMemoryBookStore::new();
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_then_list_round_trips() {
        let store = InMemoryBookStore::new();
        let saved = store.create(fields("Dune")).await.unwrap();
        assert_eq!(saved.version, Some(0));

        let books = store.list_all().await.unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].id, saved.id);
        assert_eq!(books[0].title, "Dune");
        assert_eq!(books[0].version, None);
    }

    #[tokio::test]
    async fn update_replaces_every_field() {
        let store = InMemoryBookStore::new();
        let saved = store.create(fields("Dune")).await.unwrap();

        let replacement = BookFields {
            title: "Dune Messiah".to_string(),
            author: "Frank Herbert".to_string(),
            year: 1969,
            number_pages: 256,
            cover: "cover2".to_string(),
            description: "sequel".to_string(),
        };
        let updated = store.update(&saved.id, replacement.clone()).await.unwrap();
        assert_eq!(updated.title, replacement.title);
        assert_eq!(updated.number_pages, 256);

        let books = store.list_all().await.unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].author, "Frank Herbert");
        assert_eq!(books[0].year, 1969);
        assert_eq!(books[0].cover, "cover2");
        assert_eq!(books[0].description, "sequel");
    }

    #[tokio::test]
    async fn unknown_ids_leave_collection_unchanged() {
        let store = InMemoryBookStore::new();
        store.create(fields("Dune")).await.unwrap();
        let missing = ObjectId::new().to_hex();

        assert!(matches!(
            store.update(&missing, fields("Other")).await,
            Err(StoreError::NotFound)
        ));
        assert!(matches!(store.remove(&missing).await, Err(StoreError::NotFound)));

        let books = store.list_all().await.unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].title, "Dune");
    }

    #[tokio::test]
    async fn remove_deletes_exactly_one() {
        let store = InMemoryBookStore::new();
        let first = store.create(fields("Dune")).await.unwrap();
        let second = store.create(fields("Emma")).await.unwrap();

        let removed = store.remove(&first.id).await.unwrap();
        assert_eq!(removed.id, first.id);

        let books = store.list_all().await.unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].id, second.id);
    }
}
