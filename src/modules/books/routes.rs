//! HTTP handlers for the book collection.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{delete, get, post},
    Json, Router,
};
use bookshelf_http::error::AppError;
use serde::Serialize;

use super::models::Book;
use super::store::{BookStore, StoreError};
use super::validation::{self, BookForm};

pub const WELCOME_TEXT: &str = "Welcome to the library system";
pub const EDIT_NOT_FOUND: &str = "Book not found";
pub const DELETE_NOT_FOUND: &str = "Trying to delete a book not found, nothing happened";

pub type SharedStore = Arc<dyn BookStore>;

/// The book a write touched, keyed by what happened to it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mutation {
    SavedBook(Book),
    DeletedBook(Book),
}

/// `[{<mutation>: book}, [every book]]`
pub type MutationResponse = Json<(Mutation, Vec<Book>)>;

pub fn router(store: SharedStore) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/get-all-books", get(get_all_books))
        .route("/create-book", post(create_book))
        .route("/edit-book", post(edit_book))
        .route("/delete-book", delete(delete_book))
        .with_state(store)
}

async fn home() -> &'static str {
    tracing::debug!("home endpoint hit");
    WELCOME_TEXT
}

async fn get_all_books(State(store): State<SharedStore>) -> Result<Json<Vec<Book>>, AppError> {
    let books = store.list_all().await.map_err(AppError::database)?;
    Ok(Json(books))
}

async fn create_book(
    State(store): State<SharedStore>,
    payload: Result<Json<BookForm>, JsonRejection>,
) -> Result<MutationResponse, AppError> {
    let form = read_form(payload);
    let fields = validation::validate_create(&form).map_err(AppError::validation)?;

    let saved = store.create(fields).await.map_err(AppError::database)?;
    tracing::info!(id = %saved.id, title = %saved.title, "saved book");

    with_collection(store.as_ref(), Mutation::SavedBook(saved)).await
}

async fn edit_book(
    State(store): State<SharedStore>,
    payload: Result<Json<BookForm>, JsonRejection>,
) -> Result<MutationResponse, AppError> {
    let form = read_form(payload);
    let (id, fields) = validation::validate_edit(&form).map_err(AppError::validation)?;

    let saved = store
        .update(&id, fields)
        .await
        .map_err(|err| not_found_as(err, EDIT_NOT_FOUND))?;
    tracing::info!(id = %saved.id, title = %saved.title, "edited book");

    with_collection(store.as_ref(), Mutation::SavedBook(saved)).await
}

async fn delete_book(
    State(store): State<SharedStore>,
    payload: Result<Json<BookForm>, JsonRejection>,
) -> Result<MutationResponse, AppError> {
    let form = read_form(payload);
    let id = validation::validate_delete(&form).map_err(AppError::validation)?;

    let deleted = store
        .remove(&id)
        .await
        .map_err(|err| not_found_as(err, DELETE_NOT_FOUND))?;
    tracing::info!(id = %deleted.id, title = %deleted.title, "deleted book");

    with_collection(store.as_ref(), Mutation::DeletedBook(deleted)).await
}

/// Pair the touched book with a fresh read of the whole collection.
pub async fn with_collection(
    store: &dyn BookStore,
    mutation: Mutation,
) -> Result<MutationResponse, AppError> {
    let books = store.list_all().await.map_err(AppError::database)?;
    Ok(Json((mutation, books)))
}

/// A body that is missing or not a JSON object validates as an empty form.
fn read_form(payload: Result<Json<BookForm>, JsonRejection>) -> BookForm {
    match payload {
        Ok(Json(form)) => form,
        Err(rejection) => {
            tracing::debug!(%rejection, "unreadable request body, validating as empty");
            BookForm::default()
        }
    }
}

fn not_found_as(err: StoreError, message: &str) -> AppError {
    match err {
        StoreError::NotFound => AppError::not_found(message),
        other => AppError::database(other),
    }
}
