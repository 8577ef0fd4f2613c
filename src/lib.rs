//! Bookshelf application library
//!
//! Feature modules of the book collection service.

pub mod modules;

pub use modules::*;
