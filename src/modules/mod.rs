pub mod books;

use std::sync::Arc;

use bookshelf_kernel::ModuleRegistry;
use mongodb::Database;

/// Register every feature module, handing each the storage it needs
pub fn register_all(registry: &mut ModuleRegistry, database: &Database) {
    let store = Arc::new(books::store::MongoBookStore::new(database));
    registry.register(books::create_module(store));
}
