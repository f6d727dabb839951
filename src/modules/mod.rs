pub mod authors;
pub mod books;

use std::sync::Arc;

use shelf_db::Database;
use shelf_kernel::ModuleRegistry;

use authors::{repository::SqlAuthorRepository, service::AuthorService};
use books::{repository::SqlBookRepository, service::BookService};

/// Wire store -> repositories -> services -> modules and register them
pub fn register_all(registry: &mut ModuleRegistry, db: &Database) {
    let author_repository = Arc::new(SqlAuthorRepository::new(db.pool().clone()));
    let book_repository = Arc::new(SqlBookRepository::new(db.pool().clone()));

    let author_service = AuthorService::new(author_repository.clone());
    let book_service = BookService::new(book_repository, author_repository);

    registry.register(authors::create_module(author_service));
    registry.register(books::create_module(book_service));
}
