pub mod collection;
pub mod manager;
pub mod memory;
pub mod models;
pub mod repository;
pub mod store;

pub use collection::{DocumentCollection, PgCollection};
pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryCollection;
pub use repository::{Document, Repository};
pub use store::Store;
