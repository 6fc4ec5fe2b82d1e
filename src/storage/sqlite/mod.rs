pub mod connection;
pub mod entry_repository;

pub use connection::SqliteStorage;
pub use entry_repository::SqliteEntryRepository;
