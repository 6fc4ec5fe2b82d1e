pub mod sqlite;
pub mod traits;

pub use traits::{EntryQuery, EntryRepository, InsertOutcome, MAX_LIMIT};
