pub mod digest;
pub mod entry;
pub mod rule;

pub use digest::PushMessage;
pub use entry::{Entry, NewEntry};
pub use rule::{FeedSource, KeywordRule};
