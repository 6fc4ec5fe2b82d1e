pub mod ingest_service;
pub mod push_service;

pub use ingest_service::{CycleReport, IngestService, SourceReport};
pub use push_service::{DeliveryWindow, PushService};
