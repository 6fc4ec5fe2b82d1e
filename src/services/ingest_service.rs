use crate::domain::{Entry, FeedSource, NewEntry};
use crate::sources::FeedFetcher;
use crate::storage::{EntryRepository, InsertOutcome};

/// Outcome of one source within a cycle. `new_entries` holds only entries
/// inserted during this run; duplicates and failures are counted, not kept.
#[derive(Debug)]
pub struct SourceReport {
    pub source: FeedSource,
    pub new_entries: Vec<Entry>,
    pub duplicates: usize,
    pub failures: usize,
    pub fetch_failed: bool,
}

/// Everything one ingestion run produced, returned by value so no new-item
/// state survives across runs.
#[derive(Debug, Default)]
pub struct CycleReport {
    pub sources: Vec<SourceReport>,
}

impl CycleReport {
    pub fn total_new(&self) -> usize {
        self.sources.iter().map(|s| s.new_entries.len()).sum()
    }

    pub fn total_failures(&self) -> usize {
        self.sources.iter().map(|s| s.failures).sum()
    }
}

pub struct IngestService<R: EntryRepository, F: FeedFetcher> {
    repository: R,
    fetcher: F,
}

impl<R: EntryRepository, F: FeedFetcher> IngestService<R, F> {
    pub fn new(repository: R, fetcher: F) -> Self {
        Self {
            repository,
            fetcher,
        }
    }

    /// Run one ingestion pass over all sources in configuration order.
    /// A source's fetch or storage trouble never aborts the others.
    pub fn run_cycle(&self, sources: &[FeedSource]) -> CycleReport {
        let mut report = CycleReport::default();

        for source in sources {
            report.sources.push(self.ingest_source(source));
        }

        tracing::info!(
            new = report.total_new(),
            failures = report.total_failures(),
            sources = sources.len(),
            "ingestion cycle finished"
        );

        report
    }

    fn ingest_source(&self, source: &FeedSource) -> SourceReport {
        let mut result = SourceReport {
            source: source.clone(),
            new_entries: Vec::new(),
            duplicates: 0,
            failures: 0,
            fetch_failed: false,
        };

        let items = match self.fetcher.fetch(&source.url) {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!(source = %source.name, url = %source.url, error = %e, "feed fetch failed, skipping source");
                result.fetch_failed = true;
                return result;
            }
        };

        for item in items {
            let entry = NewEntry::new(item.guid, item.link, item.title)
                .with_description(item.description)
                .with_published_at(item.published_at)
                .with_provenance(&source.category, &source.name);

            match self.repository.insert(&entry) {
                Ok(InsertOutcome::Inserted(stored)) => result.new_entries.push(stored),
                Ok(InsertOutcome::Duplicate) => result.duplicates += 1,
                Err(e) => {
                    tracing::warn!(source = %source.name, link = %entry.link, error = %e, "entry insert failed");
                    result.failures += 1;
                }
            }
        }

        tracing::info!(
            source = %source.name,
            category = %source.category,
            new = result.new_entries.len(),
            duplicates = result.duplicates,
            failures = result.failures,
            "source processed"
        );

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::FeedgrepError;
    use crate::sources::traits::MockFeedFetcher;
    use crate::sources::FetchedItem;
    use crate::storage::sqlite::{SqliteEntryRepository, SqliteStorage};

    fn item(guid: &str, link: &str, title: &str) -> FetchedItem {
        FetchedItem {
            guid: guid.to_string(),
            link: link.to_string(),
            title: title.to_string(),
            description: String::new(),
            published_at: String::new(),
        }
    }

    fn repo() -> SqliteEntryRepository {
        SqliteEntryRepository::new(SqliteStorage::in_memory().unwrap())
    }

    #[test]
    fn test_cycle_inserts_new_entries_with_provenance() {
        let mut fetcher = MockFeedFetcher::new();
        fetcher.expect_fetch().returning(|_| {
            Ok(vec![
                item("g1", "https://example.com/1", "One"),
                item("g2", "https://example.com/2", "Two"),
            ])
        });

        let service = IngestService::new(repo(), fetcher);
        let sources = vec![FeedSource::new("Example", "https://example.com/feed", "tech")];

        let report = service.run_cycle(&sources);

        assert_eq!(report.total_new(), 2);
        let entries = &report.sources[0].new_entries;
        assert_eq!(entries[0].category, "tech");
        assert_eq!(entries[0].source_name, "Example");
        assert!(!entries[0].ingested_at.is_empty());
    }

    #[test]
    fn test_rerun_reports_zero_new_items() {
        let mut fetcher = MockFeedFetcher::new();
        fetcher.expect_fetch().times(2).returning(|_| {
            Ok(vec![
                item("g1", "https://example.com/1", "One"),
                item("g2", "https://example.com/2", "Two"),
            ])
        });

        let repository = std::sync::Arc::new(repo());
        let service = IngestService::new(repository.clone(), fetcher);
        let sources = vec![FeedSource::new("Example", "https://example.com/feed", "tech")];

        let first = service.run_cycle(&sources);
        assert_eq!(first.total_new(), 2);
        assert_eq!(repository.count().unwrap(), 2);

        let second = service.run_cycle(&sources);
        assert_eq!(second.total_new(), 0);
        assert_eq!(second.sources[0].duplicates, 2);
        assert_eq!(repository.count().unwrap(), 2);
    }

    #[test]
    fn test_fetch_failure_does_not_abort_later_sources() {
        let mut fetcher = MockFeedFetcher::new();
        fetcher.expect_fetch().returning(|url| {
            if url.contains("broken") {
                Err(FeedgrepError::FeedFetch {
                    url: url.to_string(),
                    reason: "connection refused".to_string(),
                })
            } else {
                Ok(vec![item("g1", "https://ok.example/1", "One")])
            }
        });

        let service = IngestService::new(repo(), fetcher);
        let sources = vec![
            FeedSource::new("Broken", "https://broken.example/feed", "tech"),
            FeedSource::new("Fine", "https://ok.example/feed", "tech"),
        ];

        let report = service.run_cycle(&sources);

        assert!(report.sources[0].fetch_failed);
        assert!(report.sources[0].new_entries.is_empty());
        assert_eq!(report.sources[1].new_entries.len(), 1);
    }

    #[test]
    fn test_duplicate_links_across_sources_kept_once() {
        let mut fetcher = MockFeedFetcher::new();
        fetcher
            .expect_fetch()
            .returning(|_| Ok(vec![item("shared", "https://example.com/shared", "Shared")]));

        let repository = std::sync::Arc::new(repo());
        let service = IngestService::new(repository.clone(), fetcher);
        let sources = vec![
            FeedSource::new("A", "https://a.example/feed", "tech"),
            FeedSource::new("B", "https://b.example/feed", "news"),
        ];

        let report = service.run_cycle(&sources);

        assert_eq!(report.total_new(), 1);
        assert_eq!(report.sources[1].duplicates, 1);
        assert_eq!(repository.count().unwrap(), 1);
    }
}
