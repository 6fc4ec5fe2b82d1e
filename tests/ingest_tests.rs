use std::sync::Arc;

use feedgrep::domain::FeedSource;
use feedgrep::errors::FeedgrepResult;
use feedgrep::query::KeywordQuery;
use feedgrep::services::IngestService;
use feedgrep::sources::{FeedFetcher, FetchedItem};
use feedgrep::storage::sqlite::{SqliteEntryRepository, SqliteStorage};
use feedgrep::storage::{EntryQuery, EntryRepository};

/// Serves a fixed item set for every fetch, like a feed that never updates.
struct StaticFetcher {
    items: Vec<FetchedItem>,
}

impl FeedFetcher for StaticFetcher {
    fn fetch(&self, _url: &str) -> FeedgrepResult<Vec<FetchedItem>> {
        Ok(self.items.clone())
    }
}

fn item(guid: &str, link: &str, title: &str, description: &str) -> FetchedItem {
    FetchedItem {
        guid: guid.to_string(),
        link: link.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        published_at: "2024-08-05T10:00:00Z".to_string(),
    }
}

fn setup() -> (Arc<SqliteEntryRepository>, Vec<FeedSource>) {
    let repository = Arc::new(SqliteEntryRepository::new(
        SqliteStorage::in_memory().unwrap(),
    ));
    let sources = vec![FeedSource::new("Example", "https://example.com/feed", "tech")];
    (repository, sources)
}

#[test]
fn test_cycle_then_identical_rerun_leaves_two_rows_and_zero_new() {
    let (repository, sources) = setup();
    let fetcher = StaticFetcher {
        items: vec![
            item("g1", "https://example.com/1", "Rust release", "new borrow checker"),
            item("g2", "https://example.com/2", "Go release", "faster gc"),
        ],
    };
    let service = IngestService::new(repository.clone(), fetcher);

    let first = service.run_cycle(&sources);
    assert_eq!(first.total_new(), 2);
    assert_eq!(repository.count().unwrap(), 2);

    let second = service.run_cycle(&sources);
    assert_eq!(second.total_new(), 0);
    assert_eq!(second.sources[0].duplicates, 2);
    assert_eq!(repository.count().unwrap(), 2);
}

#[test]
fn test_ingested_entries_are_searchable_with_keyword_grammar() {
    let (repository, sources) = setup();
    let fetcher = StaticFetcher {
        items: vec![
            item("g1", "https://example.com/1", "Rust 1.80", "release notes"),
            item("g2", "https://example.com/2", "Rust drama thread", "community drama"),
            item("g3", "https://example.com/3", "Go 1.23", "release notes"),
        ],
    };
    IngestService::new(repository.clone(), fetcher).run_cycle(&sources);

    let query = EntryQuery::default()
        .with_keyword(KeywordQuery::parse("+rust -drama"))
        .with_limit(50);
    let matches = repository.search(&query).unwrap();

    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].title, "Rust 1.80");

    // Unfiltered listing still sees every row, newest first.
    let all = repository.search(&EntryQuery::default().with_limit(50)).unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].title, "Go 1.23");
}

#[test]
fn test_provenance_filters_compose_with_keyword() {
    let repository = Arc::new(SqliteEntryRepository::new(
        SqliteStorage::in_memory().unwrap(),
    ));
    let sources = vec![
        FeedSource::new("Alpha", "https://a.example/feed", "tech"),
        FeedSource::new("Beta", "https://b.example/feed", "news"),
    ];

    struct PerSourceFetcher;
    impl FeedFetcher for PerSourceFetcher {
        fn fetch(&self, url: &str) -> FeedgrepResult<Vec<FetchedItem>> {
            let host = if url.contains("a.example") { "a" } else { "b" };
            Ok(vec![item(
                &format!("{}-1", host),
                &format!("https://{}.example/kernel-post", host),
                "Kernel update",
                "scheduler patches",
            )])
        }
    }

    IngestService::new(repository.clone(), PerSourceFetcher).run_cycle(&sources);
    assert_eq!(repository.count().unwrap(), 2);

    let query = EntryQuery::default()
        .with_keyword(KeywordQuery::parse("kernel"))
        .with_category("news")
        .with_limit(50);
    let matches = repository.search(&query).unwrap();

    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].source_name, "Beta");
}
