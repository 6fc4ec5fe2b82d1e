//! Periodic driver: runs ingestion cycles on a fixed interval, then the two
//! push paths (per-source digests, keyword-rule digests).
//!
//! Cycles run back to back on a single thread, so two cycles can never
//! overlap: a run that outlasts the interval just delays the next tick.
//! Shutdown is a message on the control channel, honored between ticks; a
//! cycle already in flight completes first.

use std::collections::HashSet;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crate::domain::{FeedSource, KeywordRule, PushMessage};
use crate::query::KeywordQuery;
use crate::services::{CycleReport, IngestService, PushService};
use crate::sources::FeedFetcher;
use crate::storage::{EntryQuery, EntryRepository, MAX_LIMIT};

pub struct Scheduler<R: EntryRepository, F: FeedFetcher> {
    ingest: IngestService<R, F>,
    repository: R,
    push: PushService,
    sources: Vec<FeedSource>,
    rules: Vec<KeywordRule>,
    interval: Duration,
    dedupe_rule_pushes: bool,
}

impl<R: EntryRepository, F: FeedFetcher> Scheduler<R, F> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        ingest: IngestService<R, F>,
        repository: R,
        push: PushService,
        sources: Vec<FeedSource>,
        rules: Vec<KeywordRule>,
        interval: Duration,
        dedupe_rule_pushes: bool,
    ) -> Self {
        Self {
            ingest,
            repository,
            push,
            sources,
            rules,
            interval,
            dedupe_rule_pushes,
        }
    }

    /// One full tick: ingest all sources, push per-source digests, then
    /// evaluate keyword rules over the trailing window and push their digests.
    pub fn run_cycle_once(&self) -> CycleReport {
        let report = self.ingest.run_cycle(&self.sources);
        let pushed = self.push_source_digests(&report);
        self.push_rule_digests(&pushed);
        report
    }

    /// Per-source push: only sources that produced new items and have
    /// channels configured. Returns guids that went out, for optional
    /// rule-push dedup.
    fn push_source_digests(&self, report: &CycleReport) -> HashSet<String> {
        let mut pushed = HashSet::new();

        for source_report in &report.sources {
            if source_report.new_entries.is_empty() || source_report.source.channels.is_empty() {
                continue;
            }

            let message = PushMessage::source_digest(
                &source_report.source.name,
                &source_report.new_entries,
            );
            let delivered = self.push.dispatch(&source_report.source.channels, &message);

            if delivered > 0 {
                for entry in &source_report.new_entries {
                    pushed.insert(entry.guid.clone());
                }
            }
        }

        pushed
    }

    fn push_rule_digests(&self, already_pushed: &HashSet<String>) {
        for rule in &self.rules {
            let keyword = KeywordQuery::parse(&rule.expression);
            if keyword.is_empty() || rule.channels.is_empty() {
                continue;
            }

            let label = keyword.label().unwrap_or("keyword").to_string();
            let query = EntryQuery::default()
                .with_keyword(keyword)
                .with_limit(MAX_LIMIT)
                .within(self.interval);

            let mut matches = match self.repository.search(&query) {
                Ok(matches) => matches,
                Err(e) => {
                    tracing::warn!(rule = %rule.expression, error = %e, "keyword rule query failed");
                    continue;
                }
            };

            if self.dedupe_rule_pushes {
                matches.retain(|entry| !already_pushed.contains(&entry.guid));
            }

            if matches.is_empty() {
                continue;
            }

            let message = PushMessage::rule_digest(&label, &matches);
            self.push.dispatch(&rule.channels, &message);
        }
    }

    /// Run cycles until the control channel delivers a stop message (or its
    /// sender is dropped). The first cycle starts immediately.
    pub fn run(&self, shutdown: &Receiver<()>) {
        loop {
            let started = Instant::now();
            self.run_cycle_once();

            let wait = self.interval.saturating_sub(started.elapsed());
            match shutdown.recv_timeout(wait) {
                Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                    tracing::info!("scheduler stopping");
                    break;
                }
                Err(RecvTimeoutError::Timeout) => {}
            }
        }
    }
}

/// A scheduler running on its own thread, stoppable between ticks.
pub struct SchedulerHandle {
    shutdown: Sender<()>,
    thread: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Request a stop and wait for the in-flight cycle, if any, to finish.
    pub fn stop(self) {
        let _ = self.shutdown.send(());
        let _ = self.thread.join();
    }
}

/// Spawn the scheduler loop on a background thread.
pub fn spawn<R, F>(scheduler: Scheduler<R, F>) -> SchedulerHandle
where
    R: EntryRepository + 'static,
    F: FeedFetcher + 'static,
{
    let (shutdown, rx) = mpsc::channel();
    let thread = std::thread::spawn(move || scheduler.run(&rx));
    SchedulerHandle { shutdown, thread }
}
