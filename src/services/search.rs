// src/services/search.rs

//! Filter composition, execution and result aggregation.
//!
//! [`ApplicationSearch`] turns a filter selection into descriptors, runs
//! them against the gateway, and merges the results. [`SearchController`]
//! adds the page-level lifecycle: the sequential pagination loop and
//! last-request-wins cancellation.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use futures::future::{self, AbortHandle, Abortable};

use crate::error::{AppError, Result};
use crate::models::{Application, FilterSelection};
use crate::query::{compose, MapBounds};
use crate::services::ApplicationGateway;

/// Executes composed queries and merges their results.
pub struct ApplicationSearch<G> {
    gateway: Arc<G>,
}

impl<G: ApplicationGateway> ApplicationSearch<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }

    /// Count the records matching the selection.
    ///
    /// The result is the sum of per-descriptor counts and may overcount a
    /// record that satisfies more than one descriptor. That approximation is
    /// deliberate: the number backs a "matches found" indicator, not exact
    /// pagination math.
    pub async fn count(
        &self,
        filters: &FilterSelection,
        viewport: Option<&MapBounds>,
    ) -> Result<u64> {
        let descriptors = compose(filters, viewport, Utc::now());
        let counts = future::try_join_all(
            descriptors.iter().map(|d| self.gateway.count(d)),
        )
        .await?;
        Ok(counts.into_iter().sum())
    }

    /// Fetch one page of records for the selection.
    ///
    /// Every descriptor is queried with the same page number and size,
    /// concurrently; the round completes only when all have resolved, and a
    /// single failure fails the whole round. Results are concatenated in
    /// descriptor order and deduplicated by id, first occurrence winning.
    /// Cross-page deduplication is the caller's responsibility.
    pub async fn fetch_page(
        &self,
        page_num: u32,
        page_size: u32,
        filters: &FilterSelection,
        viewport: Option<&MapBounds>,
    ) -> Result<Vec<Application>> {
        let descriptors = compose(filters, viewport, Utc::now());
        let pages = future::try_join_all(
            descriptors
                .iter()
                .map(|d| self.gateway.list(d, page_num, page_size)),
        )
        .await?;

        let mut seen = HashSet::new();
        let mut merged = Vec::new();
        for record in pages.into_iter().flatten() {
            if seen.insert(record.id.clone()) {
                merged.push(record);
            }
        }
        Ok(merged)
    }
}

/// Aggregation lifecycle phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    Idle,
    Composing,
    Fetching,
    Merged,
    Failed,
}

/// Page-level search driver.
///
/// Owns the pagination loop and the cancellation policy: starting a new
/// search aborts all in-flight requests of the previous one, and the
/// superseded caller receives [`AppError::Aborted`]. Partial success across
/// descriptors or rounds is never surfaced; the caller gets either the
/// complete merged set or a single error.
pub struct SearchController<G> {
    search: ApplicationSearch<G>,
    page_size: u32,
    active: Mutex<Option<AbortHandle>>,
    phase: Mutex<SearchPhase>,
}

impl<G: ApplicationGateway> SearchController<G> {
    pub fn new(gateway: Arc<G>, page_size: u32) -> Self {
        Self {
            search: ApplicationSearch::new(gateway),
            page_size,
            active: Mutex::new(None),
            phase: Mutex::new(SearchPhase::Idle),
        }
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> SearchPhase {
        *lock(&self.phase)
    }

    pub fn search(&self) -> &ApplicationSearch<G> {
        &self.search
    }

    /// Run a full aggregation for the selection: count, then
    /// `ceil(count / page_size)` sequential listing rounds.
    ///
    /// The first round replaces the accumulator outright; later rounds
    /// append after deduplicating against everything accumulated, guarding
    /// against records shifting between pages mid-flight. `on_round`
    /// observes the accumulator after each completed round, never a
    /// partially merged state.
    pub async fn run(
        &self,
        filters: &FilterSelection,
        viewport: Option<&MapBounds>,
        mut on_round: impl FnMut(&[Application]),
    ) -> Result<Vec<Application>> {
        let (handle, registration) = AbortHandle::new_pair();

        // last request wins: cancel whatever is still in flight
        if let Some(previous) = lock(&self.active).replace(handle) {
            previous.abort();
        }
        *lock(&self.phase) = SearchPhase::Composing;

        let aggregation = async {
            let total = self.search.count(filters, viewport).await?;
            *lock(&self.phase) = SearchPhase::Fetching;

            let rounds = total.div_ceil(u64::from(self.page_size));
            log::debug!(
                "{total} matching records, fetching in {rounds} rounds of {}",
                self.page_size
            );
            let mut accumulated: Vec<Application> = Vec::new();
            let mut seen: HashSet<String> = HashSet::new();

            for page in 0..rounds {
                let records = self
                    .search
                    .fetch_page(page as u32, self.page_size, filters, viewport)
                    .await?;

                if page == 0 {
                    seen = records.iter().map(|r| r.id.clone()).collect();
                    accumulated = records;
                } else {
                    for record in records {
                        if seen.insert(record.id.clone()) {
                            accumulated.push(record);
                        }
                    }
                }
                on_round(&accumulated);
            }

            Ok(accumulated)
        };

        match Abortable::new(aggregation, registration).await {
            Ok(Ok(records)) => {
                *lock(&self.phase) = SearchPhase::Merged;
                log::debug!("aggregation complete: {} unique records", records.len());
                Ok(records)
            }
            Ok(Err(error)) => {
                *lock(&self.phase) = SearchPhase::Failed;
                Err(error)
            }
            Err(futures::future::Aborted) => Err(AppError::Aborted),
        }
    }
}

/// Poison-tolerant mutex access: a panicked holder cannot corrupt either an
/// abort handle or a phase tag.
fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use crate::models::{
        Comment, CommentPeriod, Decision, Document, Feature, NewComment, StatusGroup,
    };
    use crate::query::QueryDescriptor;

    use super::*;

    fn app(id: &str) -> Application {
        Application {
            id: id.to_string(),
            ..Application::default()
        }
    }

    /// Gateway returning canned pages, with optional failure injection.
    #[derive(Default)]
    struct MockGateway {
        /// records returned for every descriptor, per page number
        pages: Vec<Vec<Application>>,
        /// fixed count returned per descriptor
        count_per_descriptor: u64,
        /// fail any list call for a descriptor carrying a reason filter
        fail_reason_descriptors: bool,
        count_calls: AtomicUsize,
        list_calls: AtomicUsize,
    }

    #[async_trait]
    impl ApplicationGateway for MockGateway {
        async fn count(&self, _descriptor: &QueryDescriptor) -> Result<u64> {
            self.count_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.count_per_descriptor)
        }

        async fn list(
            &self,
            descriptor: &QueryDescriptor,
            page_num: u32,
            _page_size: u32,
        ) -> Result<Vec<Application>> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_reason_descriptors && descriptor.reasons.is_some() {
                return Err(AppError::gateway("list", "injected failure"));
            }
            Ok(self
                .pages
                .get(page_num as usize)
                .cloned()
                .unwrap_or_default())
        }

        async fn application(&self, _id: &str) -> Result<Option<Application>> {
            Ok(None)
        }

        async fn periods_for(&self, _application_id: &str) -> Result<Vec<CommentPeriod>> {
            Ok(Vec::new())
        }

        async fn documents_for(&self, _application_id: &str) -> Result<Vec<Document>> {
            Ok(Vec::new())
        }

        async fn decision_for(&self, _application_id: &str) -> Result<Option<Decision>> {
            Ok(None)
        }

        async fn features_for(&self, _application_id: &str) -> Result<Vec<Feature>> {
            Ok(Vec::new())
        }

        async fn submit_comment(&self, _comment: &NewComment) -> Result<Comment> {
            Ok(Comment::default())
        }
    }

    fn approved_selection() -> FilterSelection {
        FilterSelection {
            statuses: BTreeSet::from([StatusGroup::DecisionApproved]),
            ..FilterSelection::default()
        }
    }

    #[tokio::test]
    async fn count_sums_across_descriptors() {
        let gateway = Arc::new(MockGateway {
            count_per_descriptor: 3,
            ..MockGateway::default()
        });
        let search = ApplicationSearch::new(Arc::clone(&gateway));

        // approved expands into two descriptors
        let total = search.count(&approved_selection(), None).await.unwrap();
        assert_eq!(total, 6);
        assert_eq!(gateway.count_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn fully_overlapping_descriptors_dedup_to_one_copy() {
        let gateway = Arc::new(MockGateway {
            pages: vec![vec![app("a"), app("b")]],
            ..MockGateway::default()
        });
        let search = ApplicationSearch::new(Arc::clone(&gateway));

        let records = search
            .fetch_page(0, 10, &approved_selection(), None)
            .await
            .unwrap();

        // both descriptors returned the same two records
        assert_eq!(gateway.list_calls.load(Ordering::SeqCst), 2);
        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn partial_descriptor_failure_is_total_failure() {
        let gateway = Arc::new(MockGateway {
            pages: vec![vec![app("a")]],
            fail_reason_descriptors: true,
            ..MockGateway::default()
        });
        let search = ApplicationSearch::new(gateway);

        // one descriptor succeeds, the amendment one fails
        let result = search.fetch_page(0, 10, &approved_selection(), None).await;
        assert!(matches!(result, Err(AppError::Gateway { .. })));
    }

    #[tokio::test]
    async fn pagination_rounds_accumulate_and_dedup() {
        let gateway = Arc::new(MockGateway {
            // page 1 re-serves "b" (records can shift between pages)
            pages: vec![
                vec![app("a"), app("b")],
                vec![app("b"), app("c")],
                vec![app("d")],
            ],
            count_per_descriptor: 5,
            ..MockGateway::default()
        });
        let controller = SearchController::new(gateway, 2);

        let mut round_sizes = Vec::new();
        let records = controller
            .run(&FilterSelection::default(), None, |accumulated| {
                round_sizes.push(accumulated.len())
            })
            .await
            .unwrap();

        // 5 records at page size 2 means 3 sequential rounds
        assert_eq!(round_sizes, vec![2, 3, 4]);
        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c", "d"]);
        assert_eq!(controller.phase(), SearchPhase::Merged);
    }

    #[tokio::test]
    async fn zero_matches_yield_empty_result_without_listing() {
        let gateway = Arc::new(MockGateway::default());
        let controller = SearchController::new(Arc::clone(&gateway), 2);

        let records = controller
            .run(&FilterSelection::default(), None, |_| {})
            .await
            .unwrap();
        assert!(records.is_empty());
        assert_eq!(gateway.list_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn failed_round_surfaces_single_error() {
        let gateway = Arc::new(MockGateway {
            pages: vec![vec![app("a")]],
            count_per_descriptor: 1,
            fail_reason_descriptors: true,
            ..MockGateway::default()
        });
        let controller = SearchController::new(gateway, 10);

        let mut rounds = 0;
        let result = controller
            .run(&approved_selection(), None, |_| rounds += 1)
            .await;

        assert!(result.is_err());
        assert_eq!(rounds, 0, "no partial result may be delivered");
        assert_eq!(controller.phase(), SearchPhase::Failed);
    }

    /// Gateway whose first count call hangs forever.
    #[derive(Default)]
    struct StalledGateway {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ApplicationGateway for StalledGateway {
        async fn count(&self, _descriptor: &QueryDescriptor) -> Result<u64> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                futures::future::pending::<()>().await;
            }
            Ok(0)
        }

        async fn list(
            &self,
            _descriptor: &QueryDescriptor,
            _page_num: u32,
            _page_size: u32,
        ) -> Result<Vec<Application>> {
            Ok(Vec::new())
        }

        async fn application(&self, _id: &str) -> Result<Option<Application>> {
            Ok(None)
        }

        async fn periods_for(&self, _application_id: &str) -> Result<Vec<CommentPeriod>> {
            Ok(Vec::new())
        }

        async fn documents_for(&self, _application_id: &str) -> Result<Vec<Document>> {
            Ok(Vec::new())
        }

        async fn decision_for(&self, _application_id: &str) -> Result<Option<Decision>> {
            Ok(None)
        }

        async fn features_for(&self, _application_id: &str) -> Result<Vec<Feature>> {
            Ok(Vec::new())
        }

        async fn submit_comment(&self, _comment: &NewComment) -> Result<Comment> {
            Ok(Comment::default())
        }
    }

    #[tokio::test]
    async fn new_selection_aborts_inflight_search() {
        let controller = Arc::new(SearchController::new(
            Arc::new(StalledGateway::default()),
            10,
        ));

        let first = {
            let controller = Arc::clone(&controller);
            tokio::spawn(async move {
                controller.run(&FilterSelection::default(), None, |_| {}).await
            })
        };
        // let the first search get its count request in flight
        tokio::task::yield_now().await;

        let second = controller.run(&FilterSelection::default(), None, |_| {}).await;
        assert!(second.unwrap().is_empty());

        let first = first.await.unwrap();
        assert!(matches!(first, Err(AppError::Aborted)));
    }
}
