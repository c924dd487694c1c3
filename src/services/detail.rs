// src/services/detail.rs

//! Single-application detail fetch with a one-slot cache.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use futures::future;

use crate::error::Result;
use crate::models::{current_period, Application};
use crate::services::ApplicationGateway;

/// Fetches one application with its secondary data attached (comment
/// period, documents, decision, geometry features), caching the most
/// recently viewed record.
///
/// The cache holds exactly one application. Requesting a different id
/// invalidates it; `force_reload` bypasses it for the same id.
pub struct ApplicationDetail<G> {
    gateway: Arc<G>,
    cached: Mutex<Option<Application>>,
}

impl<G: ApplicationGateway> ApplicationDetail<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            cached: Mutex::new(None),
        }
    }

    /// Fetch an application by id, attaching its current comment period
    /// (with state and days remaining evaluated at `now`), its documents,
    /// its decision and its geometry features.
    ///
    /// Returns `Ok(None)` when no record exists under that id.
    pub async fn get(
        &self,
        id: &str,
        force_reload: bool,
        now: DateTime<Utc>,
    ) -> Result<Option<Application>> {
        if !force_reload {
            let cached = lock(&self.cached);
            if let Some(app) = cached.as_ref().filter(|app| app.id == id) {
                return Ok(Some(app.clone()));
            }
        }

        let Some(mut app) = self.gateway.application(id).await? else {
            // a stale entry must not outlive a deleted record
            lock(&self.cached).take_if(|cached| cached.id == id);
            return Ok(None);
        };

        let (periods, documents, decision, features) = future::try_join4(
            self.gateway.periods_for(id),
            self.gateway.documents_for(id),
            self.gateway.decision_for(id),
            self.gateway.features_for(id),
        )
        .await?;

        if let Some(period) = current_period(&periods) {
            let today = now.date_naive();
            app.cp_state = Some(period.state(today));
            app.days_remaining = period.days_remaining(today);
            app.current_period = Some(period.clone());
        }
        app.documents = documents;
        app.decision = decision;
        app.features = features;

        *lock(&self.cached) = Some(app.clone());
        Ok(Some(app))
    }

    /// Drop the cached record.
    pub fn clear(&self) {
        lock(&self.cached).take();
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::TimeZone;

    use crate::models::{
        Comment, CommentPeriod, CommentPeriodState, Decision, Document, Feature, NewComment,
    };
    use crate::query::QueryDescriptor;

    use super::*;

    #[derive(Default)]
    struct MockGateway {
        applications: HashMap<String, Application>,
        periods: HashMap<String, Vec<CommentPeriod>>,
        documents: HashMap<String, Vec<Document>>,
        decisions: HashMap<String, Decision>,
        features: HashMap<String, Vec<Feature>>,
        detail_calls: AtomicUsize,
    }

    #[async_trait]
    impl ApplicationGateway for MockGateway {
        async fn count(&self, _descriptor: &QueryDescriptor) -> Result<u64> {
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

        async fn application(&self, id: &str) -> Result<Option<Application>> {
            self.detail_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.applications.get(id).cloned())
        }

        async fn periods_for(&self, application_id: &str) -> Result<Vec<CommentPeriod>> {
            Ok(self.periods.get(application_id).cloned().unwrap_or_default())
        }

        async fn documents_for(&self, application_id: &str) -> Result<Vec<Document>> {
            Ok(self.documents.get(application_id).cloned().unwrap_or_default())
        }

        async fn decision_for(&self, application_id: &str) -> Result<Option<Decision>> {
            Ok(self.decisions.get(application_id).cloned())
        }

        async fn features_for(&self, application_id: &str) -> Result<Vec<Feature>> {
            Ok(self.features.get(application_id).cloned().unwrap_or_default())
        }

        async fn submit_comment(&self, _comment: &NewComment) -> Result<Comment> {
            Ok(Comment::default())
        }
    }

    fn gateway_with(ids: &[&str]) -> MockGateway {
        let mut gateway = MockGateway::default();
        for id in ids {
            gateway.applications.insert(
                id.to_string(),
                Application {
                    id: id.to_string(),
                    ..Application::default()
                },
            );
        }
        gateway
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 3, 15, 12, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn repeated_fetch_of_same_id_hits_cache() {
        let gateway = Arc::new(gateway_with(&["a1"]));
        let detail = ApplicationDetail::new(Arc::clone(&gateway));

        detail.get("a1", false, now()).await.unwrap();
        let second = detail.get("a1", false, now()).await.unwrap();

        assert_eq!(second.unwrap().id, "a1");
        assert_eq!(gateway.detail_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn different_id_invalidates_cache() {
        let gateway = Arc::new(gateway_with(&["a1", "a2"]));
        let detail = ApplicationDetail::new(Arc::clone(&gateway));

        detail.get("a1", false, now()).await.unwrap();
        let other = detail.get("a2", false, now()).await.unwrap();

        assert_eq!(other.unwrap().id, "a2");
        assert_eq!(gateway.detail_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn force_reload_bypasses_cache() {
        let gateway = Arc::new(gateway_with(&["a1"]));
        let detail = ApplicationDetail::new(Arc::clone(&gateway));

        detail.get("a1", false, now()).await.unwrap();
        detail.get("a1", true, now()).await.unwrap();
        assert_eq!(gateway.detail_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn open_period_data_attached() {
        let mut gateway = gateway_with(&["a1"]);
        gateway.periods.insert(
            "a1".to_string(),
            vec![CommentPeriod {
                id: "p1".to_string(),
                application_id: "a1".to_string(),
                start_date: Some(Utc.with_ymd_and_hms(2020, 3, 1, 0, 0, 0).unwrap()),
                end_date: Some(Utc.with_ymd_and_hms(2020, 3, 31, 0, 0, 0).unwrap()),
            }],
        );
        let detail = ApplicationDetail::new(Arc::new(gateway));

        let app = detail.get("a1", false, now()).await.unwrap().unwrap();
        assert_eq!(app.cp_state, Some(CommentPeriodState::Open));
        assert_eq!(app.days_remaining, Some(17));
        assert_eq!(app.current_period.map(|p| p.id), Some("p1".to_string()));
    }

    #[tokio::test]
    async fn documents_decision_and_features_attached() {
        let mut gateway = gateway_with(&["a1"]);
        gateway.documents.insert(
            "a1".to_string(),
            vec![Document {
                id: "d1".to_string(),
                application_id: Some("a1".to_string()),
                display_name: Some("Survey plan".to_string()),
                ..Document::default()
            }],
        );
        gateway.decisions.insert(
            "a1".to_string(),
            Decision {
                id: "dec1".to_string(),
                application_id: "a1".to_string(),
                ..Decision::default()
            },
        );
        gateway.features.insert(
            "a1".to_string(),
            vec![Feature {
                application_id: Some("a1".to_string()),
                feature_type: Some("Feature".to_string()),
                ..Feature::default()
            }],
        );
        let detail = ApplicationDetail::new(Arc::new(gateway));

        let app = detail.get("a1", false, now()).await.unwrap().unwrap();
        assert_eq!(app.documents.len(), 1);
        assert_eq!(app.documents[0].display_name.as_deref(), Some("Survey plan"));
        assert_eq!(app.decision.map(|d| d.id), Some("dec1".to_string()));
        assert_eq!(app.features.len(), 1);

        // an application without secondary data attaches nothing
        let bare = ApplicationDetail::new(Arc::new(gateway_with(&["a2"])));
        let app = bare.get("a2", false, now()).await.unwrap().unwrap();
        assert!(app.documents.is_empty());
        assert!(app.decision.is_none());
        assert!(app.features.is_empty());
    }

    #[tokio::test]
    async fn missing_record_yields_none_and_clears_cache() {
        let gateway = Arc::new(gateway_with(&["a1"]));
        let detail = ApplicationDetail::new(Arc::clone(&gateway));

        assert!(detail.get("nope", false, now()).await.unwrap().is_none());

        detail.get("a1", false, now()).await.unwrap();
        detail.clear();
        detail.get("a1", false, now()).await.unwrap();
        assert_eq!(gateway.detail_calls.load(Ordering::SeqCst), 3);
    }
}
