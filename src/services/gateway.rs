// src/services/gateway.rs

//! HTTP gateway for the public registry API.
//!
//! All endpoints take repeated `key[modifier]=value` query parameters and a
//! pipe-joined `fields` whitelist. Counts are served from the
//! `x-total-count` header of a metadata-only request, not a body.

use async_trait::async_trait;
use futures::future;
use reqwest::Client;
use url::Url;

use crate::config::ApiConfig;
use crate::error::{AppError, Result};
use crate::models::{
    Application, Comment, CommentPeriod, Decision, Document, Feature, NewComment,
};
use crate::query::QueryDescriptor;
use crate::utils::{http, pipe_join};

/// Application summary fields requested from the listing endpoint.
const APPLICATION_FIELDS: &[&str] = &[
    "agency",
    "areaHectares",
    "businessUnit",
    "centroid",
    "cl_file",
    "client",
    "description",
    "legalDescription",
    "location",
    "name",
    "publishDate",
    "purpose",
    "status",
    "reason",
    "statusHistoryEffectiveDate",
    "subpurpose",
    "subtype",
    "tantalisID",
    "tenureStage",
    "type",
];

/// Comment period fields requested from the comment period endpoint.
const PERIOD_FIELDS: &[&str] = &["_addedBy", "_application", "startDate", "endDate"];

/// Fields echoed back when submitting a comment.
const COMMENT_FIELDS: &[&str] = &["comment", "commentAuthor"];

/// Document fields requested from the document endpoint.
const DOCUMENT_FIELDS: &[&str] = &[
    "_application",
    "documentFileName",
    "displayName",
    "internalURL",
    "internalMime",
];

/// Decision fields requested from the decision endpoint.
const DECISION_FIELDS: &[&str] = &["_addedBy", "_application", "name", "description"];

/// Feature fields requested from the feature endpoint.
const FEATURE_FIELDS: &[&str] = &["applicationID", "geometry", "properties", "type"];

/// Query-execution gateway against the registry's REST API.
///
/// The trait is the seam between the aggregation logic and the transport;
/// tests drive the aggregator through an in-process implementation.
#[async_trait]
pub trait ApplicationGateway: Send + Sync {
    /// Count the records matching one descriptor. When the descriptor
    /// carries an identifier, this is the sum over both identifier fields.
    async fn count(&self, descriptor: &QueryDescriptor) -> Result<u64>;

    /// Fetch one page of records matching one descriptor. When the
    /// descriptor carries an identifier, results from both identifier
    /// fields are concatenated (OR semantics); deduplication is the
    /// aggregator's job.
    async fn list(
        &self,
        descriptor: &QueryDescriptor,
        page_num: u32,
        page_size: u32,
    ) -> Result<Vec<Application>>;

    /// Fetch a single application by its unique id.
    async fn application(&self, id: &str) -> Result<Option<Application>>;

    /// Fetch all comment periods for an application.
    async fn periods_for(&self, application_id: &str) -> Result<Vec<CommentPeriod>>;

    /// Fetch all documents attached to an application.
    async fn documents_for(&self, application_id: &str) -> Result<Vec<Document>>;

    /// Fetch the decision for an application, if one has been made.
    async fn decision_for(&self, application_id: &str) -> Result<Option<Decision>>;

    /// Fetch the tenure geometry features for an application.
    async fn features_for(&self, application_id: &str) -> Result<Vec<Feature>>;

    /// Submit a new comment.
    async fn submit_comment(&self, comment: &NewComment) -> Result<Comment>;
}

/// Expand base query pairs into the per-request parameter sets for a
/// descriptor.
///
/// An identifier is ambiguous between two backend fields (crown-land file
/// number vs. disposition transaction id), so it yields two parameter sets,
/// one per field; without an identifier the base set passes through alone.
fn identifier_pair_sets(
    descriptor: &QueryDescriptor,
    base: Vec<(String, String)>,
) -> Vec<Vec<(String, String)>> {
    let Some(identifier) = &descriptor.clid_dtid else {
        return vec![base];
    };

    let mut clid = base.clone();
    clid.push(("cl_file".to_string(), identifier.clone()));
    let mut dtid = base;
    dtid.push(("tantalisId".to_string(), identifier.clone()));
    vec![clid, dtid]
}

/// reqwest-backed gateway.
pub struct HttpGateway {
    client: Client,
    base_url: Url,
}

impl HttpGateway {
    /// Build a gateway from API configuration.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = http::create_async_client(config)?;
        // Url::join drops the last path segment unless the base ends in '/'
        let mut base = config.base_url.trim_end_matches('/').to_string();
        base.push('/');
        let base_url = Url::parse(&base)?;
        Ok(Self { client, base_url })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    /// Issue one metadata-only request and read the count header.
    async fn head_count(&self, pairs: &[(String, String)]) -> Result<u64> {
        let url = self.endpoint("application")?;
        let response = self
            .client
            .head(url)
            .query(pairs)
            .send()
            .await?
            .error_for_status()?;

        response
            .headers()
            .get("x-total-count")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse().ok())
            .ok_or_else(|| AppError::gateway("count", "missing or invalid x-total-count header"))
    }

    /// Issue one listing request and normalize the records.
    async fn get_applications(&self, pairs: &[(String, String)]) -> Result<Vec<Application>> {
        let url = self.endpoint("application")?;
        log::trace!("GET {url} with {} query pairs", pairs.len());
        let records: Vec<Application> = self
            .client
            .get(url)
            .query(pairs)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(records.into_iter().map(Application::normalized).collect())
    }
}

#[async_trait]
impl ApplicationGateway for HttpGateway {
    async fn count(&self, descriptor: &QueryDescriptor) -> Result<u64> {
        let sets = identifier_pair_sets(descriptor, descriptor.query_pairs());
        let counts =
            future::try_join_all(sets.iter().map(|pairs| self.head_count(pairs))).await?;
        Ok(counts.into_iter().sum())
    }

    async fn list(
        &self,
        descriptor: &QueryDescriptor,
        page_num: u32,
        page_size: u32,
    ) -> Result<Vec<Application>> {
        let mut pairs = vec![
            ("pageNum".to_string(), page_num.to_string()),
            ("pageSize".to_string(), page_size.to_string()),
        ];
        pairs.extend(descriptor.query_pairs());
        pairs.push(("fields".to_string(), pipe_join(APPLICATION_FIELDS)));

        let sets = identifier_pair_sets(descriptor, pairs);
        let pages =
            future::try_join_all(sets.iter().map(|pairs| self.get_applications(pairs))).await?;
        Ok(pages.into_iter().flatten().collect())
    }

    async fn application(&self, id: &str) -> Result<Option<Application>> {
        let url = self.endpoint(&format!("application/{id}"))?;
        let pairs = [("fields".to_string(), pipe_join(APPLICATION_FIELDS))];

        // the API returns a one-element array
        let records: Vec<Application> = self
            .client
            .get(url)
            .query(&pairs)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(records.into_iter().next().map(Application::normalized))
    }

    async fn periods_for(&self, application_id: &str) -> Result<Vec<CommentPeriod>> {
        let url = self.endpoint("commentperiod")?;
        let pairs = [
            ("_application".to_string(), application_id.to_string()),
            ("fields".to_string(), pipe_join(PERIOD_FIELDS)),
        ];

        let periods = self
            .client
            .get(url)
            .query(&pairs)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(periods)
    }

    async fn documents_for(&self, application_id: &str) -> Result<Vec<Document>> {
        let url = self.endpoint("document")?;
        let pairs = [
            ("_application".to_string(), application_id.to_string()),
            ("fields".to_string(), pipe_join(DOCUMENT_FIELDS)),
        ];

        let documents = self
            .client
            .get(url)
            .query(&pairs)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(documents)
    }

    async fn decision_for(&self, application_id: &str) -> Result<Option<Decision>> {
        let url = self.endpoint("decision")?;
        let pairs = [
            ("_application".to_string(), application_id.to_string()),
            ("fields".to_string(), pipe_join(DECISION_FIELDS)),
        ];

        // the API returns an array; at most one decision per application
        let decisions: Vec<Decision> = self
            .client
            .get(url)
            .query(&pairs)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(decisions.into_iter().next())
    }

    async fn features_for(&self, application_id: &str) -> Result<Vec<Feature>> {
        let url = self.endpoint("feature")?;
        let pairs = [
            ("applicationId".to_string(), application_id.to_string()),
            ("fields".to_string(), pipe_join(FEATURE_FIELDS)),
        ];

        let features = self
            .client
            .get(url)
            .query(&pairs)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(features)
    }

    async fn submit_comment(&self, comment: &NewComment) -> Result<Comment> {
        let url = self.endpoint("comment")?;
        let pairs = [("fields".to_string(), pipe_join(COMMENT_FIELDS))];

        let stored = self
            .client
            .post(url)
            .query(&pairs)
            .json(comment)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(stored)
    }
}
