// src/models/comment.rs

//! Comment periods and comment submission payloads.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::models::CommentPeriodState;

/// A public comment period attached to an application.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CommentPeriod {
    #[serde(rename = "_id", default)]
    pub id: String,

    /// Id of the application this period belongs to
    #[serde(rename = "_application", default)]
    pub application_id: String,

    #[serde(rename = "startDate", default)]
    pub start_date: Option<DateTime<Utc>>,

    #[serde(rename = "endDate", default)]
    pub end_date: Option<DateTime<Utc>>,
}

impl CommentPeriod {
    /// Comment period state at day granularity: open when
    /// `start <= today <= end`, not-open otherwise (including periods with
    /// missing dates).
    pub fn state(&self, today: NaiveDate) -> CommentPeriodState {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end))
                if start.date_naive() <= today && end.date_naive() >= today =>
            {
                CommentPeriodState::Open
            }
            _ => CommentPeriodState::NotOpen,
        }
    }

    /// Days remaining in the period, including today. None when the period
    /// is not open.
    pub fn days_remaining(&self, today: NaiveDate) -> Option<i64> {
        if self.state(today) != CommentPeriodState::Open {
            return None;
        }
        let end = self.end_date?.date_naive();
        Some((end - today).num_days() + 1)
    }
}

/// Pick the period the UI treats as current. Multiple concurrent periods are
/// not supported; the first one wins.
pub fn current_period(periods: &[CommentPeriod]) -> Option<&CommentPeriod> {
    periods.first()
}

/// A stored comment as returned by the API.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Comment {
    #[serde(rename = "_id", default)]
    pub id: String,

    #[serde(rename = "_commentPeriod", default)]
    pub comment_period_id: String,

    #[serde(rename = "commentNumber", default)]
    pub comment_number: Option<u64>,

    #[serde(default)]
    pub comment: Option<String>,

    #[serde(rename = "commentAuthor", default)]
    pub comment_author: Option<CommentAuthor>,

    #[serde(rename = "dateAdded", default)]
    pub date_added: Option<DateTime<Utc>>,

    #[serde(rename = "commentStatus", default)]
    pub comment_status: Option<String>,
}

/// Author details attached to a comment.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CommentAuthor {
    #[serde(rename = "orgName", default)]
    pub org_name: Option<String>,

    #[serde(rename = "contactName", default)]
    pub contact_name: Option<String>,

    #[serde(default)]
    pub location: Option<String>,

    /// Author asked for their identity to be withheld from publication
    #[serde(rename = "requestedAnonymous", default)]
    pub requested_anonymous: bool,
}

/// Payload for submitting a new comment against an open period.
#[derive(Debug, Clone, Serialize)]
pub struct NewComment {
    #[serde(rename = "_commentPeriod")]
    pub comment_period_id: String,

    pub comment: String,

    #[serde(rename = "commentAuthor")]
    pub comment_author: CommentAuthor,
}
