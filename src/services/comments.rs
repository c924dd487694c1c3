// src/services/comments.rs

//! Comment submission against open comment periods.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::error::{AppError, Result};
use crate::models::{Comment, CommentAuthor, CommentPeriod, CommentPeriodState, NewComment};
use crate::services::ApplicationGateway;

/// Validates and submits public comments.
pub struct CommentService<G> {
    gateway: Arc<G>,
}

impl<G: ApplicationGateway> CommentService<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }

    /// Submit a comment against a period.
    ///
    /// The period must be open on `now`'s calendar day and the comment text
    /// must not be blank; violations are reported as validation errors
    /// without touching the network.
    pub async fn submit(
        &self,
        period: &CommentPeriod,
        text: &str,
        author: CommentAuthor,
        now: DateTime<Utc>,
    ) -> Result<Comment> {
        if period.state(now.date_naive()) != CommentPeriodState::Open {
            return Err(AppError::validation(
                "comment period is not accepting comments",
            ));
        }
        let text = text.trim();
        if text.is_empty() {
            return Err(AppError::validation("comment text must not be empty"));
        }

        let payload = NewComment {
            comment_period_id: period.id.clone(),
            comment: text.to_string(),
            comment_author: author,
        };
        self.gateway.submit_comment(&payload).await
    }
}
