// src/models/filters.rs

//! User-selected search constraints.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::models::{CommentPeriodState, PurposeGroup, StatusGroup};

/// The full set of user-chosen search constraints at one point in time.
///
/// All fields are optional; absence means "no constraint on this dimension".
/// Selections are kept in ordered sets so composing the same selection twice
/// yields structurally identical query descriptor lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    /// Free-text identifier: a crown-land file number or a disposition id.
    /// Ambiguous between two backend fields, so it is queried against both.
    pub clid_dtid: Option<String>,

    /// Earliest publish date, inclusive (normalized to start of day)
    pub publish_from: Option<NaiveDate>,

    /// Latest publish date, inclusive (normalized to end of day)
    pub publish_to: Option<NaiveDate>,

    /// Selected comment period states
    pub cp_states: BTreeSet<CommentPeriodState>,

    /// Selected application status groups
    pub statuses: BTreeSet<StatusGroup>,

    /// Selected purpose groups
    pub purposes: BTreeSet<PurposeGroup>,
}

impl FilterSelection {
    /// True if no constraint is set on any dimension.
    pub fn is_empty(&self) -> bool {
        self.clid_dtid.is_none()
            && self.publish_from.is_none()
            && self.publish_to.is_none()
            && self.cp_states.is_empty()
            && self.statuses.is_empty()
            && self.purposes.is_empty()
    }
}
