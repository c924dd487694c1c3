// src/models/application.rs

//! Application summary record as returned by the public API.

use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};

use crate::models::comment::CommentPeriod;
use crate::models::{CommentPeriodState, Decision, Document, Feature, ReasonCode, RegionCode, StatusGroup};
use crate::utils::{end_of_day, unescape_newlines};

/// An application record.
///
/// The API returns partial objects restricted to the requested field
/// whitelist, so every field is optional. Raw records must be passed through
/// [`Application::normalized`] before use.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Application {
    /// Unique record identifier
    #[serde(rename = "_id", default)]
    pub id: String,

    #[serde(default)]
    pub agency: Option<String>,

    #[serde(rename = "areaHectares", default)]
    pub area_hectares: Option<f64>,

    #[serde(rename = "businessUnit", default)]
    pub business_unit: Option<String>,

    /// Geometry centroid as `[lng, lat]`
    #[serde(default)]
    pub centroid: Vec<f64>,

    /// Crown-land file number
    #[serde(rename = "cl_file", default)]
    pub cl_file: Option<u64>,

    /// Applicant name(s), comma separated
    #[serde(default)]
    pub client: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(rename = "legalDescription", default)]
    pub legal_description: Option<String>,

    #[serde(default)]
    pub location: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(rename = "publishDate", default)]
    pub publish_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub purpose: Option<String>,

    #[serde(default)]
    pub subpurpose: Option<String>,

    /// Raw backend status code
    #[serde(default)]
    pub status: Option<String>,

    /// Raw backend status-change reason
    #[serde(default)]
    pub reason: Option<String>,

    #[serde(rename = "statusHistoryEffectiveDate", default)]
    pub status_history_effective_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub subtype: Option<String>,

    /// Disposition transaction id
    #[serde(rename = "tantalisID", default)]
    pub tantalis_id: Option<u64>,

    #[serde(rename = "tenureStage", default)]
    pub tenure_stage: Option<String>,

    #[serde(rename = "type", default)]
    pub tenure_type: Option<String>,

    /// Region display name, derived from the business unit
    #[serde(skip)]
    pub region: Option<String>,

    /// Current comment period, attached by the detail fetch
    #[serde(skip)]
    pub current_period: Option<CommentPeriod>,

    /// Comment period state, attached by the detail fetch
    #[serde(skip)]
    pub cp_state: Option<CommentPeriodState>,

    /// Days remaining in an open comment period, including today
    #[serde(skip)]
    pub days_remaining: Option<i64>,

    /// Attached documents, fetched by the detail fetch
    #[serde(skip)]
    pub documents: Vec<Document>,

    /// Decision record, fetched by the detail fetch
    #[serde(skip)]
    pub decision: Option<Decision>,

    /// Tenure geometry features, fetched by the detail fetch
    #[serde(skip)]
    pub features: Vec<Feature>,
}

impl Application {
    /// Post-process a raw API record: unescape literal `\n` sequences in the
    /// textual description fields and derive the region from the business
    /// unit.
    pub fn normalized(mut self) -> Self {
        self.description = self.description.map(|d| unescape_newlines(&d));
        self.legal_description = self.legal_description.map(|d| unescape_newlines(&d));
        self.region = self
            .business_unit
            .as_deref()
            .and_then(RegionCode::from_business_unit)
            .map(|r| r.text_long().to_string());
        self
    }

    /// The status group this record's raw status code belongs to.
    pub fn status_group(&self) -> StatusGroup {
        self.status
            .as_deref()
            .map(StatusGroup::from_status_code)
            .unwrap_or(StatusGroup::Unknown)
    }

    /// The amendment reason attached to this record, if any.
    pub fn amendment_reason(&self) -> Option<ReasonCode> {
        self.reason.as_deref().and_then(ReasonCode::from_reason)
    }

    /// True if the record is nominally abandoned but carries an amendment
    /// reason, meaning it represents an amendment decision.
    pub fn is_amendment(&self) -> bool {
        self.status_group() == StatusGroup::Abandoned && self.amendment_reason().is_some()
    }

    /// True if the record is abandoned and not an amendment.
    pub fn is_abandoned(&self) -> bool {
        self.status_group() == StatusGroup::Abandoned && self.amendment_reason().is_none()
    }

    /// Long user-facing status string. Amendment records report the
    /// amendment outcome rather than "abandoned".
    pub fn status_string_long(&self) -> &'static str {
        match self.amendment_reason() {
            Some(reason) if self.status_group() == StatusGroup::Abandoned => reason.text_long(),
            _ => self.status_group().text_long(),
        }
    }

    /// Crown-land file number padded to seven digits for display.
    pub fn cl_file_display(&self) -> Option<String> {
        self.cl_file.map(|n| format!("{n:07}"))
    }

    /// Unique applicant names, preserving first-seen order.
    pub fn applicants(&self) -> Option<String> {
        let client = self.client.as_deref()?;
        let mut seen = Vec::new();
        for name in client.split(", ") {
            if !seen.contains(&name) {
                seen.push(name);
            }
        }
        Some(seen.join(", "))
    }

    /// Date after which a decided or abandoned record is retired from the
    /// site: six months past the end of the status-change day.
    pub fn retire_date(&self) -> Option<DateTime<Utc>> {
        let effective = self.status_history_effective_date?;
        match self.status_group() {
            StatusGroup::DecisionApproved
            | StatusGroup::DecisionNotApproved
            | StatusGroup::Abandoned => {
                end_of_day(effective.date_naive()).checked_add_months(Months::new(6))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn record(status: &str, reason: Option<&str>) -> Application {
        Application {
            id: "abc123".to_string(),
            status: Some(status.to_string()),
            reason: reason.map(|r| r.to_string()),
            ..Application::default()
        }
    }

    #[test]
    fn normalized_unescapes_descriptions() {
        let app = Application {
            description: Some("line one\\nline two".to_string()),
            legal_description: Some("lot 1\\nplan 2".to_string()),
            business_unit: Some("VI - LAND MGMNT - WEST COAST SERVICE REGION".to_string()),
            ..Application::default()
        }
        .normalized();

        assert_eq!(app.description.as_deref(), Some("line one\nline two"));
        assert_eq!(app.legal_description.as_deref(), Some("lot 1\nplan 2"));
        assert_eq!(app.region.as_deref(), Some("West Coast, Nanaimo"));
    }

    #[test]
    fn amendment_classification() {
        let amendment = record("WITHDRAWN", Some("AMENDMENT APPROVED - APPLICATION"));
        assert!(amendment.is_amendment());
        assert!(!amendment.is_abandoned());
        assert_eq!(
            amendment.status_string_long(),
            "Decision: Approved - Application Amendment"
        );

        let abandoned = record("WITHDRAWN", None);
        assert!(abandoned.is_abandoned());
        assert!(!abandoned.is_amendment());
        assert_eq!(abandoned.status_string_long(), "Abandoned");
    }

    #[test]
    fn cl_file_padded_to_seven_digits() {
        let mut app = record("ACCEPTED", None);
        app.cl_file = Some(12345);
        assert_eq!(app.cl_file_display().as_deref(), Some("0012345"));
    }

    #[test]
    fn applicants_deduplicated() {
        let mut app = record("ACCEPTED", None);
        app.client = Some("ACME LTD, JANE DOE, ACME LTD".to_string());
        assert_eq!(app.applicants().as_deref(), Some("ACME LTD, JANE DOE"));
    }

    #[test]
    fn retire_date_only_for_decided_records() {
        let effective = Utc.with_ymd_and_hms(2019, 1, 15, 10, 30, 0).unwrap();

        let mut approved = record("ACTIVE", None);
        approved.status_history_effective_date = Some(effective);
        let retire = approved.retire_date().unwrap();
        assert_eq!(retire.date_naive(), chrono::NaiveDate::from_ymd_opt(2019, 7, 15).unwrap());

        let mut pending = record("ACCEPTED", None);
        pending.status_history_effective_date = Some(effective);
        assert!(pending.retire_date().is_none());
    }
}
