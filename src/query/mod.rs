// src/query/mod.rs

//! Backend query descriptors.
//!
//! A [`QueryDescriptor`] is one concrete parameter set for the application
//! endpoint. One filter selection may expand into several descriptors (see
//! [`compose`]); their combined results satisfy the selection.

mod compose;
mod viewport;

pub use compose::compose;
pub use viewport::MapBounds;

use chrono::{DateTime, SecondsFormat, Utc};

/// Comparison modifiers the API accepts on query parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    /// Value must equal this; with multiple values, must match at least one
    Equal,
    /// Value must not equal this; with multiple values, must match none
    NotEqual,
    /// Date must be on or after this
    Since,
    /// Date must be before this
    Until,
}

impl Modifier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Modifier::Equal => "eq",
            Modifier::NotEqual => "ne",
            Modifier::Since => "since",
            Modifier::Until => "until",
        }
    }
}

/// A reason constraint: a set of reason codes with a comparison modifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReasonFilter {
    pub codes: Vec<&'static str>,
    pub modifier: Modifier,
}

/// One concrete backend query parameter set.
///
/// The identifier (`clid_dtid`) is deliberately absent from
/// [`query_pairs`](QueryDescriptor::query_pairs): it is ambiguous between two
/// backend fields and fans out into two calls at the gateway.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryDescriptor {
    /// Crown-land file or disposition id, queried against both fields
    pub clid_dtid: Option<String>,

    /// Backend purpose codes (equality, any-of)
    pub purposes: Vec<&'static str>,

    pub publish_since: Option<DateTime<Utc>>,
    pub publish_until: Option<DateTime<Utc>>,

    /// Serialized viewport ring (see [`MapBounds::to_coordinates`])
    pub coordinates: Option<String>,

    /// Backend status codes (equality, any-of)
    pub statuses: Vec<&'static str>,

    /// Reason constraint, used to split amendment records out of (or back
    /// into) the abandoned group
    pub reasons: Option<ReasonFilter>,

    pub cp_start_since: Option<DateTime<Utc>>,
    pub cp_start_until: Option<DateTime<Utc>>,
    pub cp_end_since: Option<DateTime<Utc>>,
    pub cp_end_until: Option<DateTime<Utc>>,
}

impl QueryDescriptor {
    /// True if any comment-period bound is set.
    pub fn has_comment_period_constraint(&self) -> bool {
        self.cp_start_since.is_some()
            || self.cp_start_until.is_some()
            || self.cp_end_since.is_some()
            || self.cp_end_until.is_some()
    }

    /// Encode this descriptor as repeated `key[modifier]=value` query pairs,
    /// in the order the API documents them.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();

        if let Some(dt) = self.cp_start_since {
            pairs.push(date_pair("cpStart", Modifier::Since, dt));
        }
        if let Some(dt) = self.cp_start_until {
            pairs.push(date_pair("cpStart", Modifier::Until, dt));
        }
        if let Some(dt) = self.cp_end_since {
            pairs.push(date_pair("cpEnd", Modifier::Since, dt));
        }
        if let Some(dt) = self.cp_end_until {
            pairs.push(date_pair("cpEnd", Modifier::Until, dt));
        }
        for status in &self.statuses {
            pairs.push(("status[eq]".to_string(), (*status).to_string()));
        }
        if let Some(reasons) = &self.reasons {
            let key = format!("reason[{}]", reasons.modifier.as_str());
            for reason in &reasons.codes {
                pairs.push((key.clone(), (*reason).to_string()));
            }
        }
        for purpose in &self.purposes {
            pairs.push(("purpose[eq]".to_string(), (*purpose).to_string()));
        }
        if let Some(dt) = self.publish_since {
            pairs.push(date_pair("publishDate", Modifier::Since, dt));
        }
        if let Some(dt) = self.publish_until {
            pairs.push(date_pair("publishDate", Modifier::Until, dt));
        }
        if let Some(coordinates) = &self.coordinates {
            pairs.push(("centroid".to_string(), coordinates.clone()));
        }

        pairs
    }
}

fn date_pair(key: &str, modifier: Modifier, dt: DateTime<Utc>) -> (String, String) {
    (format!("{key}[{}]", modifier.as_str()), iso(dt))
}

/// RFC 3339 with millisecond precision and a `Z` suffix, the shape the
/// backend's date parser expects.
fn iso(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn query_pairs_encode_modifiers() {
        let descriptor = QueryDescriptor {
            statuses: vec!["ACTIVE", "EXPIRED"],
            reasons: Some(ReasonFilter {
                codes: vec!["AMENDMENT APPROVED - APPLICATION"],
                modifier: Modifier::NotEqual,
            }),
            purposes: vec!["AGRICULTURE"],
            publish_since: Some(Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap()),
            ..QueryDescriptor::default()
        };

        let pairs = descriptor.query_pairs();
        assert!(pairs.contains(&("status[eq]".to_string(), "ACTIVE".to_string())));
        assert!(pairs.contains(&("status[eq]".to_string(), "EXPIRED".to_string())));
        assert!(pairs.contains(&(
            "reason[ne]".to_string(),
            "AMENDMENT APPROVED - APPLICATION".to_string()
        )));
        assert!(pairs.contains(&("purpose[eq]".to_string(), "AGRICULTURE".to_string())));
        assert!(pairs.contains(&(
            "publishDate[since]".to_string(),
            "2020-01-01T00:00:00.000Z".to_string()
        )));
    }

    #[test]
    fn identifier_not_in_query_pairs() {
        let descriptor = QueryDescriptor {
            clid_dtid: Some("123456".to_string()),
            ..QueryDescriptor::default()
        };
        assert!(descriptor.query_pairs().is_empty());
    }

    #[test]
    fn comment_period_bounds_encoded_with_date_modifiers() {
        let descriptor = QueryDescriptor {
            cp_start_until: Some(Utc.with_ymd_and_hms(2020, 3, 15, 23, 59, 59).unwrap()),
            cp_end_since: Some(Utc.with_ymd_and_hms(2020, 3, 15, 0, 0, 0).unwrap()),
            ..QueryDescriptor::default()
        };
        assert!(descriptor.has_comment_period_constraint());

        let pairs = descriptor.query_pairs();
        assert_eq!(pairs[0].0, "cpStart[until]");
        assert_eq!(pairs[1].0, "cpEnd[since]");
    }
}
