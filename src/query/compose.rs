// src/query/compose.rs

//! Filter composition: expanding a filter selection into the minimal set of
//! backend query descriptors whose combined results satisfy it.

use chrono::{DateTime, Utc};

use crate::models::{CommentPeriodState, FilterSelection, ReasonCode, StatusGroup};
use crate::query::{MapBounds, Modifier, QueryDescriptor, ReasonFilter};
use crate::utils::{end_of_day, start_of_day};

/// Build the query descriptors for a filter selection.
///
/// Most filter dimensions map directly onto backend parameters and live in a
/// single base descriptor. Status groups do not: the backend files amendment
/// decisions under abandoned status codes, distinguishable only by their
/// reason field, so some groups expand into multiple descriptors:
///
/// - Abandoned: one descriptor, abandoned codes minus amendment reasons.
/// - DecisionApproved / DecisionNotApproved: two descriptors each, the direct
///   codes plus the abandoned codes restricted to the matching amendment
///   reason.
/// - Everything else: one descriptor per group.
///
/// Selecting exactly one comment-period state adds temporal bounds to every
/// descriptor; "not open" is a union of two disjoint temporal halves and
/// doubles the descriptor count. Selecting neither or both states means
/// "don't care".
///
/// Duplicates across descriptors are expected; they are removed during
/// aggregation, never here. `now` is injected so composition stays pure.
pub fn compose(
    filters: &FilterSelection,
    viewport: Option<&MapBounds>,
    now: DateTime<Utc>,
) -> Vec<QueryDescriptor> {
    let base = QueryDescriptor {
        clid_dtid: filters.clid_dtid.clone(),
        purposes: filters
            .purposes
            .iter()
            .flat_map(|p| p.mapped_codes().iter().copied())
            .collect(),
        publish_since: filters.publish_from.map(start_of_day),
        publish_until: filters.publish_to.map(end_of_day),
        coordinates: viewport.map(MapBounds::to_coordinates),
        ..QueryDescriptor::default()
    };

    let mut descriptors: Vec<QueryDescriptor> = Vec::new();

    for group in &filters.statuses {
        match group {
            StatusGroup::Abandoned => {
                // abandoned without an amendment reason: true withdrawals only
                descriptors.push(QueryDescriptor {
                    statuses: StatusGroup::Abandoned.mapped_codes().to_vec(),
                    reasons: Some(ReasonFilter {
                        codes: ReasonCode::all().iter().map(|r| r.as_str()).collect(),
                        modifier: Modifier::NotEqual,
                    }),
                    ..base.clone()
                });
            }
            StatusGroup::DecisionApproved => {
                descriptors.push(QueryDescriptor {
                    statuses: StatusGroup::DecisionApproved.mapped_codes().to_vec(),
                    ..base.clone()
                });
                // plus abandoned records that are really approved amendments
                descriptors.push(QueryDescriptor {
                    statuses: StatusGroup::Abandoned.mapped_codes().to_vec(),
                    reasons: Some(ReasonFilter {
                        codes: vec![ReasonCode::AmendmentApproved.as_str()],
                        modifier: Modifier::Equal,
                    }),
                    ..base.clone()
                });
            }
            StatusGroup::DecisionNotApproved => {
                descriptors.push(QueryDescriptor {
                    statuses: StatusGroup::DecisionNotApproved.mapped_codes().to_vec(),
                    ..base.clone()
                });
                // plus abandoned records that are really rejected amendments
                descriptors.push(QueryDescriptor {
                    statuses: StatusGroup::Abandoned.mapped_codes().to_vec(),
                    reasons: Some(ReasonFilter {
                        codes: vec![ReasonCode::AmendmentNotApproved.as_str()],
                        modifier: Modifier::Equal,
                    }),
                    ..base.clone()
                });
            }
            group => {
                descriptors.push(QueryDescriptor {
                    statuses: group.mapped_codes().to_vec(),
                    ..base.clone()
                });
            }
        }
    }

    // no status filters selected: the base descriptor still applies
    if descriptors.is_empty() {
        descriptors.push(base);
    }

    let open = filters.cp_states.contains(&CommentPeriodState::Open);
    let not_open = filters.cp_states.contains(&CommentPeriodState::NotOpen);
    let today = now.date_naive();

    if open && !not_open {
        // open today: cpStart <= today && cpEnd >= today
        for descriptor in &mut descriptors {
            descriptor.cp_start_until = Some(end_of_day(today));
            descriptor.cp_end_since = Some(start_of_day(today));
        }
    }

    if not_open && !open {
        // not open: cpEnd <= yesterday || cpStart >= tomorrow.
        // The union needs one descriptor per temporal half.
        let yesterday = today.pred_opt().unwrap_or(today);
        let tomorrow = today.succ_opt().unwrap_or(today);

        let mut future_half = descriptors.clone();
        for descriptor in &mut descriptors {
            descriptor.cp_end_until = Some(end_of_day(yesterday));
        }
        for descriptor in &mut future_half {
            descriptor.cp_start_since = Some(start_of_day(tomorrow));
        }
        descriptors.extend(future_half);
    }

    descriptors
}
