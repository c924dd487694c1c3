// src/models/codes.rs

//! Closed code tables for the public registry.
//!
//! The backend stores raw Tantalis codes; the UI presents them as a small set
//! of named groups. Each group enumerates the backend codes it covers, so
//! membership checks and query expansion never work from free-form strings.

use std::fmt;
use std::str::FromStr;

use crate::error::AppError;

/// A user-selectable application status group.
///
/// One group covers several underlying backend status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum StatusGroup {
    /// Application withdrawn or abandoned before a decision
    Abandoned,
    /// Application received and under review
    UnderReview,
    /// Review complete, decision pending
    ReviewComplete,
    /// Decision made: approved
    DecisionApproved,
    /// Decision made: not approved
    DecisionNotApproved,
    /// Status code not recognized
    Unknown,
}

impl StatusGroup {
    /// Backend status codes covered by this group.
    pub fn mapped_codes(&self) -> &'static [&'static str] {
        match self {
            StatusGroup::Abandoned => &[
                "ABANDONED",
                "CANCELLED",
                "OFFER NOT ACCEPTED",
                "OFFER RESCINDED",
                "RETURNED",
                "REVERTED",
                "SUSPENDED",
                "WITHDRAWN",
            ],
            StatusGroup::UnderReview => &["ACCEPTED", "ALLOWED", "PENDING", "RECEIVED"],
            StatusGroup::ReviewComplete => &["OFFER ACCEPTED", "OFFERED"],
            StatusGroup::DecisionApproved => &[
                "ACTIVE",
                "COMPLETED",
                "DISPOSITION IN GOOD STANDING",
                "EXPIRED",
                "HISTORIC",
            ],
            StatusGroup::DecisionNotApproved => &["DISALLOWED"],
            StatusGroup::Unknown => &["NOT USED", "PRE-TANTALIS"],
        }
    }

    /// Short display string.
    pub fn text_short(&self) -> &'static str {
        match self {
            StatusGroup::Abandoned => "Abandoned",
            StatusGroup::UnderReview => "Under Review",
            StatusGroup::ReviewComplete => "Decision Pending",
            StatusGroup::DecisionApproved => "Approved",
            StatusGroup::DecisionNotApproved => "Not Approved",
            StatusGroup::Unknown => "Unknown",
        }
    }

    /// Long display string.
    pub fn text_long(&self) -> &'static str {
        match self {
            StatusGroup::Abandoned => "Abandoned",
            StatusGroup::UnderReview => "Application Under Review",
            StatusGroup::ReviewComplete => "Application Review Complete - Decision Pending",
            StatusGroup::DecisionApproved => "Decision: Approved - Tenure Issued",
            StatusGroup::DecisionNotApproved => "Decision: Not Approved",
            StatusGroup::Unknown => "Unknown Status",
        }
    }

    /// Classify a raw backend status code into its group.
    pub fn from_status_code(code: &str) -> StatusGroup {
        let code = code.trim().to_uppercase();
        for group in [
            StatusGroup::Abandoned,
            StatusGroup::UnderReview,
            StatusGroup::ReviewComplete,
            StatusGroup::DecisionApproved,
            StatusGroup::DecisionNotApproved,
        ] {
            if group.mapped_codes().contains(&code.as_str()) {
                return group;
            }
        }
        StatusGroup::Unknown
    }
}

impl fmt::Display for StatusGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text_short())
    }
}

impl FromStr for StatusGroup {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ABANDONED" => Ok(StatusGroup::Abandoned),
            "APPLICATION_UNDER_REVIEW" => Ok(StatusGroup::UnderReview),
            "APPLICATION_REVIEW_COMPLETE" => Ok(StatusGroup::ReviewComplete),
            "DECISION_APPROVED" => Ok(StatusGroup::DecisionApproved),
            "DECISION_NOT_APPROVED" => Ok(StatusGroup::DecisionNotApproved),
            "UNKNOWN" => Ok(StatusGroup::Unknown),
            other => Err(AppError::validation(format!(
                "unrecognized status group: {other}"
            ))),
        }
    }
}

/// Backend "reason" codes attached to abandoned records.
///
/// An abandoned record carrying one of these reasons is functionally an
/// amendment decision, not a true withdrawal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReasonCode {
    AmendmentApproved,
    AmendmentNotApproved,
}

impl ReasonCode {
    /// The literal backend reason string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReasonCode::AmendmentApproved => "AMENDMENT APPROVED - APPLICATION",
            ReasonCode::AmendmentNotApproved => "AMENDMENT NOT APPROVED - APPLICATION",
        }
    }

    /// Long display string for amendment records.
    pub fn text_long(&self) -> &'static str {
        match self {
            ReasonCode::AmendmentApproved => "Decision: Approved - Application Amendment",
            ReasonCode::AmendmentNotApproved => "Decision: Not Approved - Application Amendment",
        }
    }

    /// Both amendment reasons, in stable order.
    pub fn all() -> &'static [ReasonCode] {
        &[ReasonCode::AmendmentApproved, ReasonCode::AmendmentNotApproved]
    }

    /// Match a raw backend reason string against the known amendment reasons.
    pub fn from_reason(reason: &str) -> Option<ReasonCode> {
        let reason = reason.trim().to_uppercase();
        ReasonCode::all()
            .iter()
            .copied()
            .find(|r| r.as_str() == reason)
    }
}

/// Comment period state as presented to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum CommentPeriodState {
    /// Commenting is open today
    Open,
    /// Commenting has ended, or has not yet started
    NotOpen,
}

impl CommentPeriodState {
    pub fn text_long(&self) -> &'static str {
        match self {
            CommentPeriodState::Open => "Commenting Open",
            CommentPeriodState::NotOpen => "Commenting Closed",
        }
    }
}

impl FromStr for CommentPeriodState {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "OPEN" => Ok(CommentPeriodState::Open),
            "NOT_OPEN" => Ok(CommentPeriodState::NotOpen),
            other => Err(AppError::validation(format!(
                "unrecognized comment period state: {other}"
            ))),
        }
    }
}

/// A user-selectable purpose group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum PurposeGroup {
    Agriculture,
    AlpineSkiing,
    Aquaculture,
    Commercial,
    CommercialRecreation,
    Communication,
    Community,
    Energy,
    EnvironmentConservation,
    FirstNations,
    Industrial,
    Institutional,
    Miscellaneous,
    Quarrying,
    Residential,
    Transportation,
    Utility,
}

impl PurposeGroup {
    /// Backend purpose codes covered by this group.
    pub fn mapped_codes(&self) -> &'static [&'static str] {
        match self {
            PurposeGroup::Agriculture => &["AGRICULTURE"],
            PurposeGroup::AlpineSkiing => &["ALPINE SKIING", "ALL SEASONS RESORT"],
            PurposeGroup::Aquaculture => &["AQUACULTURE"],
            PurposeGroup::Commercial => &["COMMERCIAL"],
            PurposeGroup::CommercialRecreation => &["COMMERCIAL RECREATION"],
            PurposeGroup::Communication => &["COMMUNICATION"],
            PurposeGroup::Community => &["COMMUNITY"],
            PurposeGroup::Energy => &[
                "ENERGY PRODUCTION",
                "OCEAN ENERGY",
                "SOLAR POWER",
                "WATERPOWER",
                "WINDPOWER",
            ],
            PurposeGroup::EnvironmentConservation => &["ENVIRONMENT, CONSERVATION, & RECR"],
            PurposeGroup::FirstNations => &["FIRST NATIONS"],
            PurposeGroup::Industrial => &["INDUSTRIAL"],
            PurposeGroup::Institutional => &["INSTITUTIONAL"],
            PurposeGroup::Miscellaneous => &["MISCELLANEOUS LAND USES"],
            PurposeGroup::Quarrying => &["QUARRYING"],
            PurposeGroup::Residential => &["RESIDENTIAL"],
            PurposeGroup::Transportation => &["TRANSPORTATION"],
            PurposeGroup::Utility => &["UTILITY"],
        }
    }
}

/// Administrative regions, derived from the business unit field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionCode {
    Cariboo,
    Kootenay,
    LowerMainland,
    Omineca,
    Skeena,
    ThompsonOkanagan,
    WestCoast,
}

impl RegionCode {
    /// Region display name, including the field office.
    pub fn text_long(&self) -> &'static str {
        match self {
            RegionCode::Cariboo => "Cariboo, Williams Lake",
            RegionCode::Kootenay => "Kootenay, Cranbrook",
            RegionCode::LowerMainland => "Lower Mainland, Surrey",
            RegionCode::Omineca => "Omineca/Peace, Prince George",
            RegionCode::Skeena => "Skeena, Smithers",
            RegionCode::ThompsonOkanagan => "Thompson/Okanagan, Kamloops",
            RegionCode::WestCoast => "West Coast, Nanaimo",
        }
    }

    /// Derive the region from a raw business unit string.
    ///
    /// Business units look like `SK - LAND MGMNT - SKEENA FIELD OFFICE`; the
    /// leading token identifies the region.
    pub fn from_business_unit(business_unit: &str) -> Option<RegionCode> {
        let prefix = business_unit.split_whitespace().next()?;
        match prefix.to_uppercase().as_str() {
            "CA" => Some(RegionCode::Cariboo),
            "KO" => Some(RegionCode::Kootenay),
            "LM" => Some(RegionCode::LowerMainland),
            "OM" => Some(RegionCode::Omineca),
            "SK" => Some(RegionCode::Skeena),
            "SI" => Some(RegionCode::ThompsonOkanagan),
            "VI" => Some(RegionCode::WestCoast),
            _ => None,
        }
    }
}
