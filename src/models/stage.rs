use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Canonical pipeline stage. The backend and the older list screens use two
/// different encodings for this field; both decode into this enum and
/// nothing else in the crate touches the raw values.
///
/// Numeric wire encoding: 0=PostInterVet, 1=InterviewFix, 2=InterviewTaken,
/// 3=Rejected, 4=Hired. Coarse string encoding:
/// `Screening|Interview|Hired|Rejected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    PostInterVet,
    InterviewFix,
    InterviewTaken,
    Rejected,
    Hired,
}

/// A stage value as it arrives from the backend or from legacy list payloads,
/// before canonicalization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawStage {
    Numeric(i64),
    Label(String),
}

impl Stage {
    pub const ALL: [Stage; 5] = [
        Stage::PostInterVet,
        Stage::InterviewFix,
        Stage::InterviewTaken,
        Stage::Rejected,
        Stage::Hired,
    ];

    /// Decode the numeric encoding used by the candidate detail and
    /// pipeline screens.
    pub fn from_numeric(raw: i64) -> Result<Self> {
        match raw {
            0 => Ok(Stage::PostInterVet),
            1 => Ok(Stage::InterviewFix),
            2 => Ok(Stage::InterviewTaken),
            3 => Ok(Stage::Rejected),
            4 => Ok(Stage::Hired),
            other => Err(Error::UnknownStage(other.to_string())),
        }
    }

    /// Decode the coarse string encoding used by the general candidates list
    /// and the interview-summary screen. `Screening` maps to the earliest
    /// fine stage it covers, `Interview` likewise.
    pub fn from_label(raw: &str) -> Result<Self> {
        match raw {
            "Screening" => Ok(Stage::PostInterVet),
            "Interview" => Ok(Stage::InterviewFix),
            "Hired" => Ok(Stage::Hired),
            "Rejected" => Ok(Stage::Rejected),
            other => Err(Error::UnknownStage(other.to_string())),
        }
    }

    /// Canonicalize either legacy encoding. Values outside both tables are
    /// a data-integrity problem and are surfaced, never defaulted.
    pub fn decode(raw: &RawStage) -> Result<Self> {
        match raw {
            RawStage::Numeric(n) => Stage::from_numeric(*n),
            RawStage::Label(s) => Stage::from_label(s),
        }
    }

    pub fn as_numeric(&self) -> i64 {
        match self {
            Stage::PostInterVet => 0,
            Stage::InterviewFix => 1,
            Stage::InterviewTaken => 2,
            Stage::Rejected => 3,
            Stage::Hired => 4,
        }
    }

    /// Coarse string form for endpoints that still speak the four-value
    /// encoding. `InterviewTaken` has no string of its own and is reported
    /// as `Interview`.
    pub fn as_coarse_label(&self) -> &'static str {
        match self {
            Stage::PostInterVet => "Screening",
            Stage::InterviewFix | Stage::InterviewTaken => "Interview",
            Stage::Rejected => "Rejected",
            Stage::Hired => "Hired",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Stage::PostInterVet => "Post-InterVet",
            Stage::InterviewFix => "Interview Fix",
            Stage::InterviewTaken => "Interview Taken",
            Stage::Rejected => "Rejected",
            Stage::Hired => "Hired",
        }
    }

    pub fn badge_class(&self) -> &'static str {
        match self {
            Stage::PostInterVet => "badge-screening",
            Stage::InterviewFix => "badge-interview-fix",
            Stage::InterviewTaken => "badge-interview-taken",
            Stage::Rejected => "badge-rejected",
            Stage::Hired => "badge-hired",
        }
    }

    /// The one explicit transition table in the system. Every screen must
    /// consult this instead of hard-coding its own buttons.
    pub fn allowed_transitions(&self) -> &'static [Stage] {
        match self {
            Stage::PostInterVet => &[Stage::InterviewFix, Stage::Rejected],
            Stage::InterviewFix => &[Stage::InterviewTaken, Stage::Rejected],
            Stage::InterviewTaken => &[Stage::Hired, Stage::Rejected],
            Stage::Rejected | Stage::Hired => &[],
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.allowed_transitions().is_empty()
    }

    pub fn can_transition_to(&self, target: Stage) -> bool {
        self.allowed_transitions().contains(&target)
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
