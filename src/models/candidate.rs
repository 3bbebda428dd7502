use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::stage::Stage;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub education: Option<String>,
    pub experience: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    /// 0.0..=5.0; screens that show a score out of ten derive it, they do
    /// not store it.
    pub rating: Option<f64>,
    pub avatar_url: Option<String>,
    pub resume_url: Option<String>,
    pub cover_letter_url: Option<String>,
    pub applied_at: NaiveDate,
    pub job_id: Uuid,
    pub stage: Stage,
    /// Present once a candidate reaches Interview Fix; never required at
    /// stages 0, 3, 4.
    pub interview_fix: Option<InterviewFix>,
}

impl Candidate {
    pub fn score_out_of_ten(&self) -> Option<f64> {
        self.rating.map(|r| r * 2.0)
    }

    /// Validated stage move. The transition table is checked before anything
    /// else happens, so an invalid move never reaches the network layer.
    pub fn apply_transition(&self, target: Stage) -> Result<Candidate> {
        if !self.stage.can_transition_to(target) {
            return Err(Error::Transition {
                from: self.stage,
                to: target,
            });
        }
        let mut moved = self.clone();
        moved.stage = target;
        Ok(moved)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewFix {
    pub notice_period_days: Option<i32>,
    #[serde(default)]
    pub resigned: bool,
    pub resignation_date: Option<NaiveDate>,
    pub location_preference: Option<String>,
    pub current_compensation: Option<Decimal>,
    pub expected_compensation: Option<Decimal>,
    #[serde(default)]
    pub has_other_offers: bool,
    #[serde(default)]
    pub call_outcome: CallOutcome,
    pub interview_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallOutcome {
    #[default]
    Pending,
    Scheduled,
    NotResponded,
    Declined,
    Failed,
}
