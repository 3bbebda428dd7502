use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::stage::Stage;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCandidatePayload {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    pub phone: Option<String>,
    pub education: Option<String>,
    pub experience: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[validate(range(min = 0.0, max = 5.0))]
    pub rating: Option<f64>,
    pub resume_url: Option<String>,
    pub cover_letter_url: Option<String>,
    pub applied_at: Option<NaiveDate>,
    pub job_id: Uuid,
}

/// Wire shape of a stage update: the backend takes the numeric encoding via
/// `PUT /candidates/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStagePayload {
    pub status: i64,
}

impl From<Stage> for UpdateStagePayload {
    fn from(stage: Stage) -> Self {
        Self {
            status: stage.as_numeric(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CandidateListQuery {
    pub job_id: Option<Uuid>,
    pub status: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn stage_updates_serialize_to_the_numeric_status_field() {
        let payload = UpdateStagePayload::from(Stage::InterviewTaken);
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json, serde_json::json!({ "status": 2 }));
    }

    #[test]
    fn create_payload_rejects_out_of_range_ratings() {
        let payload = CreateCandidatePayload {
            name: "Aida".into(),
            email: "aida@example.com".into(),
            phone: None,
            education: None,
            experience: None,
            skills: vec![],
            rating: Some(5.5),
            resume_url: None,
            cover_letter_url: None,
            applied_at: None,
            job_id: Uuid::new_v4(),
        };
        assert!(payload.validate().is_err());
    }
}
