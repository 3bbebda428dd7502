use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Per-job structured interview plan: ordered categories, each with a time
/// budget and an ordered question list. HR-only on the backend side; this
/// layer only models and validates the shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Persona {
    pub job_id: Uuid,
    pub categories: Vec<Category>,
}

impl Persona {
    /// Total interview time is always derived from the categories, never
    /// stored on its own.
    pub fn total_minutes(&self) -> i32 {
        self.categories.iter().map(|c| c.minutes).sum()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Category {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[validate(length(min = 1))]
    pub name: String,
    pub description: Option<String>,
    /// Minutes allocated to this category: 5..=60 in steps of 5.
    #[validate(custom(function = "validate_allocation"))]
    pub minutes: i32,
    #[serde(default)]
    pub questions: Vec<PersonaQuestion>,
}

fn validate_allocation(minutes: i32) -> Result<(), ValidationError> {
    if !(5..=60).contains(&minutes) || minutes % 5 != 0 {
        return Err(ValidationError::new("time_allocation"));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonaQuestion {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub text: String,
    #[serde(default)]
    pub disposition: Disposition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Disposition {
    #[default]
    MustAsk,
    IfTimePermits,
    Skip,
}
