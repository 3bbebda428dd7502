use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::job::JobStatus;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateJobPayload {
    #[validate(length(min = 1))]
    pub title: String,
    pub description: Option<String>,
    pub requirements: Option<String>,
    pub location: Option<String>,
    pub department: Option<String>,
    pub salary: Option<Decimal>,
    pub closing_date: Option<NaiveDate>,
    pub status: Option<JobStatus>,
    pub hiring_manager_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
pub struct UpdateJobPayload {
    #[validate(length(min = 1))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub requirements: Option<String>,
    pub location: Option<String>,
    pub department: Option<String>,
    pub salary: Option<Decimal>,
    pub closing_date: Option<NaiveDate>,
    pub status: Option<JobStatus>,
    pub hiring_manager_id: Option<Uuid>,
}
