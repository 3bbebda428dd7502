use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub requirements: Option<String>,
    pub location: Option<String>,
    pub department: Option<String>,
    pub salary: Option<Decimal>,
    pub closing_date: Option<NaiveDate>,
    pub status: JobStatus,
    pub hiring_manager_id: Option<Uuid>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Draft,
    Open,
    InReview,
    Closed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HiringManager {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub department: Option<String>,
}
