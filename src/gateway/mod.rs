pub mod http;

use async_trait::async_trait;
use uuid::Uuid;

use crate::dto::auth_dto::{LoginPayload, SignupPayload, TokenResponse};
use crate::dto::candidate_dto::{CandidateListQuery, CreateCandidatePayload};
use crate::dto::job_dto::{CreateJobPayload, UpdateJobPayload};
use crate::error::Result;
use crate::models::candidate::Candidate;
use crate::models::job::{HiringManager, Job};
use crate::models::persona::{Category, Persona, PersonaQuestion};
use crate::models::stage::Stage;

/// Everything the dashboard logic needs from the backend. Screens depend on
/// this trait, never on the HTTP client directly, so tests can substitute an
/// in-memory implementation.
///
/// Every method returns a recoverable error on network or 4xx/5xx failure;
/// nothing here panics or retries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Gateway: Send + Sync {
    async fn login(&self, payload: &LoginPayload) -> Result<TokenResponse>;
    async fn signup(&self, payload: &SignupPayload) -> Result<TokenResponse>;

    async fn list_jobs(&self) -> Result<Vec<Job>>;
    async fn get_job(&self, id: Uuid) -> Result<Job>;
    async fn list_jobs_by_manager(&self, manager_id: Uuid) -> Result<Vec<Job>>;
    async fn create_job(&self, payload: &CreateJobPayload) -> Result<Job>;
    async fn update_job(&self, id: Uuid, payload: &UpdateJobPayload) -> Result<Job>;
    async fn delete_job(&self, id: Uuid) -> Result<()>;

    async fn list_hiring_managers(&self) -> Result<Vec<HiringManager>>;

    async fn list_candidates(&self, query: &CandidateListQuery) -> Result<Vec<Candidate>>;
    async fn get_candidate(&self, id: Uuid) -> Result<Candidate>;
    async fn create_candidate(&self, payload: &CreateCandidatePayload) -> Result<Candidate>;
    async fn update_candidate_stage(&self, id: Uuid, stage: Stage) -> Result<Candidate>;
    async fn delete_candidate(&self, id: Uuid) -> Result<()>;

    async fn get_persona(&self, job_id: Uuid) -> Result<Persona>;
    async fn save_category(&self, job_id: Uuid, category: &Category) -> Result<Category>;
    async fn delete_category(&self, job_id: Uuid, category_id: Uuid) -> Result<()>;
    async fn save_question(
        &self,
        category_id: Uuid,
        question: &PersonaQuestion,
    ) -> Result<PersonaQuestion>;
    async fn delete_question(&self, category_id: Uuid, question_id: Uuid) -> Result<()>;
}
