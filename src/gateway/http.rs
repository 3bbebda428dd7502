use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, Method, RequestBuilder};
use url::Url;
use serde::Deserialize;
use tracing::{info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

use crate::config::Config;
use crate::dto::auth_dto::{LoginPayload, SignupPayload, TokenResponse};
use crate::dto::candidate_dto::{CandidateListQuery, CreateCandidatePayload, UpdateStagePayload};
use crate::dto::job_dto::{CreateJobPayload, UpdateJobPayload};
use crate::error::{Error, Result};
use crate::gateway::Gateway;
use crate::models::candidate::{Candidate, InterviewFix};
use crate::models::job::{HiringManager, Job};
use crate::models::persona::{Category, Persona, PersonaQuestion};
use crate::models::stage::{RawStage, Stage};

/// Candidate record as the backend sends it: the stage arrives in whichever
/// legacy encoding the endpoint speaks and is canonicalized on the way in.
#[derive(Debug, Deserialize)]
struct CandidateWire {
    id: Uuid,
    name: String,
    email: String,
    phone: Option<String>,
    education: Option<String>,
    experience: Option<String>,
    #[serde(default)]
    skills: Vec<String>,
    rating: Option<f64>,
    avatar_url: Option<String>,
    resume_url: Option<String>,
    cover_letter_url: Option<String>,
    applied_at: NaiveDate,
    job_id: Uuid,
    status: RawStage,
    interview_fix: Option<InterviewFix>,
}

impl CandidateWire {
    fn into_candidate(self) -> Result<Candidate> {
        let stage = Stage::decode(&self.status)?;
        Ok(Candidate {
            id: self.id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            education: self.education,
            experience: self.experience,
            skills: self.skills,
            rating: self.rating,
            avatar_url: self.avatar_url,
            resume_url: self.resume_url,
            cover_letter_url: self.cover_letter_url,
            applied_at: self.applied_at,
            job_id: self.job_id,
            stage,
            interview_fix: self.interview_fix,
        })
    }
}

/// REST gateway against the recruiting backend. Plain request/response; no
/// retries, no interceptors. The bearer token is attached once `login` has
/// succeeded and dropped on `clear_session`.
pub struct HttpGateway {
    client: Client,
    base_url: Url,
    token: RwLock<Option<String>>,
}

impl HttpGateway {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        // Relative joins drop the last path segment unless the base ends
        // with a slash.
        let mut base = config.api_base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url =
            Url::parse(&base).map_err(|e| Error::Config(format!("Invalid API_BASE_URL: {}", e)))?;
        Ok(Self {
            client,
            base_url,
            token: RwLock::new(None),
        })
    }

    pub fn set_token(&self, token: String) {
        *self.token.write().expect("token lock") = Some(token);
    }

    pub fn clear_session(&self) {
        *self.token.write().expect("token lock") = None;
    }

    pub fn has_session(&self) -> bool {
        self.token.read().expect("token lock").is_some()
    }

    fn url(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| Error::Config(format!("Invalid request path {}: {}", path, e)))
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let mut builder = self.client.request(method, self.url(path)?);
        if let Some(token) = self.token.read().expect("token lock").as_deref() {
            builder = builder.bearer_auth(token);
        }
        Ok(builder)
    }

    /// Maps non-2xx responses into the error taxonomy. The backend reports
    /// failures as `{"error": "..."}`.
    async fn check(resp: reqwest::Response) -> Result<reqwest::Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let code = status.as_u16();
        let message = resp
            .json::<serde_json::Value>()
            .await
            .ok()
            .and_then(|body| body.get("error").and_then(|e| e.as_str()).map(String::from))
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });
        warn!(code, %message, "Backend request failed");
        match code {
            401 => Err(Error::Unauthorized(message)),
            404 => Err(Error::NotFound(message)),
            _ => Err(Error::Gateway { code, message }),
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let resp = self.request(Method::GET, path)?.send().await?;
        Ok(Self::check(resp).await?.json().await?)
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    /// Credentials go over the wire form-encoded, as the auth endpoint
    /// expects; the returned bearer token becomes the session.
    #[instrument(skip(self, payload))]
    async fn login(&self, payload: &LoginPayload) -> Result<TokenResponse> {
        payload.validate()?;
        let resp = self
            .request(Method::POST, "auth/login")?
            .form(payload)
            .send()
            .await?;
        let token: TokenResponse = Self::check(resp).await?.json().await?;
        self.set_token(token.token.clone());
        info!("Session established");
        Ok(token)
    }

    #[instrument(skip(self, payload))]
    async fn signup(&self, payload: &SignupPayload) -> Result<TokenResponse> {
        payload.validate()?;
        let resp = self
            .request(Method::POST, "auth/signup")?
            .json(payload)
            .send()
            .await?;
        let token: TokenResponse = Self::check(resp).await?.json().await?;
        self.set_token(token.token.clone());
        Ok(token)
    }

    async fn list_jobs(&self) -> Result<Vec<Job>> {
        self.get_json("jobs").await
    }

    async fn get_job(&self, id: Uuid) -> Result<Job> {
        self.get_json(&format!("jobs/{}", id)).await
    }

    async fn list_jobs_by_manager(&self, manager_id: Uuid) -> Result<Vec<Job>> {
        self.get_json(&format!("jobs/manager/{}", manager_id)).await
    }

    #[instrument(skip(self, payload))]
    async fn create_job(&self, payload: &CreateJobPayload) -> Result<Job> {
        payload.validate()?;
        let resp = self
            .request(Method::POST, "jobs")?
            .json(payload)
            .send()
            .await?;
        Ok(Self::check(resp).await?.json().await?)
    }

    #[instrument(skip(self, payload))]
    async fn update_job(&self, id: Uuid, payload: &UpdateJobPayload) -> Result<Job> {
        payload.validate()?;
        let resp = self
            .request(Method::PUT, &format!("jobs/{}", id))?
            .json(payload)
            .send()
            .await?;
        Ok(Self::check(resp).await?.json().await?)
    }

    #[instrument(skip(self))]
    async fn delete_job(&self, id: Uuid) -> Result<()> {
        let resp = self
            .request(Method::DELETE, &format!("jobs/{}", id))?
            .send()
            .await?;
        Self::check(resp).await?;
        Ok(())
    }

    async fn list_hiring_managers(&self) -> Result<Vec<HiringManager>> {
        self.get_json("hiring-managers").await
    }

    async fn list_candidates(&self, query: &CandidateListQuery) -> Result<Vec<Candidate>> {
        let resp = self
            .request(Method::GET, "candidates")?
            .query(query)
            .send()
            .await?;
        let wires: Vec<CandidateWire> = Self::check(resp).await?.json().await?;
        wires.into_iter().map(CandidateWire::into_candidate).collect()
    }

    async fn get_candidate(&self, id: Uuid) -> Result<Candidate> {
        let wire: CandidateWire = self.get_json(&format!("candidates/{}", id)).await?;
        wire.into_candidate()
    }

    #[instrument(skip(self, payload))]
    async fn create_candidate(&self, payload: &CreateCandidatePayload) -> Result<Candidate> {
        payload.validate()?;
        let resp = self
            .request(Method::POST, "candidates")?
            .json(payload)
            .send()
            .await?;
        let wire: CandidateWire = Self::check(resp).await?.json().await?;
        wire.into_candidate()
    }

    /// Stage updates go out in the numeric encoding via `PUT`.
    #[instrument(skip(self))]
    async fn update_candidate_stage(&self, id: Uuid, stage: Stage) -> Result<Candidate> {
        let resp = self
            .request(Method::PUT, &format!("candidates/{}", id))?
            .json(&UpdateStagePayload::from(stage))
            .send()
            .await?;
        let wire: CandidateWire = Self::check(resp).await?.json().await?;
        wire.into_candidate()
    }

    #[instrument(skip(self))]
    async fn delete_candidate(&self, id: Uuid) -> Result<()> {
        let resp = self
            .request(Method::DELETE, &format!("candidates/{}", id))?
            .send()
            .await?;
        Self::check(resp).await?;
        Ok(())
    }

    async fn get_persona(&self, job_id: Uuid) -> Result<Persona> {
        self.get_json(&format!("interview/{}", job_id)).await
    }

    #[instrument(skip(self, category))]
    async fn save_category(&self, job_id: Uuid, category: &Category) -> Result<Category> {
        category.validate()?;
        let builder = match category.id {
            Some(id) => self.request(Method::PUT, &format!("interview/categories/{}", id))?,
            None => self.request(Method::POST, &format!("interview/{}/categories", job_id))?,
        };
        let resp = builder.json(category).send().await?;
        Ok(Self::check(resp).await?.json().await?)
    }

    #[instrument(skip(self))]
    async fn delete_category(&self, _job_id: Uuid, category_id: Uuid) -> Result<()> {
        let resp = self
            .request(Method::DELETE, &format!("interview/categories/{}", category_id))?
            .send()
            .await?;
        Self::check(resp).await?;
        Ok(())
    }

    #[instrument(skip(self, question))]
    async fn save_question(
        &self,
        category_id: Uuid,
        question: &PersonaQuestion,
    ) -> Result<PersonaQuestion> {
        let builder = match question.id {
            Some(id) => self.request(Method::PUT, &format!("interview/questions/{}", id))?,
            None => self.request(
                Method::POST,
                &format!("interview/categories/{}/questions", category_id),
            )?,
        };
        let resp = builder.json(question).send().await?;
        Ok(Self::check(resp).await?.json().await?)
    }

    #[instrument(skip(self))]
    async fn delete_question(&self, _category_id: Uuid, question_id: Uuid) -> Result<()> {
        let resp = self
            .request(Method::DELETE, &format!("interview/questions/{}", question_id))?
            .send()
            .await?;
        Self::check(resp).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response_with(status: u16, body: &str) -> reqwest::Response {
        let resp = http::Response::builder()
            .status(status)
            .body(body.to_string())
            .expect("response");
        reqwest::Response::from(resp)
    }

    #[tokio::test]
    async fn successful_responses_pass_through() {
        let resp = response_with(200, r#"{"ok":true}"#);
        assert!(HttpGateway::check(resp).await.is_ok());
    }

    #[tokio::test]
    async fn error_bodies_map_to_the_taxonomy() {
        let err = HttpGateway::check(response_with(401, r#"{"error":"token expired"}"#))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Unauthorized(ref m) if m == "token expired"));
        assert_eq!(err.status_code(), Some(401));

        let err = HttpGateway::check(response_with(404, r#"{"error":"no such job"}"#))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(ref m) if m == "no such job"));

        let err = HttpGateway::check(response_with(500, r#"{"error":"boom"}"#))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Gateway {
                code: 500,
                ref message
            } if message == "boom"
        ));

        let err = HttpGateway::check(response_with(503, r#"{"error":"maintenance"}"#))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), Some(503));
    }

    #[tokio::test]
    async fn non_json_error_bodies_fall_back_to_the_status_reason() {
        let err = HttpGateway::check(response_with(502, "<html>bad gateway</html>"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Gateway {
                code: 502,
                ref message
            } if message == "Bad Gateway"
        ));
    }

    #[test]
    fn login_payload_goes_over_the_wire_form_encoded() {
        let payload = LoginPayload {
            email: "hr@example.com".into(),
            password: "secret".into(),
        };
        let req = Client::new()
            .post("http://localhost/auth/login")
            .form(&payload)
            .build()
            .expect("request");
        assert_eq!(
            req.headers()[reqwest::header::CONTENT_TYPE],
            "application/x-www-form-urlencoded"
        );
        let body = std::str::from_utf8(req.body().and_then(|b| b.as_bytes()).expect("body"))
            .expect("utf8 body");
        assert_eq!(body, "email=hr%40example.com&password=secret");
    }
}
