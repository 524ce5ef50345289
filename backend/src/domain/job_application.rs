//! Job application records tracked per applicant.
//!
//! Create and replace payloads arrive as [`JobApplicationDraft`] with
//! free-form strings for the enumerated employment fields so that blank
//! values surface as missing-field errors. Partial updates use
//! [`JobApplicationPatch`] and the merge engine in [`super::patch`].

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::patch::{ApplyPatch, Nullable, patch, patch_nested, patch_nested_nullable, patch_nullable};
use super::validation::{ValidationError, require};

/// Validation errors returned when parsing a [`JobApplicationId`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobApplicationIdValidationError {
    InvalidId,
}

impl fmt::Display for JobApplicationIdValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId => write!(f, "job application id must be a valid UUID"),
        }
    }
}

impl std::error::Error for JobApplicationIdValidationError {}

/// Identifier of a job application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobApplicationId(Uuid);

impl JobApplicationId {
    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for JobApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for JobApplicationId {
    type Err = JobApplicationIdValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| JobApplicationIdValidationError::InvalidId)
    }
}

/// Contract type of the position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmploymentType {
    FullTime,
    PartTime,
    Contract,
}

impl FromStr for EmploymentType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "FullTime" => Ok(Self::FullTime),
            "PartTime" => Ok(Self::PartTime),
            "Contract" => Ok(Self::Contract),
            other => Err(ValidationError::InvalidValue {
                field: "employment type",
                message: format!("expected FullTime, PartTime or Contract, got {other:?}"),
            }),
        }
    }
}

/// Where the work happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkLocation {
    Onsite,
    Hybrid,
    Remote,
}

impl FromStr for WorkLocation {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Onsite" => Ok(Self::Onsite),
            "Hybrid" => Ok(Self::Hybrid),
            "Remote" => Ok(Self::Remote),
            other => Err(ValidationError::InvalidValue {
                field: "work location",
                message: format!("expected Onsite, Hybrid or Remote, got {other:?}"),
            }),
        }
    }
}

/// Advertised pay band.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SalaryRange {
    pub from: i64,
    pub to: i64,
    pub currency: String,
    pub period: String,
    pub negotiable: bool,
}

/// Terms of the position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employment {
    #[serde(rename = "type")]
    pub employment_type: EmploymentType,
    pub duration: Option<String>,
    pub work_location: WorkLocation,
    pub seniority: Option<String>,
    pub hours_per_week: Option<u32>,
    pub salary_range: Option<SalaryRange>,
}

/// Stored job application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobApplication {
    pub id: JobApplicationId,
    pub company: String,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub source: String,
    pub applied_at: Option<DateTime<Utc>>,
    pub next_follow_up_at: Option<DateTime<Utc>>,
    pub last_contact_at: Option<DateTime<Utc>>,
    pub posting_url: Option<String>,
    pub company_url: Option<String>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub external_job_id: Option<String>,
    pub employment: Employment,
    pub location: Option<String>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Employment section of a [`JobApplicationDraft`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmploymentDraft {
    #[serde(rename = "type")]
    pub employment_type: String,
    pub duration: Option<String>,
    pub work_location: String,
    pub seniority: Option<String>,
    pub hours_per_week: Option<u32>,
    pub salary_range: Option<SalaryRange>,
}

/// Full job application payload for create and replace.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobApplicationDraft {
    pub company: String,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub source: String,
    pub applied_at: Option<DateTime<Utc>>,
    pub next_follow_up_at: Option<DateTime<Utc>>,
    pub last_contact_at: Option<DateTime<Utc>>,
    pub posting_url: Option<String>,
    pub company_url: Option<String>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub external_job_id: Option<String>,
    pub employment: EmploymentDraft,
    pub location: Option<String>,
    pub tags: Vec<String>,
}

impl JobApplicationDraft {
    /// Check required fields and build a record with the given identity.
    pub fn into_record(
        self,
        id: JobApplicationId,
        created_at: DateTime<Utc>,
    ) -> Result<JobApplication, ValidationError> {
        require(&[
            ("title", &self.title),
            ("employment type", &self.employment.employment_type),
            ("work location", &self.employment.work_location),
        ])?;
        let employment = Employment {
            employment_type: self.employment.employment_type.parse()?,
            duration: self.employment.duration,
            work_location: self.employment.work_location.parse()?,
            seniority: self.employment.seniority,
            hours_per_week: self.employment.hours_per_week,
            salary_range: self.employment.salary_range,
        };
        Ok(JobApplication {
            id,
            company: self.company,
            title: self.title,
            description: self.description,
            status: self.status,
            source: self.source,
            applied_at: self.applied_at,
            next_follow_up_at: self.next_follow_up_at,
            last_contact_at: self.last_contact_at,
            posting_url: self.posting_url,
            company_url: self.company_url,
            contact_name: self.contact_name,
            contact_email: self.contact_email,
            external_job_id: self.external_job_id,
            employment,
            location: self.location,
            tags: self.tags,
            created_at,
        })
    }
}

/// Partial update of a [`SalaryRange`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryRangePatch {
    pub from: Option<i64>,
    pub to: Option<i64>,
    pub currency: Option<String>,
    pub period: Option<String>,
    pub negotiable: Option<bool>,
}

impl ApplyPatch<SalaryRangePatch> for SalaryRange {
    fn apply_patch(&mut self, update: SalaryRangePatch) {
        patch(&mut self.from, update.from);
        patch(&mut self.to, update.to);
        patch(&mut self.currency, update.currency);
        patch(&mut self.period, update.period);
        patch(&mut self.negotiable, update.negotiable);
    }
}

/// Partial update of an [`Employment`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmploymentPatch {
    #[serde(rename = "type")]
    pub employment_type: Option<EmploymentType>,
    #[serde(default)]
    pub duration: Nullable<String>,
    pub work_location: Option<WorkLocation>,
    #[serde(default)]
    pub seniority: Nullable<String>,
    #[serde(default)]
    pub hours_per_week: Nullable<u32>,
    #[serde(default)]
    pub salary_range: Nullable<SalaryRangePatch>,
}

impl ApplyPatch<EmploymentPatch> for Employment {
    fn apply_patch(&mut self, update: EmploymentPatch) {
        patch(&mut self.employment_type, update.employment_type);
        patch_nullable(&mut self.duration, update.duration);
        patch(&mut self.work_location, update.work_location);
        patch_nullable(&mut self.seniority, update.seniority);
        patch_nullable(&mut self.hours_per_week, update.hours_per_week);
        patch_nested_nullable(&mut self.salary_range, update.salary_range);
    }
}

/// Partial update of a [`JobApplication`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobApplicationPatch {
    pub company: Option<String>,
    pub title: Option<String>,
    #[serde(default)]
    pub description: Nullable<String>,
    pub status: Option<String>,
    pub source: Option<String>,
    #[serde(default)]
    pub applied_at: Nullable<DateTime<Utc>>,
    #[serde(default)]
    pub next_follow_up_at: Nullable<DateTime<Utc>>,
    #[serde(default)]
    pub last_contact_at: Nullable<DateTime<Utc>>,
    #[serde(default)]
    pub posting_url: Nullable<String>,
    #[serde(default)]
    pub company_url: Nullable<String>,
    #[serde(default)]
    pub contact_name: Nullable<String>,
    #[serde(default)]
    pub contact_email: Nullable<String>,
    #[serde(default)]
    pub external_job_id: Nullable<String>,
    pub employment: Option<EmploymentPatch>,
    #[serde(default)]
    pub location: Nullable<String>,
    pub tags: Option<Vec<String>>,
}

impl ApplyPatch<JobApplicationPatch> for JobApplication {
    fn apply_patch(&mut self, update: JobApplicationPatch) {
        patch(&mut self.company, update.company);
        patch(&mut self.title, update.title);
        patch_nullable(&mut self.description, update.description);
        patch(&mut self.status, update.status);
        patch(&mut self.source, update.source);
        patch_nullable(&mut self.applied_at, update.applied_at);
        patch_nullable(&mut self.next_follow_up_at, update.next_follow_up_at);
        patch_nullable(&mut self.last_contact_at, update.last_contact_at);
        patch_nullable(&mut self.posting_url, update.posting_url);
        patch_nullable(&mut self.company_url, update.company_url);
        patch_nullable(&mut self.contact_name, update.contact_name);
        patch_nullable(&mut self.contact_email, update.contact_email);
        patch_nullable(&mut self.external_job_id, update.external_job_id);
        patch_nested(&mut self.employment, update.employment);
        patch_nullable(&mut self.location, update.location);
        patch(&mut self.tags, update.tags);
    }
}
