use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::answers::AnswerSet;
use super::record::LeadRecord;
use super::report::ReportView;

/// Storage abstraction so the service module can be exercised in isolation.
/// Records are keyed by their opaque unique id.
pub trait LeadRepository: Send + Sync {
    fn insert(&self, record: LeadRecord) -> Result<LeadRecord, RepositoryError>;
    fn update(&self, record: LeadRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &Uuid) -> Result<Option<LeadRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("no such record")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Rendered report document produced by the external renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedReport {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// External document renderer: given a report view, produce a byte stream.
pub trait ReportRenderer: Send + Sync {
    fn render(&self, view: &ReportView) -> Result<RenderedReport, RenderError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("report rendering failed: {0}")]
    Failed(String),
}

/// Outbound report email with the rendered document attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
    pub attachment_name: String,
    pub attachment: Vec<u8>,
}

/// External mail transport. Failure never aborts the funnel; outcomes are
/// annotated on the record instead.
pub trait MailTransport: Send + Sync {
    fn send(&self, email: ReportEmail) -> Result<(), TransportError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("mail transport not configured")]
    NotConfigured,
    #[error("mail delivery failed: {0}")]
    Failed(String),
}

/// Optional text-generation collaborator. The service bounds every call
/// with a timeout; implementations need not enforce one themselves.
#[async_trait]
pub trait EnrichmentClient: Send + Sync {
    async fn suggest(&self, answers: &AnswerSet) -> Result<String, EnrichmentError>;
}

#[derive(Debug, thiserror::Error)]
pub enum EnrichmentError {
    #[error("enrichment unavailable: {0}")]
    Unavailable(String),
}

/// No-op enrichment for deployments without a text-generation backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledEnrichment;

#[async_trait]
impl EnrichmentClient for DisabledEnrichment {
    async fn suggest(&self, _answers: &AnswerSet) -> Result<String, EnrichmentError> {
        Err(EnrichmentError::Unavailable(
            "enrichment disabled".to_string(),
        ))
    }
}
