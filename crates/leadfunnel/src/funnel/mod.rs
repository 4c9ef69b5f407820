//! Lead-capture quiz funnel: catalog, scoring, insights, session state
//! machine, record assembly, and the collaborator seams around them.

pub mod answers;
pub mod catalog;
pub mod insights;
pub mod record;
pub mod report;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;
pub mod session;

#[cfg(test)]
mod tests;

pub use answers::{AnswerSet, AnswerValue};
pub use catalog::{QuestionCatalog, QuestionDefinition, QuestionId, QuestionKind, ScoringRole};
pub use insights::{InsightGenerator, InsightList};
pub use record::{DeliveryOutcome, LeadRecord};
pub use report::{AnsweredQuestionView, ReportAssembler, ReportView};
pub use repository::{
    DisabledEnrichment, EnrichmentClient, EnrichmentError, LeadRepository, MailTransport,
    RenderError, RenderedReport, ReportEmail, ReportRenderer, RepositoryError, TransportError,
};
pub use scoring::{ScoreBand, ScoreResult, ScoringConfig, ScoringEngine};
pub use service::{FunnelService, FunnelServiceError, LeadSubmission, SubmissionReceipt};
pub use session::{
    FunnelAction, FunnelError, FunnelSession, FunnelStage, LeadForm, SessionPolicy, SideEffect,
};
pub use router::funnel_router;
