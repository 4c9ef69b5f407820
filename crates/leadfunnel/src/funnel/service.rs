use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::FunnelConfig;

use super::answers::AnswerSet;
use super::catalog::QuestionCatalog;
use super::insights::InsightGenerator;
use super::record::{DeliveryOutcome, LeadRecord};
use super::report::{ReportAssembler, ReportView, REPORT_TITLE};
use super::repository::{
    EnrichmentClient, LeadRepository, MailTransport, RenderError, RenderedReport, ReportEmail,
    ReportRenderer, RepositoryError, TransportError,
};
use super::scoring::{ScoringConfig, ScoringEngine};
use super::session::{FunnelAction, FunnelError, FunnelSession, LeadForm, SessionPolicy, SideEffect};

/// One-shot funnel submission as it arrives over the wire: lead contact
/// fields plus a loose answer map keyed by question id.
#[derive(Debug, Clone, Deserialize)]
pub struct LeadSubmission {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub consent: bool,
    #[serde(default)]
    pub answers: BTreeMap<String, Value>,
}

impl LeadSubmission {
    fn lead_form(&self) -> LeadForm {
        LeadForm {
            name: self.name.clone(),
            email: self.email.clone(),
            location: self.location.clone(),
            consent: self.consent,
        }
    }
}

/// Outcome of a completed submission returned to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionReceipt {
    pub record_id: Uuid,
    pub persisted: bool,
    pub delivery: DeliveryOutcome,
    pub report: ReportView,
}

/// Service composing the catalog, scoring engine, insight generator, report
/// assembler, and the injected collaborators.
pub struct FunnelService<R, M, E> {
    catalog: QuestionCatalog,
    engine: ScoringEngine,
    generator: InsightGenerator,
    assembler: ReportAssembler,
    repository: Arc<R>,
    mail: Arc<M>,
    enrichment: Arc<E>,
    renderer: Arc<dyn ReportRenderer>,
    config: FunnelConfig,
}

impl<R, M, E> FunnelService<R, M, E>
where
    R: LeadRepository + 'static,
    M: MailTransport + 'static,
    E: EnrichmentClient + 'static,
{
    pub fn new(
        repository: Arc<R>,
        mail: Arc<M>,
        enrichment: Arc<E>,
        renderer: Arc<dyn ReportRenderer>,
        config: FunnelConfig,
    ) -> Self {
        let catalog = QuestionCatalog::standard();
        Self {
            catalog,
            engine: ScoringEngine::new(catalog, ScoringConfig::default()),
            generator: InsightGenerator::new(catalog),
            assembler: ReportAssembler::new(catalog, config.insight_display_cap),
            repository,
            mail,
            enrichment,
            renderer,
            config,
        }
    }

    pub fn catalog(&self) -> &QuestionCatalog {
        &self.catalog
    }

    fn session_policy(&self) -> SessionPolicy {
        SessionPolicy {
            location_required: self.config.location_required,
        }
    }

    /// Run one submission through the funnel: validate the lead, record the
    /// answers, finish, then execute the completion side effect. Scoring and
    /// insight generation always finish before persistence or delivery is
    /// attempted, and a failure in either collaborator cannot block the
    /// caller from receiving the report view.
    pub async fn submit(
        &self,
        submission: LeadSubmission,
    ) -> Result<SubmissionReceipt, FunnelServiceError> {
        let mut session = FunnelSession::new(self.session_policy());
        session.apply(FunnelAction::Begin)?;
        session.apply(FunnelAction::SubmitLead(submission.lead_form()))?;

        let answers = AnswerSet::from_wire(&self.catalog, &submission.answers);
        for (id, value) in answers.iter() {
            session.apply(FunnelAction::Answer {
                id,
                value: value.clone(),
            })?;
        }

        let effects = session.apply(FunnelAction::Finish)?;
        debug_assert_eq!(effects, vec![SideEffect::CompleteSubmission]);

        let receipt = self.complete_submission(&mut session).await;
        Ok(receipt)
    }

    /// Execute the `CompleteSubmission` side effect for a finished session.
    async fn complete_submission(&self, session: &mut FunnelSession) -> SubmissionReceipt {
        let answers = session.answers().clone();
        let score = self.engine.score(&answers);
        let mut insights = self.generator.insights(&answers, &score);

        match tokio::time::timeout(
            self.config.enrichment_timeout(),
            self.enrichment.suggest(&answers),
        )
        .await
        {
            Ok(Ok(extra)) => insights.push(extra),
            Ok(Err(err)) => warn!(%err, "enrichment skipped"),
            Err(_) => warn!(
                timeout_ms = self.config.enrichment_timeout_ms,
                "enrichment timed out; continuing without it"
            ),
        }

        let record = LeadRecord::new(session.lead(), answers, score, insights);
        session.attach_record(record.id);

        let persisted = match self.repository.insert(record.clone()) {
            Ok(_) => true,
            Err(err) => {
                warn!(record_id = %record.id, %err, "lead record not persisted");
                false
            }
        };

        let view = self.assembler.assemble(&record);
        let delivery = self.dispatch_report(&record, &view);

        if persisted {
            let annotated = record.clone().with_delivery(delivery.clone());
            if let Err(err) = self.repository.update(annotated) {
                warn!(record_id = %record.id, %err, "delivery annotation not persisted");
            }
        }

        info!(
            record_id = %record.id,
            band = record.score.band.label(),
            percentage = record.score.percentage,
            "funnel submission completed"
        );

        SubmissionReceipt {
            record_id: record.id,
            persisted,
            delivery,
            report: view,
        }
    }

    /// Render the document and hand it to the mail transport. Every failure
    /// path degrades to a delivery annotation.
    fn dispatch_report(&self, record: &LeadRecord, view: &ReportView) -> DeliveryOutcome {
        let rendered = match self.renderer.render(view) {
            Ok(rendered) => rendered,
            Err(RenderError::Failed(reason)) => {
                warn!(record_id = %record.id, %reason, "report rendering failed");
                return DeliveryOutcome::Failed { reason };
            }
        };

        let email = ReportEmail {
            to: record.email.clone(),
            subject: format!("{REPORT_TITLE} for {}", record.name),
            body: format!(
                "Hi {},\n\nYour readiness report is attached.\n{}\n",
                record.name, view.score_line
            ),
            attachment_name: rendered.filename,
            attachment: rendered.bytes,
        };

        match self.mail.send(email) {
            Ok(()) => DeliveryOutcome::Sent,
            Err(TransportError::NotConfigured) => {
                info!(record_id = %record.id, "mail transport not configured; report kept for download");
                DeliveryOutcome::NotConfigured
            }
            Err(TransportError::Failed(reason)) => {
                warn!(record_id = %record.id, %reason, "report email failed");
                DeliveryOutcome::Failed { reason }
            }
        }
    }

    /// Side-effect-free retrieval: re-assembling a report never re-persists
    /// and never re-triggers delivery.
    pub fn report(&self, id: &Uuid) -> Result<ReportView, FunnelServiceError> {
        let record = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(self.assembler.assemble(&record))
    }

    /// Re-render the downloadable document for an existing record.
    pub fn document(&self, id: &Uuid) -> Result<RenderedReport, FunnelServiceError> {
        let view = self.report(id)?;
        Ok(self.renderer.render(&view)?)
    }
}

/// Error raised by the funnel service.
#[derive(Debug, thiserror::Error)]
pub enum FunnelServiceError {
    #[error(transparent)]
    Funnel(#[from] FunnelError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Render(#[from] RenderError),
}
