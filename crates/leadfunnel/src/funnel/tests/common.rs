use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::config::FunnelConfig;
use crate::funnel::answers::{AnswerSet, AnswerValue};
use crate::funnel::catalog::{QuestionCatalog, QuestionId, COMPLEX_COHORT_OPTION};
use crate::funnel::record::LeadRecord;
use crate::funnel::report::ReportView;
use crate::funnel::repository::{
    DisabledEnrichment, EnrichmentClient, EnrichmentError, LeadRepository, MailTransport,
    RenderError, RenderedReport, ReportEmail, ReportRenderer, RepositoryError, TransportError,
};
use crate::funnel::service::{FunnelService, LeadSubmission};

pub(super) fn catalog() -> QuestionCatalog {
    QuestionCatalog::standard()
}

/// Answer set with the first `affirmative` best-practice questions answered
/// yes and the remainder answered no.
pub(super) fn best_practice_answers(affirmative: usize) -> AnswerSet {
    let mut answers = AnswerSet::new();
    for (index, definition) in catalog().best_practices().enumerate() {
        answers.insert(definition.id, AnswerValue::YesNo(index < affirmative));
    }
    answers
}

pub(super) fn with_ratings(mut answers: AnswerSet, current: u8, desired: u8) -> AnswerSet {
    answers.insert(QuestionId::CurrentAutomation, AnswerValue::Scale(current));
    answers.insert(QuestionId::DesiredAutomation, AnswerValue::Scale(desired));
    answers
}

pub(super) fn with_complex_cohort(mut answers: AnswerSet) -> AnswerSet {
    answers.insert(
        QuestionId::CohortComplexity,
        AnswerValue::Choice(COMPLEX_COHORT_OPTION.to_string()),
    );
    answers
}

pub(super) fn all_yes_wire() -> BTreeMap<String, Value> {
    catalog()
        .best_practices()
        .map(|definition| (definition.id.as_str().to_string(), json!("yes")))
        .collect()
}

pub(super) fn submission_with(answers: BTreeMap<String, Value>) -> LeadSubmission {
    LeadSubmission {
        name: "Dana Fields".to_string(),
        email: "dana@brightsmiles.example".to_string(),
        location: "Des Moines".to_string(),
        consent: true,
        answers,
    }
}

pub(super) fn funnel_config() -> FunnelConfig {
    FunnelConfig {
        location_required: true,
        insight_display_cap: 5,
        enrichment_timeout_ms: 200,
        mail_sender: None,
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    records: Arc<Mutex<HashMap<Uuid, LeadRecord>>>,
}

impl LeadRepository for MemoryRepository {
    fn insert(&self, record: LeadRecord) -> Result<LeadRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("lock");
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id, record.clone());
        Ok(record)
    }

    fn update(&self, record: LeadRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("lock");
        if guard.contains_key(&record.id) {
            guard.insert(record.id, record);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &Uuid) -> Result<Option<LeadRecord>, RepositoryError> {
        let guard = self.records.lock().expect("lock");
        Ok(guard.get(id).cloned())
    }
}

/// Repository that refuses every operation, for persistence-failure paths.
#[derive(Default, Clone)]
pub(super) struct BrokenRepository;

impl LeadRepository for BrokenRepository {
    fn insert(&self, _record: LeadRecord) -> Result<LeadRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("disk full".to_string()))
    }

    fn update(&self, _record: LeadRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("disk full".to_string()))
    }

    fn fetch(&self, _id: &Uuid) -> Result<Option<LeadRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("disk full".to_string()))
    }
}

#[derive(Default, Clone)]
pub(super) struct RecordingMail {
    sent: Arc<Mutex<Vec<ReportEmail>>>,
}

impl RecordingMail {
    pub(super) fn sent(&self) -> Vec<ReportEmail> {
        self.sent.lock().expect("lock").clone()
    }
}

impl MailTransport for RecordingMail {
    fn send(&self, email: ReportEmail) -> Result<(), TransportError> {
        self.sent.lock().expect("lock").push(email);
        Ok(())
    }
}

#[derive(Default, Clone)]
pub(super) struct UnconfiguredMail;

impl MailTransport for UnconfiguredMail {
    fn send(&self, _email: ReportEmail) -> Result<(), TransportError> {
        Err(TransportError::NotConfigured)
    }
}

#[derive(Default, Clone)]
pub(super) struct PlainRenderer;

impl ReportRenderer for PlainRenderer {
    fn render(&self, view: &ReportView) -> Result<RenderedReport, RenderError> {
        let text = format!(
            "{}\n{}\n{}\n{}\n",
            view.title, view.record_id, view.name, view.score_line
        );
        Ok(RenderedReport {
            filename: format!("readiness-report-{}.txt", view.record_id),
            content_type: "text/plain; charset=utf-8",
            bytes: text.into_bytes(),
        })
    }
}

/// Enrichment stub returning a fixed suggestion immediately.
#[derive(Clone)]
pub(super) struct StubEnrichment {
    pub(super) text: String,
}

#[async_trait]
impl EnrichmentClient for StubEnrichment {
    async fn suggest(&self, _answers: &AnswerSet) -> Result<String, EnrichmentError> {
        Ok(self.text.clone())
    }
}

/// Enrichment stub that outlives any sane timeout.
#[derive(Clone, Copy)]
pub(super) struct SlowEnrichment;

#[async_trait]
impl EnrichmentClient for SlowEnrichment {
    async fn suggest(&self, _answers: &AnswerSet) -> Result<String, EnrichmentError> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok("too late".to_string())
    }
}

pub(super) fn build_service() -> (
    Arc<FunnelService<MemoryRepository, RecordingMail, DisabledEnrichment>>,
    Arc<MemoryRepository>,
    Arc<RecordingMail>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let mail = Arc::new(RecordingMail::default());
    let service = Arc::new(FunnelService::new(
        repository.clone(),
        mail.clone(),
        Arc::new(DisabledEnrichment),
        Arc::new(PlainRenderer),
        funnel_config(),
    ));
    (service, repository, mail)
}

pub(super) fn build_service_with<R, M, E>(
    repository: Arc<R>,
    mail: Arc<M>,
    enrichment: Arc<E>,
) -> Arc<FunnelService<R, M, E>>
where
    R: LeadRepository + 'static,
    M: MailTransport + 'static,
    E: EnrichmentClient + 'static,
{
    Arc::new(FunnelService::new(
        repository,
        mail,
        enrichment,
        Arc::new(PlainRenderer),
        funnel_config(),
    ))
}
