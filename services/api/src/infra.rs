use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;
use uuid::Uuid;

use leadfunnel::config::FunnelConfig;
use leadfunnel::funnel::{
    DisabledEnrichment, FunnelService, LeadRecord, LeadRepository, MailTransport, RenderError,
    RenderedReport, ReportEmail, ReportRenderer, ReportView, RepositoryError, TransportError,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryLeadRepository {
    records: Arc<Mutex<HashMap<Uuid, LeadRecord>>>,
}

impl LeadRepository for InMemoryLeadRepository {
    fn insert(&self, record: LeadRecord) -> Result<LeadRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id, record.clone());
        Ok(record)
    }

    fn update(&self, record: LeadRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id) {
            guard.insert(record.id, record);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &Uuid) -> Result<Option<LeadRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

/// Mail transport without an external provider: configured sends are logged
/// and retained in memory, unset sender degrades to `NotConfigured`.
#[derive(Default, Clone)]
pub(crate) struct LoggingMailTransport {
    sender: Option<String>,
    sent: Arc<Mutex<Vec<ReportEmail>>>,
}

impl LoggingMailTransport {
    pub(crate) fn new(sender: Option<String>) -> Self {
        Self {
            sender,
            sent: Arc::default(),
        }
    }
}

impl MailTransport for LoggingMailTransport {
    fn send(&self, email: ReportEmail) -> Result<(), TransportError> {
        let Some(sender) = self.sender.as_deref() else {
            return Err(TransportError::NotConfigured);
        };
        info!(
            from = sender,
            to = email.to,
            subject = email.subject,
            attachment = email.attachment_name,
            "report email dispatched"
        );
        self.sent.lock().expect("mail mutex poisoned").push(email);
        Ok(())
    }
}

/// Renders the full report as a plain-text document suitable for an email
/// attachment or direct download.
#[derive(Default, Clone)]
pub(crate) struct PlainTextReportRenderer;

impl ReportRenderer for PlainTextReportRenderer {
    fn render(&self, view: &ReportView) -> Result<RenderedReport, RenderError> {
        let mut text = String::new();
        // Writing to a String cannot fail.
        let _ = writeln!(text, "{}", view.title);
        let _ = writeln!(text, "Record: {}", view.record_id);
        let _ = writeln!(text, "Prepared for: {} <{}>", view.name, view.email);
        if !view.location.is_empty() {
            let _ = writeln!(text, "Location: {}", view.location);
        }
        let _ = writeln!(text, "Generated: {}", view.created_at.to_rfc3339());
        let _ = writeln!(text, "\n{}", view.score_line);
        let _ = writeln!(text, "Tier: {}", view.band_label);
        let _ = writeln!(text, "\nRecommendations");
        for (index, insight) in view.insights.iter().enumerate() {
            let _ = writeln!(text, "{}. {}", index + 1, insight);
        }
        let _ = writeln!(text, "\nYour answers");
        for answer in &view.answers {
            let _ = writeln!(text, "- {}: {}", answer.label, answer.answer);
        }
        let _ = writeln!(text, "\n{}", view.next_step);

        Ok(RenderedReport {
            filename: format!("readiness-report-{}.txt", view.record_id),
            content_type: "text/plain; charset=utf-8",
            bytes: text.into_bytes(),
        })
    }
}

pub(crate) type ApiFunnelService =
    FunnelService<InMemoryLeadRepository, LoggingMailTransport, DisabledEnrichment>;

pub(crate) fn build_funnel_service(config: FunnelConfig) -> Arc<ApiFunnelService> {
    let repository = Arc::new(InMemoryLeadRepository::default());
    let mail = Arc::new(LoggingMailTransport::new(config.mail_sender.clone()));
    Arc::new(FunnelService::new(
        repository,
        mail,
        Arc::new(DisabledEnrichment),
        Arc::new(PlainTextReportRenderer),
        config,
    ))
}
