use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::catalog::QuestionCatalog;
use super::record::LeadRecord;
use super::scoring::ScoreBand;

pub const REPORT_TITLE: &str = "Practice Readiness Scorecard";

/// One labeled answer in the report listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnsweredQuestionView {
    pub question_id: String,
    pub label: String,
    pub answer: String,
}

/// Presentation-ready projection of a lead record. The results endpoint and
/// the document renderer both consume this view, so the emailed report and
/// the on-screen results always derive from the same data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportView {
    pub title: &'static str,
    pub record_id: Uuid,
    pub name: String,
    pub email: String,
    pub location: String,
    pub created_at: DateTime<Utc>,
    pub raw_points: f32,
    pub percentage: u8,
    pub band: ScoreBand,
    pub band_label: &'static str,
    pub score_line: String,
    pub top_insights: Vec<String>,
    pub insights: Vec<String>,
    pub answers: Vec<AnsweredQuestionView>,
    pub next_step: &'static str,
}

/// Pure transformation from record to view; no I/O.
#[derive(Debug, Clone)]
pub struct ReportAssembler {
    catalog: QuestionCatalog,
    display_cap: usize,
}

impl ReportAssembler {
    pub fn new(catalog: QuestionCatalog, display_cap: usize) -> Self {
        Self {
            catalog,
            display_cap,
        }
    }

    pub fn assemble(&self, record: &LeadRecord) -> ReportView {
        let answers = self
            .catalog
            .questions()
            .iter()
            .map(|definition| {
                let raw_id = definition.id.as_str();
                AnsweredQuestionView {
                    question_id: raw_id.to_string(),
                    label: self.catalog.label(raw_id),
                    answer: record
                        .answers
                        .get(definition.id)
                        .map(|value| value.display())
                        .filter(|text| !text.is_empty())
                        .unwrap_or_else(|| "not answered".to_string()),
                }
            })
            .collect();

        ReportView {
            title: REPORT_TITLE,
            record_id: record.id,
            name: record.name.clone(),
            email: record.email.clone(),
            location: record.location.clone(),
            created_at: record.created_at,
            raw_points: record.score.raw_points,
            percentage: record.score.percentage,
            band: record.score.band,
            band_label: record.score.band.headline(),
            score_line: record.score.summary_line(),
            top_insights: record.insights.top(self.display_cap).to_vec(),
            insights: record.insights.entries().to_vec(),
            answers,
            next_step: next_step_line(record.score.band),
        }
    }
}

/// Band-specific closing line required in every rendered report.
pub const fn next_step_line(band: ScoreBand) -> &'static str {
    match band {
        ScoreBand::Red => "Next step: book a strategy call to prioritise your first rollout.",
        ScoreBand::Amber => "Next step: implement the top recommendation above this month.",
        ScoreBand::Green => "Next step: review your metrics quarterly and tune reminder timing.",
    }
}
