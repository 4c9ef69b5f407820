use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::answers::AnswerSet;
use super::insights::InsightList;
use super::scoring::ScoreResult;
use super::session::LeadForm;

/// Terminal state of a report delivery attempt, annotated on the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryOutcome {
    Sent,
    Failed { reason: String },
    NotConfigured,
}

/// Durable artifact of one completed quiz submission. Immutable after
/// creation except for the delivery annotation; the id is generated once
/// and is the sole retrieval key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadRecord {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub location: String,
    pub answers: AnswerSet,
    pub score: ScoreResult,
    pub insights: InsightList,
    pub created_at: DateTime<Utc>,
    pub delivery: Option<DeliveryOutcome>,
}

impl LeadRecord {
    pub fn new(
        lead: &LeadForm,
        answers: AnswerSet,
        score: ScoreResult,
        insights: InsightList,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: lead.name.trim().to_string(),
            email: lead.email.trim().to_string(),
            location: lead.location.trim().to_string(),
            answers,
            score,
            insights,
            created_at: Utc::now(),
            delivery: None,
        }
    }

    pub fn with_delivery(mut self, outcome: DeliveryOutcome) -> Self {
        self.delivery = Some(outcome);
        self
    }
}
