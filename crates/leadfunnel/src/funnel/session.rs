use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::answers::{AnswerSet, AnswerValue};
use super::catalog::QuestionId;

/// Funnel step sequence. The only backward transition is an explicit
/// restart, which discards in-progress state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunnelStage {
    Landing,
    LeadCapture,
    Quiz,
    Results,
}

impl FunnelStage {
    pub const fn label(self) -> &'static str {
        match self {
            FunnelStage::Landing => "landing",
            FunnelStage::LeadCapture => "lead_capture",
            FunnelStage::Quiz => "quiz",
            FunnelStage::Results => "results",
        }
    }
}

/// Contact fields collected on the lead-capture step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadForm {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub consent: bool,
}

/// Guard configuration for the lead-capture transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionPolicy {
    pub location_required: bool,
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self {
            location_required: true,
        }
    }
}

/// Actions the funnel reducer accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FunnelAction {
    Begin,
    SubmitLead(LeadForm),
    Answer { id: QuestionId, value: AnswerValue },
    Finish,
    Restart,
}

/// Side effects requested by a transition; the caller executes them so the
/// reducer stays pure and unit-testable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideEffect {
    /// Score, generate insights, assemble the record, persist, and deliver.
    CompleteSubmission,
}

/// Violation of a transition guard. Validation carries the single message
/// surfaced to the visitor; the stage never advances on error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FunnelError {
    #[error("{0}")]
    Validation(String),
    #[error("action not available from the {} step", .stage.label())]
    InvalidTransition { stage: FunnelStage },
}

/// Explicit per-visitor session state; nothing about the funnel is global.
#[derive(Debug, Clone, PartialEq)]
pub struct FunnelSession {
    stage: FunnelStage,
    policy: SessionPolicy,
    lead: LeadForm,
    answers: AnswerSet,
    submitted: bool,
    record_id: Option<Uuid>,
}

impl FunnelSession {
    pub fn new(policy: SessionPolicy) -> Self {
        Self {
            stage: FunnelStage::Landing,
            policy,
            lead: LeadForm::default(),
            answers: AnswerSet::new(),
            submitted: false,
            record_id: None,
        }
    }

    pub fn stage(&self) -> FunnelStage {
        self.stage
    }

    pub fn lead(&self) -> &LeadForm {
        &self.lead
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    pub fn submitted(&self) -> bool {
        self.submitted
    }

    pub fn record_id(&self) -> Option<Uuid> {
        self.record_id
    }

    /// Mark the record produced by an executed `CompleteSubmission` effect so
    /// repeat finishes within the session resolve to the same identity.
    pub fn attach_record(&mut self, id: Uuid) {
        self.record_id = Some(id);
    }

    /// Pure reducer: applies one action, returning the side effects the
    /// caller must execute. On a guard violation the session is unchanged.
    pub fn apply(&mut self, action: FunnelAction) -> Result<Vec<SideEffect>, FunnelError> {
        match (self.stage, action) {
            (FunnelStage::Landing, FunnelAction::Begin) => {
                self.stage = FunnelStage::LeadCapture;
                Ok(Vec::new())
            }
            (FunnelStage::LeadCapture, FunnelAction::SubmitLead(lead)) => {
                validate_lead(&lead, &self.policy)?;
                self.lead = lead;
                self.stage = FunnelStage::Quiz;
                Ok(Vec::new())
            }
            (FunnelStage::Quiz, FunnelAction::Answer { id, value }) => {
                self.answers.insert(id, value);
                Ok(Vec::new())
            }
            (FunnelStage::Quiz, FunnelAction::Finish) => {
                self.stage = FunnelStage::Results;
                self.submitted = true;
                Ok(vec![SideEffect::CompleteSubmission])
            }
            // A repeat finish on the results step is a no-op: the submitted
            // flag blocks duplicate persistence and delivery.
            (FunnelStage::Results, FunnelAction::Finish) if self.submitted => Ok(Vec::new()),
            (_, FunnelAction::Restart) => {
                self.stage = FunnelStage::Landing;
                self.lead = LeadForm::default();
                self.answers = AnswerSet::new();
                self.submitted = false;
                self.record_id = None;
                Ok(Vec::new())
            }
            (stage, _) => Err(FunnelError::InvalidTransition { stage }),
        }
    }
}

fn validate_lead(lead: &LeadForm, policy: &SessionPolicy) -> Result<(), FunnelError> {
    if lead.name.trim().is_empty() {
        return Err(FunnelError::Validation("name is required".to_string()));
    }
    if !email_shape_ok(&lead.email) {
        return Err(FunnelError::Validation(
            "email address looks invalid".to_string(),
        ));
    }
    if policy.location_required && lead.location.trim().is_empty() {
        return Err(FunnelError::Validation("location is required".to_string()));
    }
    if !lead.consent {
        return Err(FunnelError::Validation(
            "consent is required to receive your report".to_string(),
        ));
    }
    Ok(())
}

/// Basic email shape check: one '@', non-empty local part, dotted domain.
fn email_shape_ok(email: &str) -> bool {
    let email = email.trim();
    let mut parts = email.splitn(2, '@');
    let (Some(local), Some(domain)) = (parts.next(), parts.next()) else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let mut labels = domain.split('.');
    let has_dot = domain.contains('.');
    has_dot && labels.all(|label| !label.is_empty())
}
