use serde::{Deserialize, Serialize};

/// Closed identifier set for quiz questions, ordered as presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionId {
    OnlineBooking,
    AutomatedReminders,
    DigitalIntake,
    RecallCampaigns,
    WaitlistBackfill,
    TwoWayMessaging,
    FollowUpSequences,
    OutcomeTracking,
    ReviewRequests,
    OnlinePayments,
    CurrentAutomation,
    DesiredAutomation,
    CohortComplexity,
    DesiredOutcome,
    MainObstacle,
    AdditionalContext,
}

impl QuestionId {
    pub const fn as_str(self) -> &'static str {
        match self {
            QuestionId::OnlineBooking => "online_booking",
            QuestionId::AutomatedReminders => "automated_reminders",
            QuestionId::DigitalIntake => "digital_intake",
            QuestionId::RecallCampaigns => "recall_campaigns",
            QuestionId::WaitlistBackfill => "waitlist_backfill",
            QuestionId::TwoWayMessaging => "two_way_messaging",
            QuestionId::FollowUpSequences => "follow_up_sequences",
            QuestionId::OutcomeTracking => "outcome_tracking",
            QuestionId::ReviewRequests => "review_requests",
            QuestionId::OnlinePayments => "online_payments",
            QuestionId::CurrentAutomation => "current_automation",
            QuestionId::DesiredAutomation => "desired_automation",
            QuestionId::CohortComplexity => "cohort_complexity",
            QuestionId::DesiredOutcome => "desired_outcome",
            QuestionId::MainObstacle => "main_obstacle",
            QuestionId::AdditionalContext => "additional_context",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        QuestionCatalog::standard()
            .questions()
            .iter()
            .map(|definition| definition.id)
            .find(|id| id.as_str() == raw.trim())
    }
}

/// Presentation and parsing shape of a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    YesNo,
    Scale { max: u8 },
    SingleChoice { options: &'static [&'static str] },
    FreeText,
}

/// How an answer participates in scoring and insight generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringRole {
    BestPractice,
    ContextCurrent,
    ContextDesired,
    Obstacle,
    SolutionPreference,
    Note,
}

/// Static definition of one quiz item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuestionDefinition {
    pub id: QuestionId,
    pub prompt: &'static str,
    pub kind: QuestionKind,
    pub role: ScoringRole,
}

pub const COHORT_OPTIONS: &[&str] = &[
    "Routine single-visit patients",
    "Mixed case load",
    "Complex multi-visit treatment plans",
];

/// Cohort selection that earns the complexity context bonus.
pub const COMPLEX_COHORT_OPTION: &str = "Complex multi-visit treatment plans";

pub const OUTCOME_OPTIONS: &[&str] = &[
    "Reduce no-shows",
    "Fill more appointments",
    "Free up front-desk time",
    "Grow patient reviews",
];

pub const OBSTACLE_OPTIONS: &[&str] = &[
    "No time to implement",
    "Budget",
    "Team buy-in",
    "Unsure where to start",
];

const STANDARD_QUESTIONS: &[QuestionDefinition] = &[
    QuestionDefinition {
        id: QuestionId::OnlineBooking,
        prompt: "Do you offer online appointment booking?",
        kind: QuestionKind::YesNo,
        role: ScoringRole::BestPractice,
    },
    QuestionDefinition {
        id: QuestionId::AutomatedReminders,
        prompt: "Do you send automated appointment reminders?",
        kind: QuestionKind::YesNo,
        role: ScoringRole::BestPractice,
    },
    QuestionDefinition {
        id: QuestionId::DigitalIntake,
        prompt: "Do patients complete intake forms digitally before arrival?",
        kind: QuestionKind::YesNo,
        role: ScoringRole::BestPractice,
    },
    QuestionDefinition {
        id: QuestionId::RecallCampaigns,
        prompt: "Do you run automated recall campaigns for overdue patients?",
        kind: QuestionKind::YesNo,
        role: ScoringRole::BestPractice,
    },
    QuestionDefinition {
        id: QuestionId::WaitlistBackfill,
        prompt: "Are cancelled slots backfilled automatically from a waitlist?",
        kind: QuestionKind::YesNo,
        role: ScoringRole::BestPractice,
    },
    QuestionDefinition {
        id: QuestionId::TwoWayMessaging,
        prompt: "Can patients reach the practice by two-way text messaging?",
        kind: QuestionKind::YesNo,
        role: ScoringRole::BestPractice,
    },
    QuestionDefinition {
        id: QuestionId::FollowUpSequences,
        prompt: "Do new enquiries receive an automated follow-up sequence?",
        kind: QuestionKind::YesNo,
        role: ScoringRole::BestPractice,
    },
    QuestionDefinition {
        id: QuestionId::OutcomeTracking,
        prompt: "Do you track booking and attendance rates in a dashboard?",
        kind: QuestionKind::YesNo,
        role: ScoringRole::BestPractice,
    },
    QuestionDefinition {
        id: QuestionId::ReviewRequests,
        prompt: "Are review requests sent automatically after completed visits?",
        kind: QuestionKind::YesNo,
        role: ScoringRole::BestPractice,
    },
    QuestionDefinition {
        id: QuestionId::OnlinePayments,
        prompt: "Can patients pay invoices online?",
        kind: QuestionKind::YesNo,
        role: ScoringRole::BestPractice,
    },
    QuestionDefinition {
        id: QuestionId::CurrentAutomation,
        prompt: "How automated is your patient journey today? (0-10)",
        kind: QuestionKind::Scale { max: 10 },
        role: ScoringRole::ContextCurrent,
    },
    QuestionDefinition {
        id: QuestionId::DesiredAutomation,
        prompt: "Where should automation be in twelve months? (0-10)",
        kind: QuestionKind::Scale { max: 10 },
        role: ScoringRole::ContextDesired,
    },
    QuestionDefinition {
        id: QuestionId::CohortComplexity,
        prompt: "Which best describes your patient case load?",
        kind: QuestionKind::SingleChoice {
            options: COHORT_OPTIONS,
        },
        role: ScoringRole::ContextCurrent,
    },
    QuestionDefinition {
        id: QuestionId::DesiredOutcome,
        prompt: "What outcome matters most to you right now?",
        kind: QuestionKind::SingleChoice {
            options: OUTCOME_OPTIONS,
        },
        role: ScoringRole::SolutionPreference,
    },
    QuestionDefinition {
        id: QuestionId::MainObstacle,
        prompt: "What has held automation back so far?",
        kind: QuestionKind::SingleChoice {
            options: OBSTACLE_OPTIONS,
        },
        role: ScoringRole::Obstacle,
    },
    QuestionDefinition {
        id: QuestionId::AdditionalContext,
        prompt: "Anything else about your practice we should know?",
        kind: QuestionKind::FreeText,
        role: ScoringRole::Note,
    },
];

/// Ordered, immutable quiz definition shared by every session.
#[derive(Debug, Clone, Copy)]
pub struct QuestionCatalog {
    questions: &'static [QuestionDefinition],
}

impl QuestionCatalog {
    pub const fn standard() -> Self {
        Self {
            questions: STANDARD_QUESTIONS,
        }
    }

    pub fn questions(&self) -> &'static [QuestionDefinition] {
        self.questions
    }

    pub fn definition(&self, id: QuestionId) -> Option<&'static QuestionDefinition> {
        self.questions.iter().find(|definition| definition.id == id)
    }

    pub fn best_practices(&self) -> impl Iterator<Item = &'static QuestionDefinition> + '_ {
        self.questions
            .iter()
            .filter(|definition| definition.role == ScoringRole::BestPractice)
    }

    pub fn best_practice_count(&self) -> usize {
        self.best_practices().count()
    }

    /// Label for a raw id; unknown ids fall back to the raw string.
    pub fn label(&self, raw_id: &str) -> String {
        match QuestionId::parse(raw_id).and_then(|id| self.definition(id)) {
            Some(definition) => definition.prompt.to_string(),
            None => raw_id.to_string(),
        }
    }
}

impl Default for QuestionCatalog {
    fn default() -> Self {
        Self::standard()
    }
}
