use serde::{Deserialize, Serialize};

use super::answers::AnswerSet;
use super::catalog::{QuestionCatalog, QuestionId};
use super::scoring::{ScoreBand, ScoreResult};

/// Self-rating gap at or above which the accelerated-plan message fires.
const ACCELERATED_PLAN_GAP: i16 = 4;

/// Ordered, prioritized recommendations. The full list is retained for the
/// report document; display surfaces cap it via [`InsightList::top`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InsightList {
    entries: Vec<String>,
}

impl InsightList {
    pub fn push(&mut self, entry: impl Into<String>) {
        self.entries.push(entry.into());
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn top(&self, cap: usize) -> &[String] {
        &self.entries[..self.entries.len().min(cap)]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Rule-based insight generation. Excluding the optional enrichment entry
/// appended by the service, output is a pure function of (answers, score).
#[derive(Debug, Clone)]
pub struct InsightGenerator {
    catalog: QuestionCatalog,
}

impl InsightGenerator {
    pub fn new(catalog: QuestionCatalog) -> Self {
        Self { catalog }
    }

    pub fn insights(&self, answers: &AnswerSet, score: &ScoreResult) -> InsightList {
        let mut list = InsightList::default();

        list.push(baseline_message(score.band));

        for definition in self.catalog.best_practices() {
            if !answers.is_affirmative(definition.id) {
                if let Some(recommendation) = gap_recommendation(definition.id) {
                    list.push(recommendation);
                }
            }
        }

        let current = answers.scale(QuestionId::CurrentAutomation);
        let desired = answers.scale(QuestionId::DesiredAutomation);
        if current > 0 && desired > 0 {
            let gap = desired as i16 - current as i16;
            if gap >= ACCELERATED_PLAN_GAP {
                list.push(ACCELERATED_PLAN_MESSAGE);
            } else {
                list.push(INCREMENTAL_PLAN_MESSAGE);
            }
        }

        if let Some(tactic) = answers
            .choice(QuestionId::DesiredOutcome)
            .and_then(outcome_tactic)
        {
            list.push(tactic);
        }

        list
    }
}

pub const ACCELERATED_PLAN_MESSAGE: &str = "The gap between where you are and where you want to \
    be is large. An accelerated implementation plan with weekly milestones will be needed.";

pub const INCREMENTAL_PLAN_MESSAGE: &str = "You are within reach of your automation target. An \
    incremental plan, one change per fortnight, will get you there.";

/// Fixed prose opener for each band; always the first insight.
pub const fn baseline_message(band: ScoreBand) -> &'static str {
    match band {
        ScoreBand::Red => {
            "Most of your patient journey still relies on manual work. Start with the first \
             recommendations below to stop losing leads."
        }
        ScoreBand::Amber => {
            "You have some automation in place, but gaps in the patient journey are costing you \
             bookings. A focused rollout plan will close them."
        }
        ScoreBand::Green => {
            "Your practice already runs on strong automation foundations. The next wins come \
             from tuning what you have and measuring outcomes."
        }
    }
}

/// Fixed mapping from a missed best practice to a targeted recommendation.
fn gap_recommendation(id: QuestionId) -> Option<&'static str> {
    match id {
        QuestionId::OnlineBooking => {
            Some("Add online self-scheduling so new patients can book without calling.")
        }
        QuestionId::AutomatedReminders => {
            Some("Layer SMS and email reminders 48 and 2 hours before each visit.")
        }
        QuestionId::DigitalIntake => {
            Some("Move intake paperwork online to cut front-desk handling time.")
        }
        QuestionId::RecallCampaigns => {
            Some("Schedule recurring recall outreach for patients overdue for a visit.")
        }
        QuestionId::WaitlistBackfill => {
            Some("Keep a standing waitlist and auto-offer cancelled slots to it.")
        }
        QuestionId::TwoWayMessaging => {
            Some("Open a two-way SMS channel so reschedules stay out of the phone queue.")
        }
        QuestionId::FollowUpSequences => {
            Some("Automate a short follow-up sequence so no enquiry goes cold.")
        }
        QuestionId::OutcomeTracking => {
            Some("Track bookings, attendance, and no-shows weekly so changes are measurable.")
        }
        QuestionId::ReviewRequests => {
            Some("Trigger review requests after completed visits to build referral flow.")
        }
        QuestionId::OnlinePayments => {
            Some("Offer online payment links to shorten the billing cycle.")
        }
        _ => None,
    }
}

/// Single tactic keyed by exact match on the desired-outcome selection.
fn outcome_tactic(choice: &str) -> Option<&'static str> {
    match choice {
        "Reduce no-shows" => {
            Some("Start with layered reminders plus a deposit policy for repeat no-shows.")
        }
        "Fill more appointments" => {
            Some("Pair waitlist backfill with recall campaigns to lift utilisation.")
        }
        "Free up front-desk time" => {
            Some("Digitise intake and move confirmations to two-way SMS first.")
        }
        "Grow patient reviews" => {
            Some("Automate post-visit review requests with a direct review link.")
        }
        _ => None,
    }
}
