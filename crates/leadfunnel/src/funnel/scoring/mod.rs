mod config;
mod policy;

pub use config::ScoringConfig;
pub use policy::ScoreBand;

use serde::{Deserialize, Serialize};

use super::answers::AnswerSet;
use super::catalog::{QuestionCatalog, QuestionId, COMPLEX_COHORT_OPTION};
use policy::band_for_percentage;

/// Stateless engine applying the rubric to an answer set.
///
/// Scoring is total: any input, however malformed, degrades to a valid
/// numeric default, so there is no error path.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    catalog: QuestionCatalog,
    config: ScoringConfig,
}

impl ScoringEngine {
    pub fn new(catalog: QuestionCatalog, config: ScoringConfig) -> Self {
        Self { catalog, config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Maximum achievable raw points: best-practice base plus bonus ceiling.
    pub fn max_points(&self) -> f32 {
        self.catalog.best_practice_count() as f32 + self.config.bonus_ceiling()
    }

    pub fn score(&self, answers: &AnswerSet) -> ScoreResult {
        let base_points = self
            .catalog
            .best_practices()
            .filter(|definition| answers.is_affirmative(definition.id))
            .count() as f32;

        let mut bonus = 0.0;
        if answers.choice(QuestionId::CohortComplexity) == Some(COMPLEX_COHORT_OPTION) {
            bonus += self.config.complex_cohort_bonus;
        }
        if answers.scale(QuestionId::DesiredAutomation) >= self.config.ambitious_target_threshold {
            bonus += self.config.ambitious_target_bonus;
        }

        let raw_points = base_points + bonus;

        // Percentage is measured against the best-practice baseline so k
        // affirmative answers with no bonuses land exactly on round(100k/N);
        // bonuses can push a borderline profile up, clamped at 100.
        let baseline = self.catalog.best_practice_count() as f32;
        let percentage = if baseline > 0.0 {
            ((raw_points / baseline) * 100.0).round().clamp(0.0, 100.0) as u8
        } else {
            0
        };

        let band = band_for_percentage(percentage, &self.config);

        ScoreResult {
            raw_points,
            percentage,
            band,
        }
    }
}

/// Derived score; always reproducible from the answer set that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub raw_points: f32,
    pub percentage: u8,
    pub band: ScoreBand,
}

impl ScoreResult {
    pub fn summary_line(&self) -> String {
        format!(
            "Readiness score: {:.1} points ({}%) - {}",
            self.raw_points,
            self.percentage,
            self.band.headline()
        )
    }
}
