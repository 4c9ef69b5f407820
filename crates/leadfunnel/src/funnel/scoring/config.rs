use serde::{Deserialize, Serialize};

/// Rubric configuration for the readiness score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Bonus for a complex-cohort practice profile.
    pub complex_cohort_bonus: f32,
    /// Bonus for an ambitious twelve-month automation target.
    pub ambitious_target_bonus: f32,
    /// Desired self-rating at or above which the target bonus applies.
    pub ambitious_target_threshold: u8,
    /// Percentage at or above which the band is Green.
    pub green_threshold: u8,
    /// Percentage at or above which the band is Amber.
    pub amber_threshold: u8,
}

impl ScoringConfig {
    /// Ceiling on additive context bonuses, known in advance.
    pub fn bonus_ceiling(&self) -> f32 {
        self.complex_cohort_bonus + self.ambitious_target_bonus
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            complex_cohort_bonus: 0.5,
            ambitious_target_bonus: 0.5,
            ambitious_target_threshold: 9,
            green_threshold: 75,
            amber_threshold: 45,
        }
    }
}
