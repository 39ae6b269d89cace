use crate::domain::scoring::{CategoryScoring, ScoringStrategy};
use serde::Serialize;

pub type TeamId = u32;

pub const SCORE_SLOTS: usize = 5;

/// 五項評審原始分數，長度固定為 5
pub type RawScores = [i32; SCORE_SLOTS];

/// Label used wherever a team has no judge assignment.
pub const UNASSIGNED_JUDGE: &str = "Unassigned";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub university: String,
    pub category: String,
    pub eligible: bool,
    pub scores: RawScores,
    /// 自訂細節（隊名縮寫）
    pub custom_detail: String,
    pub scoring: CategoryScoring,
}

impl Team {
    pub fn new(
        id: TeamId,
        name: impl Into<String>,
        university: impl Into<String>,
        category: impl Into<String>,
        scores: RawScores,
        scoring: CategoryScoring,
    ) -> Self {
        let name = name.into();
        let custom_detail = initials(&name);
        Self {
            id,
            name,
            university: university.into(),
            category: category.into(),
            eligible: true,
            scores,
            custom_detail,
            scoring,
        }
    }

    /// 每次都重新計算，不做快取
    pub fn overall_score(&self) -> f64 {
        self.scoring.overall_score(&self.scores, self.eligible)
    }

    pub fn eligibility_label(&self) -> &'static str {
        if self.eligible {
            "Eligible"
        } else {
            "INELIGIBLE"
        }
    }

    pub fn full_details(&self) -> String {
        let scores = self
            .scores
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            "Team ID: {}\nName: {}\nUniversity: {}\nCategory: {}\nEligibility: {}\nCustom Detail (Initials): {}\nScores (5 Criteria): [{}]\nOverall Score (max 5.0): {:.2}\n{}",
            self.id,
            self.name,
            self.university,
            self.category,
            self.eligibility_label(),
            self.custom_detail,
            scores,
            self.overall_score(),
            self.scoring.attribute_details()
        )
    }
}

/// Short custom detail derived from a team name: first letter plus the first
/// letter of the last word, or the first two letters of a single-word name.
pub fn initials(name: &str) -> String {
    let name = name.trim();
    let detail: String = match name.rfind(' ') {
        Some(idx) => name
            .chars()
            .take(1)
            .chain(name[idx + 1..].chars().take(1))
            .collect(),
        None => name.chars().take(2).collect(),
    };
    detail.to_uppercase()
}
