use crate::domain::model::RawScores;
use serde::{Deserialize, Serialize};

/// 各分類的計分策略
///
/// 所有策略都必須：不具資格時直接回傳 0.0，否則計算加權分數、套用加減分，
/// 最後夾在 [0.0, 5.0] 之間。
pub trait ScoringStrategy {
    fn overall_score(&self, scores: &RawScores, eligible: bool) -> f64;

    /// 分類專屬屬性的說明文字
    fn attribute_details(&self) -> String;
}

pub const MAX_OVERALL_SCORE: f64 = 5.0;

const SECURITY_WEIGHTS: [f64; 5] = [0.10, 0.15, 0.30, 0.25, 0.20];
const SECURITY_BONUS: f64 = 0.5;
const TOOLING_BONUS: f64 = 2.5;
const TOOLING_PENALTY: f64 = 5.0;

fn clamp_overall(score: f64) -> f64 {
    score.clamp(0.0, MAX_OVERALL_SCORE)
}

fn yes_no(flag: bool, yes: &str, no: &str) -> String {
    if flag { yes.to_string() } else { no.to_string() }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SecurityStandards {
    pub adheres: bool,
}

impl ScoringStrategy for SecurityStandards {
    fn overall_score(&self, scores: &RawScores, eligible: bool) -> f64 {
        if !eligible {
            return 0.0;
        }

        let mut weighted: f64 = scores
            .iter()
            .zip(SECURITY_WEIGHTS.iter())
            .map(|(score, weight)| f64::from(*score) * weight)
            .sum();

        if self.adheres {
            weighted += SECURITY_BONUS;
        }

        clamp_overall(weighted)
    }

    fn attribute_details(&self) -> String {
        format!(
            "Unique Attribute: Adheres to Security Standards: {}",
            yes_no(self.adheres, "Yes (Bonus Applied)", "No")
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModernTooling {
    pub uses_modern_tooling: bool,
}

impl ScoringStrategy for ModernTooling {
    fn overall_score(&self, scores: &RawScores, eligible: bool) -> f64 {
        if !eligible {
            return 0.0;
        }

        let mut total: f64 = scores.iter().map(|score| f64::from(*score)).sum();

        if self.uses_modern_tooling {
            total += TOOLING_BONUS;
        } else {
            total -= TOOLING_PENALTY;
        }

        clamp_overall(total.max(0.0) / 5.0)
    }

    fn attribute_details(&self) -> String {
        format!(
            "Unique Attribute: Uses Modern Tooling: {}",
            yes_no(
                self.uses_modern_tooling,
                "Yes (Bonus Applied)",
                "No (Penalty Applied)"
            )
        )
    }
}

/// 計分變體種類（設定檔中的 `scoring` 欄位）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ScoringVariant {
    SecurityStandards,
    #[default]
    ModernTooling,
}

/// 隊伍實際持有的策略，帶著分類專屬的布林屬性
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "variant", rename_all = "kebab-case")]
pub enum CategoryScoring {
    SecurityStandards(SecurityStandards),
    ModernTooling(ModernTooling),
}

impl CategoryScoring {
    pub fn new(variant: ScoringVariant, attribute: bool) -> Self {
        match variant {
            ScoringVariant::SecurityStandards => {
                Self::SecurityStandards(SecurityStandards { adheres: attribute })
            }
            ScoringVariant::ModernTooling => Self::ModernTooling(ModernTooling {
                uses_modern_tooling: attribute,
            }),
        }
    }

    pub fn variant(&self) -> ScoringVariant {
        match self {
            Self::SecurityStandards(_) => ScoringVariant::SecurityStandards,
            Self::ModernTooling(_) => ScoringVariant::ModernTooling,
        }
    }

    pub fn attribute(&self) -> bool {
        match self {
            Self::SecurityStandards(s) => s.adheres,
            Self::ModernTooling(t) => t.uses_modern_tooling,
        }
    }

    /// 換分類時保留屬性旗標，只更換變體
    pub fn with_variant(self, variant: ScoringVariant) -> Self {
        Self::new(variant, self.attribute())
    }
}

impl ScoringStrategy for CategoryScoring {
    fn overall_score(&self, scores: &RawScores, eligible: bool) -> f64 {
        match self {
            Self::SecurityStandards(s) => s.overall_score(scores, eligible),
            Self::ModernTooling(t) => t.overall_score(scores, eligible),
        }
    }

    fn attribute_details(&self) -> String {
        match self {
            Self::SecurityStandards(s) => s.attribute_details(),
            Self::ModernTooling(t) => t.attribute_details(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct VariantRule {
    category: String,
    variant: ScoringVariant,
}

/// 分類名稱 -> 計分變體
///
/// Lookup is case-insensitive. Categories without a rule (including ones added
/// at runtime) fall back to [`ScoringVariant::ModernTooling`].
#[derive(Debug, Clone, Default)]
pub struct ScoringRegistry {
    rules: Vec<VariantRule>,
}

impl ScoringRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rule(mut self, category: &str, variant: ScoringVariant) -> Self {
        self.set(category, variant);
        self
    }

    pub fn set(&mut self, category: &str, variant: ScoringVariant) {
        let category = category.trim();
        match self
            .rules
            .iter_mut()
            .find(|r| r.category.eq_ignore_ascii_case(category))
        {
            Some(rule) => rule.variant = variant,
            None => self.rules.push(VariantRule {
                category: category.to_string(),
                variant,
            }),
        }
    }

    pub fn resolve(&self, category: &str) -> ScoringVariant {
        let category = category.trim();
        self.rules
            .iter()
            .find(|r| r.category.eq_ignore_ascii_case(category))
            .map(|r| r.variant)
            .unwrap_or_default()
    }

    pub fn scoring_for(&self, category: &str, attribute: bool) -> CategoryScoring {
        CategoryScoring::new(self.resolve(category), attribute)
    }
}
