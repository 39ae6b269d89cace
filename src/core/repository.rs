use crate::domain::model::{Team, TeamId, UNASSIGNED_JUDGE};
use crate::domain::scoring::ScoringRegistry;
use std::collections::BTreeMap;

/// Highest possible raw sub-score tracked by [`TeamRepository::score_frequency`].
pub const MAX_FREQUENCY_SCORE: usize = 10;

pub type ScoreFrequency = [usize; MAX_FREQUENCY_SCORE + 1];

/// 隊伍、分類、評審與評審指派的唯一擁有者
#[derive(Debug, Clone)]
pub struct TeamRepository {
    teams: Vec<Team>,
    next_id: TeamId,
    categories: Vec<String>,
    judges: Vec<String>,
    judge_assignments: BTreeMap<TeamId, String>,
    scoring: ScoringRegistry,
}

impl TeamRepository {
    pub fn new(
        first_id: TeamId,
        categories: Vec<String>,
        judges: Vec<String>,
        scoring: ScoringRegistry,
    ) -> Self {
        Self {
            teams: Vec::new(),
            next_id: first_id,
            categories,
            judges,
            judge_assignments: BTreeMap::new(),
            scoring,
        }
    }

    /// Appends without duplicate detection; the caller owns id uniqueness.
    pub fn add(&mut self, team: Team) {
        if team.id >= self.next_id {
            self.next_id = team.id.saturating_add(1);
        }
        tracing::debug!("Added team {} ({})", team.id, team.name);
        self.teams.push(team);
    }

    pub fn next_id(&self) -> TeamId {
        self.next_id
    }

    pub fn find_by_id(&self, id: TeamId) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == id)
    }

    pub fn find_by_id_mut(&mut self, id: TeamId) -> Option<&mut Team> {
        self.teams.iter_mut().find(|t| t.id == id)
    }

    pub fn contains(&self, id: TeamId) -> bool {
        self.find_by_id(id).is_some()
    }

    /// 移除隊伍時一併清除評審指派
    pub fn remove(&mut self, id: TeamId) -> bool {
        let before = self.teams.len();
        self.teams.retain(|t| t.id != id);
        self.judge_assignments.remove(&id);
        self.teams.len() < before
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    /// Descending by overall score; ties keep insertion order.
    pub fn all_sorted_by_score(&self) -> Vec<&Team> {
        let mut sorted: Vec<&Team> = self.teams.iter().collect();
        // sort_by 是穩定排序
        sorted.sort_by(|a, b| b.overall_score().total_cmp(&a.overall_score()));
        sorted
    }

    /// 同分時取最先加入的隊伍
    pub fn top_team(&self) -> Option<&Team> {
        self.teams.iter().fold(None, |best: Option<&Team>, team| match best {
            Some(b) if b.overall_score() >= team.overall_score() => Some(b),
            _ => Some(team),
        })
    }

    pub fn average_score(&self) -> f64 {
        if self.teams.is_empty() {
            return 0.0;
        }
        let total: f64 = self.teams.iter().map(Team::overall_score).sum();
        total / self.teams.len() as f64
    }

    /// Tally of every raw sub-score in 0..=10 across all teams and slots.
    /// Out-of-range legacy values are not counted.
    pub fn score_frequency(&self) -> ScoreFrequency {
        let mut frequency = [0usize; MAX_FREQUENCY_SCORE + 1];
        for score in self.teams.iter().flat_map(|t| t.scores.iter()) {
            if let Ok(slot) = usize::try_from(*score) {
                if slot <= MAX_FREQUENCY_SCORE {
                    frequency[slot] += 1;
                }
            }
        }
        frequency
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn add_category(&mut self, name: &str) -> bool {
        let normalized = name.trim();
        if normalized.is_empty() || self.categories.iter().any(|c| c == normalized) {
            return false;
        }
        self.categories.push(normalized.to_string());
        true
    }

    /// 仍有隊伍使用（不分大小寫）的分類不可刪除
    pub fn remove_category(&mut self, name: &str) -> bool {
        let normalized = name.trim();
        if self.category_in_use(normalized) {
            return false;
        }
        match self.categories.iter().position(|c| c == normalized) {
            Some(idx) => {
                self.categories.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn category_in_use(&self, name: &str) -> bool {
        let name = name.trim();
        self.teams
            .iter()
            .any(|t| t.category.trim().eq_ignore_ascii_case(name))
    }

    pub fn scoring_registry(&self) -> &ScoringRegistry {
        &self.scoring
    }

    pub fn judges(&self) -> &[String] {
        &self.judges
    }

    pub fn judge_assignments(&self) -> &BTreeMap<TeamId, String> {
        &self.judge_assignments
    }

    /// Unconditional upsert; the team id is not checked.
    pub fn assign_judge(&mut self, team_id: TeamId, judge_name: &str) {
        self.judge_assignments
            .insert(team_id, judge_name.to_string());
    }

    pub fn judge_for(&self, team_id: TeamId) -> &str {
        self.judge_assignments
            .get(&team_id)
            .map(String::as_str)
            .unwrap_or(UNASSIGNED_JUDGE)
    }
}
