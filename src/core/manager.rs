use crate::core::loader::{DataLoader, LoadSummary};
use crate::core::report::ReportGenerator;
use crate::core::repository::TeamRepository;
use crate::domain::model::{RawScores, Team, TeamId, SCORE_SLOTS};
use crate::domain::ports::Storage;
use crate::utils::error::{HackathonError, Result};
use serde::Serialize;
use std::collections::BTreeMap;

/// Upper bound enforced on stored sub-scores. Front ends may apply a tighter
/// per-field bound (0-5) before calling in.
pub const MAX_STORED_SCORE: i32 = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedTeam {
    pub rank: usize,
    pub id: TeamId,
    pub name: String,
    pub university: String,
    pub category: String,
    pub eligible: bool,
    pub scores: RawScores,
    pub overall_score: f64,
    pub judge: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopTeam {
    pub id: TeamId,
    pub name: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overview {
    pub total_teams: usize,
    pub average_score: f64,
    pub top_team: Option<TopTeam>,
}

/// 對外的管理介面：驗證輸入後才修改 repository，所有操作只回傳成功與否
pub struct HackathonManager<S: Storage> {
    repository: TeamRepository,
    storage: S,
    data_file: String,
    report_file: String,
}

impl<S: Storage> HackathonManager<S> {
    pub fn new(
        repository: TeamRepository,
        storage: S,
        data_file: impl Into<String>,
        report_file: impl Into<String>,
    ) -> Self {
        Self {
            repository,
            storage,
            data_file: data_file.into(),
            report_file: report_file.into(),
        }
    }

    pub fn repository(&self) -> &TeamRepository {
        &self.repository
    }

    pub fn data_file(&self) -> &str {
        &self.data_file
    }

    pub fn report_file(&self) -> &str {
        &self.report_file
    }

    // --- 檔案 I/O ---

    /// Loads the configured data file. A missing or unreadable file is logged
    /// and leaves the repository as it was.
    pub fn load_team_data(&mut self) -> Option<LoadSummary> {
        let loader = DataLoader::new(&self.storage, self.data_file.clone());
        match loader.load_into(&mut self.repository) {
            Ok(summary) => Some(summary),
            Err(e) => {
                tracing::error!("❌ FATAL: team data could not be loaded: {}", e);
                tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
                None
            }
        }
    }

    pub fn generate_report(&self) -> bool {
        let generator = ReportGenerator::new(&self.repository);
        match generator.write_to(&self.storage, &self.report_file) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("❌ Report could not be written to {}: {}", self.report_file, e);
                false
            }
        }
    }

    // --- 隊伍修改 ---

    pub fn update_team_scores(&mut self, id: TeamId, new_scores: &[i32]) -> bool {
        let result = self.try_update_scores(id, new_scores);
        outcome("update scores", id, result)
    }

    fn try_update_scores(&mut self, id: TeamId, new_scores: &[i32]) -> Result<()> {
        let scores: RawScores = new_scores.try_into().map_err(|_| {
            HackathonError::validation(format!(
                "expected {} scores, got {}",
                SCORE_SLOTS,
                new_scores.len()
            ))
        })?;
        for score in scores {
            require_score(score)?;
        }

        let team = self.team_mut(id)?;
        team.scores = scores;
        Ok(())
    }

    /// 只更新名稱與學校，不動分類與資格
    pub fn update_team_details(&mut self, id: TeamId, name: &str, university: &str) -> bool {
        let result = self.try_update_details(id, name, university, None);
        outcome("update details", id, result)
    }

    /// Full update including category and eligibility. A category change
    /// re-resolves the scoring variant and keeps the team's attribute flag.
    pub fn update_team_details_with_category(
        &mut self,
        id: TeamId,
        name: &str,
        university: &str,
        category: &str,
        eligible: bool,
    ) -> bool {
        let result = self.try_update_details(id, name, university, Some((category, eligible)));
        outcome("update details", id, result)
    }

    fn try_update_details(
        &mut self,
        id: TeamId,
        name: &str,
        university: &str,
        category: Option<(&str, bool)>,
    ) -> Result<()> {
        require_text("name", name)?;
        require_text("university", university)?;
        if let Some((category, _)) = category {
            require_text("category", category)?;
        }

        let variant = category.map(|(c, _)| self.repository.scoring_registry().resolve(c));
        let team = self.team_mut(id)?;
        team.name = name.trim().to_string();
        team.university = university.trim().to_string();
        if let (Some((category, eligible)), Some(variant)) = (category, variant) {
            team.category = category.trim().to_string();
            team.eligible = eligible;
            team.scoring = team.scoring.with_variant(variant);
        }
        Ok(())
    }

    /// 只關閉資格，原始分數保留
    pub fn disqualify_team(&mut self, id: TeamId) -> bool {
        let result = self.team_mut(id).map(|team| team.eligible = false);
        outcome("disqualify", id, result)
    }

    pub fn remove_team(&mut self, id: TeamId) -> bool {
        let removed = self.repository.remove(id);
        if removed {
            tracing::info!("🗑️ Team {} removed", id);
        } else {
            tracing::warn!("⚠️ remove rejected for team {}: team not found", id);
        }
        removed
    }

    /// Registers a new team under the next free id. New teams start
    /// ineligible with zero scores until their details are confirmed.
    pub fn register_team(&mut self, name: &str, university: &str, category: &str) -> Option<TeamId> {
        match self.try_register(name, university, category) {
            Ok(id) => {
                tracing::info!("✅ Team registered with id {}", id);
                Some(id)
            }
            Err(e) => {
                tracing::warn!("⚠️ registration rejected: {}", e);
                None
            }
        }
    }

    fn try_register(&mut self, name: &str, university: &str, category: &str) -> Result<TeamId> {
        require_text("name", name)?;
        require_text("university", university)?;
        require_text("category", category)?;
        let (name, university, category) = (name.trim(), university.trim(), category.trim());

        let duplicate = self.repository.teams().iter().any(|t| {
            t.name.eq_ignore_ascii_case(name) && t.category.eq_ignore_ascii_case(category)
        });
        if duplicate {
            return Err(HackathonError::validation(format!(
                "a team named '{}' already exists in '{}'",
                name, category
            )));
        }

        let id = self.repository.next_id();
        let scoring = self.repository.scoring_registry().scoring_for(category, false);
        let mut team = Team::new(id, name, university, category, [0; SCORE_SLOTS], scoring);
        team.eligible = false;
        self.repository.add(team);
        Ok(id)
    }

    // --- 分類與評審 ---

    pub fn available_categories(&self) -> &[String] {
        self.repository.categories()
    }

    pub fn add_category(&mut self, name: &str) -> bool {
        let added = self.repository.add_category(name);
        if !added {
            tracing::warn!("⚠️ category '{}' rejected: empty or already present", name.trim());
        }
        added
    }

    pub fn remove_category(&mut self, name: &str) -> bool {
        let removed = self.repository.remove_category(name);
        if !removed {
            tracing::warn!("⚠️ category '{}' not removed: in use or unknown", name.trim());
        }
        removed
    }

    pub fn available_judges(&self) -> &[String] {
        self.repository.judges()
    }

    pub fn judge_assignments(&self) -> &BTreeMap<TeamId, String> {
        self.repository.judge_assignments()
    }

    /// Upserts the assignment. The team id is not checked; only a blank judge
    /// name is rejected.
    pub fn assign_judge(&mut self, id: TeamId, judge_name: &str) -> bool {
        let result = require_text("judge", judge_name)
            .map(|_| self.repository.assign_judge(id, judge_name.trim()));
        outcome("assign judge", id, result)
    }

    // --- 唯讀查詢 ---

    pub fn find_team(&self, id: TeamId) -> Option<&Team> {
        self.repository.find_by_id(id)
    }

    /// Stable descending ranking, optionally limited to one category
    /// (exact match). Ranks are positions within the returned list.
    pub fn ranked_teams(&self, category: Option<&str>) -> Vec<RankedTeam> {
        self.repository
            .all_sorted_by_score()
            .into_iter()
            .filter(|t| category.map_or(true, |c| t.category == c))
            .enumerate()
            .map(|(idx, t)| RankedTeam {
                rank: idx + 1,
                id: t.id,
                name: t.name.clone(),
                university: t.university.clone(),
                category: t.category.clone(),
                eligible: t.eligible,
                scores: t.scores,
                overall_score: t.overall_score(),
                judge: self.repository.judge_for(t.id).to_string(),
            })
            .collect()
    }

    pub fn overview(&self) -> Overview {
        Overview {
            total_teams: self.repository.len(),
            average_score: self.repository.average_score(),
            top_team: self.repository.top_team().map(|t| TopTeam {
                id: t.id,
                name: t.name.clone(),
                score: t.overall_score(),
            }),
        }
    }

    fn team_mut(&mut self, id: TeamId) -> Result<&mut Team> {
        self.repository
            .find_by_id_mut(id)
            .ok_or_else(|| HackathonError::validation(format!("team {} not found", id)))
    }
}

// 前端輸入的檢查錯誤一律歸類為 Validation
fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(HackathonError::validation(format!("{} cannot be empty", field)));
    }
    Ok(())
}

fn require_score(score: i32) -> Result<()> {
    if !(0..=MAX_STORED_SCORE).contains(&score) {
        return Err(HackathonError::validation(format!(
            "score {} is outside 0-{}",
            score, MAX_STORED_SCORE
        )));
    }
    Ok(())
}

fn outcome(action: &str, id: TeamId, result: Result<()>) -> bool {
    match result {
        Ok(()) => {
            tracing::info!("✅ {} succeeded for team {}", action, id);
            true
        }
        Err(e) => {
            tracing::warn!("⚠️ {} rejected for team {}: {}", action, id, e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::scoring::{ScoringRegistry, ScoringVariant};
    use crate::utils::error::{ErrorCategory, ErrorSeverity};
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
        fail_writes: bool,
    }

    impl MockStorage {
        fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            self.files.lock().unwrap().get(path).cloned()
        }

        fn put_file(&self, path: &str, content: &str) {
            self.files
                .lock()
                .unwrap()
                .insert(path.to_string(), content.as_bytes().to_vec());
        }
    }

    impl Storage for MockStorage {
        fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            self.get_file(path).ok_or_else(|| {
                HackathonError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            if self.fail_writes {
                return Err(HackathonError::IoError(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "read-only",
                )));
            }
            self.files
                .lock()
                .unwrap()
                .insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    const DATA: &str = "Team ID,Name,University,Category,Leader,Members,S1,S2,S3,S4,S5\n\
                        101,Secure Shells,North Uni,Cybersecurity,x,y,8,8,9,7,6\n\
                        102,Web Wizards,South Uni,Web Development,x,y,3,3,3,3,3\n\
                        103,Green Giants,East Uni,Sustainability Tech,x,y,1,1,1,1,1\n";

    fn manager_with(storage: MockStorage) -> HackathonManager<MockStorage> {
        let repository = TeamRepository::new(
            101,
            vec![
                "Cybersecurity".to_string(),
                "Web Development".to_string(),
                "Sustainability Tech".to_string(),
            ],
            vec!["Judge Alice".to_string(), "Judge Bob".to_string()],
            ScoringRegistry::new().with_rule("Cybersecurity", ScoringVariant::SecurityStandards),
        );
        HackathonManager::new(repository, storage, "teams.csv", "report.txt")
    }

    fn loaded_manager() -> HackathonManager<MockStorage> {
        let storage = MockStorage::default();
        storage.put_file("teams.csv", DATA);
        let mut manager = manager_with(storage);
        assert!(manager.load_team_data().is_some());
        manager
    }

    #[test]
    fn test_update_scores_rejects_out_of_range() {
        let mut manager = loaded_manager();
        let before = manager.find_team(102).unwrap().scores;

        assert!(!manager.update_team_scores(102, &[0, 1, 2, 3, 11]));
        assert!(!manager.update_team_scores(102, &[-1, 1, 2, 3, 4]));
        assert!(!manager.update_team_scores(102, &[1, 2, 3, 4]));
        assert!(!manager.update_team_scores(102, &[1, 2, 3, 4, 5, 6]));
        assert!(!manager.update_team_scores(999, &[1, 2, 3, 4, 5]));
        assert_eq!(manager.find_team(102).unwrap().scores, before);

        // 0-10 之間都接受（比介面上的 0-5 更寬）
        assert!(manager.update_team_scores(102, &[10, 0, 7, 5, 5]));
        assert_eq!(manager.find_team(102).unwrap().scores, [10, 0, 7, 5, 5]);
    }

    #[test]
    fn test_rejected_input_is_a_validation_error() {
        let mut manager = loaded_manager();

        let err = manager.try_update_scores(102, &[0, 1, 2, 3, 11]).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Validation);
        assert_eq!(err.severity(), ErrorSeverity::Low);

        let err = manager.try_update_details(102, "  ", "Uni", None).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Validation);

        let err = manager.try_register("Late", "", "Data Science").unwrap_err();
        assert!(matches!(err, HackathonError::ValidationError { .. }));
    }

    #[test]
    fn test_update_details_two_field_form() {
        let mut manager = loaded_manager();
        assert!(manager.update_team_details(102, " Web Weavers ", "West Uni"));

        let team = manager.find_team(102).unwrap();
        assert_eq!(team.name, "Web Weavers");
        assert_eq!(team.university, "West Uni");
        assert_eq!(team.category, "Web Development");
        assert!(team.eligible);

        assert!(!manager.update_team_details(102, "", "West Uni"));
        assert!(!manager.update_team_details(999, "Name", "Uni"));
    }

    #[test]
    fn test_update_details_with_category_switches_variant() {
        let mut manager = loaded_manager();
        let before = manager.find_team(102).unwrap().scoring;
        assert_eq!(before.variant(), ScoringVariant::ModernTooling);

        assert!(manager.update_team_details_with_category(
            102,
            "Web Wizards",
            "South Uni",
            "Cybersecurity",
            false
        ));

        let team = manager.find_team(102).unwrap();
        assert_eq!(team.category, "Cybersecurity");
        assert!(!team.eligible);
        assert_eq!(team.scoring.variant(), ScoringVariant::SecurityStandards);
        assert_eq!(team.scoring.attribute(), before.attribute());
        assert_eq!(team.overall_score(), 0.0);

        assert!(!manager.update_team_details_with_category(102, "X", "Y", "  ", true));
        assert_eq!(manager.find_team(102).unwrap().name, "Web Wizards");
    }

    #[test]
    fn test_disqualify_keeps_scores() {
        let mut manager = loaded_manager();
        let score = manager.find_team(102).unwrap().overall_score();
        assert!(score > 0.0);

        assert!(manager.disqualify_team(102));
        let team = manager.find_team(102).unwrap();
        assert_eq!(team.overall_score(), 0.0);
        assert_eq!(team.scores, [3, 3, 3, 3, 3]);

        // 恢復資格後分數回來
        assert!(manager.update_team_details_with_category(
            102,
            "Web Wizards",
            "South Uni",
            "Web Development",
            true
        ));
        assert_eq!(manager.find_team(102).unwrap().overall_score(), score);

        assert!(!manager.disqualify_team(999));
    }

    #[test]
    fn test_remove_team_prunes_judge() {
        let mut manager = loaded_manager();
        assert!(manager.assign_judge(101, "Judge Alice"));
        assert!(manager.remove_team(101));
        assert!(!manager.judge_assignments().contains_key(&101));
        assert!(!manager.remove_team(101));
    }

    #[test]
    fn test_assign_judge_rejects_blank_name() {
        let mut manager = loaded_manager();
        assert!(!manager.assign_judge(101, "  "));
        assert!(manager.judge_assignments().is_empty());

        // 不檢查隊伍是否存在
        assert!(manager.assign_judge(4242, "Judge Bob"));
        assert_eq!(manager.judge_assignments().get(&4242).unwrap(), "Judge Bob");
    }

    #[test]
    fn test_category_lock() {
        let mut manager = loaded_manager();
        assert!(!manager.remove_category("web development"));
        assert!(manager.add_category("Robotics"));
        assert!(manager.remove_category("Robotics"));
        assert!(!manager.available_categories().contains(&"Robotics".to_string()));
    }

    #[test]
    fn test_register_team() {
        let mut manager = loaded_manager();
        let id = manager
            .register_team("Byte Busters", "Central Uni", "Quantum Computing")
            .unwrap();
        assert_eq!(id, 104);

        let team = manager.find_team(id).unwrap();
        assert!(!team.eligible);
        assert_eq!(team.scores, [0; SCORE_SLOTS]);
        assert_eq!(team.custom_detail, "BB");
        // 未登錄的分類使用預設變體
        assert_eq!(team.scoring.variant(), ScoringVariant::ModernTooling);

        assert!(manager
            .register_team("byte busters", "Other Uni", "quantum computing")
            .is_none());
        assert!(manager.register_team("", "Uni", "Data").is_none());
        assert_eq!(manager.register_team("Next", "Uni", "Data"), Some(105));
    }

    #[test]
    fn test_ranked_teams_and_filter() {
        let mut manager = loaded_manager();
        manager.assign_judge(102, "Judge Bob");

        let ranked = manager.ranked_teams(None);
        let ids: Vec<TeamId> = ranked.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![101, 102, 103]);
        assert_eq!(ranked[1].judge, "Judge Bob");
        assert_eq!(ranked[2].judge, "Unassigned");

        let web = manager.ranked_teams(Some("Web Development"));
        assert_eq!(web.len(), 1);
        assert_eq!(web[0].rank, 1);
        assert!(manager.ranked_teams(Some("web development")).is_empty());
    }

    #[test]
    fn test_overview() {
        let manager = loaded_manager();
        let overview = manager.overview();
        assert_eq!(overview.total_teams, 3);
        assert_eq!(overview.top_team.as_ref().map(|t| t.id), Some(101));
        // (5.0 + 3.5 + 0.0) / 3
        assert!((overview.average_score - 8.5 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_data_file_is_not_fatal_for_caller() {
        let mut manager = manager_with(MockStorage::default());
        assert!(manager.load_team_data().is_none());
        assert!(manager.repository().is_empty());
        assert!(manager.generate_report());
    }

    #[test]
    fn test_generate_report_writes_file() {
        let manager = loaded_manager();
        assert!(manager.generate_report());

        let report = String::from_utf8(manager.storage.get_file("report.txt").unwrap()).unwrap();
        assert!(report.starts_with("--- HACKATHON SYSTEM FINAL REPORT ---\n"));
        assert!(report.contains("Total Teams Processed: 3\n"));
    }

    #[test]
    fn test_generate_report_failure_returns_false() {
        let storage = MockStorage {
            fail_writes: true,
            ..MockStorage::default()
        };
        storage.put_file("teams.csv", DATA);
        let mut manager = manager_with(storage);
        manager.load_team_data();
        assert!(!manager.generate_report());
        assert_eq!(manager.repository().len(), 3);
    }
}
