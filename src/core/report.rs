use crate::core::repository::TeamRepository;
use crate::domain::ports::Storage;
use crate::utils::error::Result;
use chrono::{DateTime, Local, TimeZone};

pub const REPORT_TITLE: &str = "--- HACKATHON SYSTEM FINAL REPORT ---";
pub const NO_TEAMS_LINE: &str = "No teams available to calculate top team.";
const TIMESTAMP_FORMAT: &str = "%a %b %d %H:%M:%S %Z %Y";
const TABLE_RULE: &str = "-----------------------------------------------------------------------------------------------------------------";

/// Read-only renderer for the final report text.
pub struct ReportGenerator<'a> {
    repository: &'a TeamRepository,
}

impl<'a> ReportGenerator<'a> {
    pub fn new(repository: &'a TeamRepository) -> Self {
        Self { repository }
    }

    pub fn render<Tz>(&self, generated_at: &DateTime<Tz>) -> String
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let repo = self.repository;
        let mut lines = vec![
            REPORT_TITLE.to_string(),
            format!("Generated on: {}", generated_at.format(TIMESTAMP_FORMAT)),
            format!("Total Teams Processed: {}", repo.len()),
            format!("Average Overall Score: {:.2} (max 5.0)", repo.average_score()),
        ];

        lines.push(match repo.top_team() {
            Some(top) => format!(
                "Top Scoring Team: {} ({}) with a score of {:.2}",
                top.name,
                top.id,
                top.overall_score()
            ),
            None => NO_TEAMS_LINE.to_string(),
        });

        lines.extend(self.distribution_lines());
        lines.extend(self.ranking_lines());
        join_lines(&lines)
    }

    fn distribution_lines(&self) -> Vec<String> {
        let mut lines = vec![
            String::new(),
            "--- Score Distribution (Individual Score Frequency 0-10) ---".to_string(),
            "Score | Count".to_string(),
            "------|------".to_string(),
        ];
        for (score, count) in self.repository.score_frequency().iter().enumerate() {
            lines.push(format!("{:>5} | {:>5}", score, count));
        }
        lines
    }

    /// 排名表格，同分保持原本順序
    pub fn render_ranking(&self) -> String {
        join_lines(&self.ranking_lines())
    }

    fn ranking_lines(&self) -> Vec<String> {
        let mut lines = vec![
            String::new(),
            "--- Full Team List (Ranked by Overall Score) ---".to_string(),
            format!(
                "{:<5} | {:<15} | {:<30} | {:<15} | {:<15} | {:<10} | {:<20}",
                "Rank", "ID", "Name", "Category", "Eligibility", "Score", "Assigned Judge"
            ),
            TABLE_RULE.to_string(),
        ];

        for (idx, team) in self.repository.all_sorted_by_score().iter().enumerate() {
            lines.push(format!(
                "{:<5} | {:<15} | {:<30} | {:<15} | {:<15} | {:<10.2} | {:<20}",
                idx + 1,
                team.id,
                team.name,
                team.category,
                team.eligibility_label(),
                team.overall_score(),
                self.repository.judge_for(team.id)
            ));
        }
        lines
    }

    /// 產生報告並透過 Storage 寫出；失敗時不保證檔案完整
    pub fn write_to<S: Storage>(&self, storage: &S, path: &str) -> Result<()> {
        let report = self.render(&Local::now());
        tracing::debug!("Writing report ({} bytes) to {}", report.len(), path);
        storage.write_file(path, report.as_bytes())?;
        tracing::info!("📝 Report successfully generated and written to: {}", path);
        Ok(())
    }
}

// 每行皆以換行結尾
fn join_lines(lines: &[String]) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}
