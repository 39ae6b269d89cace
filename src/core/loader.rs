use crate::core::repository::TeamRepository;
use crate::domain::model::{RawScores, Team, TeamId, SCORE_SLOTS};
use crate::domain::ports::Storage;
use crate::domain::scoring::{CategoryScoring, ScoringVariant};
use crate::utils::error::{HackathonError, Result};
use csv::{ReaderBuilder, StringRecord, Trim};

pub const HEADER_PREFIX: &str = "Team ID";

const ID_FIELD: usize = 0;
const NAME_FIELD: usize = 1;
const UNIVERSITY_FIELD: usize = 2;
const CATEGORY_FIELD: usize = 3;
// 第 5、6 欄未使用，分數從第 7 欄開始
const FIRST_SCORE_FIELD: usize = 6;

// 4 個文字欄 + 2 個未使用欄 + 5 個分數
pub const MIN_FIELDS: usize = FIRST_SCORE_FIELD + SCORE_SLOTS;

const BOM: char = '\u{feff}';

/// 由隊名/分類文字推斷的分類專屬屬性，兩個關鍵字規則彼此獨立
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryAttribute {
    pub security: bool,
    pub tooling: bool,
}

impl CategoryAttribute {
    /// The flag that turns on the bonus for `variant`.
    pub fn applies_to(self, variant: ScoringVariant) -> bool {
        match variant {
            ScoringVariant::SecurityStandards => self.security,
            ScoringVariant::ModernTooling => self.tooling,
        }
    }
}

/// Keyword heuristic over the team name and category, case-insensitive.
/// "security"/"secure" sets the security flag, "web"/"dev" sets the tooling flag.
pub fn infer_attribute(name: &str, category: &str) -> CategoryAttribute {
    let text = format!("{} {}", name, category).to_lowercase();

    CategoryAttribute {
        security: text.contains("security") || text.contains("secure"),
        tooling: text.contains("web") || text.contains("dev"),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub loaded: usize,
    pub skipped: usize,
}

pub struct DataLoader<'a, S: Storage> {
    storage: &'a S,
    path: String,
}

impl<'a, S: Storage> DataLoader<'a, S> {
    pub fn new(storage: &'a S, path: impl Into<String>) -> Self {
        Self {
            storage,
            path: path.into(),
        }
    }

    /// 載入整個檔案；單行錯誤只記錄警告並略過，找不到檔案才是致命錯誤
    pub fn load_into(&self, repository: &mut TeamRepository) -> Result<LoadSummary> {
        tracing::info!("📂 Loading team data from: {}", self.path);

        let data = self.storage.read_file(&self.path).map_err(|e| match e {
            HackathonError::IoError(io) if io.kind() == std::io::ErrorKind::NotFound => {
                HackathonError::SourceNotFound {
                    path: self.path.clone(),
                }
            }
            other => other,
        })?;

        let summary = load_records(&data, repository);

        tracing::info!(
            "✅ Team data loaded: {} teams added, {} lines skipped, {} teams total",
            summary.loaded,
            summary.skipped,
            repository.len()
        );
        Ok(summary)
    }
}

/// Parses CSV bytes and adds every well-formed record to `repository`.
pub fn load_records(data: &[u8], repository: &mut TeamRepository) -> LoadSummary {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .trim(Trim::All)
        .from_reader(data);

    let mut summary = LoadSummary::default();

    for (index, result) in reader.records().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                let line = e
                    .position()
                    .map(|p| p.line())
                    .unwrap_or(index as u64 + 1);
                tracing::warn!("⚠️ Line {}: unreadable record skipped: {}", line, e);
                summary.skipped += 1;
                continue;
            }
        };

        let line = record
            .position()
            .map(|p| p.line())
            .unwrap_or(index as u64 + 1);

        if is_blank_or_header(&record) {
            continue;
        }

        match parse_record(&record, line, repository) {
            Ok(team) => {
                repository.add(team);
                summary.loaded += 1;
            }
            Err(e) => {
                tracing::warn!("⚠️ {} - line skipped", e);
                summary.skipped += 1;
            }
        }
    }

    summary
}

fn first_field(record: &StringRecord) -> &str {
    record.get(0).unwrap_or("").trim_start_matches(BOM).trim()
}

fn is_blank_or_header(record: &StringRecord) -> bool {
    if record.iter().all(|f| f.trim_start_matches(BOM).trim().is_empty()) {
        return true;
    }
    first_field(record).starts_with(HEADER_PREFIX)
}

fn parse_record(record: &StringRecord, line: u64, repository: &TeamRepository) -> Result<Team> {
    if record.len() < MIN_FIELDS {
        return Err(HackathonError::record(
            line,
            format!(
                "insufficient fields ({} < {})",
                record.len(),
                MIN_FIELDS
            ),
        ));
    }

    let id_text = first_field(record);
    let id: TeamId = id_text
        .parse()
        .map_err(|e| HackathonError::record(line, format!("invalid team id '{}': {}", id_text, e)))?;
    if id == 0 {
        return Err(HackathonError::record(line, "team id must be positive"));
    }
    if repository.contains(id) {
        return Err(HackathonError::record(
            line,
            format!("duplicate team id {}", id),
        ));
    }

    let name = required_text(record, NAME_FIELD, "name", line)?;
    let university = required_text(record, UNIVERSITY_FIELD, "university", line)?;
    let category = required_text(record, CATEGORY_FIELD, "category", line)?;

    let mut scores: RawScores = [0; SCORE_SLOTS];
    for (slot, score) in scores.iter_mut().enumerate() {
        let field = FIRST_SCORE_FIELD + slot;
        let text = record.get(field).ok_or_else(|| {
            HackathonError::record(line, format!("missing sub-score field {}", field + 1))
        })?;
        *score = text.parse().map_err(|e| {
            HackathonError::record(line, format!("invalid sub-score '{}': {}", text, e))
        })?;
    }

    let variant = repository.scoring_registry().resolve(category);
    let attribute = infer_attribute(name, category).applies_to(variant);

    tracing::debug!(
        "Line {}: team {} '{}' scored as {:?} (bonus attribute: {})",
        line,
        id,
        name,
        variant,
        attribute
    );

    // 載入的隊伍一律視為具資格
    Ok(Team::new(
        id,
        name,
        university,
        category,
        scores,
        CategoryScoring::new(variant, attribute),
    ))
}

fn required_text<'r>(
    record: &'r StringRecord,
    index: usize,
    field: &str,
    line: u64,
) -> Result<&'r str> {
    match record.get(index).map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(HackathonError::record(line, format!("empty {}", field))),
    }
}
