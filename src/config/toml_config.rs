use crate::core::repository::TeamRepository;
use crate::domain::model::TeamId;
use crate::domain::ports::ConfigProvider;
use crate::domain::scoring::{ScoringRegistry, ScoringVariant};
use crate::utils::error::{HackathonError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_positive_number, validate_unique_names,
    Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_DATA_FILE: &str = "HackathonTeams.csv";
pub const DEFAULT_REPORT_FILE: &str = "HackathonReport.txt";
pub const DEFAULT_FIRST_ID: TeamId = 101;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HackathonConfig {
    #[serde(default)]
    pub files: FilesConfig,
    #[serde(default)]
    pub teams: TeamsConfig,
    #[serde(default = "default_categories")]
    pub categories: Vec<CategoryConfig>,
    #[serde(default = "default_judges")]
    pub judges: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FilesConfig {
    #[serde(default = "default_base_dir")]
    pub base_dir: String,
    #[serde(default = "default_data_file")]
    pub data_file: String,
    #[serde(default = "default_report_file")]
    pub report_file: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TeamsConfig {
    #[serde(default = "default_first_id")]
    pub first_id: TeamId,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryConfig {
    pub name: String,
    /// 未指定時使用預設的 modern-tooling
    #[serde(default)]
    pub scoring: Option<ScoringVariant>,
}

fn default_base_dir() -> String {
    ".".to_string()
}

fn default_data_file() -> String {
    DEFAULT_DATA_FILE.to_string()
}

fn default_report_file() -> String {
    DEFAULT_REPORT_FILE.to_string()
}

fn default_first_id() -> TeamId {
    DEFAULT_FIRST_ID
}

fn default_categories() -> Vec<CategoryConfig> {
    let mut categories = vec![CategoryConfig {
        name: "Cybersecurity".to_string(),
        scoring: Some(ScoringVariant::SecurityStandards),
    }];
    for name in [
        "Web Development",
        "Mobile Applications",
        "Artificial Intelligence",
        "Data Science",
        "Cloud Computing",
        "Sustainability Tech",
    ] {
        categories.push(CategoryConfig {
            name: name.to_string(),
            scoring: Some(ScoringVariant::ModernTooling),
        });
    }
    categories
}

fn default_judges() -> Vec<String> {
    ["Judge Alice", "Judge Bob", "Judge Carol", "Judge David"]
        .iter()
        .map(|j| j.to_string())
        .collect()
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir(),
            data_file: default_data_file(),
            report_file: default_report_file(),
        }
    }
}

impl Default for TeamsConfig {
    fn default() -> Self {
        Self {
            first_id: default_first_id(),
        }
    }
}

impl Default for HackathonConfig {
    fn default() -> Self {
        Self {
            files: FilesConfig::default(),
            teams: TeamsConfig::default(),
            categories: default_categories(),
            judges: default_judges(),
        }
    }
}

impl HackathonConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(HackathonError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| HackathonError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${EVENT_DIR})，找不到的變數原樣保留
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| HackathonError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn category_names(&self) -> Vec<String> {
        self.categories.iter().map(|c| c.name.trim().to_string()).collect()
    }

    pub fn scoring_registry(&self) -> ScoringRegistry {
        let mut registry = ScoringRegistry::new();
        for category in &self.categories {
            if let Some(variant) = category.scoring {
                registry.set(&category.name, variant);
            }
        }
        registry
    }

    pub fn build_repository(&self) -> TeamRepository {
        TeamRepository::new(
            self.teams.first_id,
            self.category_names(),
            self.judges.iter().map(|j| j.trim().to_string()).collect(),
            self.scoring_registry(),
        )
    }
}

impl ConfigProvider for HackathonConfig {
    fn base_dir(&self) -> &str {
        &self.files.base_dir
    }

    fn data_file(&self) -> &str {
        &self.files.data_file
    }

    fn report_file(&self) -> &str {
        &self.files.report_file
    }
}

impl Validate for HackathonConfig {
    fn validate(&self) -> Result<()> {
        validate_path("files.base_dir", &self.files.base_dir)?;
        validate_path("files.data_file", &self.files.data_file)?;
        validate_path("files.report_file", &self.files.report_file)?;
        validate_positive_number("teams.first_id", self.teams.first_id, 1)?;

        for category in &self.categories {
            validate_non_empty_string("categories.name", &category.name)?;
        }
        validate_unique_names(
            "categories.name",
            self.categories.iter().map(|c| c.name.as_str()),
        )?;

        for judge in &self.judges {
            validate_non_empty_string("judges", judge)?;
        }
        validate_unique_names("judges", self.judges.iter().map(String::as_str))?;

        Ok(())
    }
}
