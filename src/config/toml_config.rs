use crate::core::fetcher::{DEFAULT_TABLE_MARKER, DEFAULT_USER_AGENT};
use crate::core::resolver::EntityResolver;
use crate::core::snapshot::{PublishClock, SnapshotLayout};
use crate::domain::model::{
    EntityStandings, MedalCount, Participant, RankCriterion, RosterAssignment,
};
use crate::utils::error::{LeaderboardError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardConfig {
    pub source: SourceConfig,
    #[serde(default)]
    pub ranking: RankingConfig,
    /// Display name as it appears on the standings page -> entity code.
    pub entities: Option<BTreeMap<String, String>>,
    pub roster: Vec<Participant>,
    pub publish: PublishConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    #[default]
    Html,
    Static,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default)]
    pub r#type: SourceType,
    pub url: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub table_marker: Option<String>,
    pub user_agent: Option<String>,
    /// Entity code -> counts, for `type = "static"`.
    pub standings: Option<BTreeMap<String, MedalCount>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RankingConfig {
    #[serde(default)]
    pub criterion: RankCriterion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SinkType {
    #[default]
    Csv,
    Sheets,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishConfig {
    #[serde(default)]
    pub sink: SinkType,
    pub output_path: Option<String>,
    pub filename: Option<String>,
    pub include_score_column: Option<bool>,
    pub utc_offset_minutes: Option<i32>,
    pub sheets: Option<SheetsConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetsConfig {
    pub spreadsheet_id: String,
    pub range: Option<String>,
    pub api_base: Option<String>,
    /// Environment variable holding the bearer token.
    pub token_env: Option<String>,
}

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;
pub const DEFAULT_OUTPUT_PATH: &str = "./output";
pub const DEFAULT_TOKEN_ENV: &str = "SHEETS_ACCESS_TOKEN";

impl LeaderboardConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(LeaderboardError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| LeaderboardError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables stay as written.
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        match self.source.r#type {
            SourceType::Html => {
                let url = validation::validate_required_field("source.url", &self.source.url)?;
                validation::validate_url("source.url", url)?;
            }
            SourceType::Static => {
                validation::validate_required_field("source.standings", &self.source.standings)?;
            }
        }

        if let Some(timeout) = self.source.timeout_seconds {
            validation::validate_range("source.timeout_seconds", timeout, 1, 120)?;
        }
        if let Some(marker) = &self.source.table_marker {
            validation::validate_non_empty_string("source.table_marker", marker)?;
        }

        if self.roster.is_empty() {
            return Err(LeaderboardError::MissingConfigError {
                field: "roster".to_string(),
            });
        }
        for participant in &self.roster {
            validation::validate_non_empty_string("roster.name", &participant.name)?;
            if participant.entities.is_empty() {
                return Err(LeaderboardError::InvalidConfigValueError {
                    field: "roster.entities".to_string(),
                    value: participant.name.clone(),
                    reason: "Every participant needs at least one entity".to_string(),
                });
            }
            for code in &participant.entities {
                validation::validate_non_empty_string("roster.entities", code)?;
            }
        }
        validation::validate_unique(
            "roster.name",
            self.roster.iter().map(|p| p.name.as_str()),
            |name| name.trim().to_string(),
        )?;

        if let Some(entities) = &self.entities {
            for code in entities.values() {
                validation::validate_non_empty_string("entities", code)?;
            }
        }

        if let Some(offset) = self.publish.utc_offset_minutes {
            validation::validate_range("publish.utc_offset_minutes", offset, -720, 840)?;
        }
        match self.publish.sink {
            SinkType::Csv => {
                validation::validate_path("publish.output_path", self.output_path())?;
                validation::validate_path("publish.filename", self.filename())?;
            }
            SinkType::Sheets => {
                let sheets =
                    validation::validate_required_field("publish.sheets", &self.publish.sheets)?;
                validation::validate_non_empty_string(
                    "publish.sheets.spreadsheet_id",
                    &sheets.spreadsheet_id,
                )?;
                if let Some(api_base) = &sheets.api_base {
                    validation::validate_url("publish.sheets.api_base", api_base)?;
                }
            }
        }

        Ok(())
    }

    pub fn source_url(&self) -> Option<&str> {
        self.source.url.as_deref()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.source.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS))
    }

    pub fn table_marker(&self) -> &str {
        self.source.table_marker.as_deref().unwrap_or(DEFAULT_TABLE_MARKER)
    }

    pub fn user_agent(&self) -> &str {
        self.source.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT)
    }

    pub fn static_standings(&self) -> EntityStandings {
        self.source
            .standings
            .iter()
            .flatten()
            .map(|(code, count)| (code.trim(), *count))
            .collect()
    }

    pub fn resolver(&self) -> EntityResolver {
        match &self.entities {
            Some(table) => EntityResolver::new(table),
            None => EntityResolver::with_defaults(),
        }
    }

    pub fn roster(&self) -> RosterAssignment {
        self.roster
            .iter()
            .map(|p| {
                (
                    p.name.trim(),
                    p.entities.iter().map(|code| code.trim().to_string()),
                )
            })
            .collect()
    }

    pub fn criterion(&self) -> RankCriterion {
        self.ranking.criterion
    }

    pub fn output_path(&self) -> &str {
        self.publish.output_path.as_deref().unwrap_or(DEFAULT_OUTPUT_PATH)
    }

    pub fn filename(&self) -> &str {
        self.publish
            .filename
            .as_deref()
            .unwrap_or(crate::adapters::csv_sink::DEFAULT_FILENAME)
    }

    pub fn layout(&self) -> SnapshotLayout {
        SnapshotLayout {
            include_score: self.publish.include_score_column.unwrap_or(false),
        }
    }

    pub fn clock(&self) -> PublishClock {
        PublishClock {
            utc_offset_minutes: self.publish.utc_offset_minutes,
        }
    }
}

impl Validate for LeaderboardConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
