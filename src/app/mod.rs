//! Wiring from configuration to a runnable engine.

use crate::adapters::sheets::{DEFAULT_API_BASE, DEFAULT_RANGE};
use crate::adapters::{CsvPublisher, LocalStorage, SheetTarget, SheetsPublisher};
use crate::config::toml_config::{LeaderboardConfig, SinkType, SourceType, DEFAULT_TOKEN_ENV};
use crate::core::engine::LeaderboardEngine;
use crate::core::fetcher::{StandingsFetcher, StaticStandings};
use crate::core::snapshot::COLUMNS;
use crate::domain::model::{LeaderboardRow, RankCriterion};
use crate::domain::ports::{SnapshotPublisher, StandingsSource};
use crate::utils::error::{LeaderboardError, Result};

pub type BoxedEngine = LeaderboardEngine<Box<dyn StandingsSource>, Box<dyn SnapshotPublisher>>;

pub fn build_source(config: &LeaderboardConfig) -> Result<Box<dyn StandingsSource>> {
    match config.source.r#type {
        SourceType::Html => {
            let url = config
                .source_url()
                .ok_or_else(|| LeaderboardError::MissingConfigError {
                    field: "source.url".to_string(),
                })?;
            let fetcher = StandingsFetcher::with_options(
                url,
                config.resolver(),
                config.timeout(),
                config.table_marker(),
                config.user_agent(),
            )?;
            Ok(Box::new(fetcher))
        }
        SourceType::Static => Ok(Box::new(StaticStandings::new(config.static_standings()))),
    }
}

/// Builds the configured sink. The sheets token is read from the environment
/// here and handed to the publisher; nothing else sees it.
pub fn build_publisher(config: &LeaderboardConfig) -> Result<Box<dyn SnapshotPublisher>> {
    match config.publish.sink {
        SinkType::Csv => {
            let storage = LocalStorage::new(config.output_path());
            Ok(Box::new(CsvPublisher::new(
                storage,
                config.filename(),
                config.layout(),
            )))
        }
        SinkType::Sheets => {
            let sheets = config.publish.sheets.as_ref().ok_or_else(|| {
                LeaderboardError::MissingConfigError {
                    field: "publish.sheets".to_string(),
                }
            })?;
            let token_env = sheets.token_env.as_deref().unwrap_or(DEFAULT_TOKEN_ENV);
            let token = std::env::var(token_env).map_err(|_| {
                LeaderboardError::config(format!(
                    "{} environment variable is required for the sheets sink",
                    token_env
                ))
            })?;
            let target = SheetTarget {
                api_base: sheets
                    .api_base
                    .clone()
                    .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
                spreadsheet_id: sheets.spreadsheet_id.clone(),
                range: sheets
                    .range
                    .clone()
                    .unwrap_or_else(|| DEFAULT_RANGE.to_string()),
            };
            let client = reqwest::Client::builder()
                .timeout(config.timeout())
                .build()?;
            Ok(Box::new(SheetsPublisher::new(
                client,
                target,
                token,
                config.layout(),
            )))
        }
    }
}

pub fn build_engine(
    config: &LeaderboardConfig,
    criterion: Option<RankCriterion>,
) -> Result<BoxedEngine> {
    let criterion = criterion.unwrap_or_else(|| config.criterion());
    Ok(LeaderboardEngine::new(
        build_source(config)?,
        build_publisher(config)?,
        config.roster(),
    )
    .with_criterion(criterion)
    .with_clock(config.clock()))
}

/// Plain-text table for terminals.
pub fn render_table(rows: &[LeaderboardRow]) -> String {
    let body: Vec<[String; 6]> = rows
        .iter()
        .map(|row| {
            let r = &row.record;
            [
                row.rank.to_string(),
                r.name.clone(),
                r.total.to_string(),
                r.gold.to_string(),
                r.silver.to_string(),
                r.bronze.to_string(),
            ]
        })
        .collect();

    let mut widths: Vec<usize> = COLUMNS[..6].iter().map(|c| c.chars().count()).collect();
    for line in &body {
        for (width, cell) in widths.iter_mut().zip(line) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let format_line = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = vec![format_line(COLUMNS[..6].to_vec())];
    for line in &body {
        out.push(format_line(line.iter().map(String::as_str).collect()));
    }
    out.join("\n")
}
