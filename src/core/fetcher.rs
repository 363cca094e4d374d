use crate::core::resolver::EntityResolver;
use crate::domain::model::{EntityStandings, MedalCount};
use crate::domain::ports::StandingsSource;
use crate::utils::error::{LeaderboardError, Result};
use crate::utils::html;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_TABLE_MARKER: &str = "wikitable";
pub const DEFAULT_USER_AGENT: &str = concat!("medal-board/", env!("CARGO_PKG_VERSION"));

/// Label, gold, silver, bronze, plus a rank or a total.
const MIN_CELLS: usize = 5;

/// Counts above this are treated as garbage; keeps roster sums and the
/// 3-2-1 weighting far from `u32` overflow.
pub const MAX_MEDAL_COUNT: u32 = 100_000;

/// One medal-table row that parsed cleanly; the label is still raw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MedalRow {
    pub label: String,
    pub count: MedalCount,
}

/// Parses a count cell, dropping thousands separators first.
pub fn parse_count(cell: &str) -> Option<u32> {
    let digits: String = cell
        .chars()
        .filter(|c| !matches!(c, ',' | '.' | '\'' | '_' | '\u{2009}' | '\u{202f}' | '\u{a0}'))
        .filter(|c| !c.is_whitespace())
        .collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok().filter(|n| *n <= MAX_MEDAL_COUNT)
}

fn is_label(cell: &str) -> bool {
    let cell = cell.trim();
    !cell.is_empty() && parse_count(cell).is_none()
}

/// Reads `label, gold, silver, bronze` starting at `at`.
fn read_at(cells: &[String], at: usize) -> Option<MedalRow> {
    let label = cells.get(at)?.trim();
    Some(MedalRow {
        label: label.to_string(),
        count: MedalCount::new(
            parse_count(cells.get(at + 1)?)?,
            parse_count(cells.get(at + 2)?)?,
            parse_count(cells.get(at + 3)?)?,
        ),
    })
}

fn parse_row(cells: &[String]) -> Option<MedalRow> {
    if cells.len() < MIN_CELLS {
        return None;
    }
    // `label, gold, silver, bronze, total` at the right edge absorbs a rank
    // cell that rowspan may have dropped
    let at = cells.len() - MIN_CELLS;
    if is_label(&cells[at]) && parse_count(&cells[at + 4]).is_some() {
        if let Some(row) = read_at(cells, at) {
            return Some(row);
        }
    }
    // no total column: the first text cell followed by three counts is the
    // label; a tied rank such as "=3" is text too
    (0..cells.len())
        .filter(|&at| is_label(&cells[at]))
        .find_map(|at| read_at(cells, at))
}

/// Lazily parsed rows of a medal table. Rows that do not fit the layout are
/// skipped and counted rather than failing the whole table.
pub struct MedalRows<'a> {
    rows: html::Rows<'a>,
    parsed: usize,
    skipped: usize,
}

impl MedalRows<'_> {
    pub fn parsed(&self) -> usize {
        self.parsed
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

impl Iterator for MedalRows<'_> {
    type Item = MedalRow;

    fn next(&mut self) -> Option<Self::Item> {
        for row in self.rows.by_ref() {
            let cells = html::cells(row);
            if cells.is_empty() {
                continue;
            }
            match parse_row(&cells) {
                Some(parsed) => {
                    self.parsed += 1;
                    return Some(parsed);
                }
                None => {
                    tracing::trace!("Skipping medal row: {:?}", cells);
                    self.skipped += 1;
                }
            }
        }
        None
    }
}

/// Iterates the rows of one `<table>` block.
pub fn medal_rows(table: &str) -> MedalRows<'_> {
    MedalRows {
        rows: html::rows(table),
        parsed: 0,
        skipped: 0,
    }
}

#[derive(Debug, Default)]
struct TableScan {
    standings: EntityStandings,
    parsed: usize,
    skipped: usize,
    unrecognized: usize,
}

fn scan_table(table: &str, resolver: &EntityResolver) -> TableScan {
    let mut rows = medal_rows(table);
    let mut scan = TableScan::default();

    for row in rows.by_ref() {
        match resolver.resolve(&row.label) {
            Some(code) => {
                if !scan.standings.insert(code, row.count) {
                    tracing::warn!(
                        "Duplicate standings row for {} ({}), keeping first",
                        code,
                        row.label
                    );
                }
            }
            None => {
                tracing::debug!("Unrecognized entity label: {}", row.label);
                scan.unrecognized += 1;
            }
        }
    }

    scan.parsed = rows.parsed();
    scan.skipped = rows.skipped();
    scan
}

/// Builds standings from a medal-table page.
///
/// Every table carrying `table_marker` is tried in page order; the first one
/// with at least one recognized entity wins. Unrecognized labels are dropped.
pub fn parse_standings(
    page: &str,
    table_marker: &str,
    resolver: &EntityResolver,
) -> Result<EntityStandings> {
    let tables = html::find_tables(page, table_marker);
    if tables.is_empty() {
        return Err(LeaderboardError::parse_failure(format!(
            "no <table> marked '{}' in the standings page",
            table_marker
        )));
    }

    let mut parsed = 0usize;
    for (index, table) in tables.iter().enumerate() {
        let scan = scan_table(table, resolver);
        parsed += scan.parsed;
        if scan.standings.is_empty() {
            tracing::debug!(
                "Table {} marked '{}' has no recognized entities ({} rows parsed)",
                index + 1,
                table_marker,
                scan.parsed
            );
            continue;
        }

        tracing::info!(
            "Parsed {} medal rows: {} entities, {} unrecognized, {} skipped",
            scan.parsed,
            scan.standings.len(),
            scan.unrecognized,
            scan.skipped
        );
        return Ok(scan.standings);
    }

    Err(LeaderboardError::parse_failure(if parsed == 0 {
        format!(
            "{} table(s) marked '{}' but none has parseable medal rows",
            tables.len(),
            table_marker
        )
    } else {
        format!(
            "{} medal rows parsed but no entity was recognized",
            parsed
        )
    }))
}

/// Fetches the live medal table over HTTP.
pub struct StandingsFetcher {
    client: Client,
    url: String,
    table_marker: String,
    resolver: EntityResolver,
}

impl StandingsFetcher {
    pub fn new(url: impl Into<String>, resolver: EntityResolver) -> Result<Self> {
        Self::with_options(
            url,
            resolver,
            DEFAULT_TIMEOUT,
            DEFAULT_TABLE_MARKER,
            DEFAULT_USER_AGENT,
        )
    }

    pub fn with_options(
        url: impl Into<String>,
        resolver: EntityResolver,
        timeout: Duration,
        table_marker: impl Into<String>,
        user_agent: &str,
    ) -> Result<Self> {
        // one round trip: a redirect is reported, not followed
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
            table_marker: table_marker.into(),
            resolver,
        })
    }

    async fn download(&self) -> Result<String> {
        tracing::debug!("Requesting standings from: {}", self.url);
        let response = self.client.get(&self.url).send().await.map_err(|e| {
            LeaderboardError::source_unavailable(if e.is_timeout() {
                format!("request to {} timed out", self.url)
            } else {
                format!("request to {} failed: {}", self.url, e)
            })
        })?;

        let status = response.status();
        tracing::debug!("Standings response status: {}", status);
        if status.is_redirection() {
            let location = response
                .headers()
                .get(reqwest::header::LOCATION)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("<no location>");
            return Err(LeaderboardError::source_unavailable(format!(
                "{} answered {} to {}; point source.url at the final address",
                self.url, status, location
            )));
        }
        if !status.is_success() {
            return Err(LeaderboardError::source_unavailable(format!(
                "{} answered {}",
                self.url, status
            )));
        }

        response.text().await.map_err(|e| {
            LeaderboardError::source_unavailable(format!("reading body from {}: {}", self.url, e))
        })
    }
}

#[async_trait]
impl StandingsSource for StandingsFetcher {
    async fn fetch(&self) -> Result<EntityStandings> {
        let page = self.download().await?;
        parse_standings(&page, &self.table_marker, &self.resolver)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Standings fixed in configuration; no network involved.
pub struct StaticStandings {
    standings: EntityStandings,
}

impl StaticStandings {
    pub fn new(standings: EntityStandings) -> Self {
        Self { standings }
    }
}

#[async_trait]
impl StandingsSource for StaticStandings {
    async fn fetch(&self) -> Result<EntityStandings> {
        Ok(self.standings.clone())
    }

    fn describe(&self) -> String {
        format!("static standings ({} entities)", self.standings.len())
    }
}
