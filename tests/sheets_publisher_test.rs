use httpmock::prelude::*;
use medal_board::core::engine::LeaderboardEngine;
use medal_board::core::fetcher::StaticStandings;
use medal_board::core::snapshot::SnapshotLayout;
use medal_board::domain::model::{
    LeaderboardRow, MedalCount, ParticipantRecord, RosterAssignment,
};
use medal_board::domain::ports::SnapshotPublisher;
use medal_board::{app, LeaderboardConfig, LeaderboardError, SheetsPublisher};
use medal_board::adapters::SheetTarget;
use serde_json::json;

fn target(server: &MockServer) -> SheetTarget {
    SheetTarget {
        api_base: server.base_url(),
        spreadsheet_id: "draft-2026".to_string(),
        range: "Sheet1".to_string(),
    }
}

fn rows() -> Vec<LeaderboardRow> {
    vec![
        LeaderboardRow {
            rank: 1,
            record: ParticipantRecord {
                name: "PlaceHolder A".to_string(),
                total: 37,
                gold: 12,
                silver: 10,
                bronze: 15,
                gold_breakdown: "ITA: 8G | GER: 4G".to_string(),
                silver_breakdown: "ITA: 4S | GER: 6S".to_string(),
                bronze_breakdown: "ITA: 10B | GER: 5B".to_string(),
                weighted_score: 71,
            },
        },
        LeaderboardRow {
            rank: 2,
            record: ParticipantRecord {
                name: "Group 1".to_string(),
                total: 33,
                gold: 13,
                silver: 9,
                bronze: 11,
                gold_breakdown: "NOR: 12G | KOR: 1G".to_string(),
                silver_breakdown: "NOR: 7S | KOR: 2S".to_string(),
                bronze_breakdown: "NOR: 8B | KOR: 3B".to_string(),
                weighted_score: 68,
            },
        },
    ]
}

#[tokio::test]
async fn test_publish_clears_then_writes_grid() {
    let server = MockServer::start();

    let clear_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v4/spreadsheets/draft-2026/values/Sheet1:clear")
            .header("Authorization", "Bearer secret-token");
        then.status(200).json_body(json!({"clearedRange": "Sheet1!A1:Z1000"}));
    });

    let update_mock = server.mock(|when, then| {
        when.method(PUT)
            .path("/v4/spreadsheets/draft-2026/values/Sheet1")
            .query_param("valueInputOption", "RAW")
            .header("Authorization", "Bearer secret-token")
            .json_body(json!({
                "range": "Sheet1",
                "majorDimension": "ROWS",
                "values": [
                    ["Last Updated: 2026-02-15 18:30:00 UTC"],
                    [],
                    ["Rank", "Name", "Total", "Gold", "Silver", "Bronze",
                     "Gold Breakdown", "Silver Breakdown", "Bronze Breakdown"],
                    [1, "PlaceHolder A", 37, 12, 10, 15,
                     "ITA: 8G | GER: 4G", "ITA: 4S | GER: 6S", "ITA: 10B | GER: 5B"],
                    [2, "Group 1", 33, 13, 9, 11,
                     "NOR: 12G | KOR: 1G", "NOR: 7S | KOR: 2S", "NOR: 8B | KOR: 3B"]
                ]
            }));
        then.status(200).json_body(json!({"updatedRows": 5}));
    });

    let publisher = SheetsPublisher::new(
        reqwest::Client::new(),
        target(&server),
        "secret-token",
        SnapshotLayout::default(),
    );
    publisher
        .publish("Last Updated: 2026-02-15 18:30:00 UTC", &rows())
        .await
        .unwrap();

    clear_mock.assert();
    update_mock.assert();
}

#[tokio::test]
async fn test_rejected_clear_is_publish_failure_and_skips_write() {
    let server = MockServer::start();

    let clear_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v4/spreadsheets/draft-2026/values/Sheet1:clear");
        then.status(403)
            .json_body(json!({"error": {"code": 403, "status": "PERMISSION_DENIED"}}));
    });
    let update_mock = server.mock(|when, then| {
        when.method(PUT)
            .path("/v4/spreadsheets/draft-2026/values/Sheet1");
        then.status(200);
    });

    let publisher = SheetsPublisher::new(
        reqwest::Client::new(),
        target(&server),
        "expired",
        SnapshotLayout::default(),
    );
    let err = publisher
        .publish("Last Updated: now", &rows())
        .await
        .unwrap_err();

    assert!(matches!(err, LeaderboardError::PublishFailure { .. }));
    assert!(err.to_string().contains("403"));
    clear_mock.assert();
    assert_eq!(update_mock.hits(), 0);
}

#[tokio::test]
async fn test_engine_with_sheets_sink() {
    let server = MockServer::start();
    let clear_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v4/spreadsheets/draft-2026/values/Sheet1:clear");
        then.status(200);
    });
    let update_mock = server.mock(|when, then| {
        when.method(PUT)
            .path("/v4/spreadsheets/draft-2026/values/Sheet1")
            .json_body_partial(r#"{"majorDimension": "ROWS"}"#);
        then.status(200);
    });

    let standings = [
        ("NOR", MedalCount::new(12, 7, 8)),
        ("KOR", MedalCount::new(1, 2, 3)),
    ]
    .into_iter()
    .collect();
    let roster: RosterAssignment = [("Group 1", vec!["NOR", "KOR"])].into_iter().collect();
    let publisher = SheetsPublisher::new(
        reqwest::Client::new(),
        target(&server),
        "token",
        SnapshotLayout::default(),
    );

    let engine = LeaderboardEngine::new(StaticStandings::new(standings), publisher, roster);
    let report = engine.run().await.unwrap();

    assert_eq!(report.rows.len(), 1);
    assert_eq!(report.rows[0].record.total, 33);
    assert_eq!(report.destination, "spreadsheet draft-2026 (Sheet1)");
    clear_mock.assert();
    update_mock.assert();
}

#[tokio::test]
async fn test_sheets_sink_from_config() {
    let server = MockServer::start();
    let clear_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v4/spreadsheets/cfg-sheet/values/Leaderboard:clear")
            .header("Authorization", "Bearer from-env");
        then.status(200);
    });
    let update_mock = server.mock(|when, then| {
        when.method(PUT)
            .path("/v4/spreadsheets/cfg-sheet/values/Leaderboard");
        then.status(200);
    });

    std::env::set_var("MEDAL_BOARD_SHEETS_TEST_TOKEN", "from-env");
    let toml_content = format!(
        r#"
[source]
type = "static"

[source.standings]
NOR = {{ gold = 1, silver = 1, bronze = 1 }}

[[roster]]
name = "Solo"
entities = ["NOR"]

[publish]
sink = "sheets"

[publish.sheets]
spreadsheet_id = "cfg-sheet"
range = "Leaderboard"
api_base = "{}"
token_env = "MEDAL_BOARD_SHEETS_TEST_TOKEN"
"#,
        server.base_url()
    );
    let config = LeaderboardConfig::from_toml_str(&toml_content).unwrap();
    let report = app::build_engine(&config, None)
        .unwrap()
        .run()
        .await
        .unwrap();
    std::env::remove_var("MEDAL_BOARD_SHEETS_TEST_TOKEN");

    assert_eq!(report.rows[0].record.total, 3);
    clear_mock.assert();
    update_mock.assert();
}
