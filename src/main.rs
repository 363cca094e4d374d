use anyhow::Context;
use clap::Parser;
use medal_board::utils::error::ErrorSeverity;
use medal_board::utils::logger::{self, LogFormat};
use medal_board::utils::validation::Validate;
use medal_board::{app, CliArgs, LeaderboardConfig};

fn exit_code(severity: ErrorSeverity) -> i32 {
    match severity {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,   // source or parse, next cycle retries
        ErrorSeverity::High => 1,     // configuration
        ErrorSeverity::Critical => 3, // publish or system
    }
}

fn load_config(args: &CliArgs) -> anyhow::Result<LeaderboardConfig> {
    let config = LeaderboardConfig::from_file(&args.config)
        .with_context(|| format!("Failed to load config file '{}'", args.config.display()))?;
    config.validate().context("Configuration validation failed")?;
    Ok(config)
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = CliArgs::parse();

    logger::init_logger(LogFormat::from_flag(args.json_logs), args.verbose);

    tracing::info!("Loading configuration from: {}", args.config.display());
    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{:#}", e);
            eprintln!("❌ {:#}", e);
            std::process::exit(1);
        }
    };

    let engine = match app::build_engine(&config, args.rank_by) {
        Ok(engine) => engine,
        Err(e) => {
            tracing::error!("Could not set up the run: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(exit_code(e.severity()));
        }
    };

    if args.dry_run {
        tracing::info!("DRY RUN - nothing will be published");
        match engine.build().await {
            Ok(rows) => println!("{}", app::render_table(&rows)),
            Err(e) => {
                tracing::error!("{}", e.user_friendly_message());
                std::process::exit(exit_code(e.severity()));
            }
        }
        return;
    }

    match engine.run().await {
        Ok(report) => {
            println!(
                "Leaderboard updated LIVE at {} ({} participants, {})",
                report.timestamp,
                report.rows.len(),
                report.destination
            );
        }
        Err(e) => {
            tracing::error!(
                "{} (Category: {:?}, Severity: {:?})",
                e.user_friendly_message(),
                e.category(),
                e.severity()
            );
            tracing::error!("Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(exit_code(e.severity()));
        }
    }
}
