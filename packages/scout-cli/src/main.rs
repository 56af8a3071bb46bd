//! `scout` - search listings, analyze them, print a ranked report.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use domain::{Report, UserCriteria};
use land_client::{LandClient, LandConfig};
use molit_client::{MolitClient, MolitConfig};
use pipeline::{Pipeline, PipelineConfig, PipelineError};
use transit_client::{TransitClient, TransitConfig};

mod render;

/// Exit code for a blocked listing source, so wrapper scripts can back off
/// instead of retrying immediately.
const EXIT_BLOCKED: u8 = 3;

#[derive(Parser)]
#[command(name = "scout", about = "아파트 매물 검색·분석 도구", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search the configured regions and print a ranked report
    Run {
        /// Path to the criteria JSON file
        #[arg(long)]
        criteria: PathBuf,
        /// Listing cap per region
        #[arg(long, default_value_t = 50)]
        max_items: usize,
        /// Transaction-history window in months
        #[arg(long, default_value_t = 6)]
        months: u32,
        /// Write the full report as JSON to this path
        #[arg(long)]
        json_out: Option<PathBuf>,
    },
    /// List the apartment complexes of one region, largest first
    Complexes {
        /// Region name, e.g. 양천구 or 분당
        #[arg(long)]
        region: String,
        /// 전세, 월세, or 매매
        #[arg(long, default_value = "전세")]
        trade: String,
        /// Also fetch current listings for this complex
        #[arg(long)]
        name: Option<String>,
    },
    /// Inspect or prune the on-disk response cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand)]
enum CacheAction {
    /// Entry count, total size, and per-entry expiry
    Status,
    /// Drop every cached response
    Clear,
    /// Drop only entries past their TTL
    ClearExpired,
    /// Drop entries for one region code
    ClearRegion { code: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    match dispatch(cli).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn dispatch(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Command::Run {
            criteria,
            max_items,
            months,
            json_out,
        } => run(criteria, max_items, months, json_out).await,
        Command::Complexes { region, trade, name } => {
            complexes(&region, &trade, name.as_deref()).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Cache { action } => {
            cache(action)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn complexes(region: &str, trade: &str, name: Option<&str>) -> Result<()> {
    let code = domain::regions::sigungu_code(region)
        .with_context(|| format!("unknown region: {region}"))?;
    let trade_code = match trade {
        "전세" => "B1",
        "월세" => "B2",
        "매매" => "A1",
        other => anyhow::bail!("unknown trade type: {other}"),
    };

    let land = LandClient::new(LandConfig::from_env()).context("building listing client")?;
    let directory = land.region_complexes(code, trade_code).await?;
    println!("{region} 아파트 단지 {}곳", directory.len());
    for complex in &directory {
        println!(
            "  {} ({}세대, {}동, {}년)",
            complex.name,
            complex.households.map_or("?".to_string(), |h| h.to_string()),
            complex.buildings.map_or("?".to_string(), |b| b.to_string()),
            complex.built_year.map_or("?".to_string(), |y| y.to_string()),
        );
    }

    if let Some(name) = name {
        let listings = land.complex_articles(code, name, trade_code).await?;
        println!("\n'{name}' 매물 {}건", listings.len());
        for listing in &listings {
            println!("  {}", listing.summary());
        }
    }
    Ok(())
}

async fn run(
    criteria_path: PathBuf,
    max_items: usize,
    months: u32,
    json_out: Option<PathBuf>,
) -> Result<ExitCode> {
    let raw = std::fs::read_to_string(&criteria_path)
        .with_context(|| format!("reading {}", criteria_path.display()))?;
    let criteria: UserCriteria =
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", criteria_path.display()))?;
    for name in criteria.unknown_must_conditions() {
        tracing::warn!(name, "unrecognized must condition, it will not reject anything");
    }

    let land = LandClient::new(LandConfig::from_env()).context("building listing client")?;
    let molit = MolitClient::new(MolitConfig::from_env()).context("building price-history client")?;
    let transit =
        TransitClient::new(TransitConfig::from_env()).context("building transit client")?;

    let pipeline = Pipeline::new(
        Arc::new(land),
        Arc::new(molit),
        Arc::new(transit),
        PipelineConfig {
            max_items_per_region: max_items,
            price_months: months,
        },
    );

    let report = match pipeline.run(&criteria).await {
        Ok(report) => report,
        Err(PipelineError::SourceBlocked) => {
            eprintln!("매물 사이트가 요청을 차단했습니다. 몇 시간 후 다시 시도하세요.");
            return Ok(ExitCode::from(EXIT_BLOCKED));
        }
    };

    render::print_report(&report);
    if let Some(path) = json_out {
        write_json(&report, &path)?;
        println!("\n전체 리포트 저장: {}", path.display());
    }
    Ok(ExitCode::SUCCESS)
}

fn write_json(report: &Report, path: &PathBuf) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

fn cache(action: CacheAction) -> Result<()> {
    let config = LandConfig::from_env();
    let cache = land_client::ResponseCache::new(
        &config.cache_dir,
        chrono::Duration::hours(config.cache_ttl_hours),
    )
    .context("opening response cache")?;

    match action {
        CacheAction::Status => {
            let stats = cache.stats();
            println!("캐시 항목: {}개, {} bytes", stats.entries, stats.total_bytes);
            for entry in cache.detailed_stats() {
                let expiry = if entry.expired {
                    "만료됨".to_string()
                } else {
                    format!("만료까지 {}분", entry.expires_in.num_minutes())
                };
                println!(
                    "  {} {} ({}건, {} bytes, {expiry})",
                    entry.region, entry.kind, entry.items, entry.size_bytes
                );
            }
        }
        CacheAction::Clear => {
            println!("{}개 항목 삭제", cache.clear());
        }
        CacheAction::ClearExpired => {
            println!("만료된 {}개 항목 삭제", cache.clear_expired());
        }
        CacheAction::ClearRegion { code } => {
            println!("지역 {code}의 {}개 항목 삭제", cache.clear_by_region(&code));
        }
    }
    Ok(())
}
