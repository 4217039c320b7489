use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use esports_stats::api::{build_router, state::AppState};
use esports_stats::calculate::StatsEngine;
use esports_stats::config::AppConfig;
use esports_stats::feed::{FeedClient, MatchSource, StaticSource};
use esports_stats::models::{Achievement, DerivedStats, Lang, TrackedTeam};

#[derive(Parser)]
#[command(name = "esports-stats")]
#[command(about = "Match statistics, streaks and achievements for an esports team")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error); defaults to the config value
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute win/loss stats for the tracked team
    Stats {
        #[command(flatten)]
        query: QueryArgs,
    },

    /// Evaluate achievements for the tracked team
    Achievements {
        #[command(flatten)]
        query: QueryArgs,
    },

    /// Start the API server
    Serve {
        /// Bind address
        #[arg(long)]
        host: Option<String>,

        /// Port number
        #[arg(long)]
        port: Option<u16>,
    },

    /// Write a default configuration file
    InitConfig {
        #[arg(long, default_value = "./config.toml")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args)]
struct QueryArgs {
    /// Read matches from a JSON file
    #[arg(long, conflicts_with = "url")]
    input: Option<PathBuf>,

    /// Fetch matches from this feed URL instead of the configured one
    #[arg(long)]
    url: Option<String>,

    /// Team slug, code or name (defaults to the configured team)
    #[arg(long)]
    team: Option<String>,

    /// Output language (es, en)
    #[arg(long)]
    lang: Option<String>,

    /// Print JSON instead of a text report
    #[arg(long)]
    json: bool,
}

impl QueryArgs {
    fn tracked_team(&self, config: &AppConfig) -> TrackedTeam {
        match self.team.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => {
                TrackedTeam::from_identifier(id).with_fallback(config.team.fallback)
            }
            _ => config.tracked_team(),
        }
    }

    fn lang(&self, config: &AppConfig) -> Lang {
        self.lang.as_deref().map(Lang::parse).unwrap_or(config.lang)
    }

    fn source(&self, config: &AppConfig) -> Result<Arc<dyn MatchSource>> {
        if let Some(path) = &self.input {
            let source = StaticSource::from_file(path)
                .with_context(|| format!("Failed to load matches from {}", path.display()))?;
            return Ok(Arc::new(source));
        }

        let mut config = config.clone();
        if let Some(url) = &self.url {
            config.feed.url = Some(url.clone());
        }

        match config.feed_client_config()? {
            Some(client_config) => Ok(Arc::new(FeedClient::new(client_config)?)),
            None => bail!("No match input: pass --input or --url, or set feed.url in the config"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.command {
        Commands::InitConfig { .. } => AppConfig::default(),
        _ => AppConfig::load(&cli.config)
            .with_context(|| format!("Failed to load config from {}", cli.config.display()))?,
    };

    // Initialize tracing
    let level = cli.log_level.as_deref().unwrap_or(&config.log_level);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let registry = tracing_subscriber::registry().with(filter);
    if cli.json_logs {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    tracing::debug!("Starting esports-stats v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Stats { query } => {
            let team = query.tracked_team(&config);
            let lang = query.lang(&config);
            let source = query.source(&config)?;
            let matches = source.fetch_matches().await?;
            tracing::info!("Loaded {} matches from {}", matches.len(), source.name());

            let stats = StatsEngine::new(team.clone()).stats(&matches);
            if query.json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                match stats {
                    Some(stats) => print_stats(&team, &stats),
                    None => println!("{}", lang.no_stats_message()),
                }
            }
        }
        Commands::Achievements { query } => {
            let team = query.tracked_team(&config);
            let lang = query.lang(&config);
            let source = query.source(&config)?;
            let matches = source.fetch_matches().await?;
            tracing::info!("Loaded {} matches from {}", matches.len(), source.name());

            let achievements = StatsEngine::new(team).achievements(&matches, lang);
            if query.json {
                println!("{}", serde_json::to_string_pretty(&achievements)?);
            } else if achievements.is_empty() {
                println!("{}", lang.no_stats_message());
            } else {
                print_achievements(&achievements, lang);
            }
        }
        Commands::Serve { host, port } => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);

            let mut state = AppState::new(config.tracked_team(), config.lang)
                .with_cors_origin(config.server.cors_origin.clone());
            match config.feed_client_config()? {
                Some(client_config) => {
                    tracing::info!("Match feed: {}", client_config.url);
                    state = state.with_source(Arc::new(FeedClient::new(client_config)?));
                }
                None => {
                    tracing::warn!("No feed.url configured; only POST endpoints will return data");
                }
            }

            let app = build_router(state);
            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
        Commands::InitConfig { path, force } => init_config(&path, force)?,
    }

    Ok(())
}

fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, AppConfig::default().to_toml()?)?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}

fn team_label(team: &TrackedTeam) -> &str {
    team.name
        .as_deref()
        .or(team.code.as_deref())
        .or(team.slug.as_deref())
        .unwrap_or("Team")
}

fn print_stats(team: &TrackedTeam, stats: &DerivedStats) {
    println!("\n=== {} ===", team_label(team));
    println!(
        "Record:         {}W - {}L ({} games)",
        stats.wins, stats.losses, stats.total_games
    );
    println!("Winrate:        {:.1}%", stats.winrate);
    let streaks = stats.streaks();
    if let Some(kind) = streaks.current_type {
        println!("Current streak: {}{}", streaks.current, kind.suffix());
    }
    println!(
        "Best streaks:   {}W / {}L",
        streaks.best_win, streaks.best_loss
    );

    if let Some(last) = &stats.last_match {
        println!(
            "Last match:     vs {} {}-{} ({}) [{}]",
            last.opponent,
            last.tracked_score,
            last.opponent_score,
            if last.win { "W" } else { "L" },
            last.league
        );
    }

    if !stats.recent_form.is_empty() {
        let form: Vec<&str> = stats
            .recent_form
            .iter()
            .map(|f| if f.win { "W" } else { "L" })
            .collect();
        println!("Recent form:    {}", form.join(" "));
    }

    if !stats.tournament_stats.is_empty() {
        println!("\nTournaments:");
        for t in &stats.tournament_stats {
            println!(
                "  {:<24} {:>3}-{:<3} {:>5.1}%",
                t.name, t.wins, t.losses, t.winrate
            );
        }
    }
}

fn print_achievements(achievements: &[Achievement], lang: Lang) {
    let unlocked = achievements.iter().filter(|a| a.unlocked).count();
    println!(
        "\n=== {} ({}/{}) ===",
        lang.pick("Logros", "Achievements"),
        unlocked,
        achievements.len()
    );
    for a in achievements {
        println!(
            "{} {} [{}] - {} ({}/{})",
            a.icon,
            a.title,
            a.rarity.label(lang),
            a.description,
            a.progress,
            a.max
        );
    }
}
