use std::fmt::Write as _;
use std::path::PathBuf;

use bookrec_common::api::{RecommendationResponse, StatsResponse};
use bookrec_common::logging::{LoggingConfig, init_tracing};
use bookrec_common::{
    Catalog, DataProvider, DatasetConfig, DatasetError, RatingSummary, recommend,
};
use clap::Parser;
use dotenvy::dotenv;
use thiserror::Error;

#[derive(Debug, Parser)]
#[command(name = "bookrec", about = "Recommend books from a synthetic rating dataset")]
struct Cli {
    /// User to recommend for (e.g. user_07)
    #[arg(long)]
    user: Option<String>,

    /// Number of recommendations; zero or negative prints none
    #[arg(long, default_value_t = 3, allow_negative_numbers = true)]
    count: i64,

    /// Print all user ids and exit
    #[arg(long)]
    list_users: bool,

    /// Print rating statistics
    #[arg(long)]
    stats: bool,

    /// Seed for the synthetic dataset (overrides BOOKREC_SEED)
    #[arg(long)]
    seed: Option<u64>,

    /// Number of synthetic users (overrides BOOKREC_USER_COUNT)
    #[arg(long)]
    user_count: Option<usize>,

    /// Directory for daily-rotated log files (overrides BOOKREC_LOG_DIR)
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    #[error("nothing to do: pass --user, --list-users or --stats")]
    NoAction,
}

fn dataset_config(cli: &Cli) -> DatasetConfig {
    let mut config = DatasetConfig::from_env();
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if let Some(user_count) = cli.user_count {
        config.user_count = user_count;
    }
    config
}

fn render_recommendations(user: &str, rows: &[RecommendationResponse]) -> String {
    if rows.is_empty() {
        return format!("No recommendations for {user}; try another user.\n");
    }

    let mut out = format!("Recommendations for {user}:\n");
    for (rank, row) in rows.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>2}. {} | {} | {} | {:.1} ({} ratings)",
            rank + 1,
            row.title,
            row.author.as_deref().unwrap_or("-"),
            row.genre.as_deref().unwrap_or("-"),
            row.predicted_score,
            row.support,
        );
    }
    out
}

fn render_stats(stats: &StatsResponse) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "users:   {}", stats.user_count);
    let _ = writeln!(out, "books:   {}", stats.book_count);
    let _ = writeln!(out, "ratings: {}", stats.rating_count);
    match stats.mean_rating {
        Some(mean) => {
            let _ = writeln!(out, "mean:    {mean:.2}");
        }
        None => {
            let _ = writeln!(out, "mean:    -");
        }
    }
    for row in &stats.distribution {
        let _ = writeln!(out, "  {} stars: {}", row.score, row.count);
    }
    out
}

fn run(cli: Cli) -> Result<String, CliError> {
    let config = dataset_config(&cli);
    let provider = DataProvider::generate(&config, Catalog::classics())?;
    let mut out = String::new();

    if cli.list_users {
        for user in provider.users() {
            let _ = writeln!(out, "{user}");
        }
        return Ok(out);
    }

    if cli.stats {
        let summary = RatingSummary::from_table(provider.ratings());
        out.push_str(&render_stats(&StatsResponse::from(&summary)));
    }

    if let Some(user) = cli.user.as_deref() {
        if !provider.has_user(user) {
            tracing::warn!(user, "user not present in dataset");
        }
        let count = usize::try_from(cli.count).unwrap_or(0);
        let recommendations = recommend(provider.ratings(), user, count);
        let rows =
            RecommendationResponse::from_recommendations(&recommendations, provider.catalog());
        out.push_str(&render_recommendations(user, &rows));
    } else if !cli.stats {
        return Err(CliError::NoAction);
    }

    Ok(out)
}

fn main() {
    dotenv().ok();
    let cli = Cli::parse();
    init_tracing(
        &LoggingConfig::from_env(env!("CARGO_PKG_NAME")).with_log_dir(cli.log_dir.clone()),
    );

    match run(cli) {
        Ok(output) => print!("{output}"),
        Err(err) => {
            tracing::error!(error = %err, "bookrec failed");
            std::process::exit(1);
        }
    }
}
