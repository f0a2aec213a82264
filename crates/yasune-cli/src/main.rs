//! Query CLI for the yasune price-comparison engine.
//!
//! Reads a JSON store snapshot and prints the ranked view list a screen
//! would render: main search, favorites, or the hidden-record listing.

use std::path::PathBuf;

use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};

use yasune_core::{load_app_config, load_categories};
use yasune_engine::{
    cheapest_alternatives, project, run_filter, CategorySelection, DedupPolicy, Query, ViewMode,
};

mod render;
mod snapshot;

use snapshot::SnapshotFile;

#[derive(Debug, Parser)]
#[command(name = "yasune")]
#[command(about = "Ranked unit-price views over a price-record snapshot")]
struct Cli {
    /// Identity token; omit to query as an anonymous user (no overlays).
    #[arg(long, global = true)]
    user: Option<String>,

    /// Snapshot file; defaults to YASUNE_SNAPSHOT_PATH.
    #[arg(long, global = true)]
    snapshot: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Main view: keyword/rating search with category narrowing.
    Search {
        /// Text keyword, or a star count 0-3 for a rating query.
        keyword: Option<String>,
        #[arg(long)]
        large: Option<String>,
        #[arg(long)]
        medium: Option<String>,
        #[arg(long)]
        small: Option<String>,
        #[arg(long, value_enum, default_value_t = DedupArg::Auto)]
        dedup: DedupArg,
    },
    /// Favorites view: rated products only, cheapest per name.
    Favorites { keyword: Option<String> },
    /// Records the user has hidden.
    Hidden { keyword: Option<String> },
    /// Cheapest same-name offers at other stores.
    Alternatives { product_name: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum DedupArg {
    Auto,
    Always,
    Never,
}

impl From<DedupArg> for DedupPolicy {
    fn from(arg: DedupArg) -> Self {
        match arg {
            DedupArg::Auto => DedupPolicy::Automatic,
            DedupArg::Always => DedupPolicy::Always,
            DedupArg::Never => DedupPolicy::Never,
        }
    }
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = load_app_config()?;

    let snapshot_path = cli.snapshot.unwrap_or(config.snapshot_path);
    let snapshot = SnapshotFile::load(&snapshot_path)?;
    let definitions = snapshot.definitions_by_id();
    let views = project(&snapshot.records, &definitions);
    let overlay = snapshot.overlay_for(cli.user.as_deref());

    let query = match &cli.command {
        Commands::Search {
            keyword,
            large,
            medium,
            small,
            dedup,
        } => {
            let category = CategorySelection {
                large: large.clone(),
                medium: medium.clone(),
                small: small.clone(),
            };
            warn_on_unknown_categories(&config.categories_path, &category);
            Query {
                keyword: keyword.clone().unwrap_or_default(),
                category,
                view: ViewMode::Main,
                dedup: (*dedup).into(),
            }
        }
        Commands::Favorites { keyword } => Query {
            keyword: keyword.clone().unwrap_or_default(),
            view: ViewMode::Favorites,
            ..Query::default()
        },
        Commands::Hidden { keyword } => Query {
            keyword: keyword.clone().unwrap_or_default(),
            view: ViewMode::Hidden,
            ..Query::default()
        },
        Commands::Alternatives { product_name } => {
            let rows = cheapest_alternatives(
                &views,
                product_name,
                &overlay.hidden_ids,
                config.alternatives_limit,
            );
            print_rows(&rows, &overlay);
            return Ok(());
        }
    };

    let rows = run_filter(&views, &overlay, &query);
    print_rows(&rows, &overlay);
    Ok(())
}

fn print_rows(rows: &[yasune_core::ViewRecord], overlay: &yasune_engine::OverlaySnapshot) {
    if rows.is_empty() {
        println!("no matching records");
        return;
    }
    let now = Utc::now();
    for row in rows {
        println!("{}", render::render_row(row, overlay, now));
    }
}

/// The pipeline treats unknown category names as plain non-matching
/// filters; surface a warning so a typo doesn't read as an empty store.
fn warn_on_unknown_categories(path: &std::path::Path, selection: &CategorySelection) {
    if selection.large.is_none() && selection.medium.is_none() && selection.small.is_none() {
        return;
    }
    let Ok(tree) = load_categories(path) else {
        tracing::debug!(path = %path.display(), "categories file unavailable; skipping validation");
        return;
    };
    if let Some(large) = &selection.large {
        if !tree.large_names().contains(&large.as_str()) {
            tracing::warn!(large, "unknown large category");
        } else if let Some(medium) = &selection.medium {
            if !tree.medium_names(large).contains(&medium.as_str()) {
                tracing::warn!(large, medium, "unknown medium category");
            } else if let Some(small) = &selection.small {
                if !tree.small_names(large, medium).contains(&small.as_str()) {
                    tracing::warn!(large, medium, small, "unknown small category");
                }
            }
        }
    }
}
