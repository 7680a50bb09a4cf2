use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli_style;

use cli_style::{
    get_styles, print_empty_list, print_error, print_key_value, print_section_footer,
    print_section_header, score_color, Cell, TableBuilder,
};
use cratedigger_server::matching::{
    CollectionSummary, CountEntry, MatchResult, MatchingEngine, UserProfile, DEFAULT_THRESHOLD,
};
use cratedigger_server::records::{load_collection_file, load_inventory_file};
use serde_json::json;

fn parse_path(s: &str) -> Result<PathBuf> {
    let original_path = PathBuf::from(s);
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

/// Ranks the records of an inventory file against a collection file.
#[derive(Parser, Debug)]
#[command(styles=get_styles(), version = concat!(env!("APP_VERSION"), "-", env!("GIT_HASH")))]
struct CliArgs {
    /// Collection JSON: an array of records, Discogs collection items, or a
    /// Discogs export with a `releases` array.
    #[clap(value_parser = parse_path)]
    pub collection: PathBuf,

    /// Inventory JSON: an array of store records.
    #[clap(value_parser = parse_path)]
    pub inventory: PathBuf,

    /// Minimum score a record needs to be listed.
    #[clap(short, long, default_value_t = DEFAULT_THRESHOLD)]
    pub threshold: f64,

    /// Show at most this many matches.
    #[clap(short, long)]
    pub limit: Option<usize>,

    /// Print JSON instead of a table.
    #[clap(long)]
    pub json: bool,

    /// Also print an overview of the collection.
    #[clap(long)]
    pub summary: bool,
}

struct MatchRun {
    matches: Vec<MatchResult>,
    total_matches: usize,
    summary: CollectionSummary,
}

fn run(args: &CliArgs) -> Result<MatchRun> {
    let engine = MatchingEngine::with_threshold(args.threshold)?;

    let collection = load_collection_file(&args.collection)?;
    let inventory = load_inventory_file(&args.inventory)?;

    let profile = UserProfile::build(&collection);
    let mut matches = engine.match_profile(&profile, &inventory);
    let total_matches = matches.len();
    if let Some(limit) = args.limit {
        matches.truncate(limit);
    }

    Ok(MatchRun {
        matches,
        total_matches,
        summary: CollectionSummary::from_profile(&profile, collection.len()),
    })
}

fn print_json(run: &MatchRun, with_summary: bool) -> Result<()> {
    let output = if with_summary {
        json!({
            "matches": run.matches,
            "totalMatches": run.total_matches,
            "summary": run.summary,
        })
    } else {
        serde_json::to_value(&run.matches)?
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&output).context("Failed to serialize matches")?
    );
    Ok(())
}

fn print_summary(summary: &CollectionSummary) {
    fn joined<K: std::fmt::Display>(entries: &[CountEntry<K>]) -> String {
        entries
            .iter()
            .map(|e| format!("{} ({})", e.name, e.count))
            .collect::<Vec<_>>()
            .join(", ")
    }

    print_section_header("Collection");
    print_key_value("Records", &summary.collection_size.to_string());
    print_key_value("Top genres", &joined(&summary.top_genres));
    print_key_value("Top artists", &joined(&summary.top_artists));
    print_key_value("Decades", &joined(&summary.decades));
    print_section_footer();
}

fn print_table(run: &MatchRun) {
    print_section_header(&format!(
        "Matches ({} of {})",
        run.matches.len(),
        run.total_matches
    ));

    if run.matches.is_empty() {
        print_empty_list("Nothing in the inventory reaches the threshold");
        print_section_footer();
        return;
    }

    let mut table = TableBuilder::new(vec![
        "#", "Score", "Artist", "Title", "Year", "Price", "Genre", "Artist~", "Era",
    ]);
    for (i, result) in run.matches.iter().enumerate() {
        let record = &result.record;
        let details = result.match_details;
        table.add_row(vec![
            Cell::plain((i + 1).to_string()),
            Cell::colored(
                format!("{:.3}", result.match_score),
                score_color(result.match_score),
            ),
            Cell::plain(record.artist.clone()),
            Cell::plain(record.title.clone()),
            Cell::plain(record.year.map(|y| y.to_string()).unwrap_or_default()),
            Cell::plain(record.price.map(|p| format!("{:.2}", p)).unwrap_or_default()),
            Cell::plain(format!("{:.2}", details.genre_similarity)),
            Cell::plain(format!("{:.2}", details.artist_similarity)),
            Cell::plain(format!("{:.2}", details.era_similarity)),
        ]);
    }
    table.print();
    print_section_footer();
}

fn main() {
    let args = CliArgs::parse();

    // Logs go to stderr so `--json` output stays parseable
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init();

    let result = run(&args).and_then(|run| {
        if args.json {
            print_json(&run, args.summary)
        } else {
            if args.summary {
                print_summary(&run.summary);
            }
            print_table(&run);
            Ok(())
        }
    });

    if let Err(err) = result {
        print_error(&format!("{:#}", err));
        std::process::exit(1);
    }
}
