use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use folio::catalog::loader::{self, LoadedTable};
use folio::catalog::table::Table;
use folio::config::Config;
use folio::output::terminal;
use folio::{Engine, Genre};

/// Folio: book recommendations from catalog metadata.
///
/// Finds books similar to one you like by comparing titles, authors and
/// publishers, and browses the catalog by rough genre.
#[derive(Parser)]
#[command(name = "folio", version, about)]
struct Cli {
    /// Keep only the first N catalog rows for the model (0 = whole file).
    /// Overrides FOLIO_MAX_BOOKS.
    #[arg(long, global = true)]
    limit_books: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List catalog titles containing QUERY (case-insensitive)
    Titles {
        /// Text to search for; omit to list from the start of the catalog
        query: Option<String>,

        /// Max titles to print
        #[arg(long, default_value = "20")]
        limit: usize,
    },

    /// Recommend books similar to the one with this exact title
    Recommend {
        /// Exact, case-sensitive title (use `folio titles` to find it)
        title: String,

        /// Number of recommendations
        #[arg(long, default_value = "5")]
        top: usize,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show a random selection of books from a genre
    Genre {
        /// One of: Fantasy, Mystery, Romance, Sci-Fi, Horror
        name: String,

        /// Number of books to show
        #[arg(long, default_value = "10")]
        top: usize,

        /// Seed the sample for a reproducible pick (overrides FOLIO_SEED)
        #[arg(long)]
        seed: Option<u64>,

        /// Print JSON instead of a list
        #[arg(long)]
        json: bool,
    },

    /// List the genres and the title keywords behind them
    Genres,

    /// Show the highest-rated books with enough ratings
    Popular {
        /// Length of the list
        #[arg(long, default_value = "50")]
        top: usize,

        /// Minimum ratings per book (overrides FOLIO_MIN_RATINGS)
        #[arg(long)]
        min_ratings: Option<u32>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show catalog and model statistics
    Status,
}

fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("folio=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;
    let limit = match cli.limit_books {
        Some(0) => None,
        Some(n) => Some(n),
        None => config.max_books,
    };

    match cli.command {
        Commands::Titles { query, limit: max } => {
            let loaded = load_catalog(&config)?;
            let engine = build_engine(&loaded.table, limit)?;
            let query = query.unwrap_or_default();
            let titles = engine.search_titles(&query, max);
            if titles.is_empty() {
                println!("No titles contain {query:?}.");
            }
            for title in titles {
                println!("{title}");
            }
        }

        Commands::Recommend { title, top, json } => {
            let loaded = load_catalog(&config)?;
            let engine = build_engine(&loaded.table, limit)?;

            let recs = engine.recommend(&title, top);
            if json {
                println!("{}", serde_json::to_string_pretty(&recs)?);
                return Ok(());
            }

            match engine.resolve(&title).and_then(|i| engine.book(i)) {
                Some(book) => {
                    terminal::display_selected_book(book);
                    terminal::display_recommendations(&recs);
                }
                None => {
                    println!("{} {title:?} is not in the catalog.", "Not found:".yellow());
                    let close = engine.search_titles(&title, 5);
                    if !close.is_empty() {
                        println!("Titles containing that text:");
                        for t in close {
                            println!("  {t}");
                        }
                    }
                }
            }
        }

        Commands::Genre {
            name,
            top,
            seed,
            json,
        } => {
            if Genre::from_name(&name).is_none() {
                println!("{} unknown genre {name:?}.", "Note:".yellow());
                terminal::display_genres();
                return Ok(());
            }

            let loaded = load_catalog(&config)?;
            let engine = build_engine(&loaded.table, limit)?;

            let mut rng = match seed.or(config.seed) {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_os_rng(),
            };
            let books = engine.by_category(&name, top, &mut rng);

            if json {
                println!("{}", serde_json::to_string_pretty(&books)?);
            } else if books.is_empty() {
                println!("No books found matching {name} in this part of the catalog.");
            } else {
                terminal::display_book_list(&format!("Top picks in {name}"), &books);
            }
        }

        Commands::Genres => terminal::display_genres(),

        Commands::Popular {
            top,
            min_ratings,
            json,
        } => {
            config.require_ratings()?;
            let loaded = load_catalog(&config)?;
            // Popularity ranks the whole catalog, not just the model corpus
            let books = loaded.table.books()?;
            let ratings = loader::load_ratings(&config.ratings_path).with_context(|| {
                format!("Failed to read {}", config.ratings_path.display())
            })?;

            let min_ratings = min_ratings.unwrap_or(config.min_ratings);
            let popular =
                folio::popularity::top_books(&books, &ratings.ratings, min_ratings, top);

            if json {
                println!("{}", serde_json::to_string_pretty(&popular)?);
            } else {
                terminal::display_popular(&popular, min_ratings);
            }
        }

        Commands::Status => {
            let loaded = load_catalog(&config)?;
            let engine = build_engine(&loaded.table, limit)?;
            println!("Books file: {}", config.books_path.display());
            terminal::display_status(loaded.table.len(), loaded.skipped, &engine.stats());
        }
    }

    Ok(())
}

/// Read the books file named by the config.
fn load_catalog(config: &Config) -> Result<LoadedTable> {
    config.require_books()?;
    loader::load_books(&config.books_path)
        .with_context(|| format!("Failed to read {}", config.books_path.display()))
}

/// Build the model under a spinner. This is the slow step: the similarity
/// matrix is quadratic in the corpus size.
fn build_engine(table: &Table, limit: Option<usize>) -> Result<Engine> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner} {msg}")
            .expect("valid template"),
    );
    spinner.set_message("Building recommendation model...");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = Engine::from_table(table, limit);
    spinner.finish_and_clear();

    let engine = result.context("Failed to build the recommendation model")?;
    info!(books = engine.len(), "Model built");
    Ok(engine)
}
