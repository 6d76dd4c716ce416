use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use dream_journal_lib::commands;
use dream_journal_lib::config::AppConfig;
use dream_journal_lib::domain::{FilterCriteria, Tab};
use dream_journal_lib::query::DreamStatistics;
use dream_journal_lib::AppState;

#[derive(Parser, Debug)]
#[command(author, version, about = "Dream journal with AI interpretation")]
struct Cli {
    /// Config file (defaults to the per-user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args, Debug, Default)]
struct FilterArgs {
    /// Text to search for in dreams and interpretations
    #[arg(long, default_value = "")]
    query: String,
    /// Only favorite dreams
    #[arg(long)]
    favorites: bool,
    /// First day to include (YYYY-MM-DD)
    #[arg(long)]
    from: Option<NaiveDate>,
    /// Last day to include (YYYY-MM-DD)
    #[arg(long)]
    to: Option<NaiveDate>,
    /// Symbol that must appear in the dream
    #[arg(long)]
    symbol: Option<String>,
}

impl FilterArgs {
    fn criteria(&self) -> FilterCriteria {
        FilterCriteria::new()
            .with_query(self.query.clone())
            .with_tab(if self.favorites { Tab::Favorites } else { Tab::All })
            .with_date_range(self.from, self.to)
            .with_symbol(self.symbol.as_deref())
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interpret a dream and save it
    Interpret { text: String },
    /// List saved dreams
    List {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Toggle the favorite flag
    Favorite { id: String },
    /// Delete a dream and its note
    Delete { id: String },
    /// Set a note on a dream; empty text removes it
    Note { id: String, text: String },
    /// Show statistics
    Stats,
    /// Export to CSV
    ExportCsv {
        output: PathBuf,
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Export to PDF
    ExportPdf {
        output: PathBuf,
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Write a backup file
    Backup { output: PathBuf },
    /// Restore a backup file
    Restore { input: PathBuf },
    /// Browse the symbol library
    Symbols {
        #[arg(long, default_value = "")]
        query: String,
        #[arg(long)]
        category: Option<String>,
        /// List the distinct categories instead of symbols
        #[arg(long)]
        categories: bool,
    },
    /// Load a symbol vocabulary JSON file
    ImportSymbols { input: PathBuf },
    /// Show or change settings
    Settings {
        #[arg(long)]
        language: Option<String>,
        #[arg(long)]
        dream_reminders: Option<bool>,
        #[arg(long)]
        weekly_report: Option<bool>,
        #[arg(long)]
        new_features: Option<bool>,
        #[arg(long)]
        profile_visibility: Option<String>,
        #[arg(long)]
        share_analytics: Option<bool>,
    },
    /// Print a shareable card for a dream
    Share { id: String },
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), String> {
    let json = serde_json::to_string_pretty(value).map_err(|e| e.to_string())?;
    println!("{}", json);
    Ok(())
}

async fn run(state: &AppState, command: Command) -> Result<(), String> {
    match command {
        Command::Interpret { text } => {
            let dream = commands::interpret_dream(state, &text, None).await?;
            println!("{}\n\n{}", dream.interpretation, dream.id);
        }
        Command::List { filter } => {
            let dreams = commands::list_dreams(state, filter.criteria()).await?;
            let counts = commands::tab_counts(state).await?;
            for dream in &dreams {
                let star = if dream.is_favorite { "*" } else { " " };
                println!(
                    "{} {} {}  {}",
                    star,
                    dream.created_at.with_timezone(&chrono::Local).format("%Y-%m-%d"),
                    dream.id,
                    dream.dream_text.lines().next().unwrap_or_default()
                );
            }
            println!("({} shown, {} total, {} favorites)", dreams.len(), counts.all, counts.favorites);
        }
        Command::Favorite { id } => {
            let dream = commands::toggle_favorite(state, &id).await?;
            println!("favorite: {}", dream.is_favorite);
        }
        Command::Delete { id } => commands::delete_dream(state, &id).await?,
        Command::Note { id, text } => commands::save_note(state, &id, &text).await?,
        Command::Stats => match commands::get_statistics(state).await? {
            DreamStatistics::NoData => println!("لا توجد أحلام بعد"),
            stats => print_json(&stats)?,
        },
        Command::ExportCsv { output, filter } => {
            let count = commands::export_csv(state, filter.criteria(), &output).await?;
            println!("{} dreams -> {}", count, output.display());
        }
        Command::ExportPdf { output, filter } => {
            let count = commands::export_pdf(state, filter.criteria(), &output).await?;
            println!("{} dreams -> {}", count, output.display());
        }
        Command::Backup { output } => {
            let count = commands::backup_to_file(state, &output).await?;
            println!("{} dreams -> {}", count, output.display());
        }
        Command::Restore { input } => {
            let summary = commands::restore_from_file(state, &input).await?;
            print_json(&summary)?;
        }
        Command::Symbols { categories: true, .. } => {
            print_json(&commands::list_categories(state).await?)?;
        }
        Command::Symbols { query, category, .. } => {
            let symbols = commands::list_symbols(state, &query, category.as_deref()).await?;
            print_json(&symbols)?;
        }
        Command::ImportSymbols { input } => {
            let count = commands::import_symbols(state, &input).await?;
            println!("{} symbols imported", count);
        }
        Command::Settings {
            language,
            dream_reminders,
            weekly_report,
            new_features,
            profile_visibility,
            share_analytics,
        } => {
            let update = commands::SettingsUpdate {
                language,
                dream_reminders,
                weekly_report,
                new_features,
                profile_visibility,
                share_analytics,
            };
            let is_noop = update.language.is_none()
                && update.dream_reminders.is_none()
                && update.weekly_report.is_none()
                && update.new_features.is_none()
                && update.profile_visibility.is_none()
                && update.share_analytics.is_none();
            let settings = if is_noop {
                commands::get_settings(state).await?
            } else {
                commands::update_settings(state, update).await?
            };
            print_json(&settings)?;
        }
        Command::Share { id } => println!("{}", commands::share_dream(state, &id).await?),
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match AppConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };

    match config.log_dir() {
        Ok(dir) => {
            if let Err(e) = rolling_logger::init_logger(dir, "DreamJournal") {
                eprintln!("logging disabled: {}", e);
            }
        }
        Err(e) => eprintln!("logging disabled: {}", e),
    }

    let state = match AppState::open(config).await {
        Ok(state) => state,
        Err(e) => {
            let _ = rolling_logger::error(&format!("startup failed: {}", e));
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    if let Err(message) = run(&state, cli.command).await {
        let _ = rolling_logger::warn(&message);
        eprintln!("{}", message);
        std::process::exit(1);
    }
}
