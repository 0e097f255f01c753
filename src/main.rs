use anyhow::{anyhow, bail, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::sync::Arc;

use nowruz_countdown::config::Config;
use nowruz_countdown::linkify::Segment;
use nowruz_countdown::view::{confirm_and_clear, toggle_day, DayNavigator};
use nowruz_countdown::{
    CompletionStore, DayIndex, DayView, FileStore, FsTaskSource, Language, MergedTaskList,
    Preferences, Progress, TaskListLoader, UiStrings, COUNTDOWN_DAYS,
};

/// nowruz - forty days of spring cleaning before the equinox
#[derive(Parser)]
#[command(name = "nowruz")]
#[command(about = "Countdown and daily checklist for the forty days before Nowruz", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    /// Pretend the current time is this RFC 3339 instant
    #[arg(long, global = true)]
    now: Option<DateTime<Utc>>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Days remaining, today's day and progress
    Status,
    /// Show one day's task (defaults to the day the countdown opens on)
    Show { day: Option<DayIndex> },
    /// List all forty days
    Days,
    /// Mark an unlocked day done, or undo it
    Toggle { day: DayIndex },
    /// Clear every completed day
    Reset {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Print or change the display language
    Language { code: Option<Language> },
    /// Print or change the active task list
    TaskList { id: Option<String> },
}

struct App {
    now: DateTime<Utc>,
    store: Arc<FileStore>,
    loader: TaskListLoader<FsTaskSource>,
    preferences: Preferences<Arc<FileStore>>,
}

impl App {
    fn new(config: &Config, now: DateTime<Utc>) -> Result<Self> {
        let store = Arc::new(FileStore::new(&config.storage.path));
        let preferences = Preferences::new(Arc::clone(&store)).with_defaults(
            config.default_language().map_err(|e| anyhow!(e))?,
            config.defaults.task_list.clone(),
        );
        Ok(App {
            now,
            store,
            loader: TaskListLoader::new(FsTaskSource::new(&config.data.dir)),
            preferences,
        })
    }

    fn completion(&self) -> CompletionStore<Arc<FileStore>> {
        CompletionStore::new(Arc::clone(&self.store))
    }

    async fn strings(&self) -> UiStrings {
        self.loader
            .load_ui_strings(self.preferences.language())
            .await
            .into_current()
            .unwrap_or_default()
    }

    async fn task_list(&self) -> Result<MergedTaskList> {
        let id = self.preferences.task_list_id();
        let language = self.preferences.language();
        match self.loader.load(&id, language).await.into_current() {
            Some(result) => Ok(result?),
            None => bail!("task list load for '{id}' was superseded"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.clone())?;
    config.validate().map_err(|e| anyhow!(e))?;

    nowruz_countdown::observability::init_logging(&config.logging.level)?;

    let app = App::new(&config, cli.now.unwrap_or_else(Utc::now))?;
    tracing::debug!(now = %app.now, storage = %config.storage.path.display(), "starting");

    match cli.command {
        Commands::Status => status_command(&app).await,
        Commands::Show { day } => show_command(&app, day).await,
        Commands::Days => days_command(&app).await,
        Commands::Toggle { day } => toggle_command(&app, day).await,
        Commands::Reset { yes } => reset_command(&app, yes).await,
        Commands::Language { code } => language_command(app, code),
        Commands::TaskList { id } => task_list_command(app, id),
    }
}

async fn status_command(app: &App) -> Result<()> {
    let strings = app.strings().await;
    let progress = Progress::at(&app.completion(), app.now);

    println!(
        "{}: {}",
        UiStrings::or(&strings.spring_equinox, "Spring equinox"),
        progress.equinox.format("%Y-%m-%d %H:%M UTC")
    );
    println!(
        "{}: {}",
        UiStrings::or(&strings.days_remaining, "Days remaining"),
        progress.days_remaining
    );
    if let Some(day) = progress.current_day {
        println!(
            "{}: {day} / {}",
            UiStrings::or(&strings.current_day, "Current day"),
            progress.total
        );
    }
    println!("{} / {} completed", progress.completed, progress.total);
    Ok(())
}

async fn show_command(app: &App, day: Option<DayIndex>) -> Result<()> {
    let strings = app.strings().await;
    let list = app.task_list().await?;
    let completion = app.completion();
    let navigator = match day {
        Some(day) => DayNavigator::new(day),
        None => DayNavigator::starting_at(app.now),
    };
    let card = DayView::build(&list, navigator.day(), &completion, app.now)
        .ok_or_else(|| anyhow!("task list '{}' has no day {}", list.id, navigator.day()))?;

    println!(
        "Day {} of {COUNTDOWN_DAYS} • {} completed",
        card.day,
        completion.completed_count()
    );
    println!();
    println!("{}", card.title);
    let description: String = card
        .description
        .iter()
        .map(|segment| match segment {
            Segment::Text(text) => text.to_string(),
            Segment::Link(url) => format!("<{url}>"),
        })
        .collect();
    println!("{description}");
    println!();

    if let Some(at) = card.unlocks_at {
        println!(
            "{} {}",
            UiStrings::or(&strings.unlocks_on, "Unlocks on"),
            at.format("%Y-%m-%d %H:%M UTC")
        );
    } else if card.completed {
        println!("✓ {}", UiStrings::or(&strings.day_completed, "Completed"));
    }
    Ok(())
}

async fn days_command(app: &App) -> Result<()> {
    let list = app.task_list().await?;
    let completion = app.completion();
    for day in DayIndex::all() {
        let Some(card) = DayView::build(&list, day, &completion, app.now) else {
            continue;
        };
        let mark = match (card.completed, card.locked) {
            (true, _) => "[x]",
            (false, true) => "[-]",
            (false, false) => "[ ]",
        };
        let current = if card.is_current { " <" } else { "" };
        println!("{mark} {:>2}. {}{current}", card.day, card.title);
    }
    Ok(())
}

async fn toggle_command(app: &App, day: DayIndex) -> Result<()> {
    let strings = app.strings().await;
    let mut completion = app.completion();
    match toggle_day(&mut completion, day, app.now) {
        Some(true) => println!(
            "Day {day}: {}",
            UiStrings::or(&strings.mark_complete, "marked complete")
        ),
        Some(false) => println!(
            "Day {day}: {}",
            UiStrings::or(&strings.mark_incomplete, "marked incomplete")
        ),
        None => bail!(
            "day {day}: {}",
            UiStrings::or(&strings.not_yet_unlocked, "not yet unlocked")
        ),
    }
    Ok(())
}

async fn reset_command(app: &App, yes: bool) -> Result<()> {
    let mut completion = app.completion();
    if !Progress::at(&completion, app.now).offer_reset() {
        println!("Nothing to reset.");
        return Ok(());
    }
    let strings = app.strings().await;
    let question = UiStrings::or(&strings.reset_all, "Reset all completed days?");
    let cleared = confirm_and_clear(&mut completion, || yes || ask(question));
    if cleared {
        println!("All days cleared.");
    }
    Ok(())
}

fn ask(question: &str) -> bool {
    print!("{question} [y/N] ");
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    match io::stdin().lock().read_line(&mut answer) {
        Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
        Err(e) => {
            tracing::warn!(error = %e, "could not read confirmation");
            false
        }
    }
}

fn language_command(mut app: App, code: Option<Language>) -> Result<()> {
    match code {
        Some(language) => {
            app.preferences.set_language(language);
            println!("{} ({language})", language.native_name());
        }
        None => {
            let current = app.preferences.language();
            for language in Language::ALL {
                let marker = if language == current { "*" } else { " " };
                println!("{marker} {language}  {}", language.native_name());
            }
        }
    }
    Ok(())
}

fn task_list_command(mut app: App, id: Option<String>) -> Result<()> {
    match id {
        Some(id) => {
            if id.trim().is_empty() {
                bail!("task list id must not be empty");
            }
            app.preferences.set_task_list_id(&id);
            println!("{id}");
        }
        None => println!("{}", app.preferences.task_list_id()),
    }
    Ok(())
}
