//! Command-line front end for the Ticklist core.
//!
//! # Responsibility
//! - Map one invocation to one list or editor use-case.
//! - Act as the presentation layer: print the list, follow navigation
//!   requests, render with the configured color scheme.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use ticklist_core::{
    init_logging, ColorScheme, CoreConfig, Item, ItemId, LoadOutcome, NavigationRequest,
    SaveOutcome, SqliteItemStore, TodoApp,
};

#[derive(Debug, Parser)]
#[command(name = "ticklist", version, about = "Local todo list")]
struct Cli {
    /// Directory holding the item store and logs.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Store key holding the list.
    #[arg(long, global = true)]
    key: Option<String>,

    /// trace|debug|info|warn|error
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// light|dark
    #[arg(long, global = true)]
    theme: Option<ColorScheme>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show all items, newest first.
    List,
    /// Add a new item.
    Add { title: String },
    /// Flip an item between open and done.
    Toggle { id: i64 },
    /// Delete an item.
    Delete { id: i64 },
    /// Show one item as the editor sees it.
    Show { id: i64 },
    /// Replace an item's title.
    Edit { id: i64, title: String },
    /// Print the color scheme, or preview another one (not saved).
    Theme { scheme: Option<ColorScheme> },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    init_logging(&config.log_level, config.log_dir())
        .map_err(anyhow::Error::msg)
        .context("failed to start logging")?;
    log::info!(
        "event=cli_start module=cli status=ok core_version={}",
        ticklist_core::core_version()
    );

    let app = TodoApp::open(&config)
        .with_context(|| format!("failed to open store in {}", config.data_dir.display()))?;
    run(&app, cli.command).await
}

fn resolve_config(cli: &Cli) -> Result<CoreConfig> {
    let mut config = match &cli.data_dir {
        Some(dir) => {
            let dir = std::path::absolute(dir)
                .with_context(|| format!("invalid data directory {}", dir.display()))?;
            CoreConfig::new(dir)
                .with_env_overrides()
                .context("failed to read configuration")?
        }
        None => CoreConfig::from_env().context("failed to read configuration")?,
    };
    if let Some(key) = &cli.key {
        config.storage_key = key.clone();
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(theme) = cli.theme {
        config.color_scheme = theme;
    }
    config.validate()?;
    Ok(config)
}

async fn run(app: &TodoApp<SqliteItemStore>, command: Command) -> Result<()> {
    let list = app.list_synchronizer();
    match command {
        Command::List => {
            load_list(app, &list).await?;
            print_items(app, &list.items());
        }
        Command::Add { title } => {
            load_list(app, &list).await?;
            let item = list.add(title).await.context("item added but not saved")?;
            println!("added {}", item.id);
        }
        Command::Toggle { id } => {
            load_list(app, &list).await?;
            if !list.toggle_completed(ItemId(id)).await? {
                bail!("no item with id {id}");
            }
            if let Some(item) = list.get(ItemId(id)) {
                print_items(app, &[item]);
            }
        }
        Command::Delete { id } => {
            load_list(app, &list).await?;
            if !list.delete(ItemId(id)).await? {
                bail!("no item with id {id}");
            }
            println!("deleted {id}");
        }
        Command::Show { id } => {
            let mut editor = app.item_editor();
            match editor.load_item(ItemId(id)).await? {
                Some(item) => print_items(app, &[item]),
                None => println!("no item with id {id}"),
            }
        }
        Command::Edit { id, title } => {
            load_list(app, &list).await?;
            let id = match list.open_editor(ItemId(id)) {
                NavigationRequest::OpenEditor(id) => id,
                NavigationRequest::Back => return Ok(()),
            };
            let mut editor = app.item_editor();
            editor.load_item(id).await?;
            editor.edit_title(title);
            let outcome = editor.save().await?;
            match outcome {
                SaveOutcome::Saved => println!("saved {id}"),
                SaveOutcome::NotFound | SaveOutcome::NothingToSave => {
                    println!("no item with id {id}")
                }
            }
            if outcome.navigation() == NavigationRequest::Back {
                load_list(app, &list).await?;
                print_items(app, &list.items());
            }
        }
        Command::Theme { scheme } => {
            if let Some(scheme) = scheme {
                app.theme().set_color_scheme(scheme);
            }
            let palette = app.theme().palette();
            println!(
                "{} text={} background={} border={} button={} muted={}",
                app.theme().color_scheme(),
                palette.text,
                palette.background,
                palette.border,
                palette.button,
                palette.muted
            );
        }
    }
    Ok(())
}

async fn load_list(
    app: &TodoApp<SqliteItemStore>,
    list: &ticklist_core::ListSynchronizer<SqliteItemStore>,
) -> Result<()> {
    let outcome = list
        .load()
        .await
        .with_context(|| format!("failed to load `{}`", app.repository().key()))?;
    if let LoadOutcome::Seeded { count } = outcome {
        log::info!("event=cli_seed module=cli status=ok count={count}");
    }
    Ok(())
}

fn print_items(app: &TodoApp<SqliteItemStore>, items: &[Item]) {
    if items.is_empty() {
        println!("No todos");
        return;
    }
    let done_marker = match app.theme().color_scheme() {
        ColorScheme::Light => "[x]",
        ColorScheme::Dark => "[*]",
    };
    for item in items {
        let marker = if item.completed { done_marker } else { "[ ]" };
        println!("{marker} {:>15}  {}", item.id.get(), item.title);
    }
}
