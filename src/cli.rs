//! Command-line front end over the operator commands.

use crate::commands;
use crate::config::Config;
use crate::context::AppContext;
use anyhow::{bail, Context as _};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// London Karaoke Club site content manager
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Config file (TOML). Environment variables override it.
    #[arg(short = 'C', long)]
    pub config: Option<PathBuf>,

    /// Admin password; falls back to LKC_ADMIN_PASSWORD
    #[arg(short, long, env = "LKC_ADMIN_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Print one section as JSON (header, hero, food, drinks, ...)
    Show { section: String },

    /// Replace a section with the JSON in FILE
    Set { section: String, file: PathBuf },

    /// Restore every section to factory content
    Reset {
        /// Required; the reset cannot be undone
        #[arg(long)]
        yes: bool,
    },

    /// Encode an image file as an inline data URI
    Upload { file: PathBuf },

    /// Generate hero backgrounds from the current heading
    Generate {
        /// Adopt candidate N as the hero background
        #[arg(long, value_name = "N")]
        adopt: Option<usize>,
    },

    /// Add, edit or remove a menu item
    Menu {
        #[command(subcommand)]
        action: MenuAction,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum MenuAction {
    /// Append a placeholder item to a category
    Add { menu: String, category: usize },

    /// Change one field of an item
    Edit {
        menu: String,
        category: usize,
        id: String,
        /// name, description, price or note
        field: String,
        value: String,
    },

    /// Remove an item
    Delete { menu: String, category: usize, id: String },
}

fn fail(message: String) -> anyhow::Error {
    anyhow::anyhow!(message)
}

/// Execute one invocation and return what to print on stdout.
pub async fn execute(cli: Cli, ctx: &AppContext) -> anyhow::Result<String> {
    if let Commands::Show { section } = &cli.command {
        return commands::get_section(ctx, section).await.map_err(fail);
    }

    // Read local input before unlocking so the session is always closed below.
    let body = match &cli.command {
        Commands::Set { file, .. } => Some(
            tokio::fs::read_to_string(file)
                .await
                .with_context(|| format!("reading {}", file.display()))?,
        ),
        _ => None,
    };

    let Some(password) = cli.password.as_deref() else {
        bail!("this command needs the admin password (--password or LKC_ADMIN_PASSWORD)");
    };
    commands::login(ctx, password).map_err(fail)?;

    let output = match cli.command {
        Commands::Show { section } => commands::get_section(ctx, &section).await,
        Commands::Set { section, .. } => {
            commands::update_section(ctx, &section, body.as_deref().unwrap_or_default()).await
        }
        Commands::Reset { yes } => commands::reset_all(ctx, yes).await,
        Commands::Upload { file } => commands::upload_image_file(ctx, &file).await,
        Commands::Generate { adopt } => match (commands::generate_backgrounds(ctx).await, adopt) {
            (Ok(_), Some(n)) => commands::adopt_background(ctx, n).await,
            (report, _) => report,
        },
        Commands::Menu { action } => match action {
            MenuAction::Add { menu, category } => {
                commands::add_menu_item(ctx, &menu, category).await
            }
            MenuAction::Edit {
                menu,
                category,
                id,
                field,
                value,
            } => commands::edit_menu_item(ctx, &menu, category, &id, &field, &value).await,
            MenuAction::Delete { menu, category, id } => {
                commands::delete_menu_item(ctx, &menu, category, &id).await
            }
        },
    };

    commands::logout(ctx).map_err(fail)?;
    output.map_err(fail)
}

/// Parse arguments, load configuration and run one command.
pub async fn main_entry() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref()).context("loading configuration")?;
    crate::logging::init(&config.logging.filter);

    if matches!(cli.command, Commands::Generate { .. }) && config.generator.api_key.is_empty() {
        crate::config::validate_environment().map_err(fail)?;
    }

    let ctx = AppContext::build(config).await?;
    let output = execute(cli, &ctx).await?;
    println!("{output}");
    Ok(())
}
