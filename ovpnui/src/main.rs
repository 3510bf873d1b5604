//! OpenVPN UI - command-line editor for OpenVPN client configurations
//!
//! Every editing command loads the file into a `ConfigModel`, applies one
//! `DirectiveChange`, and writes the result back.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use ovpnui_config::catalog::{self, DirectiveKind};
use ovpnui_config::{
    BlockTag, ConfigModel, ConfigSource, DirectiveChange, FileSink, FileSource, LineKind,
    MaterialFile, SaveError, FLAG_DIRECTIVES, VALUE_DIRECTIVES,
};
use ovpnui_core::{Settings, SettingsLoader};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// OpenVPN UI - edit OpenVPN client configuration files
#[derive(Parser)]
#[command(name = "ovpnui")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Settings file (TOML or JSON)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Save even when ca, cert or key material is missing
    #[arg(short = 'y', long, global = true)]
    yes: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a blank configuration
    New {
        /// Path to the configuration
        config: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Create the default client configuration
    Default {
        /// Path to the configuration
        config: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the configuration as it would be saved
    Show {
        /// Path to the configuration
        config: PathBuf,
    },

    /// Summarize active directives and inline blocks
    Status {
        /// Path to the configuration
        config: PathBuf,
    },

    /// Print the value of a directive
    Get {
        /// Path to the configuration
        config: PathBuf,

        /// Directive name
        name: String,
    },

    /// Set a value directive
    Set {
        /// Path to the configuration
        config: PathBuf,

        /// Directive name
        name: String,

        /// Directive value
        #[arg(required = true, num_args = 1..)]
        value: Vec<String>,
    },

    /// Remove a directive
    Unset {
        /// Path to the configuration
        config: PathBuf,

        /// Directive name
        name: String,
    },

    /// Enable a flag directive
    Enable {
        /// Path to the configuration
        config: PathBuf,

        /// Directive name
        name: String,
    },

    /// Embed certificate or key material as an inline block
    Embed {
        /// Path to the configuration
        config: PathBuf,

        /// Block tag: ca, cert or key
        tag: BlockTag,

        /// File holding the material
        file: PathBuf,
    },

    /// Remove an inline block
    Strip {
        /// Path to the configuration
        config: PathBuf,

        /// Block tag: ca, cert or key
        tag: BlockTag,
    },

    /// Show how each line is understood
    Outline {
        /// Path to the configuration
        config: PathBuf,
    },

    /// List the recognized directives
    Catalog,

    /// Show version information
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing; stdout is reserved for command output
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    let settings = SettingsLoader::load_or_default(cli.settings.as_deref())?;
    let yes = cli.yes;

    match cli.command {
        Commands::New { config, force } => {
            let config = with_extension(config, &settings);
            let mut model = ConfigModel::with_header(settings.header.clone());
            model.apply(DirectiveChange::Clear);
            create(&model, &config, force, &settings, yes)?;
            println!("✅ Created blank configuration {}", config.display());
        }

        Commands::Default { config, force } => {
            let config = with_extension(config, &settings);
            let mut model = ConfigModel::with_header(settings.header.clone());
            model.apply(DirectiveChange::Default);
            // The template is not indexed until it is re-scanned
            model.apply(DirectiveChange::Reparse);
            create(&model, &config, force, &settings, yes)?;
            println!("✅ Created default configuration {}", config.display());
        }

        Commands::Show { config } => {
            let model = open(&config, &settings)?;
            print!("{}", model.serialize());
        }

        Commands::Status { config } => {
            let model = open(&config, &settings)?;
            let index = model.index();
            for (name, value) in index.values() {
                println!("{:<14} {}", name, value);
            }
            for name in index.flags() {
                println!("{}", name);
            }
            for tag in BlockTag::ALL {
                let state = if model.is_tag_active(tag) { "present" } else { "missing" };
                println!("<{}> {}", tag, state);
            }
        }

        Commands::Get { config, name } => {
            let model = open(&config, &settings)?;
            if let Some(value) = model.value(&name) {
                println!("{}", value);
            } else if model.is_active(&name) {
                println!("{}", name);
            } else {
                bail!("Directive '{}' is not set in {}", name, config.display());
            }
        }

        Commands::Set { config, name, value } => {
            edit(&config, &settings, yes, DirectiveChange::Set {
                name,
                value: value.join(" "),
            })?;
        }

        Commands::Unset { config, name } => {
            // A trailing space keeps `remote` from matching `remote-random`
            let key = match catalog::kind_of(&name) {
                Some(DirectiveKind::Value) => format!("{} ", name),
                _ => name,
            };
            edit(&config, &settings, yes, DirectiveChange::Remove(key))?;
        }

        Commands::Enable { config, name } => {
            edit(&config, &settings, yes, DirectiveChange::Enable(name))?;
        }

        Commands::Embed { config, tag, file } => {
            let mut model = open(&config, &settings)?;
            let revision = model.revision();
            if !model.embed_from(tag, &mut MaterialFile::new(&file)) {
                bail!("Cannot read {} material from {}", tag, file.display());
            }
            if model.revision() == revision {
                println!("Nothing to change in {}", config.display());
                return Ok(());
            }
            save(&model, &config, &settings, yes)?;
            println!("✅ Updated {}", config.display());
        }

        Commands::Strip { config, tag } => {
            edit(&config, &settings, yes, DirectiveChange::Strip(tag))?;
        }

        Commands::Outline { config } => {
            let text = FileSource::new(&config)
                .obtain()
                .with_context(|| format!("Cannot read {}", config.display()))?;
            for line in ovpnui_config::outline(&text) {
                println!("{:>4}  {:<13} {}", line.number, kind_label(&line.kind), line.text);
            }
        }

        Commands::Catalog => {
            println!("Value directives:");
            for (name, default) in VALUE_DIRECTIVES {
                println!("  {:<14} {}", name, default);
            }
            println!("Flag directives:");
            for name in FLAG_DIRECTIVES {
                println!("  {}", name);
            }
        }

        Commands::Version => {
            println!("OpenVPN UI v{}", ovpnui_core::VERSION);
        }
    }

    Ok(())
}

/// Load an existing configuration
fn open(config: &Path, settings: &Settings) -> anyhow::Result<ConfigModel> {
    let mut model = ConfigModel::with_header(settings.header.clone());
    if !model.load_from(&mut FileSource::new(config)) {
        bail!("Cannot read configuration {}", config.display());
    }
    Ok(model)
}

/// Load, apply one change, and save back
fn edit(config: &Path, settings: &Settings, yes: bool, change: DirectiveChange) -> anyhow::Result<()> {
    let mut model = open(config, settings)?;
    let revision = model.revision();
    model.apply(change);

    if model.revision() == revision {
        println!("Nothing to change in {}", config.display());
        return Ok(());
    }

    save(&model, config, settings, yes)?;
    println!("✅ Updated {}", config.display());
    Ok(())
}

fn create(model: &ConfigModel, config: &Path, force: bool, settings: &Settings, yes: bool) -> anyhow::Result<()> {
    if config.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", config.display());
    }
    save(model, config, settings, yes)
}

fn save(model: &ConfigModel, config: &Path, settings: &Settings, yes: bool) -> anyhow::Result<()> {
    let confirm = |missing: &[BlockTag]| {
        !settings.save.confirm_missing_material || yes || ask_missing_material(missing)
    };

    match model.save_to(&mut FileSink::new(config), confirm) {
        Ok(()) => Ok(()),
        Err(SaveError::Declined { missing }) => {
            let names: Vec<_> = missing.iter().map(|t| t.name()).collect();
            bail!(
                "Not saved: missing {} material (use --yes to save anyway)",
                names.join(", ")
            )
        }
        Err(e) => Err(e).with_context(|| format!("Cannot write {}", config.display())),
    }
}

/// Interactive confirmation; a non-interactive stdin always declines
fn ask_missing_material(missing: &[BlockTag]) -> bool {
    let stdin = std::io::stdin();
    if !stdin.is_terminal() {
        return false;
    }

    let names: Vec<_> = missing.iter().map(|t| t.name()).collect();
    eprint!(
        "⚠️ At least one of the required certificates is missing ({}). \
         The configuration might not work. Continue? [y/N] ",
        names.join(", ")
    );

    let mut answer = String::new();
    if stdin.read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim(), "y" | "Y" | "yes")
}

fn with_extension(config: PathBuf, settings: &Settings) -> PathBuf {
    if config.extension().is_some() {
        config
    } else {
        config.with_extension(&settings.save.extension)
    }
}

fn kind_label(kind: &LineKind) -> String {
    match kind {
        LineKind::Value { .. } => "value".to_string(),
        LineKind::Flag { .. } => "flag".to_string(),
        LineKind::Block { tag } => format!("block <{}>", tag),
        LineKind::Comment => "comment".to_string(),
        LineKind::Unrecognized { .. } => "unrecognized".to_string(),
    }
}
