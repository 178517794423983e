//! formkit CLI — check values and render forms from a config file.
//!
//! Commands:
//! - `check` — run one value through a field's widget and report the outcome
//! - `render` — print the mounted form as HTML
//! - `widgets` — list the registered widget type tags

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use formkit_core::{
    ChangeOutcome, Form, FormConfig, FormSurface, MemorySurface, NodeId, WidgetRegistry,
};

#[derive(Parser)]
#[command(name = "formkit", about = "formkit CLI — schema-driven form fields")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a value for one field, as if typed into its text input.
    Check {
        /// Path to a TOML or JSON form config.
        #[arg(long)]
        config: PathBuf,

        /// Field name.
        #[arg(long)]
        field: String,

        /// Raw text to check. May be empty.
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
    /// Print the form as HTML.
    Render {
        /// Path to a TOML or JSON form config.
        #[arg(long)]
        config: PathBuf,

        /// Validate every field first so errors appear in the output.
        #[arg(long, default_value_t = false)]
        validate: bool,

        /// Render sliders as text inputs.
        #[arg(long, default_value_t = false)]
        no_range: bool,
    },
    /// List registered widget type tags.
    Widgets,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let registry = WidgetRegistry::with_defaults();

    match cli.command {
        Commands::Check {
            config,
            field,
            value,
        } => {
            let config = load(&config)?;
            match check(&config, &registry, &field, &value)? {
                ChangeOutcome::Committed(v) => println!("ok {v}"),
                ChangeOutcome::Cleared => println!("ok (empty)"),
                ChangeOutcome::Rejected(message) => bail!("{message}"),
                ChangeOutcome::Ignored => bail!("field '{field}' ignored the change"),
            }
        }
        Commands::Render {
            config,
            validate,
            no_range,
        } => {
            let config = load(&config)?;
            println!("{}", render(&config, &registry, validate, no_range)?);
        }
        Commands::Widgets => {
            for tag in registry.types() {
                println!("{tag}");
            }
        }
    }

    Ok(())
}

fn load(path: &Path) -> Result<FormConfig> {
    FormConfig::load(path).with_context(|| format!("loading {}", path.display()))
}

fn mount(
    config: &FormConfig,
    registry: &WidgetRegistry,
    surface: &mut MemorySurface,
) -> Result<Form> {
    let mut form = Form::build(config, registry)?;
    let root = surface.root();
    form.mount(surface, root)?;
    Ok(form)
}

/// The text input of a mounted field: the last text control in its item.
fn text_input(form: &Form, surface: &MemorySurface, field: &str) -> Result<NodeId> {
    let Some(widget) = form.widget(field) else {
        let known: Vec<&str> = form.field_names().collect();
        bail!("no field named '{field}' (fields: {})", known.join(", "));
    };
    let item = widget
        .item()
        .with_context(|| format!("field '{field}' was not rendered"))?;
    surface
        .descendants(item)
        .into_iter()
        .filter(|n| surface.control_type(*n).as_deref() == Some("text"))
        .last()
        .with_context(|| format!("field '{field}' has no text input"))
}

fn check(
    config: &FormConfig,
    registry: &WidgetRegistry,
    field: &str,
    value: &str,
) -> Result<ChangeOutcome> {
    let mut surface = MemorySurface::new();
    let mut form = mount(config, registry, &mut surface)?;
    let input = text_input(&form, &surface, field)?;

    surface.input(input, value)?;
    let dispatched = form.dispatch(&mut surface)?;
    debug!(?dispatched, "check complete");
    Ok(dispatched
        .into_iter()
        .find(|d| d.field == field)
        .map(|d| d.outcome)
        .unwrap_or(ChangeOutcome::Ignored))
}

fn render(
    config: &FormConfig,
    registry: &WidgetRegistry,
    validate: bool,
    no_range: bool,
) -> Result<String> {
    let mut surface = if no_range {
        MemorySurface::without_range_support()
    } else {
        MemorySurface::new()
    };
    let mut form = mount(config, registry, &mut surface)?;
    if validate {
        let invalid = form.validate_all(&mut surface)?;
        debug!(?invalid, "validated form");
    }
    let root = surface
        .snapshot(surface.root())
        .context("surface has no root")?;
    Ok(root.to_html())
}
