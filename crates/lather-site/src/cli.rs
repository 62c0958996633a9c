use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};

use crate::app::{Page, Site};
use crate::config::SiteConfig;
use crate::error::{Result, SiteError};
use crate::logging;
use crate::recipe::RecipeEntry;
use crate::router::{AlgorithmCategory, Route};

#[derive(Debug, Parser)]
#[command(
    name = "lather",
    about = "Render and check the Lather soap-making site",
    version
)]
pub struct Cli {
    /// TOML configuration file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Render one page to HTML.
    Render(RenderArgs),

    /// Report dangling cross-links and unresolved references.
    Check,

    /// Print every page and the hashes the routed pages accept.
    Routes,
}

#[derive(Debug, Clone, Args)]
pub struct RenderArgs {
    /// Page to render.
    #[arg(value_enum)]
    pub page: Page,

    /// Location hash applied after the first render, e.g. `#algorithms/core`.
    #[arg(long)]
    pub hash: Option<String>,

    /// Output file, or a directory to write `<page>.html` into. Defaults to
    /// stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// JSON array of recipe entries to seed the recipe page with.
    #[arg(long)]
    pub recipe: Option<PathBuf>,
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    let config = SiteConfig::load(cli.config.as_deref())?;
    logging::init(&config.log)?;
    execute(cli.command, config, &mut std::io::stdout().lock())
}

pub fn run(cli: Cli) -> Result<()> {
    let config = SiteConfig::load(cli.config.as_deref())?;
    execute(cli.command, config, &mut std::io::stdout().lock())
}

/// Run `command` against `config`, writing reports to `out`.
pub fn execute<W: Write>(command: Commands, config: SiteConfig, out: &mut W) -> Result<()> {
    match command {
        Commands::Render(args) => run_render(&args, config, out),
        Commands::Check => run_check(config, out),
        Commands::Routes => print_routes(out),
    }
}

fn read_recipe(path: &Path) -> Result<Vec<RecipeEntry>> {
    let text = std::fs::read_to_string(path)?;
    serde_json::from_str(&text)
        .map_err(|error| SiteError::invalid(format!("recipe {}: {error}", path.display())))
}

fn run_render<W: Write>(args: &RenderArgs, config: SiteConfig, out: &mut W) -> Result<()> {
    if args.recipe.is_some() && args.page != Page::Recipe {
        return Err(SiteError::invalid("--recipe only applies to the recipe page"));
    }
    let recipe = args.recipe.as_deref().map(read_recipe).transpose()?;
    let site = Site::from_config(config);
    let html = site.render_page(args.page, args.hash.as_deref(), recipe);
    match &args.out {
        Some(path) => {
            let target = if path.is_dir() {
                path.join(args.page.file_name())
            } else {
                path.clone()
            };
            std::fs::write(&target, html)?;
            tracing::info!(path = %target.display(), "page written");
        }
        None => out.write_all(html.as_bytes())?,
    }
    Ok(())
}

fn run_check<W: Write>(config: SiteConfig, out: &mut W) -> Result<()> {
    let site = Site::from_config(config);
    let issues = site.check();
    for issue in &issues {
        writeln!(out, "{issue}")?;
    }
    if issues.is_empty() {
        writeln!(out, "content links ok")?;
        Ok(())
    } else {
        Err(SiteError::BrokenLinks {
            count: issues.len(),
        })
    }
}

fn print_routes<W: Write>(out: &mut W) -> Result<()> {
    for page in Page::ALL {
        writeln!(out, "{:<14} {}", page.slug(), page.file_name())?;
        if !page.is_routed() {
            continue;
        }
        let mut hashes = vec![
            Route::Landing.to_string(),
            Route::Properties { property: None }.to_hash(),
        ];
        hashes.extend(
            AlgorithmCategory::ALL
                .into_iter()
                .map(|category| Route::Algorithms { category }.to_hash()),
        );
        hashes.push(Route::Glossary { term: None }.to_hash());
        for hash in hashes {
            writeln!(out, "  {hash}")?;
        }
    }
    Ok(())
}
