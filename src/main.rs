use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use themes_site::classify::TypePrecedence;
use themes_site::config::{SiteConfig, DEFAULT_CONFIG_FILE};
use themes_site::filter::{self, FilterState, ALL};
use themes_site::types::ThemeType;
use themes_site::{catalog, generate, options};

#[derive(Parser)]
#[command(name = "themes-site")]
#[command(about = "Static catalog site generator for mobile phone themes")]
struct Cli {
    /// Site configuration file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Which of author/carrier decides the theme type when both are set
    #[arg(long, global = true, value_enum)]
    type_precedence: Option<TypePrecedence>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the home page, one page per theme and the client script
    Generate {
        /// Theme catalog JSON
        #[arg(short, long)]
        catalog: Option<PathBuf>,
        /// Model name to image JSON for the model picker
        #[arg(long)]
        model_images: Option<PathBuf>,
        /// Site root directory
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Detail page directory, relative to the site root
        #[arg(long)]
        pages_dir: Option<String>,
    },
    /// Print the distinct models, platforms and resolutions in a catalog
    Options {
        /// Theme catalog JSON
        #[arg(short, long)]
        catalog: Option<PathBuf>,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Filter a catalog the way the home page does
    Search {
        /// Catalog path or http(s) URL (defaults to the configured catalog)
        #[arg(value_name = "PATH_OR_URL")]
        location: Option<String>,
        /// Free-text search
        #[arg(short, long, default_value = "")]
        query: String,
        #[arg(long, default_value = ALL)]
        model: String,
        #[arg(long, default_value = ALL)]
        platform: String,
        #[arg(long, default_value = ALL)]
        resolution: String,
        /// all, user, carrier or preloaded
        #[arg(long = "type", default_value = ALL)]
        theme_type: String,
        /// Print the rendered card list instead of ids
        #[arg(long)]
        html: bool,
    },
}

fn run_options(catalog: PathBuf, json: bool) -> Result<()> {
    let themes = catalog::load_catalog(&catalog)?;
    let options = options::extract_filter_options(&themes);

    if json {
        println!("{}", serde_json::to_string_pretty(&options)?);
        return Ok(());
    }

    for (label, values) in [
        ("Models", &options.models),
        ("Platforms", &options.platforms),
        ("Resolutions", &options.resolutions),
    ] {
        println!("{} ({}):", label, values.len());
        for value in values {
            println!("  {}", value);
        }
    }
    Ok(())
}

fn run_search(config: &SiteConfig, location: &str, state: &FilterState, html: bool) -> Result<()> {
    let themes = match catalog::load_catalog_from(location) {
        Ok(themes) => themes,
        Err(e) => {
            eprintln!("⚠️ {}", e);
            if html {
                println!("{}", filter::render_load_failure());
            }
            return Err(e.into());
        }
    };

    if html {
        println!(
            "{}",
            filter::render_theme_list(&themes, state, &config.pages_dir, config.type_precedence)
        );
        return Ok(());
    }

    let visible = filter::apply_filters(&themes, state, config.type_precedence);
    if visible.is_empty() {
        println!("No themes match your search/filters.");
        return Ok(());
    }
    for theme in &visible {
        println!("{}\t{}", theme.id, theme.name);
    }
    println!("{} of {} themes", visible.len(), themes.len());
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let mut config = SiteConfig::load(&cli.config)?;
    if let Some(precedence) = cli.type_precedence {
        config.type_precedence = precedence;
    }

    match cli.command {
        Commands::Generate {
            catalog,
            model_images,
            output,
            pages_dir,
        } => {
            if let Some(catalog) = catalog {
                config.catalog = catalog;
            }
            if model_images.is_some() {
                config.model_images = model_images;
            }
            if let Some(output) = output {
                config.output_dir = output;
            }
            if let Some(pages_dir) = pages_dir {
                config.pages_dir = pages_dir;
            }
            generate::run_generate(&config)
        }
        Commands::Options { catalog, json } => {
            run_options(catalog.unwrap_or_else(|| config.catalog.clone()), json)
        }
        Commands::Search {
            location,
            query,
            model,
            platform,
            resolution,
            theme_type,
            html,
        } => {
            if theme_type != ALL && ThemeType::from_str(&theme_type).is_none() {
                bail!("Unknown theme type '{}', expected all, user, carrier or preloaded", theme_type);
            }
            let location =
                location.unwrap_or_else(|| config.catalog.to_string_lossy().to_string());
            let state = FilterState {
                search: query,
                model,
                platform,
                resolution,
                theme_type,
            };
            run_search(&config, &location, &state, html)
        }
    }
}
