//! CLI entry point: renders the blog's pages from the content API.

mod render;

use anyhow::{bail, Result};
use blog_core::pages::{load_blog_index, load_category, load_home, load_post, load_static_paths};
use blog_core::{ContentApi, ContentConfig};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "blog")]
#[command(version)]
#[command(about = "Browse a CMS-backed blog from the terminal", long_about = None)]
struct Cli {
    /// CMS origin (defaults to $STRAPI_API_URL, then http://localhost:1337)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Print view models as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Featured posts, recent posts and categories
    Home,

    /// One page of the post index
    #[command(alias = "ls")]
    List {
        /// Page number (1-based)
        #[arg(short, long)]
        page: Option<String>,

        /// Only posts in this category slug
        #[arg(short, long)]
        category: Option<String>,

        /// Match title, excerpt or body; wins over --category
        #[arg(short, long)]
        search: Option<String>,
    },

    /// A single post
    Show {
        /// Post slug
        slug: String,
    },

    /// A category and its posts
    Category {
        /// Category slug
        slug: String,

        /// Page number (1-based)
        #[arg(short, long)]
        page: Option<String>,
    },

    /// All categories
    Categories,

    /// All tags
    Tags,

    /// Post slugs for static generation
    Paths,
}

fn emit<T: Serialize>(json: bool, value: &T, text: impl FnOnce(&T) -> String) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        print!("{}", text(value));
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.debug {
        "blog_core=debug,blog=debug,info"
    } else {
        "warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match cli.base_url.as_deref() {
        Some(url) => ContentConfig::new(url),
        None => ContentConfig::from_env(),
    };
    tracing::debug!("Using content API at {}", config.api_root());
    let api = ContentApi::new(config);

    match cli.command {
        Commands::Home => {
            let page = load_home(&api).await;
            emit(cli.json, &page, render::home)?;
        }

        Commands::List {
            page,
            category,
            search,
        } => {
            let index =
                load_blog_index(&api, page.as_deref(), category.as_deref(), search.as_deref()).await;
            emit(cli.json, &index, render::index)?;
        }

        Commands::Show { slug } => match load_post(&api, &slug).await {
            Some(article) => emit(cli.json, &article, render::post)?,
            None => bail!("post not found: {slug}"),
        },

        Commands::Category { slug, page } => {
            let page = load_category(&api, &slug, page.as_deref()).await;
            if page.category.is_none() {
                bail!("category not found: {slug}");
            }
            emit(cli.json, &page, render::category)?;
        }

        Commands::Categories => {
            let categories = api.get_categories().await?;
            emit(cli.json, &categories, |c| render::categories(c))?;
        }

        Commands::Tags => {
            let tags = api.get_tags().await?;
            emit(cli.json, &tags, |t| render::tags(t))?;
        }

        Commands::Paths => {
            let slugs = load_static_paths(&api).await;
            emit(cli.json, &slugs, |s| render::paths(s))?;
        }
    }

    Ok(())
}
