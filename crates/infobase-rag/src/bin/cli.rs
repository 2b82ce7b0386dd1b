//! Command-line tools: ad-hoc search, article scraping and index building
//!
//! Run with: cargo run -p infobase-rag --bin infobase-rag -- <command>

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use console::style;
use std::path::PathBuf;
use std::sync::Arc;

use infobase_rag::{
    config::RagConfig,
    ingestion::{load_articles, save_articles, ArticleScraper, IndexBuilder},
    logging,
    providers::{LocalVectorStore, VoyageEmbedder},
    retrieval::find_extracts,
    types::Lang,
};

#[derive(Parser)]
#[command(name = "infobase-rag")]
#[command(about = "Health Infobase retrieval tools", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML configuration file
    #[arg(short, long, global = true, env = "INFOBASE_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the extracts most similar to a query
    Search {
        /// Question to look up
        query: String,

        /// Number of extracts to print
        #[arg(short = 'r', long, default_value = "4")]
        results: usize,

        /// Index language (en or fr)
        #[arg(long, default_value = "en")]
        lang: String,
    },

    /// Download the article catalogue and every article's main text
    Scrape {
        /// Catalogue URL (defaults to ingest.catalogue_url)
        #[arg(long)]
        catalogue: Option<String>,

        /// Read the catalogue from the French listing page instead
        /// (URL defaults to ingest.listing_url)
        #[arg(long, num_args = 0..=1, conflicts_with = "catalogue")]
        listing: Option<Option<String>>,

        /// Output JSON file (defaults to ingest.articles_path)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Embed scraped articles into a vector index
    BuildIndex {
        /// Scraped articles JSON (defaults to ingest.articles_path)
        #[arg(long)]
        articles: Option<PathBuf>,

        /// Output directory (defaults to ingest.output_dir)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = RagConfig::load(cli.config.as_deref())?;
    logging::init(&config.logging);

    match cli.command {
        Commands::Search {
            query,
            results,
            lang,
        } => search(&config, &query, results, Lang::from_param(Some(&lang))).await,
        Commands::Scrape {
            catalogue,
            listing,
            out,
        } => scrape(&config, catalogue, listing, out).await,
        Commands::BuildIndex { articles, out } => build_index(&config, articles, out).await,
    }
}

async fn search(config: &RagConfig, query: &str, results: usize, lang: Lang) -> Result<()> {
    if config.embeddings.api_key.is_empty() {
        bail!("VOYAGE_API_KEY is not set");
    }

    let embedder = VoyageEmbedder::new(&config.embeddings)?;
    let index_path = config.index.path_for(lang);
    let store = LocalVectorStore::load(index_path)
        .with_context(|| format!("Failed to open index {}", index_path.display()))?;

    let hits = find_extracts(query, &embedder, &store, results).await?;
    if hits.is_empty() {
        println!("{}", style("No extracts found").yellow());
        return Ok(());
    }

    for (rank, hit) in hits.iter().enumerate() {
        let meta = &hit.extract.metadata;
        println!(
            "{} {} {}",
            style(format!("#{}", rank + 1)).bold(),
            style(&meta.title).cyan().bold(),
            style(format!("({:.3})", hit.similarity)).dim()
        );
        println!("   {} {}", style(&meta.date).dim(), style(&meta.link).underlined());
        println!("   {}\n", preview(&hit.extract.page_content, 300));
    }
    Ok(())
}

async fn scrape(
    config: &RagConfig,
    catalogue: Option<String>,
    listing: Option<Option<String>>,
    out: Option<PathBuf>,
) -> Result<()> {
    let out = out.unwrap_or_else(|| config.ingest.articles_path.clone());
    let scraper = ArticleScraper::new(&config.ingest)?;

    let articles = match listing {
        Some(url) => {
            let url = url.unwrap_or_else(|| config.ingest.listing_url.clone());
            scraper.scrape_listing(&url).await?
        }
        None => {
            let catalogue = catalogue.unwrap_or_else(|| config.ingest.catalogue_url.clone());
            scraper.scrape(&catalogue).await?
        }
    };
    save_articles(&out, &articles)?;

    println!(
        "{} {} articles saved to {}",
        style("✓").green(),
        articles.len(),
        out.display()
    );
    Ok(())
}

async fn build_index(
    config: &RagConfig,
    articles: Option<PathBuf>,
    out: Option<PathBuf>,
) -> Result<()> {
    if config.embeddings.api_key.is_empty() {
        bail!("VOYAGE_API_KEY is not set");
    }

    let articles_path = articles.unwrap_or_else(|| config.ingest.articles_path.clone());
    let articles = load_articles(&articles_path)
        .with_context(|| format!("Failed to read {}", articles_path.display()))?;

    let embedder = Arc::new(VoyageEmbedder::new(&config.embeddings)?);
    let mut builder = IndexBuilder::new(embedder, &config.ingest, &config.embeddings);
    if let Some(dir) = out {
        builder = builder.output_dir(dir);
    }

    let report = builder.build(&articles).await?;
    println!(
        "{} {} extracts in {} batches, merged into {}",
        style("✓").green(),
        report.extracts,
        report.partials.len(),
        report.merged.display()
    );
    Ok(())
}

/// First `max` characters of `text`, with an ellipsis when cut
fn preview(text: &str, max: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max).collect();
    if chars.next().is_some() {
        format!("{}…", head)
    } else {
        head
    }
}
