//! Article catalogue scraping

use once_cell::sync::Lazy;
use reqwest::{Client, Url};
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::config::IngestConfig;
use crate::error::{Error, Result};
use crate::types::ArticleMetadata;

static MAIN: Lazy<Selector> = Lazy::new(|| Selector::parse("main").expect("valid selector"));

// Article cards of the French listing page
static CARD: Lazy<Selector> = Lazy::new(|| selector("ul#all_articles li"));
static CARD_TITLE: Lazy<Selector> = Lazy::new(|| selector("div.col-md-10 > h3 > a"));
static CARD_DESCRIPTION: Lazy<Selector> =
    Lazy::new(|| selector("div.col-md-10 > p.mrgn-tp-md"));
static CARD_DATE: Lazy<Selector> = Lazy::new(|| selector("div.col-md-10 > p.small"));
static CARD_TOPIC: Lazy<Selector> =
    Lazy::new(|| selector("div.col-md-10 > div.labelContainer > div.label-info"));
static CARD_FORMAT: Lazy<Selector> =
    Lazy::new(|| selector("div.col-md-10 > div.labelContainer > div.label-default"));
static CARD_ICON: Lazy<Selector> = Lazy::new(|| selector("div.col-md-2 > img"));

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("valid selector")
}

/// An article with the text of its `<main>` element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapedArticle {
    #[serde(flatten)]
    pub metadata: ArticleMetadata,
    pub content: String,
}

/// Downloads the article catalogue and each article page
pub struct ArticleScraper {
    client: Client,
    request_delay: Duration,
}

impl ArticleScraper {
    pub fn new(config: &IngestConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("infobase-rag/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            request_delay: Duration::from_millis(config.request_delay_ms),
        })
    }

    /// Fetch the catalogue: a JSON list of article metadata
    pub async fn fetch_catalogue(&self, url: &str) -> Result<Vec<ArticleMetadata>> {
        tracing::info!("Fetching article catalogue from {}", url);
        let articles: Vec<ArticleMetadata> = self
            .get(url)
            .await?
            .json()
            .await
            .map_err(|e| Error::scrape(url, format!("Invalid catalogue: {}", e)))?;

        tracing::info!("Catalogue lists {} articles", articles.len());
        Ok(articles)
    }

    /// Fetch the French listing page and read its article cards
    pub async fn fetch_listing(&self, url: &str) -> Result<Vec<ArticleMetadata>> {
        tracing::info!("Fetching article listing from {}", url);
        let html = self
            .get(url)
            .await?
            .text()
            .await
            .map_err(|e| Error::scrape(url, e.to_string()))?;

        let articles = listing_articles(&html, url);
        if articles.is_empty() {
            return Err(Error::scrape(url, "No article cards in listing page"));
        }
        tracing::info!("Listing shows {} articles", articles.len());
        Ok(articles)
    }

    /// Scrape every article of the JSON catalogue
    pub async fn scrape(&self, catalogue_url: &str) -> Result<Vec<ScrapedArticle>> {
        let catalogue = self.fetch_catalogue(catalogue_url).await?;
        Ok(self.scrape_articles(catalogue).await)
    }

    /// Scrape every article of the French listing page
    pub async fn scrape_listing(&self, listing_url: &str) -> Result<Vec<ScrapedArticle>> {
        let catalogue = self.fetch_listing(listing_url).await?;
        Ok(self.scrape_articles(catalogue).await)
    }

    /// Download each article. Pages that fail to download or have no
    /// `<main>` element are skipped.
    async fn scrape_articles(&self, catalogue: Vec<ArticleMetadata>) -> Vec<ScrapedArticle> {
        let total = catalogue.len();
        let mut scraped = Vec::with_capacity(total);

        for (i, metadata) in catalogue.into_iter().enumerate() {
            match self.scrape_article(&metadata.link).await {
                Ok(Some(content)) => {
                    tracing::debug!("[{}/{}] {}", i + 1, total, metadata.title);
                    scraped.push(ScrapedArticle { metadata, content });
                }
                Ok(None) => tracing::warn!("No <main> element in {}, skipping", metadata.link),
                Err(e) => tracing::warn!("{}", e),
            }

            if i + 1 < total {
                tokio::time::sleep(self.request_delay).await;
            }
        }

        tracing::info!("Scraped {} of {} articles", scraped.len(), total);
        scraped
    }

    async fn scrape_article(&self, url: &str) -> Result<Option<String>> {
        let html = self
            .get(url)
            .await?
            .text()
            .await
            .map_err(|e| Error::scrape(url, e.to_string()))?;
        Ok(main_text(&html))
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::scrape(url, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::scrape(url, format!("HTTP {}", status)));
        }
        Ok(response)
    }
}

/// Text of the first `<main>` element, trimmed with whitespace runs
/// collapsed to single spaces
pub fn main_text(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let main = document.select(&MAIN).next()?;
    Some(collapse(&main.text().collect::<String>()))
}

/// Article metadata from the cards of a listing page.
///
/// Relative links and icons resolve against `base_url`. Cards without a
/// titled link are skipped. Topic and format labels are joined with `", "`,
/// the date is the last word of the date line and `org` is always `PHAC`.
pub fn listing_articles(html: &str, base_url: &str) -> Vec<ArticleMetadata> {
    let document = Html::parse_document(html);
    let base = Url::parse(base_url).ok();

    document
        .select(&CARD)
        .filter_map(|card| {
            let anchor = card.select(&CARD_TITLE).next()?;
            let title = collapse(&anchor.text().collect::<String>());
            let href = anchor.value().attr("href")?;
            if title.is_empty() {
                return None;
            }

            let link = base
                .as_ref()
                .and_then(|base| base.join(href).ok())
                .map(String::from)
                .unwrap_or_else(|| href.to_string());
            let description = first_text(&card, &CARD_DESCRIPTION);
            let date = first_text(&card, &CARD_DATE)
                .rsplit(' ')
                .next()
                .unwrap_or_default()
                .to_string();

            let mut article = ArticleMetadata::new(title, link, description, date);
            article
                .extra
                .insert("topic".into(), labels(&card, &CARD_TOPIC).into());
            article
                .extra
                .insert("format".into(), labels(&card, &CARD_FORMAT).into());
            if let Some(icon) = card
                .select(&CARD_ICON)
                .next()
                .and_then(|img| img.value().attr("src"))
                .and_then(|src| src.rsplit('/').next())
            {
                article.extra.insert("icon".into(), icon.into());
            }
            article.extra.insert("org".into(), "PHAC".into());
            Some(article)
        })
        .collect()
}

fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn first_text(card: &ElementRef<'_>, selector: &Selector) -> String {
    card.select(selector)
        .next()
        .map(|el| collapse(&el.text().collect::<String>()))
        .unwrap_or_default()
}

fn labels(card: &ElementRef<'_>, selector: &Selector) -> String {
    card.select(selector)
        .map(|el| collapse(&el.text().collect::<String>()))
        .filter(|label| !label.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Write scraped articles as pretty JSON, creating parent directories
pub fn save_articles(path: &Path, articles: &[ScrapedArticle]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, serde_json::to_string_pretty(articles)?)?;
    tracing::info!("Wrote {} articles to {}", articles.len(), path.display());
    Ok(())
}

/// Read articles written by [`save_articles`]
pub fn load_articles(path: &Path) -> Result<Vec<ScrapedArticle>> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}
