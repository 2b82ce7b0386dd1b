//! Offline pipeline: scrape Infobase articles, split them into extracts and
//! build the vector index served by the API

mod builder;
mod scraper;
mod splitter;

pub use builder::{merge_partials, BuildReport, IndexBuilder, MERGED_DIR};
pub use self::scraper::{
    listing_articles, load_articles, main_text, save_articles, ArticleScraper, ScrapedArticle,
};
pub use splitter::TextSplitter;
