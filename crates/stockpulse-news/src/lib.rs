//! News search and article content collaborators.

pub mod article;
pub mod error;
pub mod naver;
mod rate_limit;
pub mod text;
pub mod types;

pub use article::{extract_article, Article, ArticleFetcher, MIN_CONTENT_CHARS};
pub use error::{FetchError, NewsError};
pub use naver::NaverNewsClient;
pub use types::{normalize_item, CollectedArticle, SearchItem, SearchResponse};
