//! Wire types for the ForeignEye API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Success envelope wrapping every payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default = "default_success")]
    pub success: bool,
    pub data: T,
    #[serde(default)]
    pub message: Option<String>,
}

const fn default_success() -> bool {
    true
}

/// Parse an API timestamp (`2025-11-11T12:34:56.123456Z`)
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|parsed| parsed.with_timezone(&Utc))
}

// Auth

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

/// Tokens and profile returned by login and registration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: User,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub access_token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct UserEnvelope {
    pub user: User,
}

/// Authenticated user profile; held in memory only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "user_id", alias = "id")]
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<UserStats>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStats {
    #[serde(default)]
    pub total_concepts: u64,
    #[serde(default)]
    pub total_articles: u64,
}

// Articles

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArticleSort {
    #[default]
    CreatedAt,
    Title,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionSort {
    #[default]
    CollectedAt,
    Name,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl ArticleSort {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::Title => "title",
        }
    }
}

impl CollectionSort {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CollectedAt => "collected_at",
            Self::Name => "name",
        }
    }
}

impl SortOrder {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl fmt::Display for ArticleSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for CollectionSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Query for `GET /articles`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArticleQuery {
    pub page: u32,
    pub limit: u32,
    pub sort: ArticleSort,
    pub order: SortOrder,
}

impl Default for ArticleQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 10,
            sort: ArticleSort::CreatedAt,
            order: SortOrder::Desc,
        }
    }
}

impl ArticleQuery {
    /// Same query for another page
    #[must_use]
    pub const fn with_page(self, page: u32) -> Self {
        Self { page, ..self }
    }
}

/// Query for `GET /collections/concepts`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectionQuery {
    pub sort: Option<CollectionSort>,
    pub order: Option<SortOrder>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewConcept {
    pub concept_id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub article_id: i64,
    pub title: String,
    #[serde(default)]
    pub title_ko: Option<String>,
    pub original_url: String,
    #[serde(default)]
    pub summary_ko: String,
    pub created_at: String,
    #[serde(default)]
    pub concept_count: Option<u32>,
    #[serde(default)]
    pub preview_concepts: Option<Vec<PreviewConcept>>,
}

impl Article {
    /// Localized title when available
    pub fn display_title(&self) -> &str {
        self.title_ko
            .as_deref()
            .filter(|title| !title.is_empty())
            .unwrap_or(&self.title)
    }

    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.created_at)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_items: u64,
    pub items_per_page: u32,
    pub has_next: bool,
    pub has_prev: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticlesPage {
    pub items: Vec<Article>,
    pub pagination: Pagination,
}

/// Concept node in an article's knowledge graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptNode {
    pub id: i64,
    pub label: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub real_world_examples: Vec<String>,
    #[serde(default)]
    pub is_collected: bool,
    #[serde(default)]
    pub is_primary: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub from: i64,
    pub to: i64,
    pub strength: f64,
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeGraph {
    #[serde(default)]
    pub nodes: Vec<ConceptNode>,
    #[serde(default)]
    pub edges: Vec<GraphEdge>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleDetail {
    #[serde(flatten)]
    pub article: Article,
    #[serde(default)]
    pub graph: KnowledgeGraph,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ArticleEnvelope {
    pub article: ArticleDetail,
}

// Concepts and collections

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Concept {
    pub concept_id: i64,
    pub name: String,
    #[serde(default)]
    pub description_ko: Option<String>,
    #[serde(default)]
    pub real_world_examples_ko: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_collected: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collected_at: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct CollectConceptRequest {
    pub concept_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionRecord {
    pub user_id: i64,
    pub concept_id: i64,
    pub collected_at: String,
}

/// Strongly related concept already in the user's collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewConnection {
    pub concept_id: i64,
    pub name: String,
    pub strength: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectConceptResponse {
    pub collection: CollectionRecord,
    pub concept_name: String,
    #[serde(default)]
    pub new_connections: Vec<NewConnection>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserCollection {
    pub concepts: Vec<Concept>,
    pub total_concepts: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelatedArticle {
    pub article_id: i64,
    #[serde(default)]
    pub title_ko: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelatedConcept {
    pub concept_id: i64,
    pub name: String,
    #[serde(default)]
    pub strength: Option<f64>,
    #[serde(default)]
    pub relation_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptDetail {
    #[serde(flatten)]
    pub concept: Concept,
    #[serde(default)]
    pub related_articles: Vec<RelatedArticle>,
    #[serde(default)]
    pub related_concepts: Vec<RelatedConcept>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ConceptEnvelope {
    pub concept: ConceptDetail,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptSearchResults {
    pub results: Vec<Concept>,
    pub total_results: u64,
    #[serde(default)]
    pub query: String,
}

/// Articles mentioning one concept (`concept`) or all of several (`concepts`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleSearchResults {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concept: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concepts: Option<Vec<String>>,
    pub total_results: u64,
    pub articles: Vec<Article>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MostConnectedConcept {
    pub concept_id: i64,
    pub name: String,
    pub connection_count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeMapStats {
    #[serde(default)]
    pub total_concepts: u64,
    #[serde(default)]
    pub total_connections: u64,
    #[serde(default)]
    pub strong_connections: u64,
    #[serde(default)]
    pub most_connected: Option<MostConnectedConcept>,
}

/// The user's collected concepts and the relations among them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeMap {
    #[serde(default)]
    pub graph: KnowledgeGraph,
    #[serde(default)]
    pub stats: KnowledgeMapStats,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_accepts_user_id_field() {
        let user: User = serde_json::from_value(json!({
            "user_id": 7,
            "username": "alice",
            "email": "alice@example.com",
            "stats": {"total_concepts": 3}
        }))
        .unwrap();

        assert_eq!(user.id, 7);
        assert_eq!(user.stats.unwrap().total_articles, 0);
    }

    #[test]
    fn test_article_detail_without_graph() {
        let detail: ArticleDetail = serde_json::from_value(json!({
            "article_id": 1,
            "title": "Attention",
            "title_ko": null,
            "original_url": "https://example.com/a",
            "summary_ko": "요약",
            "created_at": "2025-11-11T12:34:56.123456Z"
        }))
        .unwrap();

        assert!(detail.graph.nodes.is_empty());
        assert_eq!(detail.article.display_title(), "Attention");
        assert!(detail.article.created_at_utc().is_some());
    }

    #[test]
    fn test_sort_wire_names() {
        assert_eq!(ArticleSort::CreatedAt.as_str(), "created_at");
        assert_eq!(CollectionSort::CollectedAt.to_string(), "collected_at");
        assert_eq!(serde_json::to_value(SortOrder::Asc).unwrap(), json!("asc"));
    }
}
