//! Article API client methods

use super::{ApiClient, ClientError};
use crate::request::ApiRequest;
use crate::types::{ArticleDetail, ArticleEnvelope, ArticleQuery, ArticlesPage};
use crate::validation::{validate_id, validate_pagination};

impl ApiClient {
    /// List one page of articles
    pub async fn list_articles(&self, query: &ArticleQuery) -> Result<ArticlesPage, ClientError> {
        validate_pagination(query.page, query.limit)?;

        let request = ApiRequest::get("/articles")
            .query("page", query.page)
            .query("limit", query.limit)
            .query("sort", query.sort)
            .query("order", query.order);
        self.gateway.execute(&request).await
    }

    /// Get an article with its concept graph
    pub async fn get_article(&self, article_id: i64) -> Result<ArticleDetail, ClientError> {
        validate_id("article_id", article_id)?;

        let request = ApiRequest::get(format!("/articles/{article_id}"));
        let envelope: ArticleEnvelope = self.gateway.execute(&request).await?;
        Ok(envelope.article)
    }
}
