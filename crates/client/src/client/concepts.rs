//! Concept lookup, search and knowledge map client methods

use super::{ApiClient, ClientError};
use crate::request::ApiRequest;
use crate::types::{
    ArticleSearchResults, ConceptDetail, ConceptEnvelope, ConceptSearchResults, KnowledgeMap,
};
use crate::validation::{
    validate_concept_id, validate_concept_names, validate_pagination, validate_search_query,
};

impl ApiClient {
    /// Get a concept with related articles and concepts
    pub async fn get_concept(&self, concept_id: i64) -> Result<ConceptDetail, ClientError> {
        validate_concept_id(concept_id)?;

        let request = ApiRequest::get(format!("/concepts/{concept_id}"));
        let envelope: ConceptEnvelope = self.gateway.execute(&request).await?;
        Ok(envelope.concept)
    }

    /// Search concepts by name
    pub async fn search_concepts(
        &self,
        query: &str,
        limit: u32,
    ) -> Result<ConceptSearchResults, ClientError> {
        let query = validate_search_query(query)?;
        validate_pagination(1, limit)?;

        let request = ApiRequest::get("/concepts/search")
            .query("q", query)
            .query("limit", limit);
        self.gateway.execute(&request).await
    }

    /// Articles that mention a concept
    pub async fn articles_by_concept(
        &self,
        concept_name: &str,
    ) -> Result<ArticleSearchResults, ClientError> {
        let mut names = validate_concept_names(&[concept_name])?;
        let concept_name = names.remove(0);

        let request =
            ApiRequest::get("/search/articles_by_concept").query("concept_name", concept_name);
        self.gateway.execute(&request).await
    }

    /// Articles that mention every one of the given concepts
    pub async fn articles_by_concepts<S: AsRef<str>>(
        &self,
        concept_names: &[S],
    ) -> Result<ArticleSearchResults, ClientError> {
        let names = validate_concept_names(concept_names)?;

        let request = ApiRequest::get("/search/articles_by_multiple_concepts")
            .query("concepts", names.join(","));
        self.gateway.execute(&request).await
    }

    /// The user's collected concepts and their relations
    pub async fn knowledge_map(&self) -> Result<KnowledgeMap, ClientError> {
        self.gateway.execute(&ApiRequest::get("/knowledge-map")).await
    }
}
