//! Concept collection API client methods

use super::{ApiClient, ClientError};
use crate::request::ApiRequest;
use crate::types::{CollectConceptRequest, CollectConceptResponse, CollectionQuery, UserCollection};
use crate::validation::validate_concept_id;

impl ApiClient {
    /// Add a concept to the user's collection
    pub async fn collect_concept(
        &self,
        concept_id: i64,
    ) -> Result<CollectConceptResponse, ClientError> {
        validate_concept_id(concept_id)?;

        let request = ApiRequest::post("/collections/concepts")
            .json(serde_json::to_value(CollectConceptRequest { concept_id })?);
        self.gateway.execute(&request).await
    }

    /// List the user's collected concepts
    pub async fn list_collection(
        &self,
        query: &CollectionQuery,
    ) -> Result<UserCollection, ClientError> {
        let request = ApiRequest::get("/collections/concepts")
            .query_opt("sort", query.sort)
            .query_opt("order", query.order);
        self.gateway.execute(&request).await
    }

    /// Remove a concept from the user's collection
    pub async fn remove_concept(&self, concept_id: i64) -> Result<(), ClientError> {
        validate_concept_id(concept_id)?;

        let request = ApiRequest::delete(format!("/collections/concepts/{concept_id}"));
        self.gateway.execute_empty(&request).await
    }
}
