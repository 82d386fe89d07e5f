//! Endpoint coverage for the ForeignEye API client

use foreigneye_client::types::{CollectionQuery, CollectionSort, SortOrder};
use foreigneye_client::{ApiClient, ClientConfig, ClientError, MemorySessionStore, Session};
use serde_json::{Value, json};
use std::sync::Arc;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn envelope(data: Value) -> Value {
    json!({ "success": true, "data": data })
}

fn authenticated_client(server: &MockServer) -> ApiClient {
    ApiClient::builder()
        .base_url(server.uri())
        .session_store(Arc::new(MemorySessionStore::with_session(Session::new(
            "access", "refresh",
        ))))
        .build()
        .unwrap()
}

#[test]
fn test_builder_requires_base_url() {
    let result = ApiClient::builder().build();
    assert!(matches!(result, Err(ClientError::Configuration(_))));
}

#[test]
fn test_builder_rejects_non_http_scheme() {
    let result = ApiClient::new("ftp://example.com/api/v1");
    assert!(matches!(result, Err(ClientError::Configuration(_))));

    let result = ApiClient::new("not a url");
    assert!(matches!(result, Err(ClientError::InvalidUrl(_))));
}

#[test]
fn test_builder_trims_trailing_slash() {
    let client = ApiClient::new("http://localhost:5000/api/v1/").unwrap();
    assert_eq!(client.base_url(), "http://localhost:5000/api/v1");
}

#[test]
fn test_builder_from_default_config() {
    let client = foreigneye_client::ApiClientBuilder::from_config(&ClientConfig::default())
        .build()
        .unwrap();
    assert_eq!(client.base_url(), "http://localhost:5000/api/v1");
    assert!(!client.is_authenticated());
}

#[tokio::test]
async fn test_get_article_with_graph() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/articles/10"))
        .and(header("authorization", "Bearer access"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "article": {
                "article_id": 10,
                "title": "Attention Is All You Need",
                "original_url": "https://example.com/attention",
                "summary_ko": "요약",
                "created_at": "2025-11-11T12:34:56Z",
                "graph": {
                    "nodes": [
                        {"id": 3, "label": "Transformer", "is_collected": true},
                        {"id": 4, "label": "Self-Attention"}
                    ],
                    "edges": [{"from": 3, "to": 4, "strength": 0.9}]
                }
            }
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let detail = authenticated_client(&server).get_article(10).await.unwrap();

    assert_eq!(detail.article.article_id, 10);
    assert_eq!(detail.article.display_title(), "Attention Is All You Need");
    assert_eq!(detail.graph.nodes.len(), 2);
    assert!(detail.graph.nodes[0].is_collected);
    assert!(!detail.graph.nodes[1].is_collected);
    assert_eq!(detail.graph.edges[0].to, 4);
}

#[tokio::test]
async fn test_invalid_ids_are_rejected_locally() {
    let server = MockServer::start().await;
    Mock::given(wiremock::matchers::any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = authenticated_client(&server);
    assert!(matches!(
        client.get_article(0).await,
        Err(ClientError::Validation(_))
    ));
    assert!(matches!(
        client.collect_concept(-1).await,
        Err(ClientError::Validation(_))
    ));
    assert!(matches!(
        client.search_concepts("a", 10).await,
        Err(ClientError::Validation(_))
    ));
}

#[tokio::test]
async fn test_collect_concept() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/collections/concepts"))
        .and(body_json(json!({"concept_id": 3})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "success": true,
            "data": {
                "collection": {"user_id": 1, "concept_id": 3, "collected_at": "2025-11-11T12:00:00Z"},
                "concept_name": "Transformer",
                "new_connections": [{"concept_id": 4, "name": "Self-Attention", "strength": 0.9}]
            },
            "message": "Concept collected"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let collected = authenticated_client(&server)
        .collect_concept(3)
        .await
        .unwrap();

    assert_eq!(collected.concept_name, "Transformer");
    assert_eq!(collected.collection.concept_id, 3);
    assert_eq!(collected.new_connections.len(), 1);
}

#[tokio::test]
async fn test_collect_duplicate_reports_conflict() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/collections/concepts"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "success": false,
            "error": {"code": "DUPLICATE_ENTRY", "message": "Concept already collected"}
        })))
        .mount(&server)
        .await;

    let error = authenticated_client(&server)
        .collect_concept(3)
        .await
        .unwrap_err();

    assert_eq!(error.status(), Some(409));
    assert_eq!(error.server_message(), Some("Concept already collected"));
}

#[tokio::test]
async fn test_list_collection_with_sort() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/collections/concepts"))
        .and(query_param("sort", "name"))
        .and(query_param("order", "asc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "concepts": [{
                "concept_id": 3,
                "name": "Transformer",
                "description_ko": "설명",
                "real_world_examples_ko": ["GPT"],
                "collected_at": "2025-11-11T12:00:00Z"
            }],
            "total_concepts": 1
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let collection = authenticated_client(&server)
        .list_collection(&CollectionQuery {
            sort: Some(CollectionSort::Name),
            order: Some(SortOrder::Asc),
        })
        .await
        .unwrap();

    assert_eq!(collection.total_concepts, 1);
    assert_eq!(collection.concepts[0].real_world_examples_ko, vec!["GPT"]);
}

#[tokio::test]
async fn test_remove_concept() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/collections/concepts/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": null,
            "message": "Concept removed from collection"
        })))
        .expect(1)
        .mount(&server)
        .await;

    authenticated_client(&server)
        .remove_concept(3)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_get_concept_with_relations() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/concepts/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "concept": {
                "concept_id": 3,
                "name": "Transformer",
                "is_collected": true,
                "related_articles": [{"article_id": 10, "title_ko": "어텐션"}],
                "related_concepts": [{"concept_id": 4, "name": "Self-Attention", "strength": 0.9}]
            }
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let concept = authenticated_client(&server).get_concept(3).await.unwrap();

    assert_eq!(concept.concept.name, "Transformer");
    assert_eq!(concept.concept.is_collected, Some(true));
    assert_eq!(concept.related_articles[0].article_id, 10);
    assert_eq!(concept.related_concepts[0].strength, Some(0.9));
}

#[tokio::test]
async fn test_search_concepts() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/concepts/search"))
        .and(query_param("q", "attention"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "results": [{"concept_id": 4, "name": "Self-Attention"}],
            "total_results": 1,
            "query": "attention"
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let results = authenticated_client(&server)
        .search_concepts("  attention ", 5)
        .await
        .unwrap();

    assert_eq!(results.total_results, 1);
    assert_eq!(results.results[0].name, "Self-Attention");
}

#[tokio::test]
async fn test_articles_by_concepts_joins_names() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/articles_by_multiple_concepts"))
        .and(query_param("concepts", "LLM,RAG"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "concepts": ["LLM", "RAG"],
            "total_results": 0,
            "articles": []
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let results = authenticated_client(&server)
        .articles_by_concepts(&[" LLM", "RAG ", ""])
        .await
        .unwrap();

    assert_eq!(
        results.concepts,
        Some(vec!["LLM".to_string(), "RAG".to_string()])
    );
    assert!(results.articles.is_empty());
}

#[tokio::test]
async fn test_articles_by_single_concept() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/articles_by_concept"))
        .and(query_param("concept_name", "Transformer"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "concept": "Transformer",
            "total_results": 1,
            "articles": [{
                "article_id": 10,
                "title": "Attention Is All You Need",
                "original_url": "https://example.com/attention",
                "created_at": "2025-11-11T12:34:56Z"
            }]
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let results = authenticated_client(&server)
        .articles_by_concept("Transformer")
        .await
        .unwrap();

    assert_eq!(results.concept.as_deref(), Some("Transformer"));
    assert_eq!(results.articles[0].article_id, 10);
}

#[tokio::test]
async fn test_knowledge_map() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/knowledge-map"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "graph": {
                "nodes": [{"id": 3, "label": "Transformer"}, {"id": 4, "label": "Self-Attention"}],
                "edges": [{"from": 3, "to": 4, "strength": 0.9}]
            },
            "stats": {
                "total_concepts": 2,
                "total_connections": 1,
                "strong_connections": 1,
                "most_connected": {"concept_id": 3, "name": "Transformer", "connection_count": 1}
            }
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let map = authenticated_client(&server).knowledge_map().await.unwrap();

    assert_eq!(map.graph.nodes.len(), 2);
    assert_eq!(map.stats.strong_connections, 1);
    assert_eq!(map.stats.most_connected.unwrap().name, "Transformer");
}

#[tokio::test]
async fn test_unsuccessful_envelope_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/knowledge-map"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "data": {},
            "message": "Map unavailable"
        })))
        .mount(&server)
        .await;

    let error = authenticated_client(&server)
        .knowledge_map()
        .await
        .unwrap_err();

    assert!(matches!(error, ClientError::ServerError { status: 200, ref message } if message == "Map unavailable"));
}
