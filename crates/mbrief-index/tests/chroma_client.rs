//! Integration tests for `ChromaClient` against a wiremock index stand-in.

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use mbrief_index::{ChromaClient, IndexError, IndexedDocument};

async fn mount_collection(server: &MockServer, id: &str) {
    Mock::given(method("POST"))
        .and(path("/api/v1/collections"))
        .and(body_partial_json(json!({"name": "market_news", "get_or_create": true})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": id, "name": "market_news"})),
        )
        .mount(server)
        .await;
}

async fn test_client(server: &MockServer) -> ChromaClient {
    mount_collection(server, "col-1").await;
    ChromaClient::connect(&server.uri(), "market_news", 5, "mbrief-test/0.1")
        .await
        .expect("failed to connect ChromaClient")
}

fn doc(text: &str, source: &str) -> IndexedDocument {
    IndexedDocument {
        text: text.to_string(),
        source: source.to_string(),
        timestamp: "2026-08-01 09:30:00".to_string(),
    }
}

#[tokio::test]
async fn connect_fails_on_unresolvable_collection() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/collections"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let result = ChromaClient::connect(&server.uri(), "market_news", 5, "mbrief-test/0.1").await;
    assert!(
        matches!(result, Err(IndexError::UnexpectedStatus { status: 500, .. })),
        "expected UnexpectedStatus(500), got connect result: {:?}",
        result.err()
    );
}

#[tokio::test]
async fn query_text_parses_matches_with_metadata() {
    let server = MockServer::start().await;
    let client = test_client(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/v1/collections/col-1/query"))
        .and(body_partial_json(json!({"query_texts": ["market trend"], "n_results": 3})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ids": [["a", "b"]],
            "documents": [["first document text", "second document text"]],
            "metadatas": [[
                {"source": "moneycontrol", "timestamp": "2026-08-01"},
                null,
            ]],
            "distances": [[0.3, 1.1]],
        })))
        .mount(&server)
        .await;

    let matches = client.query_text("market trend", 3).await.expect("query");

    assert_eq!(matches.len(), 2);
    assert_eq!(matches[0].text, "first document text");
    assert_eq!(matches[0].source.as_deref(), Some("moneycontrol"));
    assert_eq!(matches[0].timestamp.as_deref(), Some("2026-08-01"));
    assert!((matches[0].distance - 0.3).abs() < f64::EPSILON);
    // A null metadata entry must not drop or shift its match.
    assert_eq!(matches[1].text, "second document text");
    assert_eq!(matches[1].source, None);
}

#[tokio::test]
async fn query_tolerates_fewer_results_than_requested() {
    let server = MockServer::start().await;
    let client = test_client(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/v1/collections/col-1/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ids": [["only"]],
            "documents": [["the only stored document"]],
            "metadatas": [[{"source": "s", "timestamp": "t"}]],
            "distances": [[0.9]],
        })))
        .mount(&server)
        .await;

    let matches = client.query_text("anything", 50).await.expect("query");
    assert_eq!(matches.len(), 1);
}

#[tokio::test]
async fn query_embedding_sends_the_vector() {
    let server = MockServer::start().await;
    let client = test_client(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/v1/collections/col-1/query"))
        .and(body_partial_json(json!({"query_embeddings": [[0.5, 0.25]]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ids": [["a"]],
            "documents": [["doc"]],
            "metadatas": [[{"source": "s", "timestamp": "t"}]],
            "distances": [[0.2]],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let matches = client
        .query_embedding(&[0.5, 0.25], 3)
        .await
        .expect("query");
    assert_eq!(matches.len(), 1);
}

#[tokio::test]
async fn count_parses_the_bare_number() {
    let server = MockServer::start().await;
    let client = test_client(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/v1/collections/col-1/count"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(42)))
        .mount(&server)
        .await;

    assert_eq!(client.count().await.expect("count"), 42);
}

#[tokio::test]
async fn rebuild_clears_existing_contents_first() {
    let server = MockServer::start().await;
    let client = test_client(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/v1/collections/col-1/get"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"ids": ["old-1", "old-2"]})),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v1/collections/col-1/delete"))
        .and(body_partial_json(json!({"ids": ["old-1", "old-2"]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["old-1", "old-2"])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v1/collections/col-1/add"))
        .and(body_partial_json(json!({"documents": ["fresh document"]})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!(true)))
        .expect(1)
        .mount(&server)
        .await;

    let added = client
        .rebuild(&[doc("fresh document", "moneycontrol")], &[vec![0.5, 0.5]])
        .await
        .expect("rebuild");
    assert_eq!(added, 1);
}

#[tokio::test]
async fn rebuild_of_empty_collection_skips_delete() {
    let server = MockServer::start().await;
    let client = test_client(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/v1/collections/col-1/get"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ids": []})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v1/collections/col-1/delete"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v1/collections/col-1/add"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!(true)))
        .expect(1)
        .mount(&server)
        .await;

    client
        .rebuild(&[doc("a document", "s")], &[vec![1.0]])
        .await
        .expect("rebuild");
}

#[tokio::test]
async fn rebuild_rejects_mismatched_embedding_count() {
    let server = MockServer::start().await;
    let client = test_client(&server).await;

    // No corpus mutation may happen on a mismatch.
    Mock::given(method("POST"))
        .and(path("/api/v1/collections/col-1/get"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ids": []})))
        .expect(0)
        .mount(&server)
        .await;

    let result = client
        .rebuild(&[doc("a", "s"), doc("b", "s")], &[vec![1.0]])
        .await;
    assert!(
        matches!(
            result,
            Err(IndexError::EmbeddingCount {
                expected: 2,
                got: 1
            })
        ),
        "expected EmbeddingCount, got: {result:?}"
    );
}
