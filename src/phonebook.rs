use anyhow::{anyhow, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

const TOP_K: u32 = 5;

#[derive(Serialize)]
struct QueryRequest<'a> {
    query: &'a str,
    language: &'a str,
    top_k: u32,
}

#[derive(Deserialize)]
struct QueryResponse {
    answer: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub qdrant_connected: bool,
    pub collection_exists: bool,
}

#[derive(Clone)]
pub struct PhonebookClient {
    client: Client,
    base_url: String,
}

impl PhonebookClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Ask the RAG backend. No request timeout is set; a stalled backend
    /// stalls the in-flight query until the connection drops.
    pub async fn query(&self, query: &str, language: &str) -> Result<String> {
        let url = format!("{}/query", self.base_url);

        let request = QueryRequest {
            query,
            language,
            top_k: TOP_K,
        };

        let response = self.client.post(&url).json(&request).send().await?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "query request failed with status: {}",
                response.status()
            ));
        }

        let body: QueryResponse = response.json().await?;
        debug!(language, answer_len = body.answer.len(), "query answered");
        Ok(body.answer)
    }

    pub async fn health(&self) -> Result<HealthResponse> {
        let url = format!("{}/health", self.base_url);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "health check failed with status: {}",
                response.status()
            ));
        }

        let body: HealthResponse = response.json().await?;
        debug!(
            status = %body.status,
            qdrant = body.qdrant_connected,
            collection = body.collection_exists,
            "health check"
        );
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_query_sends_expected_body_and_returns_answer() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/query"))
            .and(body_json(serde_json::json!({
                "query": "Ki a dékán?",
                "language": "hu",
                "top_k": 5
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "answer": "Dr. Példa Elek a dékán.",
                "sources": [],
                "language": "hu"
            })))
            .mount(&server)
            .await;

        let client = PhonebookClient::new(&server.uri());
        let answer = client.query("Ki a dékán?", "hu").await.unwrap();
        assert_eq!(answer, "Dr. Példa Elek a dékán.");
    }

    #[tokio::test]
    async fn test_query_error_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/query"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = PhonebookClient::new(&server.uri());
        let result = client.query("anything", "en").await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("500"));
    }

    #[tokio::test]
    async fn test_query_malformed_body_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/query"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = PhonebookClient::new(&server.uri());
        assert!(client.query("q", "hu").await.is_err());
    }

    #[tokio::test]
    async fn test_trailing_slash_in_base_url_is_trimmed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/query"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "answer": "ok"
            })))
            .mount(&server)
            .await;

        let client = PhonebookClient::new(&format!("{}/", server.uri()));
        let answer = client.query("q", "hu").await.unwrap();
        assert_eq!(answer, "ok");
    }

    #[tokio::test]
    async fn test_health_parses_all_fields() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "degraded",
                "qdrant_connected": true,
                "collection_exists": false
            })))
            .mount(&server)
            .await;

        let client = PhonebookClient::new(&server.uri());
        let health = client.health().await.unwrap();
        assert_eq!(health.status, "degraded");
        assert!(health.qdrant_connected);
        assert!(!health.collection_exists);
    }

    #[tokio::test]
    async fn test_health_unreachable_backend_is_an_error() {
        // Port 1 is never listening; the connect error surfaces as Err.
        let client = PhonebookClient::new("http://127.0.0.1:1");
        assert!(client.health().await.is_err());
    }
}
