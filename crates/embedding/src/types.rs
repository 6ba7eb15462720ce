use serde::{Deserialize, Serialize};

/// OpenAI embeddings request
#[derive(Debug, Clone, Serialize)]
pub struct EmbedRequest {
    /// Model name (e.g., "text-embedding-ada-002")
    pub model: String,

    /// Input batch; this client always sends a single item
    pub input: Vec<String>,
}

/// OpenAI embeddings response
#[derive(Debug, Clone, Deserialize)]
pub struct EmbedResponse {
    /// One entry per input
    pub data: Vec<EmbedData>,

    /// Model that produced the vectors
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbedData {
    pub embedding: Vec<f32>,

    #[serde(default)]
    pub index: usize,
}

impl EmbedResponse {
    /// Take the first vector in input order
    pub fn into_first(mut self) -> Option<Vec<f32>> {
        self.data.sort_by_key(|d| d.index);
        self.data.into_iter().next().map(|d| d.embedding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let request = EmbedRequest {
            model: "text-embedding-ada-002".to_string(),
            input: vec!["Acme Steel Bolt".to_string()],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "model": "text-embedding-ada-002",
                "input": ["Acme Steel Bolt"],
            })
        );
    }

    #[test]
    fn test_response_parsing() {
        let body = r#"{
            "object": "list",
            "data": [
                {"object": "embedding", "index": 1, "embedding": [0.5, 0.5]},
                {"object": "embedding", "index": 0, "embedding": [0.1, 0.2]}
            ],
            "model": "text-embedding-ada-002",
            "usage": {"prompt_tokens": 3, "total_tokens": 3}
        }"#;
        let response: EmbedResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.model.as_deref(), Some("text-embedding-ada-002"));
        assert_eq!(response.into_first(), Some(vec![0.1, 0.2]));
    }

    #[test]
    fn test_empty_response() {
        let response: EmbedResponse = serde_json::from_str(r#"{"data": []}"#).unwrap();
        assert_eq!(response.into_first(), None);
    }
}
