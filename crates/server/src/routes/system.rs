use actix_web::{get, web, HttpResponse};
use std::sync::Arc;

use crate::state::AppState;
use crate::types::HealthResponse;

/// Liveness check; the server only listens once the index is built
#[get("/health")]
pub async fn health() -> actix_web::Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(HealthResponse { status: "ok" }))
}

/// Catalog index statistics
#[get("/catalog/stats")]
pub async fn catalog_stats(
    state: web::Data<Arc<AppState>>,
) -> actix_web::Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(state.matcher.index().stats()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test, App};
    use async_trait::async_trait;
    use rfqmatch_common::Result;
    use rfqmatch_embedding::Embedder;
    use rfqmatch_matcher::RfqMatcher;
    use rfqmatch_vector::{CatalogEntry, CatalogIndex, IndexedVector};

    struct ConstantEmbedder;

    #[async_trait]
    impl Embedder for ConstantEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Ok(vec![0.0, 0.0, 1.0])
        }

        fn model(&self) -> &str {
            "constant"
        }
    }

    fn test_state() -> web::Data<Arc<AppState>> {
        let index = CatalogIndex::from_indexed(
            vec![IndexedVector {
                vector: vec![0.0, 1.0, 0.0],
                source_entry: CatalogEntry {
                    sku: "A-1".to_string(),
                    brand: "Acme".to_string(),
                    description: "Steel Bolt".to_string(),
                    monthly_quantity: 1,
                },
            }],
            3,
            "constant",
        )
        .unwrap();
        let matcher = RfqMatcher::new(Arc::new(index), Arc::new(ConstantEmbedder));
        web::Data::new(Arc::new(AppState::new(Arc::new(matcher))))
    }

    #[actix_web::test]
    async fn test_health() {
        let app = test::init_service(App::new().configure(crate::configure)).await;
        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_catalog_stats() {
        let app = test::init_service(
            App::new().app_data(test_state()).configure(crate::configure),
        )
        .await;
        let req = test::TestRequest::get().uri("/catalog/stats").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["indexed_entries"], 1);
        assert_eq!(body["skipped_entries"], 2);
        assert_eq!(body["total_rows"], 3);
        assert_eq!(body["dimension"], 3);
        assert_eq!(body["embedding_model"], "constant");
        assert!(body["built_at"].is_string());
    }
}
