use actix_web::{error::InternalError, post, web, HttpResponse};
use std::sync::Arc;
use tracing::{info, warn};

use crate::state::AppState;
use crate::types::{ErrorResponse, RfqRequest};

const INVALID_REQUEST: &str = "Invalid request. Provide 'rfq' field in JSON.";

/// JSON extractor config: malformed bodies get the same 400 as a missing field
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .content_type_required(false)
        .error_handler(|err, _req| {
            warn!("Rejected RFQ request body: {}", err);
            let response = HttpResponse::BadRequest().json(ErrorResponse::new(INVALID_REQUEST));
            InternalError::from_response(err, response).into()
        })
}

/// Match an RFQ block against the catalog
#[post("/rfq")]
pub async fn rfq_search(
    req: web::Json<RfqRequest>,
    state: web::Data<Arc<AppState>>,
) -> actix_web::Result<HttpResponse> {
    let Some(rfq) = req.into_inner().rfq else {
        return Ok(HttpResponse::BadRequest().json(ErrorResponse::new(INVALID_REQUEST)));
    };

    info!("RFQ request received - {} bytes", rfq.len());
    let reports = state.matcher.match_rfq(&rfq).await;

    Ok(HttpResponse::Ok().json(reports))
}
