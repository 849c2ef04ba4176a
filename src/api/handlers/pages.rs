//! Static pages and planned-status endpoints

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::Serialize;

use crate::api::middleware::RequestSpan;
use crate::api::state::AppState;
use crate::api::types::Json;
use crate::domain::ServiceFlavour;

const MAIN_PAGE: &str = include_str!("../../../templates/main.html");

#[derive(Debug, Serialize)]
pub struct ApiAnswer {
    pub response: String,
}

/// `GET /`: a greeting on the backend, the rendered main page elsewhere
pub async fn homepage(State(state): State<AppState>, RequestSpan(root): RequestSpan) -> Response {
    match state.profile.flavour {
        ServiceFlavour::Backend => "Hello World".into_response(),
        ServiceFlavour::Front => {
            let _render = state.spans.start_child("homepage", &root);
            Html(MAIN_PAGE).into_response()
        }
        ServiceFlavour::Trial => Html(MAIN_PAGE).into_response(),
    }
}

/// `GET /api`
pub async fn my_api(State(state): State<AppState>, RequestSpan(root): RequestSpan) -> Json<ApiAnswer> {
    let answer = {
        let _span = state.spans.start_child("my-api", &root);
        "something".to_string()
    };

    Json(ApiAnswer { response: answer })
}

pub async fn client_success_page() -> (StatusCode, &'static str) {
    (StatusCode::OK, "Planned 200 response")
}

pub async fn client_error_page() -> (StatusCode, &'static str) {
    (StatusCode::BAD_REQUEST, "Planned 400 error")
}

pub async fn server_error_page() -> (StatusCode, &'static str) {
    (StatusCode::INTERNAL_SERVER_ERROR, "Planned 500 error")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_planned_statuses() {
        assert_eq!(client_success_page().await, (StatusCode::OK, "Planned 200 response"));
        assert_eq!(client_error_page().await, (StatusCode::BAD_REQUEST, "Planned 400 error"));
        assert_eq!(
            server_error_page().await,
            (StatusCode::INTERNAL_SERVER_ERROR, "Planned 500 error")
        );
    }

    #[test]
    fn test_main_page_is_html() {
        assert!(MAIN_PAGE.contains("<html"));
    }
}
