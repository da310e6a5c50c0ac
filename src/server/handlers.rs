use axum::extract::rejection::{FormRejection, JsonRejection};
use axum::extract::{Form, Multipart, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use log::{error, warn};
use serde::Deserialize;
use serde_json::json;

use crate::errors::TranslationError;
use crate::extraction::TextSource;
use crate::language_utils::LanguageEntry;
use crate::translation::{TranslationOutcome, TranslationRequest};

use super::pages;
use super::AppState;

/// Body of `POST /api/translate` and of the HTML form
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TranslateRequest {
    pub input_type: String,
    #[serde(default)]
    pub web_url: Option<String>,
    #[serde(default)]
    pub pdf_path: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub target_language: Option<String>,
    #[serde(default)]
    pub reference_text: Option<String>,
}

impl TranslateRequest {
    /// Validate the loosely typed fields into a pipeline request
    pub fn into_request(self) -> Result<TranslationRequest, TranslationError> {
        let source = TextSource::from_fields(
            &self.input_type,
            self.web_url.as_deref(),
            self.pdf_path.as_deref(),
            self.text.as_deref(),
        )?;

        Ok(TranslationRequest {
            source,
            target_language: self.target_language,
            reference_text: self.reference_text,
        })
    }
}

/// HTTP status for a failed request
pub fn status_for(error: &TranslationError) -> StatusCode {
    match error {
        TranslationError::InvalidInput(_)
        | TranslationError::InvalidConfiguration(_)
        | TranslationError::UnsupportedLanguage { .. } => StatusCode::BAD_REQUEST,
        TranslationError::Fetch(_) | TranslationError::TranslationFailure { .. } => StatusCode::BAD_GATEWAY,
        TranslationError::Parse(_) | TranslationError::Detection(_) => StatusCode::UNPROCESSABLE_ENTITY,
        TranslationError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
    }
}

/// JSON error response `{"error": kind, "message": text}`
pub struct ApiError(pub TranslationError);

impl From<TranslationError> for ApiError {
    fn from(error: TranslationError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        if status.is_server_error() {
            error!("Request failed: {}", self.0);
        } else {
            warn!("Request rejected: {}", self.0);
        }
        (
            status,
            Json(json!({
                "error": self.0.kind(),
                "message": self.0.to_string(),
            })),
        )
            .into_response()
    }
}

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let service = state.pipeline.service();
    Html(pages::render_form(
        service.supported_languages().entries(),
        &state.pipeline.config().default_target,
    ))
}

pub async fn translate_form(
    State(state): State<AppState>,
    form: Result<Form<TranslateRequest>, FormRejection>,
) -> Response {
    let result = match form {
        Ok(Form(form)) => match form.into_request() {
            Ok(request) => state.pipeline.translate(request).await,
            Err(e) => Err(e),
        },
        Err(rejection) => Err(TranslationError::InvalidInput(rejection.body_text())),
    };

    match result {
        Ok(outcome) => Html(pages::render_result(&outcome)).into_response(),
        Err(e) => {
            warn!("Form translation failed: {}", e);
            (status_for(&e), Html(pages::render_error(&e.to_string()))).into_response()
        }
    }
}

pub async fn translate_json(
    State(state): State<AppState>,
    payload: Result<Json<TranslateRequest>, JsonRejection>,
) -> Result<Json<TranslationOutcome>, ApiError> {
    let Json(payload) = payload.map_err(|rejection| TranslationError::InvalidInput(rejection.body_text()))?;
    let request = payload.into_request()?;
    let outcome = state.pipeline.translate(request).await?;
    Ok(Json(outcome))
}

pub async fn translate_pdf(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<TranslationOutcome>, ApiError> {
    let mut pdf = None;
    let mut target_language = None;
    let mut reference_text = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| TranslationError::InvalidInput(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "pdf_file" => {
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| TranslationError::InvalidInput(e.body_text()))?;
                pdf = Some(data);
            }
            "target_language" => {
                target_language = Some(field.text().await.map_err(|e| TranslationError::InvalidInput(e.body_text()))?);
            }
            "reference_text" => {
                reference_text = Some(field.text().await.map_err(|e| TranslationError::InvalidInput(e.body_text()))?);
            }
            _ => {}
        }
    }

    let pdf = pdf.ok_or_else(|| TranslationError::InvalidInput("pdf_file is required".to_string()))?;
    let request = TranslationRequest {
        source: TextSource::pdf_bytes(pdf)?,
        target_language,
        reference_text,
    };

    let outcome = state.pipeline.translate(request).await?;
    Ok(Json(outcome))
}

pub async fn languages(State(state): State<AppState>) -> Json<Vec<LanguageEntry>> {
    Json(state.pipeline.service().supported_languages().entries().to_vec())
}

pub async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    let service = state.pipeline.service();
    let reachable = match service.test_connection().await {
        Ok(()) => true,
        Err(e) => {
            warn!("Model health check failed: {}", e);
            false
        }
    };

    Json(json!({
        "status": "ok",
        "provider": service.model_name(),
        "model_reachable": reachable,
    }))
}
