//! Report analysis endpoints.
//!
//! `POST /analyze` — multipart PDF upload plus optional query.
//! `POST /analyze-sample` — optional JSON query against the configured
//! sample report.

use axum::extract::{Multipart, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::config::{DEFAULT_ANALYZE_QUERY, DEFAULT_SAMPLE_QUERY};
use crate::document::{looks_like_pdf, StagedReport};
use crate::pipeline::runner::{AnalysisRequest, PipelineOutcome, StepName};

#[derive(Serialize, Debug)]
pub struct AnalysisResponse {
    pub status: &'static str,
    pub query: String,
    pub analysis: String,
    pub file_processed: String,
    pub timestamp: String,
}

/// `POST /analyze` — analyze an uploaded blood test report.
pub async fn upload(
    State(ctx): State<ApiContext>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisResponse>, ApiError> {
    let mut query = String::new();
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "query" => {
                query = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Unreadable query field: {e}")))?;
            }
            "file" => {
                let filename = field.file_name().unwrap_or("report.pdf").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read file data: {e}")))?;
                file = Some((filename, bytes.to_vec()));
            }
            _ => {}
        }
    }

    let (filename, bytes) = file.ok_or_else(|| ApiError::BadRequest("No file provided".into()))?;
    if bytes.is_empty() {
        return Err(ApiError::BadRequest("Uploaded file is empty".into()));
    }
    if !filename.to_ascii_lowercase().ends_with(".pdf") || !looks_like_pdf(&bytes) {
        return Err(ApiError::BadRequest("Only PDF files are supported".into()));
    }

    // The guard removes the staged file on every exit path below.
    let staged = StagedReport::stage(&ctx.config.staging_dir, &filename, &bytes)
        .map_err(|e| ApiError::Internal(format!("Failed to stage upload: {e}")))?;

    let request = AnalysisRequest::new(
        &query,
        staged.path().to_path_buf(),
        DEFAULT_ANALYZE_QUERY,
    );
    let outcome = ctx.pipeline.run(&request).await;
    respond(outcome, &request, filename)
}

#[derive(Deserialize, Default)]
pub struct SampleAnalysisBody {
    #[serde(default)]
    pub query: Option<String>,
}

/// `POST /analyze-sample` — analyze the configured sample report.
pub async fn sample(
    State(ctx): State<ApiContext>,
    body: Option<Json<SampleAnalysisBody>>,
) -> Result<Json<AnalysisResponse>, ApiError> {
    let sample_path = ctx.config.sample_report_path.clone();
    if !sample_path.exists() {
        return Err(ApiError::NotFound("Sample blood test report not found".into()));
    }

    let file_processed = sample_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "sample.pdf".to_string());

    let query = body.and_then(|Json(b)| b.query).unwrap_or_default();
    let request = AnalysisRequest::new(&query, sample_path, DEFAULT_SAMPLE_QUERY);
    let outcome = ctx.pipeline.run(&request).await;
    respond(outcome, &request, file_processed)
}

/// Map a pipeline outcome onto the HTTP response contract.
fn respond(
    outcome: PipelineOutcome,
    request: &AnalysisRequest,
    file_processed: String,
) -> Result<Json<AnalysisResponse>, ApiError> {
    match outcome {
        PipelineOutcome {
            succeeded: true,
            final_text: Some(analysis),
            ..
        } => Ok(Json(AnalysisResponse {
            status: "success",
            query: request.query().to_string(),
            analysis,
            file_processed,
            timestamp: chrono::Utc::now().to_rfc3339(),
        })),
        outcome => Err(ApiError::PipelineFailed {
            step: outcome.failed_step.unwrap_or(StepName::Verification),
            detail: outcome
                .error_detail
                .unwrap_or_else(|| "pipeline produced no output".into()),
        }),
    }
}
