//! Request handlers for the extraction API.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::fetch::AudioCodec;
use crate::pipeline::{ExtractionRequest, ExtractionResult};

/// Query parameters for the extraction endpoint. `url` is required; the
/// flags default the way the original service did.
#[derive(Debug, Deserialize)]
pub struct ProcessParams {
    pub url: String,

    #[serde(default = "default_true")]
    pub get_audio: bool,

    #[serde(default)]
    pub get_transcript: bool,

    #[serde(default)]
    pub audio_format: AudioCodec,
}

fn default_true() -> bool {
    true
}

/// GET /api/process_video_details
///
/// Runs the extraction pipeline and returns the result as JSON. A
/// transcript-only request that succeeded returns the bare transcript with
/// a plain-text content type instead.
pub async fn process_video_details(
    State(state): State<AppState>,
    Query(params): Query<ProcessParams>,
) -> Response {
    let request = ExtractionRequest {
        url: params.url,
        audio: params.get_audio,
        transcript: params.get_transcript,
        audio_codec: params.audio_format,
    };

    let result = state.pipeline.run(&request).await;

    if request.transcript && !request.audio && result.error.is_none() {
        if let Some(text) = &result.transcript_text {
            return text.clone().into_response();
        }
    }

    (response_status(&request, &result), Json(result)).into_response()
}

/// Partial success still reports HTTP success as long as at least one
/// requested artifact was produced; a recorded error with nothing produced
/// is a server error.
fn response_status(request: &ExtractionRequest, result: &ExtractionResult) -> StatusCode {
    if result.error.is_none() {
        return StatusCode::OK;
    }

    let produced_audio = request.audio && result.audio_server_path.is_some();
    let produced_transcript = request.transcript && result.transcript_text.is_some();

    if produced_audio || produced_transcript {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub module: String,
    pub version: String,
}

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        module: "clipscribe".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(audio: bool, transcript: bool) -> ExtractionRequest {
        ExtractionRequest {
            url: "https://www.youtube.com/watch?v=abc".to_string(),
            audio,
            transcript,
            audio_codec: AudioCodec::Mp3,
        }
    }

    fn result() -> ExtractionResult {
        ExtractionResult {
            video_url: "https://www.youtube.com/watch?v=abc".to_string(),
            title: Some("t".to_string()),
            channel: Some("c".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_status_ok_without_error() {
        assert_eq!(
            response_status(&request(true, true), &result()),
            StatusCode::OK
        );
    }

    #[test]
    fn test_status_server_error_when_nothing_produced() {
        let mut failed = result();
        failed.error = Some("metadata fetch failed: boom".to_string());
        assert_eq!(
            response_status(&request(true, false), &failed),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_status_partial_success_is_ok() {
        let mut partial = result();
        partial.error = Some("no subtitles available".to_string());
        partial.audio_server_path = Some("downloads/x/x.mp3".into());
        assert_eq!(
            response_status(&request(true, true), &partial),
            StatusCode::OK
        );
    }

    #[test]
    fn test_status_transcript_only_failure() {
        let mut failed = result();
        failed.error = Some("no subtitles available".to_string());
        assert_eq!(
            response_status(&request(false, true), &failed),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_params_defaults() {
        let params: ProcessParams = serde_json::from_value(serde_json::json!({
            "url": "https://youtu.be/abc"
        }))
        .unwrap();
        assert!(params.get_audio);
        assert!(!params.get_transcript);
        assert_eq!(params.audio_format, AudioCodec::Mp3);
    }

    #[test]
    fn test_params_audio_format_parses() {
        let params: ProcessParams = serde_json::from_value(serde_json::json!({
            "url": "https://youtu.be/abc",
            "audio_format": "ogg"
        }))
        .unwrap();
        assert_eq!(params.audio_format, AudioCodec::Ogg);
    }
}
