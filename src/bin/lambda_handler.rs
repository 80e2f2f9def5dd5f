//! AWS Lambda handler for single-case calculations
//!
//! Accepts a JSON case file as the body of a Lambda Function URL request and
//! returns the full calculation result as JSON. Malformed or invalid cases
//! get a 400 with the error message.

use std::sync::OnceLock;

use aws_lambda_events::http::{HeaderMap, HeaderValue};
use aws_lambda_events::lambda_function_urls::{LambdaFunctionUrlRequest, LambdaFunctionUrlResponse};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use log::{info, warn};
use loss_of_support::case::load_case_from_reader;
use loss_of_support::{CalculationResult, SupportEngine};
use serde::Serialize;

/// Successful response body
#[derive(Debug, Serialize)]
struct CalculationResponse {
    result: CalculationResult,
    execution_time_ms: u64,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

/// Shared across warm invocations so life tables load once per container
fn engine() -> &'static SupportEngine {
    static ENGINE: OnceLock<SupportEngine> = OnceLock::new();
    ENGINE.get_or_init(SupportEngine::default)
}

fn headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("Content-Type", HeaderValue::from_static("application/json"));
    headers.insert("Access-Control-Allow-Origin", HeaderValue::from_static("*"));
    headers.insert("Access-Control-Allow-Methods", HeaderValue::from_static("POST, OPTIONS"));
    headers.insert("Access-Control-Allow-Headers", HeaderValue::from_static("Content-Type"));
    headers
}

fn response(status: i64, body: Option<String>) -> LambdaFunctionUrlResponse {
    LambdaFunctionUrlResponse {
        status_code: status,
        headers: headers(),
        body,
        is_base64_encoded: false,
        cookies: Vec::new(),
    }
}

fn error_response(status: i64, message: String) -> Result<LambdaFunctionUrlResponse, Error> {
    warn!("Rejected request: {}", message);
    let body = serde_json::to_string(&ErrorResponse { error: message })?;
    Ok(response(status, Some(body)))
}

/// Lambda handler function
async fn handler(event: LambdaEvent<LambdaFunctionUrlRequest>) -> Result<LambdaFunctionUrlResponse, Error> {
    let start = std::time::Instant::now();
    let request = event.payload;

    // CORS preflight
    if request.request_context.http.method.as_deref() == Some("OPTIONS") {
        return Ok(response(200, None));
    }

    if request.is_base64_encoded {
        return error_response(400, "Body must be plain JSON, not base64".to_string());
    }
    let body = request.body.unwrap_or_default();

    let case = match load_case_from_reader(body.as_bytes()) {
        Ok(case) => case,
        Err(e) => return error_response(400, format!("Invalid case: {}", e)),
    };
    let input = match case.into_input() {
        Ok(input) => input,
        Err(e) => return error_response(400, e.to_string()),
    };
    let result = match engine().compute(&input) {
        Ok(result) => result,
        Err(e) => return error_response(400, e.to_string()),
    };

    let execution_time_ms = start.elapsed().as_millis() as u64;
    info!(
        "{}: total after fault {:.2} in {} ms",
        input.supporter.name, result.total_after_fault, execution_time_ms
    );

    let body = serde_json::to_string(&CalculationResponse {
        result,
        execution_time_ms,
    })?;
    Ok(response(200, Some(body)))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}
