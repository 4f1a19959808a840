//! Newline-delimited JSON protocol spoken by `rpn_server` and `rpn_client`.
//!
//! Request:  `{"expression": "2x+1", "variables": {"x": 3}, "postfix": true}`
//! Response: `{"success": true, "result": 7.0, "postfix": "2 x * 1 +", ...}`

use crate::calculator::Calculator;
use crate::token::render;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalRequest {
    pub expression: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variables: Option<HashMap<String, serde_json::Value>>,
    /// Also return the postfix form of the expression.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postfix: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalResponse {
    pub success: bool,
    pub result: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postfix: Option<String>,
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<String>,
    pub execution_time_ms: f64,
    pub request_id: u64,
}

impl EvalResponse {
    pub fn failure<M: Into<String>>(error: M, error_kind: Option<&str>, execution_time_ms: f64, request_id: u64) -> Self {
        Self {
            success: false,
            result: None,
            postfix: None,
            error: Some(error.into()),
            error_kind: error_kind.map(str::to_string),
            execution_time_ms,
            request_id,
        }
    }
}

/// Request counters shared by the connection workers.
#[derive(Default)]
pub struct ServerStats {
    requests_processed: AtomicU64,
    total_execution_time: AtomicU64, // in microseconds
}

impl ServerStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_request(&self, execution_time_us: u64) {
        self.requests_processed.fetch_add(1, Ordering::Relaxed);
        self.total_execution_time.fetch_add(execution_time_us, Ordering::Relaxed);
    }

    /// (requests processed, average execution time in ms)
    pub fn get_stats(&self) -> (u64, f64) {
        let count = self.requests_processed.load(Ordering::Relaxed);
        let total_time = self.total_execution_time.load(Ordering::Relaxed);
        let avg_time_ms = if count > 0 {
            total_time as f64 / count as f64 / 1000.0
        } else { 0.0 };
        (count, avg_time_ms)
    }
}

pub fn process_request(calculator: &Calculator, req: EvalRequest, request_id: u64) -> EvalResponse {
    let start_time = Instant::now();
    let elapsed_ms = |start: Instant| start.elapsed().as_secs_f64() * 1000.0;

    let bindings = match req.variables {
        Some(vars) => match crate::bindings_from_map(vars) {
            Ok(b) => b,
            Err(e) => {
                return EvalResponse::failure(e.to_string(), Some(e.kind.name()), elapsed_ms(start_time), request_id)
            }
        },
        None => Default::default(),
    };

    let postfix = if req.postfix.unwrap_or(false) {
        match calculator.postfix(&req.expression) {
            Ok(tokens) => Some(render(&tokens)),
            Err(e) => {
                return EvalResponse::failure(e.to_string(), Some(e.kind.name()), elapsed_ms(start_time), request_id)
            }
        }
    } else {
        None
    };

    match calculator.result_with(&req.expression, &bindings) {
        Ok(value) => EvalResponse {
            success: true,
            result: Some(value),
            postfix,
            error: None,
            error_kind: None,
            execution_time_ms: elapsed_ms(start_time),
            request_id,
        },
        Err(e) => EvalResponse::failure(e.to_string(), Some(e.kind.name()), elapsed_ms(start_time), request_id),
    }
}

/// Handle one request line, producing the serialized response line.
pub fn handle_line(calculator: &Calculator, line: &str, request_id: u64) -> String {
    let response = match serde_json::from_str::<EvalRequest>(line) {
        Ok(req) => process_request(calculator, req, request_id),
        Err(e) => EvalResponse::failure(format!("Invalid JSON request: {}", e), None, 0.0, request_id),
    };

    serde_json::to_string(&response).unwrap_or_else(|_| {
        format!(r#"{{"success":false,"error":"Failed to serialize response","request_id":{}}}"#, request_id)
    })
}
