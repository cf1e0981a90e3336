//! Response DTOs for the cache server API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::memo::MemoStats;
use crate::recorder::Trace;

/// Response body for the STORE operation (PUT /store)
#[derive(Debug, Clone, Serialize)]
pub struct StoreResponse {
    /// The generated key
    pub key: String,
}

impl StoreResponse {
    /// Creates a new StoreResponse
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

/// Response body for the RETRIEVE operation (GET /retrieve/:key)
#[derive(Debug, Clone, Serialize)]
pub struct RetrieveResponse {
    /// The requested key
    pub key: String,
    /// The decoded value
    pub value: serde_json::Value,
}

impl RetrieveResponse {
    /// Creates a new RetrieveResponse
    pub fn new(key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Response body for GET /calls/:operation
#[derive(Debug, Clone, Serialize)]
pub struct CallsResponse {
    /// Operation identity
    pub operation: String,
    /// Recorded invocation count
    pub calls: i64,
}

/// Response body for GET /replay/:operation
#[derive(Debug, Clone, Serialize)]
pub struct ReplayResponse {
    /// Operation identity
    pub operation: String,
    /// Number of recorded inputs
    pub calls: usize,
    /// Header followed by one line per paired call
    pub trace: Vec<String>,
}

impl From<Trace> for ReplayResponse {
    fn from(trace: Trace) -> Self {
        let mut lines = vec![trace.header()];
        lines.extend(trace.lines());
        Self {
            operation: trace.operation,
            calls: trace.calls,
            trace: lines,
        }
    }
}

/// Response body for GET /fetch
#[derive(Debug, Clone, Serialize)]
pub struct FetchResponse {
    /// The requested URL
    pub url: String,
    /// Page content, possibly served from the memo
    pub content: String,
    /// How many times this URL has been requested
    pub access_count: u64,
}

/// Response body for the memo stats endpoint (GET /memo/stats)
#[derive(Debug, Clone, Serialize)]
pub struct MemoStatsResponse {
    /// Number of memo hits
    pub hits: u64,
    /// Number of recomputations
    pub misses: u64,
    /// Number of capacity evictions
    pub evictions: u64,
    /// Number of expired entries dropped
    pub expirations: u64,
    /// Current number of memoized entries
    pub total_entries: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<MemoStats> for MemoStatsResponse {
    fn from(stats: MemoStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            expirations: stats.expirations,
            total_entries: stats.total_entries,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::CallRecord;

    #[test]
    fn test_retrieve_response_serialize() {
        let resp = RetrieveResponse::new("k", 42);
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["key"], "k");
        assert_eq!(json["value"], 42);
    }

    #[test]
    fn test_replay_response_from_trace() {
        let trace = Trace {
            operation: "op".into(),
            calls: 2,
            records: vec![CallRecord {
                args: vec![serde_json::json!("foo")],
                output: "k1".into(),
            }],
        };

        let resp = ReplayResponse::from(trace);

        assert_eq!(resp.calls, 2);
        assert_eq!(resp.trace, vec!["op was called 2 times:", r#"op("foo") -> k1"#]);
    }

    #[test]
    fn test_memo_stats_hit_rate() {
        let mut stats = MemoStats::new();
        stats.record_hit();
        stats.record_miss();
        stats.record_miss();
        stats.record_miss();

        let resp = MemoStatsResponse::from(stats);
        assert!((resp.hit_rate - 0.25).abs() < 0.001);
        assert_eq!(resp.misses, 3);
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }

    #[test]
    fn test_error_response_serialize() {
        let resp = ErrorResponse::new("Something went wrong");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("error"));
        assert!(json.contains("Something went wrong"));
    }
}
