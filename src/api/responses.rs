//! API request and response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::{RoundStatus, Winner};

/// API response structure for round commands
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub round: RoundStatus,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: String, message: String, round: RoundStatus) -> Self {
        Self {
            status,
            message,
            timestamp: Utc::now(),
            round,
        }
    }

    /// Create an accepted response
    pub fn accepted(message: String, round: RoundStatus) -> Self {
        Self::new("accepted".to_string(), message, round)
    }

    /// Create a rejected response
    pub fn rejected(message: String, round: RoundStatus) -> Self {
        Self::new("rejected".to_string(), message, round)
    }
}

/// Body of POST /winner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WinnerRequest {
    pub winner: Winner,
}

/// Status response with server metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub round: RoundStatus,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
