//! Request context carrying the acting employee and the request origin.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Context for the current request.
///
/// Passed into every pipeline operation so that each audit entry knows
/// *who* acted and from *where*.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The acting employee's id.
    pub actor_id: i32,
    /// IP address of the request origin.
    pub ip_address: Option<String>,
    /// User-Agent header value or another client descriptor.
    pub user_agent: Option<String>,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a context for `actor_id` with no origin information.
    pub fn new(actor_id: i32) -> Self {
        Self {
            actor_id,
            ip_address: None,
            user_agent: None,
            request_time: Utc::now(),
        }
    }

    /// Attaches the request origin.
    pub fn with_origin(mut self, ip_address: Option<String>, user_agent: Option<String>) -> Self {
        self.ip_address = ip_address;
        self.user_agent = user_agent;
        self
    }
}
