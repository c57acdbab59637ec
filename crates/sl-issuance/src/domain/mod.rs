pub mod errors;

use chrono::{DateTime, Utc};

pub use errors::IssuanceError;

/// Maximum number of URLs accepted by one `batch_create` call.
pub const MAX_BATCH_SIZE: usize = 100;

#[derive(Debug, Clone)]
pub struct CreateLinkRequest {
    pub original_url: String,
    pub host: String,
    pub custom_code: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub expire_at: Option<DateTime<Utc>>,
    pub creator_ip: String,
}

/// One failed URL in a batch-create call; the batch itself never fails
/// wholesale.
#[derive(Debug, Clone)]
pub struct BatchFailure {
    pub original_url: String,
    pub error: String,
}

#[derive(Debug, Clone, Default)]
pub struct BatchCreateResult {
    pub successes: Vec<shared_types::ShortLink>,
    pub failures: Vec<BatchFailure>,
}
