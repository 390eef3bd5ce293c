use serde::{Deserialize, Serialize};

/// The body of every error response: a stable machine-readable code and
/// a human-readable description.
#[derive(Serialize, Deserialize)]
pub struct ApiError<'a> {
    pub error: &'a str,
    pub description: String,
}
