use crate::result::CheckResult;

use super::{RequestTransport, TransportError};

/// Answers every check with "exists, is a file" without touching the network.
/// Useful for trying the prompt when no backend is running.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockTransport;

impl RequestTransport for MockTransport {
    fn check(&self, url: &str) -> Result<CheckResult, TransportError> {
        Ok(CheckResult {
            url: url.to_string(),
            exists: true,
            file: true,
            folder: false,
            error: String::new(),
        })
    }
}
