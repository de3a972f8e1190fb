//! Storage URL resolution.

use async_trait::async_trait;
use veodirector_domain::StorageLocator;

use crate::infrastructure::ports::{StorageError, StoragePort};

pub const DEFAULT_PUBLIC_BASE: &str = "https://storage.googleapis.com";

/// Resolves locators to `{public_base}/{bucket}/{path}`.
///
/// Only works for publicly readable objects; signed URLs need a resolver
/// that talks to the storage API.
pub struct PublicUrlResolver {
    public_base: String,
}

impl PublicUrlResolver {
    pub fn new(public_base: &str) -> Self {
        Self {
            public_base: public_base.trim_end_matches('/').to_string(),
        }
    }
}

impl Default for PublicUrlResolver {
    fn default() -> Self {
        Self::new(DEFAULT_PUBLIC_BASE)
    }
}

#[async_trait]
impl StoragePort for PublicUrlResolver {
    async fn resolve(&self, locator: &StorageLocator) -> Result<String, StorageError> {
        if self.public_base.is_empty() {
            return Err(StorageError::Unresolvable {
                locator: locator.to_string(),
                message: "no public base URL configured".to_string(),
            });
        }

        let uri = format!("{}/{}/{}", self.public_base, locator.bucket(), locator.path());
        tracing::debug!(locator = %locator, uri = %uri, "Resolved storage locator");
        Ok(uri)
    }
}
