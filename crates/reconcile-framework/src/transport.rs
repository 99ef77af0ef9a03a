//! # Transport Contract
//!
//! The three remote operations the engine consumes. Implementations own authentication,
//! timeouts and status-code translation; the engine never sees credentials.
//!
//! | Operation | Success | Not found | Anything else |
//! |-----------|---------|-----------|---------------|
//! | [`Transport::create_or_replace`] | 200/201 → `Ok(())` | n/a | [`TransportError`] |
//! | [`Transport::read`] | 200 → `Ok(Some(doc))` | `Ok(None)` | [`TransportError`] |
//! | [`Transport::delete`] | 200/204 → `Ok(())` | `Err(Status{404})` | [`TransportError`] |
//!
//! Every call must be bounded by a timeout and report expiry as [`TransportError::Timeout`].
//! No retries are expected at this layer's callers; a retry policy, if any, lives inside the
//! implementation.

use crate::document::Document;
use crate::error::TransportError;
use async_trait::async_trait;

#[async_trait]
pub trait Transport: Send + Sync {
    /// PUT the full document at `{kind}/{id}`, creating or replacing it.
    async fn create_or_replace(
        &self,
        kind: &str,
        id: &str,
        document: &Document,
    ) -> Result<(), TransportError>;

    /// GET the document at `{kind}/{id}`; `None` when the store reports not-found.
    async fn read(&self, kind: &str, id: &str) -> Result<Option<Document>, TransportError>;

    /// DELETE the document at `{kind}/{id}`.
    async fn delete(&self, kind: &str, id: &str) -> Result<(), TransportError>;
}
