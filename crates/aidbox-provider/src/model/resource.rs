use reconcile_framework::Document;
use serde::{Deserialize, Serialize};

/// Free-form payload of a generic resource.
///
/// Must not contain `id`, `resourceType` or `meta`; the identity supplies the first two and the
/// store owns the third.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourcePayload {
    #[serde(default)]
    pub resource: Document,
}

impl ResourcePayload {
    pub fn new(resource: Document) -> Self {
        Self { resource }
    }
}
