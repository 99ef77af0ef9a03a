//! # Test Doubles & Testing Guide
//!
//! Two in-memory [`Transport`] implementations let engine and client logic be tested without a
//! remote store.
//!
//! ## When to use which
//!
//! | Feature | MockTransport | MemoryStore |
//! |---------|---------------|-------------|
//! | **State** | None (scripted responses) | Real documents, `meta`, hashed passwords |
//! | **Assertions** | Exact call order, `verify()` | Recorded calls, stored documents |
//! | **Use Case** | Error paths, exact wire exchange | Lifecycle flows, drift, replacement |
//! | **Error Injection** | `return_err` | `fail_next` |
//!
//! ## Testing Strategies
//!
//! <details>
//! <summary><b>Pattern 1: Scripted exchange (MockTransport)</b></summary>
//!
//! ```rust,ignore
//! let mock = MockTransport::new();
//! mock.expect_put("Role", "admins").return_ok();
//! mock.expect_read("Role", "admins").return_ok(Some(stored_role()));
//!
//! let engine = ReconcileEngine::new(RoleAdapter, Arc::new(mock.clone()));
//! engine.create(ResourceIdentity::new("Role", "admins"), state).await?;
//!
//! assert_eq!(mock.puts()[0].2["name"], json!("admins"));
//! mock.verify();
//! ```
//! </details>
//!
//! <details>
//! <summary><b>Pattern 2: Stateful store (MemoryStore)</b></summary>
//!
//! ```rust,ignore
//! let store = MemoryStore::new();
//! let engine = ReconcileEngine::new(UserAdapter, Arc::new(store.clone()));
//! let (identity, _) = engine.create(ResourceIdentity::unassigned("User"), state).await?;
//!
//! // Simulate someone deleting the resource out of band.
//! store.remove_externally(&identity.kind, &identity.id);
//! assert!(engine.read(&identity).await?.is_none());
//! ```
//! </details>
//!
//! An unexpected or mismatched request panics, failing the test.

use crate::document::{Document, PASSWORD_HASH_MARKER, PASSWORD_KEY, META_KEY};
use crate::error::TransportError;
use crate::transport::Transport;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::hash_map::DefaultHasher;
use std::collections::{HashMap, VecDeque};
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Mutex};

// =============================================================================
// MEMORY STORE
// =============================================================================

/// A request observed by [`MemoryStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Put { kind: String, id: String },
    Get { kind: String, id: String },
    Delete { kind: String, id: String },
}

/// The operation a failure injected with [`MemoryStore::fail_next`] applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Put,
    Get,
    Delete,
}

#[derive(Default)]
struct StoreState {
    documents: HashMap<(String, String), Document>,
    calls: Vec<Call>,
    failures: VecDeque<(Operation, TransportError)>,
    clock: u64,
}

/// An in-memory document store behaving like the remote one.
///
/// - PUT stores the document, stamps a camelCase `meta` (`versionId`, `createdAt`,
///   `lastUpdated`, from a logical clock) and replaces a plaintext `password` with a
///   hash-marked value.
/// - GET of a missing document yields `None`.
/// - DELETE of a missing document fails with status 404.
///
/// Clones share the same store.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<StoreState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a document as-is, bypassing meta stamping and hashing.
    pub fn insert(&self, kind: &str, id: &str, document: Document) {
        let mut state = self.state.lock().unwrap();
        state
            .documents
            .insert((kind.to_string(), id.to_string()), document);
    }

    /// The raw stored document.
    pub fn get(&self, kind: &str, id: &str) -> Option<Document> {
        let state = self.state.lock().unwrap();
        state
            .documents
            .get(&(kind.to_string(), id.to_string()))
            .cloned()
    }

    pub fn contains(&self, kind: &str, id: &str) -> bool {
        self.get(kind, id).is_some()
    }

    pub fn len(&self) -> usize {
        self.state.lock().unwrap().documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Deletes a document without recording a call. Returns whether it existed.
    pub fn remove_externally(&self, kind: &str, id: &str) -> bool {
        let mut state = self.state.lock().unwrap();
        state
            .documents
            .remove(&(kind.to_string(), id.to_string()))
            .is_some()
    }

    /// Edits a stored document without recording a call. Returns whether it existed.
    pub fn modify_externally(&self, kind: &str, id: &str, edit: impl FnOnce(&mut Document)) -> bool {
        let mut state = self.state.lock().unwrap();
        match state.documents.get_mut(&(kind.to_string(), id.to_string())) {
            Some(document) => {
                edit(document);
                true
            }
            None => false,
        }
    }

    /// Makes the next call of `operation` fail with `error`.
    pub fn fail_next(&self, operation: Operation, error: TransportError) {
        let mut state = self.state.lock().unwrap();
        state.failures.push_back((operation, error));
    }

    /// Every call received so far, in order.
    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Number of PUTs received so far.
    pub fn write_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, Call::Put { .. }))
            .count()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    fn record(&self, call: Call, operation: Operation) -> Result<(), TransportError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        let position = state.failures.iter().position(|(op, _)| *op == operation);
        match position.and_then(|index| state.failures.remove(index)) {
            Some((_, error)) => Err(error),
            None => Ok(()),
        }
    }
}

fn hash_password(plain: &str) -> String {
    let mut hasher = DefaultHasher::new();
    plain.hash(&mut hasher);
    format!("{PASSWORD_HASH_MARKER}{:016x}", hasher.finish())
}

#[async_trait]
impl Transport for MemoryStore {
    async fn create_or_replace(
        &self,
        kind: &str,
        id: &str,
        document: &Document,
    ) -> Result<(), TransportError> {
        self.record(
            Call::Put {
                kind: kind.to_string(),
                id: id.to_string(),
            },
            Operation::Put,
        )?;

        let mut stored = document.clone();
        let hashed = match stored.get(PASSWORD_KEY) {
            Some(Value::String(plain)) if !plain.starts_with(PASSWORD_HASH_MARKER) => {
                Some(hash_password(plain))
            }
            _ => None,
        };
        if let Some(hashed) = hashed {
            stored.insert(PASSWORD_KEY.to_string(), Value::String(hashed));
        }

        let mut state = self.state.lock().unwrap();
        state.clock += 1;
        let tick = state.clock.to_string();
        let key = (kind.to_string(), id.to_string());
        let created_at = state
            .documents
            .get(&key)
            .and_then(|previous| previous.get(META_KEY))
            .and_then(|meta| meta.get("createdAt"))
            .cloned()
            .unwrap_or_else(|| Value::String(tick.clone()));
        stored.insert(
            META_KEY.to_string(),
            json!({"versionId": tick, "createdAt": created_at, "lastUpdated": tick}),
        );
        state.documents.insert(key, stored);
        Ok(())
    }

    async fn read(&self, kind: &str, id: &str) -> Result<Option<Document>, TransportError> {
        self.record(
            Call::Get {
                kind: kind.to_string(),
                id: id.to_string(),
            },
            Operation::Get,
        )?;
        Ok(self.get(kind, id))
    }

    async fn delete(&self, kind: &str, id: &str) -> Result<(), TransportError> {
        self.record(
            Call::Delete {
                kind: kind.to_string(),
                id: id.to_string(),
            },
            Operation::Delete,
        )?;
        if self.remove_externally(kind, id) {
            Ok(())
        } else {
            Err(TransportError::Status {
                status: 404,
                body: format!("{kind}/{id} not found"),
            })
        }
    }
}

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

/// An expected request and the response to give it. `id: None` matches any id.
enum Expectation {
    Put {
        kind: String,
        id: Option<String>,
        response: Result<(), TransportError>,
    },
    Read {
        kind: String,
        id: Option<String>,
        response: Result<Option<Document>, TransportError>,
    },
    Delete {
        kind: String,
        id: Option<String>,
        response: Result<(), TransportError>,
    },
}

type Expectations = Arc<Mutex<VecDeque<Expectation>>>;

/// A transport with scripted responses, consumed in order.
///
/// # Example
/// ```ignore
/// let mock = MockTransport::new();
/// mock.expect_read("User", "u1").return_ok(None);
/// mock.expect_delete("User", "u1").return_err(TransportError::Status { status: 404, body: String::new() });
///
/// let transport: Arc<dyn Transport> = Arc::new(mock.clone());
/// // Use transport in tests...
/// mock.verify(); // Ensures all expectations were met
/// ```
#[derive(Clone, Default)]
pub struct MockTransport {
    expectations: Expectations,
    puts: Arc<Mutex<Vec<(String, String, Document)>>>,
}

impl MockTransport {
    /// Creates a new mock with no expectations.
    pub fn new() -> Self {
        Self::default()
    }

    /// Expects a PUT of `kind/id`.
    pub fn expect_put(&self, kind: &str, id: &str) -> PutExpectationBuilder {
        PutExpectationBuilder {
            kind: kind.to_string(),
            id: Some(id.to_string()),
            expectations: self.expectations.clone(),
        }
    }

    /// Expects a PUT of any id of `kind`, for generated ids.
    pub fn expect_put_any(&self, kind: &str) -> PutExpectationBuilder {
        PutExpectationBuilder {
            kind: kind.to_string(),
            id: None,
            expectations: self.expectations.clone(),
        }
    }

    /// Expects a GET of `kind/id`.
    pub fn expect_read(&self, kind: &str, id: &str) -> ReadExpectationBuilder {
        ReadExpectationBuilder {
            kind: kind.to_string(),
            id: Some(id.to_string()),
            expectations: self.expectations.clone(),
        }
    }

    /// Expects a GET of any id of `kind`.
    pub fn expect_read_any(&self, kind: &str) -> ReadExpectationBuilder {
        ReadExpectationBuilder {
            kind: kind.to_string(),
            id: None,
            expectations: self.expectations.clone(),
        }
    }

    /// Expects a DELETE of `kind/id`.
    pub fn expect_delete(&self, kind: &str, id: &str) -> DeleteExpectationBuilder {
        DeleteExpectationBuilder {
            kind: kind.to_string(),
            id: Some(id.to_string()),
            expectations: self.expectations.clone(),
        }
    }

    /// Documents received by PUT, as `(kind, id, document)`.
    pub fn puts(&self) -> Vec<(String, String, Document)> {
        self.puts.lock().unwrap().clone()
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let exps = self.expectations.lock().unwrap();
        if !exps.is_empty() {
            panic!("Not all expectations were met. {} remaining", exps.len());
        }
    }

    fn next(&self, request: &str) -> Expectation {
        let mut exps = self.expectations.lock().unwrap();
        match exps.pop_front() {
            Some(expectation) => expectation,
            None => panic!("Unexpected request {request}: no expectations left"),
        }
    }
}

fn expectation_matches(expected_kind: &str, expected_id: &Option<String>, kind: &str, id: &str) -> bool {
    expected_kind == kind && expected_id.as_deref().map_or(true, |expected| expected == id)
}

#[async_trait]
impl Transport for MockTransport {
    async fn create_or_replace(
        &self,
        kind: &str,
        id: &str,
        document: &Document,
    ) -> Result<(), TransportError> {
        self.puts
            .lock()
            .unwrap()
            .push((kind.to_string(), id.to_string(), document.clone()));
        match self.next(&format!("PUT {kind}/{id}")) {
            Expectation::Put {
                kind: k,
                id: i,
                response,
            } if expectation_matches(&k, &i, kind, id) => response,
            _ => panic!("Unexpected request or expectation mismatch: PUT {kind}/{id}"),
        }
    }

    async fn read(&self, kind: &str, id: &str) -> Result<Option<Document>, TransportError> {
        match self.next(&format!("GET {kind}/{id}")) {
            Expectation::Read {
                kind: k,
                id: i,
                response,
            } if expectation_matches(&k, &i, kind, id) => response,
            _ => panic!("Unexpected request or expectation mismatch: GET {kind}/{id}"),
        }
    }

    async fn delete(&self, kind: &str, id: &str) -> Result<(), TransportError> {
        match self.next(&format!("DELETE {kind}/{id}")) {
            Expectation::Delete {
                kind: k,
                id: i,
                response,
            } if expectation_matches(&k, &i, kind, id) => response,
            _ => panic!("Unexpected request or expectation mismatch: DELETE {kind}/{id}"),
        }
    }
}

/// Builder for PUT expectations.
pub struct PutExpectationBuilder {
    kind: String,
    id: Option<String>,
    expectations: Expectations,
}

impl PutExpectationBuilder {
    /// Sets the expectation to return a successful result.
    pub fn return_ok(self) {
        self.push(Ok(()));
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: TransportError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<(), TransportError>) {
        let mut exps = self.expectations.lock().unwrap();
        exps.push_back(Expectation::Put {
            kind: self.kind,
            id: self.id,
            response,
        });
    }
}

/// Builder for GET expectations.
pub struct ReadExpectationBuilder {
    kind: String,
    id: Option<String>,
    expectations: Expectations,
}

impl ReadExpectationBuilder {
    /// Sets the expectation to return a document, or not-found for `None`.
    pub fn return_ok(self, document: Option<Document>) {
        self.push(Ok(document));
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: TransportError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<Option<Document>, TransportError>) {
        let mut exps = self.expectations.lock().unwrap();
        exps.push_back(Expectation::Read {
            kind: self.kind,
            id: self.id,
            response,
        });
    }
}

/// Builder for DELETE expectations.
pub struct DeleteExpectationBuilder {
    kind: String,
    id: Option<String>,
    expectations: Expectations,
}

impl DeleteExpectationBuilder {
    /// Sets the expectation to return a successful result.
    pub fn return_ok(self) {
        self.push(Ok(()));
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: TransportError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<(), TransportError>) {
        let mut exps = self.expectations.lock().unwrap();
        exps.push_back(Expectation::Delete {
            kind: self.kind,
            id: self.id,
            response,
        });
    }
}
