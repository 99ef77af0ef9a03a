//! # Observability & Tracing
//!
//! Structured logging for the engine and its callers.
//!
//! ## What Gets Traced
//!
//! - **Lifecycle transitions**: `Created`, `Updated`, `Deleted`, `Absent` at `info`, with `kind`
//!   and `id` fields.
//! - **Requests**: every PUT/GET/DELETE at `debug`.
//! - **Failures**: `warn` with the error rendered as a field.
//!
//! Secrets never appear: declared states and credentials are skipped in spans and redacted in
//! their `Debug` impls.
//!
//! ## Usage Examples
//!
//! ```bash
//! # Lifecycle transitions only (default)
//! aidbox-provider read aidbox_user --id u1
//!
//! # Per-request detail
//! RUST_LOG=debug aidbox-provider read aidbox_user --id u1
//!
//! # Only the engine
//! RUST_LOG=reconcile_framework=debug aidbox-provider serve
//! ```
//!
//! Output goes to stderr so stdout stays reserved for JSON responses.
//!
//! ```text
//! DEBUG PUT kind="User" id="tf-9f0c…" fields=4
//!  INFO Created kind="User" id="tf-9f0c…"
//! DEBUG Read kind="User" id="tf-9f0c…" extensions=0
//! ```

use tracing_subscriber::EnvFilter;

/// Initializes tracing from `RUST_LOG`, falling back to `info`.
pub fn setup_tracing() {
    init(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")));
}

/// Initializes tracing for a command-line run.
///
/// `RUST_LOG` still wins when set; otherwise `verbose` selects `debug` over `info`.
pub fn setup_tracing_with_verbosity(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    init(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)));
}

fn init(filter: EnvFilter) {
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false) // kind/id fields identify the source
        .compact()
        .init();
}
