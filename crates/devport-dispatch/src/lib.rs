//! devport-dispatch — response-transforming middleware for the DevPort
//! gateway.
//!
//! A dispatch chain sits between the transport and normal routing. Each
//! stage inspects the in-flight request and either defers to the next
//! stage or produces the final response itself, optionally by calling
//! through to routing and transforming what comes back.
//!
//! # Architecture
//!
//! ```text
//! inbound request
//!   │
//!   ▼
//! DispatchChain::run
//!   ├── stage 1 → Continue
//!   ├── stage 2 → Bypass(response)   first match wins, chain stops
//!   ├── stage 3                      (never evaluated)
//!   ▼
//! terminal handler (normal application routing)
//! ```
//!
//! The chain is single-pass: responses are not re-processed by earlier
//! stages. A stage that needs to observe the final response calls the
//! terminal itself, as [`DecompressStage`] does.

pub mod chain;
pub mod decompress;
pub mod error;
pub mod pattern;
pub mod transform;

pub use chain::{BoxFuture, DispatchChain, DispatchStage, Outcome, Terminal};
pub use decompress::DecompressStage;
pub use error::{DispatchError, DispatchResult};
pub use pattern::{PatternError, UrlPattern};
pub use transform::{DEFAULT_MAX_BUFFER, maybe_decompress};
