//! devport-gateway — HTTP front door for the DevPort runtime.
//!
//! Binds the listening socket and runs the dispatch chain ahead of
//! normal routing for every inbound request.
//!
//! # Architecture
//!
//! ```text
//! HTTP client
//!   │
//!   ▼
//! hyper server (task per connection)
//!   │
//!   ├── DispatchChain::run(request)
//!   │     ├── stage bypasses → its response
//!   │     └── all continue   → terminal → axum router
//!   │
//!   ▼
//! HTTP response
//! ```

pub mod server;

pub use server::{Gateway, router_terminal};
