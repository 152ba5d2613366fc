//! Integration tests for Roomboard.
//!
//! # Test Categories
//!
//! - `booking_engine` - End-to-end flows over the core engine: selectors
//!   driving the availability engine driving the stores, with no HTTP in
//!   between. These always run.
//! - `web_flows` - HTTP-level smoke tests against a running web binary.
//!   These are `#[ignore]`d by default; start the server first:
//!
//! ```bash
//! cargo run -p roomboard-web &
//! cargo test -p roomboard-integration-tests -- --ignored
//! ```
