//! Integration tests against a running server.
//!
//! Requires a server on localhost:8000 seeded with the bundled fixture:
//!
//! ```sh
//! libretto-server seed && libretto-server
//! cargo test -- --ignored
//! ```

mod api_tests;
