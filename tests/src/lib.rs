//! # Validator Bootstrap Test Suite
//!
//! Cross-crate scenarios that drive the join orchestrator end to end.
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── join_flow.rs    # in-memory ports (StaticTopology, mock sources)
//!     └── http_stack.rs   # real HTTP adapters against a wiremock node
//! ```
//!
//! ```bash
//! cargo test -p vb-tests
//! cargo test -p vb-tests integration::http_stack::
//! ```

pub mod integration;
