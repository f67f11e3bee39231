//! # Waypoint Test Suite
//!
//! Unified test crate covering flows that span more than one crate:
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── lifecycle.rs    # Request lifecycle against mock collaborators
//!     ├── expiration.rs   # Timer behavior, stale deliveries, real scheduler
//!     └── console.rs      # Command service + roster + engine end to end
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p waypoint-tests
//! cargo test -p waypoint-tests integration::lifecycle::
//! ```

#![allow(unused_imports)]
#![allow(dead_code)]

pub mod integration;
