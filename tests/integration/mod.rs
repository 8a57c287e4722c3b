//! Integration test suite for gojo
//!
//! End-to-end tests running the `gojo` binary against throwaway images
//! directories. Remote providers are served by wiremock; builder tools only
//! run in `--dry-run` mode.
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! - **build**: builder command plans
//! - **commit**: committing and pushing build files
//! - **facts**: fact resolution and tag computation
//! - **scaffold**: new image directories
//! - **version**: version output

#[path = "../common/mod.rs"]
mod common;

mod build;
mod commit;
mod facts;
mod scaffold;
mod version;
