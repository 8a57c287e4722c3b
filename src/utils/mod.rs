//! Small helpers shared across gojo.
//!
//! # Modules
//!
//! - [`version`] - version string sanitizing
//! - [`fqin`] - parsing fully-qualified image names
//! - [`fs`] - atomic writes and text file helpers
//! - [`platform`] - path expansion and executable lookup
//!
//! # Example
//!
//! ```rust
//! use gojo::utils::{parse_fqin, sanitize_version};
//!
//! assert_eq!(sanitize_version("v1.2.3"), "1.2.3");
//!
//! let (registry, name, tag) = parse_fqin("registry.fqdn/project/name:tag").unwrap();
//! assert_eq!(registry, "registry.fqdn/project");
//! assert_eq!(name, "name");
//! assert_eq!(tag, "tag");
//! ```

pub mod fqin;
pub mod fs;
pub mod platform;
pub mod version;

pub use fqin::parse_fqin;
pub use fs::{atomic_write, ensure_dir, safe_write};
pub use platform::{command_exists, get_git_command, resolve_path};
pub use version::sanitize_version;
