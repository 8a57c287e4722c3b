//! Global constants used throughout the gojo codebase.
//!
//! File names, provider defaults and environment variable names live here so
//! the CLI, the providers and the tests agree on them.

use std::time::Duration;

/// Default name of the build manifest inside an image directory.
pub const DEFAULT_BUILD_FILE_NAME: &str = ".build.yaml";

/// Default name of the Containerfile inside an image directory.
pub const DEFAULT_CONTAINERFILE_NAME: &str = "Containerfile";

/// Tag format written by `scaffold` for provider-backed images.
pub const TAG_FORMAT_VERSION: &str = "{{ .VERSION }}";

/// Name of the fact (and build argument) created by `scaffold`.
pub const VERSION_FACT_NAME: &str = "VERSION";

/// Implicit fact holding the build timestamp.
pub const DATE_FACT_NAME: &str = "date";

/// Implicit fact holding the short HEAD commit hash.
pub const GIT_COMMIT_FACT_NAME: &str = "gitCommit";

/// Fact names that manifests may not declare themselves.
pub const RESERVED_FACT_NAMES: [&str; 2] = [DATE_FACT_NAME, GIT_COMMIT_FACT_NAME];

/// `chrono` format for the `date` fact (`YYYYMMDDHHMMSS`).
pub const DATE_FACT_FORMAT: &str = "%Y%m%d%H%M%S";

/// Number of hex characters of the HEAD commit kept in `gitCommit`.
pub const GIT_SHORT_HASH_LEN: usize = 8;

/// Build argument carrying an untargeted base image.
pub const FROM_IMAGE_ARG: &str = "FROM_IMAGE";

/// Target assigned to the `--from-image-builder` base image.
pub const BUILDER_TARGET: &str = "builder";

/// Public Alpine CDN used when a source sets no mirror.
pub const ALPINE_DEFAULT_MIRROR: &str = "http://dl-cdn.alpinelinux.org";

/// Architecture used when an Alpine source sets none.
pub const ALPINE_DEFAULT_ARCH: &str = "x86_64";

/// Archive published next to every Alpine repository.
pub const ALPINE_INDEX_ARCHIVE: &str = "APKINDEX.tar.gz";

/// Entry inside [`ALPINE_INDEX_ARCHIVE`] holding the package index.
pub const ALPINE_INDEX_ENTRY: &str = "APKINDEX";

/// Default GitHub REST API endpoint.
pub const GITHUB_DEFAULT_API_URL: &str = "https://api.github.com";

/// Page size used when listing releases and tags.
pub const GITHUB_PAGE_SIZE: u32 = 30;

/// Environment variable holding an optional GitHub access token.
pub const GITHUB_TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Environment variable overriding the GitHub API endpoint.
pub const GITHUB_API_URL_ENV: &str = "GOJO_GITHUB_API_URL";

/// Environment variable supplying `--images-dir`.
pub const IMAGES_DIR_ENV: &str = "GOJO_IMAGES_DIR";

/// Default BuildKit frontend.
pub const DEFAULT_BUILDKIT_FRONTEND: &str = "dockerfile.v0";

/// Timeout for local git invocations (HEAD lookup, status, add, commit).
pub const GIT_LOCAL_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for `git push`.
pub const GIT_PUSH_TIMEOUT: Duration = Duration::from_secs(120);
