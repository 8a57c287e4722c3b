//! Alpine package repository provider.
//!
//! The latest version of a package is read from the repository index:
//!
//! ```text
//! {mirror}/alpine/v{versionId}/{repository}/{arch}/APKINDEX.tar.gz
//! ```
//!
//! The archive is a gzip-compressed tar (in practice several concatenated
//! gzip members: a signature, then the index) holding a plain-text `APKINDEX`
//! entry. The index is a sequence of records separated by blank lines, each
//! line carrying a one-letter field prefix:
//!
//! ```text
//! P:nginx
//! V:1.18.0-r1
//! A:x86_64
//! ```
//!
//! Only `P:` (name), `V:` (version) and `A:` (arch) are read.

use anyhow::{Context, Result};
use flate2::read::MultiGzDecoder;
use std::io::Read;
use tracing::{debug, info};

use super::VersionProvider;
use crate::constants::{ALPINE_INDEX_ARCHIVE, ALPINE_INDEX_ENTRY};
use crate::core::GojoError;
use crate::manifest::{AlpineSource, SemverRange};

/// Looks up a package in one Alpine repository, branch and architecture.
#[derive(Debug, Clone)]
pub struct AlpineProvider {
    client: reqwest::Client,
    mirror: String,
    arch: String,
    version_id: String,
    repository: String,
    package: String,
}

/// Metadata of one package record in an APKINDEX.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApkPackage {
    pub name: String,
    pub version: String,
    pub arch: String,
}

impl ApkPackage {
    fn ensure_complete(&self) -> Result<(), GojoError> {
        let missing = if self.name.is_empty() {
            "Name"
        } else if self.arch.is_empty() {
            "Arch"
        } else if self.version.is_empty() {
            "Version"
        } else {
            return Ok(());
        };

        Err(GojoError::validation(format!("Alpine package meta field is empty: {missing}")))
    }
}

impl AlpineProvider {
    /// Creates a provider, applying the default mirror and architecture.
    pub fn new(client: reqwest::Client, source: &AlpineSource) -> Self {
        Self {
            client,
            mirror: source.mirror_or_default().trim_end_matches('/').to_string(),
            arch: source.arch_or_default().to_string(),
            version_id: source.version_id.clone(),
            repository: source.repository.clone(),
            package: source.package.clone(),
        }
    }

    /// URL of the repository index archive.
    #[must_use]
    pub fn index_url(&self) -> String {
        format!(
            "{}/alpine/v{}/{}/{}/{}",
            self.mirror, self.version_id, self.repository, self.arch, ALPINE_INDEX_ARCHIVE
        )
    }

    async fn fetch_archive(&self) -> Result<Vec<u8>> {
        let url = self.index_url();
        debug!(target: "provider::alpine", "Fetching {}", url);

        let response = self.client.get(&url).send().await.map_err(|e| GojoError::FetchError {
            url: url.clone(),
            reason: e.to_string(),
        })?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(GojoError::FetchError {
                url,
                reason: format!("error getting apk index file: HTTP {status}"),
            }
            .into());
        }

        let bytes = response.bytes().await.map_err(|e| GojoError::FetchError {
            url: url.clone(),
            reason: format!("failed to read response body: {e}"),
        })?;

        Ok(bytes.to_vec())
    }
}

impl VersionProvider for AlpineProvider {
    fn kind(&self) -> &'static str {
        "alpine"
    }

    async fn get_latest(&self, range: Option<&SemverRange>) -> Result<String> {
        info!(
            target: "provider::alpine",
            "Looking up {} in {}/{} (v{})", self.package, self.repository, self.arch, self.version_id
        );
        if let Some(range) = range {
            debug!(target: "provider::alpine", "Ignoring semver range '{}': an index lists one version per package", range);
        }

        let archive = self.fetch_archive().await?;
        let index = tokio::task::spawn_blocking(move || extract_index(&archive))
            .await
            .context("APKINDEX extraction task failed")??;

        let package = parse_apk_index(&index, &self.package)?;
        info!(
            target: "provider::alpine",
            "Found {} {} ({})", package.name, package.version, package.arch
        );

        Ok(package.version)
    }
}

/// Extracts the `APKINDEX` entry from a gzip-compressed tar archive.
///
/// Concatenated gzip members and tar segments are read as one stream.
///
/// # Errors
///
/// [`GojoError::ArchiveError`] when the archive cannot be read or holds no
/// regular `APKINDEX` file.
pub fn extract_index(archive: &[u8]) -> Result<String> {
    let archive_error = |reason: String| GojoError::ArchiveError {
        entry: ALPINE_INDEX_ENTRY.to_string(),
        reason,
    };

    let mut tar = tar::Archive::new(MultiGzDecoder::new(archive));
    tar.set_ignore_zeros(true);

    let entries = tar.entries().map_err(|e| archive_error(e.to_string()))?;
    for entry in entries {
        let mut entry = entry.map_err(|e| archive_error(e.to_string()))?;
        if !entry.header().entry_type().is_file() {
            continue;
        }

        let is_index = entry.path().map(|p| p.as_os_str() == ALPINE_INDEX_ENTRY).unwrap_or(false);
        if is_index {
            let mut content = String::new();
            entry.read_to_string(&mut content).map_err(|e| archive_error(e.to_string()))?;
            return Ok(content);
        }
    }

    Err(archive_error("file not found in archive".to_string()).into())
}

/// Finds `package` in the text of an APKINDEX.
///
/// Records are scanned in order. A blank line closes the current record: if
/// its name matches, scanning stops; otherwise the record is discarded. The
/// end of input also closes the last record, so a trailing blank line is not
/// required.
///
/// # Errors
///
/// - [`GojoError::NotFound`] when no record has the requested name
/// - [`GojoError::ValidationError`] when the matching record lacks its name,
///   arch or version
pub fn parse_apk_index(index: &str, package: &str) -> Result<ApkPackage> {
    let not_found = || GojoError::NotFound {
        what: format!("package '{package}' in APKINDEX"),
    };

    if package.is_empty() {
        return Err(not_found().into());
    }

    let mut current = ApkPackage::default();
    for line in index.lines() {
        if line.is_empty() {
            if current.name == package {
                break;
            }
            current = ApkPackage::default();
            continue;
        }

        if let Some(name) = line.strip_prefix("P:") {
            current.name = name.to_string();
        } else if let Some(version) = line.strip_prefix("V:") {
            current.version = version.to_string();
        } else if let Some(arch) = line.strip_prefix("A:") {
            current.arch = arch.to_string();
        }
    }

    if current.name != package {
        return Err(not_found().into());
    }

    current.ensure_complete()?;
    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{ApkIndexFixture, apk_index_archive};

    fn kind_of(err: &anyhow::Error) -> Option<&GojoError> {
        err.downcast_ref::<GojoError>()
    }

    #[test]
    fn test_parse_finds_package() {
        let package = parse_apk_index(ApkIndexFixture::well_formed(), "nginx").unwrap();
        assert_eq!(
            package,
            ApkPackage {
                name: "nginx".to_string(),
                version: "1.18.0-r1".to_string(),
                arch: "x86_64".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_first_record() {
        let package = parse_apk_index(ApkIndexFixture::well_formed(), "mariadb").unwrap();
        assert_eq!(package.version, "10.4.17-r1");
    }

    #[test]
    fn test_parse_missing_package() {
        let err = parse_apk_index(ApkIndexFixture::well_formed(), "missing").unwrap_err();
        assert!(matches!(kind_of(&err), Some(GojoError::NotFound { .. })));
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_parse_incomplete_record() {
        let err = parse_apk_index(ApkIndexFixture::missing_arch(), "nginx").unwrap_err();
        match kind_of(&err) {
            Some(GojoError::ValidationError {
                reason,
            }) => assert_eq!(reason, "Alpine package meta field is empty: Arch"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_bad_formatting() {
        // the indented V: line is not a field, so nginx has no version
        let err = parse_apk_index(ApkIndexFixture::bad_formatting(), "nginx").unwrap_err();
        match kind_of(&err) {
            Some(GojoError::ValidationError {
                reason,
            }) => assert!(reason.ends_with("Version")),
            other => panic!("unexpected error: {other:?}"),
        }

        // the garbage line does not break the other record
        let mariadb = parse_apk_index(ApkIndexFixture::bad_formatting(), "mariadb").unwrap();
        assert_eq!(mariadb.arch, "x86_64");
    }

    #[test]
    fn test_parse_last_record_without_trailing_blank_line() {
        let package = parse_apk_index(ApkIndexFixture::no_trailing_blank_line(), "nginx").unwrap();
        assert_eq!(package.version, "1.18.0-r1");
    }

    #[test]
    fn test_parse_crlf_lines() {
        let index = "P:nginx\r\nV:1.18.0-r1\r\nA:x86_64\r\n\r\n";
        assert_eq!(parse_apk_index(index, "nginx").unwrap().version, "1.18.0-r1");
    }

    #[test]
    fn test_parse_empty_package_name() {
        let err = parse_apk_index(ApkIndexFixture::well_formed(), "").unwrap_err();
        assert!(matches!(kind_of(&err), Some(GojoError::NotFound { .. })));
    }

    #[test]
    fn test_extract_index() {
        let archive = apk_index_archive(&[
            ("DESCRIPTION", "v3.13.0-1-g1234"),
            ("APKINDEX", ApkIndexFixture::well_formed()),
        ])
        .unwrap();

        assert_eq!(extract_index(&archive).unwrap(), ApkIndexFixture::well_formed());
    }

    #[test]
    fn test_extract_index_from_concatenated_members() {
        let mut archive = apk_index_archive(&[(".SIGN.RSA.alpine-devel.rsa.pub", "signature")]).unwrap();
        archive.extend(apk_index_archive(&[("APKINDEX", ApkIndexFixture::well_formed())]).unwrap());

        assert_eq!(extract_index(&archive).unwrap(), ApkIndexFixture::well_formed());
    }

    #[test]
    fn test_extract_missing_entry() {
        let archive = apk_index_archive(&[("DESCRIPTION", "nothing here")]).unwrap();
        let err = extract_index(&archive).unwrap_err();

        match kind_of(&err) {
            Some(GojoError::ArchiveError {
                reason, ..
            }) => assert_eq!(reason, "file not found in archive"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_extract_not_gzip() {
        let err = extract_index(b"plain text, not an archive").unwrap_err();
        assert!(matches!(kind_of(&err), Some(GojoError::ArchiveError { .. })));
    }

    #[test]
    fn test_index_url_custom_mirror() {
        let source = AlpineSource {
            package: "nginx".to_string(),
            repository: "community".to_string(),
            version_id: "3.12".to_string(),
            arch: Some("aarch64".to_string()),
            mirror: Some("https://mirror.example.com/".to_string()),
        };
        let provider = AlpineProvider::new(reqwest::Client::new(), &source);

        assert_eq!(
            provider.index_url(),
            "https://mirror.example.com/alpine/v3.12/community/aarch64/APKINDEX.tar.gz"
        );
    }
}
