//! Test fixtures for build files and Alpine package indexes.

use anyhow::{Context, Result};
use flate2::Compression;
use flate2::write::GzEncoder;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::constants::DEFAULT_BUILD_FILE_NAME;

/// Build file contents for common scenarios.
#[derive(Clone, Debug)]
pub struct BuildFixture {
    pub content: String,
}

impl BuildFixture {
    /// nginx image with a `VERSION` fact resolved from an Alpine mirror.
    pub fn alpine(mirror: &str) -> Self {
        Self {
            content: format!(
                r#"image:
  registry: registry.example.com/project
  name: nginx
  tag: ""
spec:
  fromImages:
    - registry: docker.io/library
      name: alpine
      tag: "3.13"
  buildArgs:
    - VERSION
  tagFormat: "{{{{ .VERSION }}}}"
  facts:
    - name: VERSION
      value: ""
      source: alpine
      kind: version
  sources:
    - name: alpine
      alpine:
        package: nginx
        repository: main
        versionId: "3.13"
        mirror: {mirror}
"#
            ),
        }
    }

    /// Image with a `VERSION` fact resolved from GitHub tags.
    pub fn github_tags(owner: &str, repository: &str) -> Self {
        Self {
            content: format!(
                r#"image:
  registry: registry.example.com/project
  name: {repository}
  tag: ""
spec:
  fromImages:
    - registry: docker.io/library
      name: alpine
      tag: "3.13"
    - registry: docker.io/library
      name: golang
      tag: "1.16"
      target: builder
  buildArgs:
    - VERSION
  tagFormat: "{{{{ .VERSION }}}}-{{{{ .gitCommit }}}}"
  facts:
    - name: VERSION
      value: ""
      source: github
      kind: version
  sources:
    - name: github
      github:
        owner: {owner}
        repository: {repository}
        object: tag
"#
            ),
        }
    }

    /// Image whose facts are all static; no sources.
    pub fn static_only() -> Self {
        Self {
            content: r#"image:
  registry: registry.example.com/project
  name: tools
  tag: "1.0.0"
spec:
  fromImages:
    - registry: docker.io/library
      name: alpine
      tag: "3.13"
  buildArgs:
    - VERSION
  tagFormat: "{{ .VERSION }}"
  facts:
    - name: VERSION
      value: 1.0.0
      kind: version
"#
            .to_string(),
        }
    }

    /// Writes the fixture as `.build.yaml` inside `dir` and returns its path.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
        let path = dir.join(DEFAULT_BUILD_FILE_NAME);
        fs::write(&path, &self.content).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }
}

/// Plain-text APKINDEX contents.
pub struct ApkIndexFixture;

impl ApkIndexFixture {
    pub fn well_formed() -> &'static str {
        "P:mariadb\nV:10.4.17-r1\nA:x86_64\n\nP:nginx\nV:1.18.0-r1\nA:x86_64\n\n"
    }

    /// nginx record without an `A:` line.
    pub fn missing_arch() -> &'static str {
        "P:mariadb\nV:10.4.17-r1\nA:x86_64\n\nP:nginx\nV:1.18.0-r1\n\n"
    }

    /// Garbage line in one record and an indented `V:` line in the nginx record.
    pub fn bad_formatting() -> &'static str {
        "P:mariadb\nV:10.4.17-r1\n\\\\\\\nA:x86_64\n\nP:nginx\n\t\t\t\tV:1.18.0-r1\nA:x86_64\n\n"
    }

    /// nginx is the last record and the file has no trailing blank line.
    pub fn no_trailing_blank_line() -> &'static str {
        "P:mariadb\nV:10.4.17-r1\nA:x86_64\n\nP:nginx\nV:1.18.0-r1\nA:x86_64"
    }
}

/// Builds a gzip-compressed tar archive holding `entries` as regular files.
pub fn apk_index_archive(entries: &[(&str, &str)]) -> Result<Vec<u8>> {
    let mut builder = tar::Builder::new(Vec::new());
    for (name, content) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        header.set_entry_type(tar::EntryType::Regular);
        builder
            .append_data(&mut header, name, content.as_bytes())
            .with_context(|| format!("Failed to append {name} to archive"))?;
    }
    let tar_bytes = builder.into_inner().context("Failed to finish tar archive")?;

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&tar_bytes).context("Failed to compress archive")?;
    encoder.finish().context("Failed to finish gzip stream")
}
