//! Containerfile generated by `gojo scaffold`.
//!
//! The image installs its package from the Alpine repositories pinned to the
//! `VERSION` build argument. When a builder base image is declared and the
//! first source is a GitHub repository, a builder stage compiles the project
//! from the release tarball and the binary is copied into the final image.

use serde::Serialize;
use tera::{Context as TeraContext, Tera};

use crate::constants::BUILDER_TARGET;
use crate::core::GojoError;
use crate::manifest::Build;

const CONTAINERFILE_TEMPLATE: &str = r#"ARG FROM_IMAGE
{%- if builder %}
ARG FROM_IMAGE_BUILDER
FROM ${FROM_IMAGE_BUILDER} AS builder

ARG VERSION

RUN apk add --no-cache git make curl gcc libc-dev ncurses
{%- if github %}

RUN curl -OL "https://github.com/{{ github.owner }}/{{ github.repository }}/archive/v${VERSION}.tar.gz" && \
    tar zxf "v${VERSION}.tar.gz" && cd "{{ github.repository }}-${VERSION}" && \
    make && mv ./{{ github.repository }} /go/bin/{{ github.repository }}
{%- endif %}
{%- endif %}

FROM ${FROM_IMAGE}

ARG VERSION
{%- if builder and github %}

COPY --from=builder /go/bin/{{ github.repository }} /usr/local/bin/{{ github.repository }}
{%- endif %}

RUN apk add --no-cache "{{ package }}~=${VERSION}"

COPY entrypoint.sh /usr/local/bin/entrypoint.sh

ENTRYPOINT ["/usr/local/bin/entrypoint.sh"]
"#;

#[derive(Debug, Serialize)]
struct GitHubView<'a> {
    owner: &'a str,
    repository: &'a str,
}

/// Renders the scaffold Containerfile for `build`.
///
/// # Errors
///
/// [`GojoError::ValidationError`] when the build has no image, or
/// [`GojoError::TemplateError`] if rendering fails.
pub fn render_containerfile(build: &Build) -> Result<String, GojoError> {
    let image = build.image()?;
    let builder = build
        .spec
        .from_images
        .iter()
        .any(|from| from.target.as_deref() == Some(BUILDER_TARGET));
    let github = build.spec.sources.first().and_then(|source| source.github.as_ref()).map(|github| {
        GitHubView {
            owner: &github.owner,
            repository: &github.repository,
        }
    });

    let mut context = TeraContext::new();
    context.insert("builder", &builder);
    context.insert("github", &github);
    context.insert("package", &image.name);

    Tera::default().render_str(CONTAINERFILE_TEMPLATE, &context).map_err(|e| GojoError::TemplateError {
        reason: format!("failed to render Containerfile: {e}"),
    })
}
