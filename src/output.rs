//! Output files: where the assembled site lands on disk.
//!
//! The writer is deliberately dumb: every decision about what goes into
//! `converted.html` and whether a `styles.css` exists was already made by
//! [`crate::pipeline::assemble`]. Here we only create the directory and put
//! bytes in place, all files or none.

use crate::error::Img2HtmlError;
use crate::pipeline::assemble::AssembledSite;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// File name of the generated page.
pub const HTML_FILE_NAME: &str = "converted.html";

/// File name of the externalised stylesheet.
pub const CSS_FILE_NAME: &str = "styles.css";

/// Paths of the files written by a conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputArtifacts {
    /// `<output_dir>/converted.html`, always written.
    pub html_path: PathBuf,
    /// `<output_dir>/styles.css`, present only when the CSS was externalised.
    pub css_path: Option<PathBuf>,
}

/// Write the assembled site into `output_dir`.
///
/// Creates the directory (and parents) if needed; an existing directory is
/// fine. Existing `converted.html` / `styles.css` are overwritten.
///
/// Both files are first written to `.tmp` siblings and only renamed into
/// place once every one of them is on disk. On failure the temp files are
/// removed, and a stylesheet already renamed is removed again, so an error
/// never leaves a `styles.css` without its page.
pub async fn write_site(
    site: &AssembledSite,
    output_dir: &Path,
) -> Result<OutputArtifacts, Img2HtmlError> {
    tokio::fs::create_dir_all(output_dir)
        .await
        .map_err(|e| Img2HtmlError::OutputWriteFailed {
            path: output_dir.to_path_buf(),
            source: e,
        })?;

    let html_path = output_dir.join(HTML_FILE_NAME);
    let css_path = site.css.as_ref().map(|_| output_dir.join(CSS_FILE_NAME));

    // Stylesheet first: the page is the last file to appear.
    let mut files: Vec<(&Path, &str)> = Vec::with_capacity(2);
    if let (Some(path), Some(css)) = (css_path.as_deref(), site.css.as_deref()) {
        files.push((path, css));
    }
    files.push((html_path.as_path(), site.html.as_str()));

    for (path, contents) in &files {
        if let Err(e) = write_tmp(path, contents).await {
            discard_tmp(&files).await;
            return Err(e);
        }
    }

    let mut committed: Vec<&Path> = Vec::with_capacity(files.len());
    for (path, _) in &files {
        if let Err(e) = commit(path).await {
            discard_tmp(&files).await;
            for done in &committed {
                remove_quietly(done).await;
            }
            return Err(e);
        }
        committed.push(*path);
    }

    if let Some(ref path) = css_path {
        info!("CSS saved to {}", path.display());
    }
    info!("HTML saved to {}", html_path.display());

    Ok(OutputArtifacts {
        html_path,
        css_path,
    })
}

async fn write_tmp(path: &Path, contents: &str) -> Result<(), Img2HtmlError> {
    let tmp_path = tmp_sibling(path);
    debug!("Writing {} bytes via {}", contents.len(), tmp_path.display());

    tokio::fs::write(&tmp_path, contents)
        .await
        .map_err(|e| Img2HtmlError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })
}

async fn commit(path: &Path) -> Result<(), Img2HtmlError> {
    tokio::fs::rename(tmp_sibling(path), path)
        .await
        .map_err(|e| Img2HtmlError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })
}

async fn discard_tmp(files: &[(&Path, &str)]) {
    for (path, _) in files {
        remove_quietly(&tmp_sibling(path)).await;
    }
}

/// Best-effort cleanup; a missing file is the expected case.
async fn remove_quietly(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!("Could not remove {}: {}", path.display(), e);
        }
    }
}

fn tmp_sibling(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site(html: &str, css: Option<&str>) -> AssembledSite {
        AssembledSite {
            html: html.to_string(),
            css: css.map(str::to_string),
        }
    }

    #[test]
    fn tmp_sibling_appends_suffix() {
        assert_eq!(
            tmp_sibling(Path::new("out/converted.html")),
            PathBuf::from("out/converted.html.tmp")
        );
    }

    #[tokio::test]
    async fn writes_html_and_css() {
        let dir = tempfile::tempdir().unwrap();
        let out = write_site(&site("<p>hi</p>", Some("p{}")), dir.path())
            .await
            .unwrap();

        assert_eq!(out.html_path, dir.path().join("converted.html"));
        assert_eq!(out.css_path, Some(dir.path().join("styles.css")));
        assert_eq!(std::fs::read_to_string(&out.html_path).unwrap(), "<p>hi</p>");
        assert_eq!(
            std::fs::read_to_string(out.css_path.unwrap()).unwrap(),
            "p{}"
        );
        assert!(!dir.path().join("converted.html.tmp").exists());
    }

    #[tokio::test]
    async fn html_only_when_css_not_externalised() {
        let dir = tempfile::tempdir().unwrap();
        let out = write_site(&site("<p>hi</p>", None), dir.path()).await.unwrap();
        assert!(out.css_path.is_none());
        assert!(!dir.path().join("styles.css").exists());
    }

    #[tokio::test]
    async fn creates_nested_directories_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b/c");

        write_site(&site("first", None), &nested).await.unwrap();
        let out = write_site(&site("second", None), &nested).await.unwrap();

        assert_eq!(std::fs::read_to_string(out.html_path).unwrap(), "second");
    }

    #[tokio::test]
    async fn unwritable_directory_is_an_output_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "not a dir").unwrap();

        let err = write_site(&site("x", None), &blocker.join("sub"))
            .await
            .unwrap_err();
        assert!(matches!(err, Img2HtmlError::OutputWriteFailed { .. }));
    }

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn failed_page_rename_leaves_no_stylesheet_or_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("converted.html")).unwrap();

        let err = write_site(&site("<p>hi</p>", Some("p{}")), dir.path())
            .await
            .unwrap_err();

        match err {
            Img2HtmlError::OutputWriteFailed { path, .. } => {
                assert_eq!(path, dir.path().join("converted.html"))
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(entries(dir.path()), vec!["converted.html".to_string()]);
    }

    #[tokio::test]
    async fn failed_staging_replaces_nothing() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("styles.css"), "old").unwrap();
        // A directory squatting on the temp name makes the page write fail.
        std::fs::create_dir(dir.path().join("converted.html.tmp")).unwrap();

        let err = write_site(&site("<p>hi</p>", Some("p{}")), dir.path())
            .await
            .unwrap_err();

        assert!(matches!(err, Img2HtmlError::OutputWriteFailed { .. }));
        assert_eq!(
            std::fs::read_to_string(dir.path().join("styles.css")).unwrap(),
            "old"
        );
        assert!(!dir.path().join("styles.css.tmp").exists());
        assert!(!dir.path().join("converted.html").exists());
    }
}
