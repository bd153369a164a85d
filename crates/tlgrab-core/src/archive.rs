//! Bundle archive creation.

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;
use xz2::write::XzEncoder;

const XZ_LEVEL: u32 = 6;

/// Dated archive file name: `<package>-<YYYYMMDD>.tar.xz`.
pub fn archive_name(package: &str) -> String {
    format!("{package}-{}.tar.xz", chrono::Utc::now().format("%Y%m%d"))
}

/// Creates a flat `.tar.xz` of the files directly under `dir`; entry names
/// are the bare file names. Subdirectories are not descended into. Entries
/// are appended in sorted name order so the archive is reproducible for a
/// given input tree.
///
/// # Errors
///
/// Fails on filesystem errors while listing `dir` or writing `output`.
pub fn create_archive(dir: &Path, output: &Path) -> Result<()> {
    info!("creating tar file {}", output.display());
    let file = File::create(output)
        .with_context(|| format!("creating archive {}", output.display()))?;
    let mut builder = tar::Builder::new(XzEncoder::new(file, XZ_LEVEL));

    let mut paths: Vec<_> = std::fs::read_dir(dir)
        .with_context(|| format!("listing {}", dir.display()))?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    paths.sort();

    for path in paths {
        let name = path
            .file_name()
            .with_context(|| format!("archive entry {} has no file name", path.display()))?;
        builder
            .append_path_with_name(&path, name)
            .with_context(|| format!("adding {} to archive", path.display()))?;
    }

    let encoder = builder
        .into_inner()
        .context("finalizing archive contents")?;
    encoder.finish().context("finalizing xz stream")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use xz2::read::XzDecoder;

    #[test]
    fn name_is_dated() {
        let name = archive_name("texlive-core");
        assert!(name.starts_with("texlive-core-"));
        assert!(name.ends_with(".tar.xz"));
        // texlive-core-YYYYMMDD.tar.xz
        assert_eq!(name.len(), "texlive-core-".len() + 8 + ".tar.xz".len());
    }

    #[test]
    fn archive_is_flat_and_sorted() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.tar.xz"), "bb").unwrap();
        std::fs::write(dir.path().join("a.tar.xz"), "aa").unwrap();
        std::fs::write(dir.path().join("CONTENTS"), "header\n").unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("nested").join("skip"), "no").unwrap();

        let out_dir = tempfile::tempdir().unwrap();
        let out = out_dir.path().join("bundle.tar.xz");
        create_archive(dir.path(), &out).unwrap();

        let mut archive = tar::Archive::new(XzDecoder::new(File::open(&out).unwrap()));
        let names: Vec<String> = archive
            .entries()
            .unwrap()
            .map(|entry| {
                entry
                    .unwrap()
                    .path()
                    .unwrap()
                    .to_string_lossy()
                    .into_owned()
            })
            .collect();
        assert_eq!(names, vec!["CONTENTS", "a.tar.xz", "b.tar.xz"]);
    }
}
