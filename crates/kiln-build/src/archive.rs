//! Artifact archive writing.
//!
//! Both artifacts are zip archives. The source archive carries the staged
//! tree under a `<name>-<version>/` prefix. The package archive carries the
//! payload under `<name>/` plus two generated entries: `METADATA` (rendered
//! manifest fields) and `RECORD` (one `path,sha256,size` line per entry,
//! RECORD itself last with an empty hash so installs can verify integrity).

use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use zip::ZipWriter;
use zip::write::FileOptions;

use kiln_manifest::Manifest;

use crate::error::BuildError;

/// Name of the rendered metadata entry inside the package archive.
pub const METADATA_NAME: &str = "METADATA";

/// Name of the integrity manifest inside the package archive.
pub const RECORD_NAME: &str = "RECORD";

/// Hex sha256 of a byte slice.
#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Hex sha256 of a file's contents.
pub fn sha256_file(path: &Path) -> Result<String, BuildError> {
    let mut file =
        File::open(path).map_err(|e| BuildError::io(path.display().to_string(), e))?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 64 * 1024];
    loop {
        let read = file
            .read(&mut buf)
            .map_err(|e| BuildError::io(path.display().to_string(), e))?;
        if read == 0 {
            break;
        }
        hasher.update(&buf[..read]);
    }
    Ok(format!("{:x}", hasher.finalize()))
}

/// Write the source archive: the staged tree under `<name>-<version>/`.
pub fn write_src_archive(
    stage_dir: &Path,
    staged: &[PathBuf],
    manifest: &Manifest,
    dest: &Path,
) -> Result<(), BuildError> {
    let file = File::create(dest).map_err(|e| BuildError::io(dest.display().to_string(), e))?;
    let mut zip = ZipWriter::new(file);
    let options: FileOptions = FileOptions::default();
    let prefix = manifest.name_version();

    for relative in staged {
        let bytes = read_staged(stage_dir, relative)?;
        zip.start_file(format!("{prefix}/{}", zip_name(relative)), options)?;
        zip.write_all(&bytes)
            .map_err(|e| BuildError::io(dest.display().to_string(), e))?;
    }

    zip.finish()?;
    Ok(())
}

/// Write the package archive: payload under `<name>/`, then METADATA and
/// RECORD.
pub fn write_pkg_archive(
    stage_dir: &Path,
    staged: &[PathBuf],
    manifest: &Manifest,
    dest: &Path,
) -> Result<(), BuildError> {
    let file = File::create(dest).map_err(|e| BuildError::io(dest.display().to_string(), e))?;
    let mut zip = ZipWriter::new(file);
    let options: FileOptions = FileOptions::default();

    let mut record_lines = Vec::with_capacity(staged.len() + 2);

    for relative in staged {
        let bytes = read_staged(stage_dir, relative)?;
        let name = format!("{}/{}", manifest.name, zip_name(relative));
        record_lines.push(format!("{name},{},{}", sha256_hex(&bytes), bytes.len()));
        zip.start_file(name, options)?;
        zip.write_all(&bytes)
            .map_err(|e| BuildError::io(dest.display().to_string(), e))?;
    }

    let metadata = render_metadata(manifest);
    record_lines.push(format!(
        "{METADATA_NAME},{},{}",
        sha256_hex(metadata.as_bytes()),
        metadata.len()
    ));
    zip.start_file(METADATA_NAME, options)?;
    zip.write_all(metadata.as_bytes())
        .map_err(|e| BuildError::io(dest.display().to_string(), e))?;

    // RECORD lists itself last, with no hash.
    record_lines.push(format!("{RECORD_NAME},,"));
    let record = record_lines.join("\n") + "\n";
    zip.start_file(RECORD_NAME, options)?;
    zip.write_all(record.as_bytes())
        .map_err(|e| BuildError::io(dest.display().to_string(), e))?;

    zip.finish()?;
    Ok(())
}

/// Render manifest fields as `Key: Value` metadata text.
#[must_use]
pub fn render_metadata(manifest: &Manifest) -> String {
    let mut lines = vec![
        format!("Name: {}", manifest.name),
        format!("Version: {}", manifest.version),
    ];
    if !manifest.description.is_empty() {
        lines.push(format!("Summary: {}", manifest.description));
    }
    for author in &manifest.authors {
        lines.push(format!("Author: {author}"));
    }
    if !manifest.keywords.is_empty() {
        lines.push(format!("Keywords: {}", manifest.keywords.join(",")));
    }
    for classifier in &manifest.classifiers {
        lines.push(format!("Classifier: {classifier}"));
    }
    if let Some(req) = &manifest.requires_runtime {
        lines.push(format!("Requires-Runtime: {req}"));
    }
    for (label, url) in &manifest.urls {
        lines.push(format!("Project-URL: {label}, {url}"));
    }
    for (dep, req) in &manifest.dependencies {
        lines.push(format!("Requires-Dist: {dep} ({req})"));
    }
    for (group, deps) in &manifest.extras {
        lines.push(format!("Provides-Extra: {group}"));
        for (dep, req) in deps {
            lines.push(format!("Requires-Dist: {dep} ({req}); extra == '{group}'"));
        }
    }
    lines.join("\n") + "\n"
}

fn read_staged(stage_dir: &Path, relative: &Path) -> Result<Vec<u8>, BuildError> {
    let path = stage_dir.join(relative);
    std::fs::read(&path).map_err(|e| BuildError::io(path.display().to_string(), e))
}

/// Zip entry names always use forward slashes.
fn zip_name(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;
    use zip::ZipArchive;

    use super::*;

    fn fixture() -> (tempfile::TempDir, Manifest, Vec<PathBuf>) {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("kiln.toml"),
            r#"
            [project]
            name = "haru"
            version = "0.1.0"
            description = "The framework for web applications."
            authors = ["t3tra"]

            [project.extras]
            sql = { relational-mapping = ">=2.0.0" }
            "#,
        )
        .unwrap();
        let manifest = Manifest::load(dir.path()).unwrap();

        let stage = dir.path().join("stage");
        fs::create_dir_all(stage.join("src")).unwrap();
        fs::write(stage.join("src/app.rs"), b"fn main() {}").unwrap();
        (dir, manifest, vec![PathBuf::from("src/app.rs")])
    }

    #[test]
    fn src_archive_prefixes_entries() {
        let (dir, manifest, staged) = fixture();
        let dest = dir.path().join("haru-0.1.0.src.zip");
        write_src_archive(&dir.path().join("stage"), &staged, &manifest, &dest).unwrap();

        let mut archive = ZipArchive::new(File::open(&dest).unwrap()).unwrap();
        assert_eq!(archive.len(), 1);
        assert!(archive.by_name("haru-0.1.0/src/app.rs").is_ok());
    }

    #[test]
    fn pkg_archive_carries_metadata_and_record() {
        let (dir, manifest, staged) = fixture();
        let dest = dir.path().join("haru-0.1.0.pkg.zip");
        write_pkg_archive(&dir.path().join("stage"), &staged, &manifest, &dest).unwrap();

        let mut archive = ZipArchive::new(File::open(&dest).unwrap()).unwrap();
        let mut record = String::new();
        archive
            .by_name(RECORD_NAME)
            .unwrap()
            .read_to_string(&mut record)
            .unwrap();

        let lines: Vec<&str> = record.trim_end().lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("haru/src/app.rs,"));
        assert!(lines[1].starts_with("METADATA,"));
        assert_eq!(lines[2], "RECORD,,");

        let expected_hash = sha256_hex(b"fn main() {}");
        assert!(lines[0].contains(&expected_hash));
    }

    #[test]
    fn metadata_renders_extras() {
        let (_dir, manifest, _) = fixture();
        let metadata = render_metadata(&manifest);
        assert!(metadata.contains("Name: haru"));
        assert!(metadata.contains("Provides-Extra: sql"));
        assert!(metadata.contains("Requires-Dist: relational-mapping (>=2.0.0); extra == 'sql'"));
    }
}
