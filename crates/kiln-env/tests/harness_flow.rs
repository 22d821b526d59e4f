//! End-to-end flow across build and environment crates: build artifacts,
//! create a fresh environment, install editable, resolve, tear down.

use std::fs;
use std::path::Path;

use kiln_build::{BuildOptions, build_project};
use kiln_core::environment::EnvPurpose;
use kiln_env::EnvStore;
use kiln_manifest::Manifest;

fn project() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("kiln.toml"),
        r#"
        [project]
        name = "haru"
        version = "0.1.0"
        description = "The framework for web applications."

        [entrypoints]
        test = "tests/frontend.sh"
        "#,
    )
    .unwrap();
    fs::create_dir_all(dir.path().join("src")).unwrap();
    fs::write(dir.path().join("src/app.rs"), b"pub fn run() {}").unwrap();
    dir
}

fn dist_file_names(root: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(root.join("dist"))
        .unwrap()
        .filter_map(Result::ok)
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn build_then_test_env_lifecycle() {
    let dir = project();
    let manifest = Manifest::load(dir.path()).unwrap();

    // Packaging: exactly one source archive and one package archive.
    let report = build_project(dir.path(), &manifest, &BuildOptions::default()).unwrap();
    assert_eq!(report.artifacts.len(), 2);
    assert_eq!(
        dist_file_names(dir.path()),
        vec![
            "haru-0.1.0.pkg.zip".to_string(),
            "haru-0.1.0.src.zip".to_string()
        ]
    );

    // Fresh environment, editable install, resolution check.
    let store = EnvStore::new(dir.path(), ".kiln/envs");
    let mut env = store.create("test", EnvPurpose::Test).unwrap();
    env.install_editable("haru", dir.path()).unwrap();
    assert_eq!(env.resolve("haru").unwrap(), dir.path());

    // Editable means live: edits show up without reinstalling.
    fs::write(dir.path().join("src/extra.rs"), b"pub fn extra() {}").unwrap();
    let resolved = env.resolve("haru").unwrap();
    assert!(resolved.join("src/extra.rs").is_file());

    // Teardown leaves no residual environment directory.
    env.teardown().unwrap();
    assert!(!dir.path().join(".kiln/envs/test").exists());
}

#[test]
fn whole_sequence_is_idempotent() {
    let dir = project();
    let manifest = Manifest::load(dir.path()).unwrap();
    let store = EnvStore::new(dir.path(), ".kiln/envs");

    for _ in 0..2 {
        let report = build_project(dir.path(), &manifest, &BuildOptions::default()).unwrap();
        assert_eq!(report.artifacts.len(), 2);

        let mut env = store.create("test", EnvPurpose::Test).unwrap();
        env.install_editable("haru", dir.path()).unwrap();
        env.teardown().unwrap();
    }

    assert_eq!(dist_file_names(dir.path()).len(), 2);
    assert!(!dir.path().join(".kiln/envs/test").exists());
}

#[test]
fn archive_install_from_built_pkg_resolves() {
    let dir = project();
    let manifest = Manifest::load(dir.path()).unwrap();
    let report = build_project(dir.path(), &manifest, &BuildOptions::default()).unwrap();
    let pkg = report
        .artifact(kiln_core::ArtifactKind::Pkg)
        .unwrap()
        .path
        .clone();

    let store = EnvStore::new(dir.path(), ".kiln/envs");
    let mut env = store.create("build", EnvPurpose::Build).unwrap();
    env.install_archive("haru", &pkg).unwrap();

    let payload = env.resolve("haru").unwrap();
    assert!(payload.join("src/app.rs").is_file());
    assert!(payload.join("kiln.toml").is_file());
}
