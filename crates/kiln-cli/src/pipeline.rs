//! Shared build/install sequences behind the `build`, `test`, and `serve`
//! commands.
//!
//! The packaging step always runs inside a throwaway build environment: the
//! artifacts are produced, the package archive is smoke-installed into the
//! build environment (which verifies every RECORD hash), and the environment
//! is torn down whether or not the build succeeded.

use anyhow::Context as _;

use kiln_build::{BuildOptions, build_project};
use kiln_core::artifact::{ArtifactKind, BuildReport};
use kiln_core::environment::EnvPurpose;
use kiln_env::Environment;
use kiln_manifest::Manifest;

use crate::context::AppContext;

/// Run the packaging step: build artifacts, smoke-install into an ephemeral
/// build environment, tear the environment down.
pub fn run_build(ctx: &AppContext, manifest: &Manifest) -> anyhow::Result<BuildReport> {
    let store = ctx.env_store();
    let mut build_env = store.create(EnvPurpose::Build.default_label(), EnvPurpose::Build)?;

    let outcome = build_and_verify(ctx, manifest, &mut build_env);
    let teardown = build_env.teardown();

    let report = outcome?;
    teardown.context("failed to tear down build environment")?;
    Ok(report)
}

fn build_and_verify(
    ctx: &AppContext,
    manifest: &Manifest,
    build_env: &mut Environment,
) -> anyhow::Result<BuildReport> {
    let options = BuildOptions {
        build_dir: ctx.config.build.build_dir.clone(),
        dist_dir: ctx.config.build.dist_dir.clone(),
    };
    let report = build_project(ctx.project_root(), manifest, &options)?;

    // Smoke install: proves the pkg archive extracts cleanly and every
    // RECORD hash matches, before anyone ships it.
    let pkg = report
        .artifact(ArtifactKind::Pkg)
        .context("build produced no package artifact")?;
    build_env.install_archive(&manifest.name, &pkg.path)?;

    Ok(report)
}

/// Create a fresh environment for `purpose`, install the package editable,
/// and check that it resolves.
pub fn prepare_editable_env(
    ctx: &AppContext,
    manifest: &Manifest,
    purpose: EnvPurpose,
) -> anyhow::Result<Environment> {
    let store = ctx.env_store();
    let mut env = store.create(purpose.default_label(), purpose)?;
    env.install_editable(&manifest.name, ctx.project_root())?;
    env.resolve(&manifest.name)
        .context("editable install did not resolve")?;
    Ok(env)
}

/// Tear an environment down, honoring `env.keep_on_failure` when the
/// entrypoint failed.
pub fn finish_env(ctx: &AppContext, env: Environment, entrypoint_failed: bool) -> anyhow::Result<()> {
    if entrypoint_failed && ctx.config.env.keep_on_failure {
        tracing::warn!(
            label = %env.descriptor().label,
            "keeping environment for inspection (env.keep_on_failure)"
        );
        return Ok(());
    }
    env.teardown().context("failed to tear down environment")
}

#[cfg(test)]
mod tests {
    use std::fs;

    use kiln_config::KilnConfig;

    use super::*;

    fn context() -> (tempfile::TempDir, AppContext) {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("kiln.toml"),
            "[project]\nname = \"haru\"\nversion = \"0.1.0\"\n",
        )
        .unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::write(dir.path().join("src/app.rs"), b"pub fn run() {}").unwrap();

        let ctx = AppContext {
            project_root: dir.path().to_path_buf(),
            config: KilnConfig::default(),
        };
        (dir, ctx)
    }

    #[test]
    fn run_build_leaves_no_build_environment() {
        let (dir, ctx) = context();
        let manifest = ctx.manifest().unwrap();

        let report = run_build(&ctx, &manifest).unwrap();
        assert_eq!(report.artifacts.len(), 2);
        assert!(!dir.path().join(".kiln/envs/build").exists());
    }

    #[test]
    fn prepared_env_resolves_and_finish_removes_it() {
        let (dir, ctx) = context();
        let manifest = ctx.manifest().unwrap();

        let env = prepare_editable_env(&ctx, &manifest, EnvPurpose::Test).unwrap();
        assert!(env.resolve("haru").is_ok());

        finish_env(&ctx, env, false).unwrap();
        assert!(!dir.path().join(".kiln/envs/test").exists());
    }

    #[test]
    fn keep_on_failure_preserves_a_failed_env() {
        let (dir, mut ctx) = context();
        ctx.config.env.keep_on_failure = true;
        let manifest = ctx.manifest().unwrap();

        let env = prepare_editable_env(&ctx, &manifest, EnvPurpose::Test).unwrap();
        finish_env(&ctx, env, true).unwrap();
        assert!(dir.path().join(".kiln/envs/test").exists());
    }
}
