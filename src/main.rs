//! `dist-stage` CLI entrypoint.
//!
//! Loads configuration, reads the artifact manifest, runs the detachment
//! step, and writes the remaining artifacts back to the manifest.

use camino::Utf8Path;
use clap::Parser;
use dist_stage::cli::Cli;
use dist_stage::config::{ConfigError, DEFAULT_CONFIG_FILE, StageConfig};
use dist_stage::logging;
use dist_stage_detach::{
    Artifact, ArtifactManifest, DetachError, DetachmentReport, DetachmentStep, ManifestError,
    StepConfig,
};
use std::error::Error as _;
use std::io::Write;
use thiserror::Error;

/// Anything that ends a run with a non-zero exit code.
#[derive(Debug, Error)]
enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Manifest(#[from] ManifestError),
    #[error(transparent)]
    Detach(#[from] DetachError),
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbosity, cli.quiet);
    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &mut stdout);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(cli: &Cli, stdout: &mut dyn Write) -> Result<(), RunError> {
    let step_config = resolve_step_config(cli)?;
    let mut manifest = ArtifactManifest::load(&cli.artifacts)?;
    let step = DetachmentStep::new(step_config);

    if cli.dry_run {
        return run_dry(&step, &manifest.artifacts, stdout);
    }

    let report = step.run(&mut manifest.artifacts)?;
    if cli.no_write_back {
        log::debug!("leaving {} unchanged", cli.artifacts);
    } else {
        manifest.save(&cli.artifacts)?;
        log::debug!(
            "{} artifacts remain attached in {}",
            manifest.artifacts.len(),
            cli.artifacts
        );
    }

    write_line(stdout, summary(&report));
    Ok(())
}

/// Merge the configuration file with command-line overrides.
///
/// An explicit `--config` must exist; the default file is optional.
fn resolve_step_config(cli: &Cli) -> Result<StepConfig, ConfigError> {
    let file_config = match &cli.config {
        Some(path) => StageConfig::load(path)?,
        None => StageConfig::load_or_default(Utf8Path::new(DEFAULT_CONFIG_FILE))?,
    };
    file_config
        .with_overrides(cli.working_directory.clone(), cli.staging_url.clone())
        .into_step_config()
}

/// Print the plan without touching the filesystem or the manifest.
fn run_dry(
    step: &DetachmentStep,
    attached: &[Artifact],
    stdout: &mut dyn Write,
) -> Result<(), RunError> {
    let plan = step.preview(attached)?;
    write_line(
        stdout,
        format!(
            "Dry run: {} artifact(s) would be staged in {}",
            plan.len(),
            step.config().working_directory
        ),
    );
    for entry in &plan {
        write_line(stdout, format!("  {} -> {}", entry.artifact, entry.destination));
        for (_, sidecar) in &entry.sidecars {
            write_line(stdout, format!("    {sidecar}"));
        }
    }
    Ok(())
}

fn summary(report: &DetachmentReport) -> String {
    format!(
        "Staged {} artifact(s) in {} with {} checksum file(s).",
        report.detached.len(),
        report.working_directory,
        report.sidecars.len()
    )
}

fn exit_code_for_run_result(result: Result<(), RunError>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_line(stderr, format!("error: {err}"));
            let mut source = err.source();
            while let Some(cause) = source {
                write_line(stderr, format!("  caused by: {cause}"));
                source = cause.source();
            }
            1
        }
    }
}

fn write_line(out: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(out, "{message}").is_err() {
        // Best-effort output; ignore write failures.
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use rstest::{fixture, rstest};
    use std::fs;
    use tempfile::TempDir;

    struct Project {
        _temp: TempDir,
        root: Utf8PathBuf,
    }

    impl Project {
        fn manifest_path(&self) -> Utf8PathBuf {
            self.root.join("artifacts.json")
        }

        fn config_path(&self) -> Utf8PathBuf {
            self.root.join("dist-stage.toml")
        }

        fn working_directory(&self) -> Utf8PathBuf {
            self.root.join("staging")
        }

        fn cli(&self, extra: &[&str]) -> Cli {
            let manifest = self.manifest_path();
            let config = self.config_path();
            let mut args = vec![
                "dist-stage",
                "--artifacts",
                manifest.as_str(),
                "--config",
                config.as_str(),
            ];
            args.extend_from_slice(extra);
            Cli::try_parse_from(args).expect("valid arguments")
        }
    }

    #[fixture]
    fn project() -> Project {
        let temp = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::try_from(temp.path().to_path_buf()).expect("UTF-8 temp dir");
        fs::write(root.join("foo.jar"), b"jar").expect("write jar");
        fs::write(root.join("foo-src.zip"), b"abc").expect("write zip");
        let manifest = ArtifactManifest::new(vec![
            Artifact::new(root.join("foo.jar"), "jar", "foo"),
            Artifact::new(root.join("foo-src.zip"), "zip", "foo"),
        ]);
        manifest
            .save(&root.join("artifacts.json"))
            .expect("write manifest");
        fs::write(
            root.join("dist-stage.toml"),
            format!(
                "working_directory = \"{}\"\nstaging_url = \"https://dist.example.org/dev/foo\"\n",
                root.join("staging")
            ),
        )
        .expect("write config");
        Project { _temp: temp, root }
    }

    fn output(buffer: Vec<u8>) -> String {
        String::from_utf8(buffer).expect("UTF-8 output")
    }

    #[rstest]
    fn run_stages_archives_and_writes_back_remainder(project: Project) {
        let mut stdout = Vec::new();

        run(&project.cli(&[]), &mut stdout).expect("run succeeds");

        let staged = project.working_directory();
        assert!(staged.join("foo-src.zip").is_file());
        assert!(staged.join("foo-src.zip.md5").is_file());
        assert!(staged.join("foo-src.zip.sha1").is_file());
        let remaining = ArtifactManifest::load(&project.manifest_path()).expect("reload");
        assert_eq!(
            remaining.artifacts,
            [Artifact::new(project.root.join("foo.jar"), "jar", "foo")]
        );
        assert!(output(stdout).starts_with("Staged 1 artifact(s)"));
    }

    #[rstest]
    fn no_write_back_leaves_manifest_untouched(project: Project) {
        let before = fs::read_to_string(project.manifest_path()).expect("read manifest");

        run(&project.cli(&["--no-write-back"]), &mut Vec::new()).expect("run succeeds");

        let after = fs::read_to_string(project.manifest_path()).expect("read manifest");
        assert_eq!(before, after);
        assert!(project.working_directory().join("foo-src.zip").is_file());
    }

    #[rstest]
    fn dry_run_prints_plan_without_side_effects(project: Project) {
        let before = fs::read_to_string(project.manifest_path()).expect("read manifest");
        let mut stdout = Vec::new();

        run(&project.cli(&["--dry-run"]), &mut stdout).expect("dry run succeeds");

        let text = output(stdout);
        assert!(text.contains("1 artifact(s) would be staged"));
        assert!(text.contains("foo-src.zip.sha1"));
        assert!(!project.working_directory().exists());
        let after = fs::read_to_string(project.manifest_path()).expect("read manifest");
        assert_eq!(before, after);
    }

    #[rstest]
    fn flags_override_the_configuration_file(project: Project) {
        let elsewhere = project.root.join("elsewhere");

        run(&project.cli(&["-w", elsewhere.as_str()]), &mut Vec::new()).expect("run succeeds");

        assert!(elsewhere.join("foo-src.zip").is_file());
        assert!(!project.working_directory().exists());
    }

    #[rstest]
    fn missing_explicit_config_is_an_error(project: Project) {
        fs::remove_file(project.config_path()).expect("remove config");

        let err = run(&project.cli(&[]), &mut Vec::new()).expect_err("config required");

        assert!(matches!(err, RunError::Config(ConfigError::Read { .. })));
    }

    #[rstest]
    fn blank_staging_url_is_rejected(project: Project) {
        let err = run(&project.cli(&["--staging-url", " "]), &mut Vec::new())
            .expect_err("blank url rejected");

        assert!(matches!(
            err,
            RunError::Config(ConfigError::MissingStagingUrl)
        ));
    }

    #[test]
    fn exit_code_for_run_result_returns_zero_on_success() {
        let mut stderr = Vec::new();
        assert_eq!(exit_code_for_run_result(Ok(()), &mut stderr), 0);
        assert!(stderr.is_empty());
    }

    #[test]
    fn exit_code_for_run_result_prints_error_chain() {
        let err = RunError::Detach(DetachError::Sign {
            artifact: "foo-src.zip".to_owned(),
            source: std::io::Error::other("disk full"),
        });
        let mut stderr = Vec::new();

        assert_eq!(exit_code_for_run_result(Err(err), &mut stderr), 1);

        let text = output(stderr);
        assert!(text.starts_with("error: could not sign file: foo-src.zip\n"));
        assert!(text.contains("caused by: disk full"));
    }
}
