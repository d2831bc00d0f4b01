//! CLI argument definitions for `dist-stage`.
//!
//! Kept apart from the entrypoint so the binary stays focused on
//! orchestration and the parser can be tested with `parse_from`.

use camino::Utf8PathBuf;
use clap::Parser;

/// Detach distribution archives from a build and stage them with checksums.
#[derive(Parser, Debug)]
#[command(name = "dist-stage")]
#[command(version, about)]
#[command(long_about = concat!(
    "Detach distribution archives from a build and stage them with checksums.\n\n",
    "Reads the build's attached artifacts from a JSON manifest, removes every ",
    "zip and tar.gz archive (and their .asc signatures), copies them into the ",
    "working directory, and writes .md5 and .sha1 sidecars next to each ",
    "archive. The manifest is rewritten with the artifacts that remain.",
))]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Stage the archives listed in a manifest:\n",
    "    $ dist-stage --artifacts target/artifacts.json\n\n",
    "  Override the staging target for one run:\n",
    "    $ dist-stage --artifacts target/artifacts.json \\\n",
    "        --staging-url https://dist.example.org/dev/foo\n\n",
    "  Preview without touching the filesystem:\n",
    "    $ dist-stage --artifacts target/artifacts.json --dry-run",
))]
pub struct Cli {
    /// JSON manifest of the build's attached artifacts.
    #[arg(short, long, value_name = "FILE")]
    pub artifacts: Utf8PathBuf,

    /// Configuration file [default: dist-stage.toml, optional].
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<Utf8PathBuf>,

    /// Directory the archives are staged in.
    #[arg(short, long, value_name = "DIR")]
    pub working_directory: Option<Utf8PathBuf>,

    /// Upload target of the downstream step.
    #[arg(long, value_name = "URL")]
    pub staging_url: Option<String>,

    /// Show what would be staged and exit without touching the filesystem.
    #[arg(long)]
    pub dry_run: bool,

    /// Leave the artifact manifest unchanged after the run.
    #[arg(long)]
    pub no_write_back: bool,

    /// Increase log verbosity (repeatable: -v, -vv).
    #[arg(
        short,
        long = "verbose",
        action = clap::ArgAction::Count,
        conflicts_with = "quiet"
    )]
    pub verbosity: u8,

    /// Only log warnings and errors.
    #[arg(short, long, conflicts_with = "verbosity")]
    pub quiet: bool,
}
