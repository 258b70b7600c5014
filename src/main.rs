use anyhow::Result;
use clap::Parser;

use glean::cmd::{GleanArgs, execute_glean};
use glean::{Config, host, utils};

/// Glean - generate a fixture from the output of any object method
///
/// Usage:
///   glean [OPTIONS] <CLASS_NAME> <METHOD_NAME> [METHOD_ARGUMENTS]...
///
/// Arguments "null", "true" and "false" are passed as null/booleans; every other token
/// is passed as a string. Put arguments that start with `-` after `--`.
///
/// Env:
///   GLEAN_STORAGE_PATH   storage root; the default --path is <root>/fixtures
///   NO_COLOR             plain status line
///
/// Built-in classes:
///   Glean\Env           get <NAME> | all | cwd
///   Glean\Config        all | storagePath | fixturesPath
///   Glean\Filesystem    files <DIR> | stat <PATH> | read <PATH> | json <PATH> | yaml <PATH>
///   Glean\Diagnostics   echo [ARGS]... | fail <MESSAGE>
///
/// Examples:
///   glean 'Glean\Diagnostics' echo null true 3 --name case1 --format json
///   glean 'Glean\Filesystem' json composer.json -a composer -f yml -p tests/fixtures
#[derive(Parser, Debug)]
#[command(
    name = "glean",
    version,
    author,
    about = "Generate a fixture from the output of any object method",
    propagate_version = true
)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors (the status line is still printed)
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(flatten)]
    args: GleanArgs,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = utils::derive_level(cli.verbose, cli.quiet);
    utils::init_logging(level);

    let config = Config::from_env();
    let (registry, container) = host::builtin(&config);

    execute_glean(cli.args, &registry, &container, &config)?;
    Ok(())
}
