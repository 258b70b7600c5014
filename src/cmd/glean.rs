/*!
`glean.rs`

The fixture command: invoke `<CLASS_NAME>::<METHOD_NAME>(args...)`, serialize whatever it
returns and save it as `<path>/<name>.<format>`.

Flow (single pass, no local recovery except the `--name` check):
  1. validate --name (non-empty)            -> ValidationError::MissingName
  2. resolve class/method, build receiver   -> ResolutionError / factory error
  3. coerce tokens (null/true/false) + call -> invoked method's own error
  4. serialize by --format                  -> SerializeError::UnsupportedFormat
  5. create dir (one level) + write file    -> filesystem error
  6. print `Saved <file>`

Method arguments that start with `-` go after a `--` separator:
  glean 'App\Math' add --name sum -- -1 2
*/

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;
use std::time::Instant;

use crate::config::Config;
use crate::error::ValidationError;
use crate::fixture::Fixture;
use crate::serialize::serialize;
use crate::target::{Container, InvocationRequest, Registry, get_method_output};
use crate::utils::output::{Color, color};
use crate::{log_debug, log_error, log_info};

/* -------------------------------------------------------------------------- */
/* Argument Struct                                                            */
/* -------------------------------------------------------------------------- */

#[derive(Args, Debug, Clone)]
pub struct GleanArgs {
    /// The fully-qualified class/interface name
    #[arg(value_name = "CLASS_NAME")]
    pub class_name: String,

    /// The name of the method
    #[arg(value_name = "METHOD_NAME")]
    pub method_name: String,

    /// Method argument values ("null", "true" and "false" are converted; everything else is a string)
    #[arg(value_name = "METHOD_ARGUMENTS")]
    pub method_arguments: Vec<String>,

    /// The filename (without extension) of the fixture
    #[arg(short = 'a', long = "name", value_name = "NAME")]
    pub name: Option<String>,

    /// The path to save the fixture (default: <storage>/fixtures, see GLEAN_STORAGE_PATH)
    #[arg(short = 'p', long = "path", value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// The fixture format (php, yml, json, xml)
    #[arg(short = 'f', long = "format", value_name = "FORMAT", default_value = "php")]
    pub format: String,
}

/* -------------------------------------------------------------------------- */
/* Public Entry Point                                                         */
/* -------------------------------------------------------------------------- */

/// Run the whole pipeline; returns the fixture file that was written.
pub fn execute_glean(
    args: GleanArgs,
    registry: &Registry,
    container: &Container,
    config: &Config,
) -> Result<PathBuf> {
    let name = match args.name.as_deref() {
        Some(n) if !n.is_empty() => n.to_string(),
        _ => return Err(ValidationError::MissingName.into()),
    };
    let path = args.path.unwrap_or_else(|| config.fixtures_path());
    let format = args.format;

    let request = InvocationRequest::new(args.class_name, args.method_name, args.method_arguments);

    log_info!(
        "gleaning {}::{} into {}",
        request.class_name,
        request.method_name,
        path.join(format!("{name}.{format}")).display()
    );

    let started = Instant::now();
    let data = get_method_output(&request, registry, container).inspect_err(|_| {
        log_error!(
            "{}::{} failed; no fixture written",
            request.class_name,
            request.method_name
        )
    })?;
    log_debug!(
        "{}::{} returned in {} ms",
        request.class_name,
        request.method_name,
        started.elapsed().as_millis()
    );

    let content = serialize(&data, &format)?;

    let fixture = Fixture {
        path,
        name,
        format,
        content,
    };
    let file = fixture.save()?;

    println!("{}", color(Color::Green, format!("Saved {}", file.display())));
    Ok(file)
}

/* -------------------------------------------------------------------------- */
/* Tests                                                                      */
/* -------------------------------------------------------------------------- */
