//! Binding resolved configuration into clap commands.
//!
//! Resolved values become argument defaults, so anything given on the
//! command line still takes precedence.
//!
//! ## Example
//!
//! ```no_run
//! use clap::Parser;
//! use flagchain::{cli, Discovery};
//!
//! #[derive(Parser)]
//! struct Args {
//!     #[arg(long = "server.port")]
//!     port: u16,
//! }
//!
//! let chain = Discovery::new("myapp").build()?;
//! let args: Args = cli::parse_from(chain, std::env::args_os())?;
//! # Ok::<(), flagchain::Error>(())
//! ```

use std::ffi::OsString;

use clap::error::ErrorKind;
use clap::{Arg, ArgAction, Command, Parser};
use serde::Serialize;
use tracing::debug;

use crate::config::{ConfigError, FileSource, ResolverChain, Value};
use crate::Error;

/// Id and long name of the repeatable config-file option.
pub const CONFIG_ARG: &str = "config";

/// Sets the default of every resolvable argument from `chain`.
///
/// Named arguments that take a value, and boolean switches, are looked up by
/// their long name (or id when they have none), subcommands included. An
/// argument that receives a value is no longer required.
pub fn apply(chain: &ResolverChain, mut cmd: Command) -> Result<Command, ConfigError> {
    let resolvable: Vec<(String, String)> = cmd
        .get_arguments()
        .filter(|arg| is_resolvable(arg))
        .map(|arg| (arg.get_id().to_string(), flag_name(arg).to_string()))
        .collect();

    for (id, name) in resolvable {
        let Some(text) = chain.resolve(&name)?.as_ref().and_then(flag_text) else {
            continue;
        };

        debug!(event = "config.cli.default_applied", command = cmd.get_name(), flag = %name);
        cmd = cmd.mut_arg(&id, |arg| arg.default_value(text).required(false));
    }

    let subcommands: Vec<String> = cmd
        .get_subcommands()
        .map(|sub| sub.get_name().to_string())
        .collect();

    for name in subcommands {
        let mut failure = None;
        cmd = cmd.mut_subcommand(&name, |sub| {
            let fallback = sub.clone();
            apply(chain, sub).unwrap_or_else(|e| {
                failure = Some(e);
                fallback
            })
        });
        if let Some(e) = failure {
            return Err(e);
        }
    }

    Ok(cmd)
}

/// Parses `args` into `T` with `chain` providing defaults.
///
/// Adds a repeatable `--config <PATH>` option. Each named file is loaded and
/// placed ahead of the chain, the last one given taking precedence.
pub fn parse_from<T, I, S>(mut chain: ResolverChain, args: I) -> Result<T, Error>
where
    T: Parser,
    I: IntoIterator<Item = S>,
    S: Into<OsString> + Clone,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    let cmd = with_config_arg(T::command());

    for path in config_paths(&cmd, &args) {
        debug!(event = "config.cli.config_file", path = %path);
        chain.prepend(FileSource::load(&path)?);
    }

    let matches = apply(&chain, cmd)?.try_get_matches_from(args)?;
    Ok(T::from_arg_matches(&matches)?)
}

/// Like [`parse_from`] over the process arguments, exiting on error.
pub fn parse<T: Parser>(chain: ResolverChain) -> T {
    match parse_from(chain, std::env::args_os()) {
        Ok(parsed) => parsed,
        Err(Error::Cli(e)) => e.exit(),
        Err(e) => T::command().error(ErrorKind::InvalidValue, e).exit(),
    }
}

/// Renders a config as YAML.
///
/// Uses serde_yaml's layout: nested mappings are indented by two spaces and
/// sequence items sit flush with their key (`items:\n- a`).
pub fn dump<T: Serialize + ?Sized>(config: &T) -> Result<String, ConfigError> {
    Ok(serde_yaml::to_string(config)?)
}

fn with_config_arg(cmd: Command) -> Command {
    if cmd.get_arguments().any(|arg| arg.get_id().as_str() == CONFIG_ARG) {
        return cmd;
    }

    cmd.arg(
        Arg::new(CONFIG_ARG)
            .long(CONFIG_ARG)
            .value_name("PATH")
            .action(ArgAction::Append)
            .global(true)
            .help("Load configuration from a YAML file; later files take precedence"),
    )
}

/// Collects `--config` values without failing on anything else in `args`.
///
/// The option is global; clap propagates its values down to the innermost
/// subcommand, so that is where they are read.
fn config_paths(cmd: &Command, args: &[OsString]) -> Vec<String> {
    let Ok(matches) = cmd.clone().ignore_errors(true).try_get_matches_from(args) else {
        return Vec::new();
    };

    let mut innermost = &matches;
    while let Some((_, sub)) = innermost.subcommand() {
        innermost = sub;
    }

    innermost
        .try_get_many::<String>(CONFIG_ARG)
        .ok()
        .flatten()
        .map(|values| values.cloned().collect())
        .unwrap_or_default()
}

fn is_resolvable(arg: &Arg) -> bool {
    !arg.is_positional()
        && arg.get_id().as_str() != CONFIG_ARG
        && matches!(
            arg.get_action(),
            ArgAction::Set | ArgAction::Append | ArgAction::SetTrue | ArgAction::SetFalse
        )
}

fn flag_name(arg: &Arg) -> &str {
    arg.get_long().unwrap_or_else(|| arg.get_id().as_str())
}

/// Renders a resolved value as command-line text. `Null` means no value.
fn flag_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Bool(b) => Some(b.to_string()),
        Value::Integer(i) => Some(i.to_string()),
        Value::Unsigned(u) => Some(u.to_string()),
        Value::Float(f) => Some(f.to_string()),
        Value::String(s) => Some(s.clone()),
        Value::Sequence(_) | Value::Mapping(_) => serde_json::to_string(value).ok(),
    }
}
