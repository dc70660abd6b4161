// src/cli.rs
use anyhow::Result;
use clap::{Arg, ArgAction, ArgGroup, Command};
use std::{env, path::PathBuf};
use tracing_subscriber::EnvFilter;

use crate::core::config::DEFAULT_CONFIG_FILE;
use crate::infra::t;

pub mod commands;

/// Pre-parses the command line arguments to find the language setting.
/// This allows i18n to be initialized before the full CLI is built.
/// It looks for a `--lang <VALUE>` argument.
fn pre_parse_language() -> Option<String> {
    let args: Vec<String> = env::args().collect();
    let pos = args.iter().position(|arg| arg == "--lang")?;
    args.get(pos + 1).cloned()
}

fn config_arg(locale: &str) -> Arg {
    Arg::new("config")
        .short('c')
        .long("config")
        .help(t!("arg_config", locale = locale).to_string())
        .value_name("CONFIG")
        .default_value(DEFAULT_CONFIG_FILE)
        .value_parser(clap::value_parser!(PathBuf))
        .action(ArgAction::Set)
}

fn selector_args(command: Command, locale: &str) -> Command {
    command
        .arg(
            Arg::new("package")
                .short('p')
                .long("package")
                .help(t!("arg_package", locale = locale).to_string())
                .value_name("PACKAGE")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("module")
                .short('m')
                .long("module")
                .help(t!("arg_module", locale = locale).to_string())
                .value_name("MODULE")
                .action(ArgAction::Set),
        )
        .group(ArgGroup::new("selector").args(["package", "module"]).multiple(false))
}

fn build_cli(locale: &str) -> Command {
    Command::new("webunit")
        .version(env!("CARGO_PKG_VERSION"))
        .about(t!("cli_about", locale = locale).to_string())
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("lang")
                .long("lang")
                .help(t!("cli_lang", locale = locale).to_string())
                .value_name("LANGUAGE")
                .global(true)
                .action(ArgAction::Set),
        )
        .subcommand(
            Command::new("serve")
                .about(t!("cmd_serve_about", locale = locale).to_string())
                .arg(config_arg(locale))
                .arg(
                    Arg::new("bind")
                        .short('b')
                        .long("bind")
                        .help(t!("arg_bind", locale = locale).to_string())
                        .value_name("ADDR")
                        .action(ArgAction::Set),
                ),
        )
        .subcommand(selector_args(
            Command::new("run")
                .about(t!("cmd_run_about", locale = locale).to_string())
                .arg(config_arg(locale)),
            locale,
        ))
        .subcommand(selector_args(
            Command::new("list")
                .about(t!("cmd_list_about", locale = locale).to_string())
                .arg(config_arg(locale)),
            locale,
        ))
        .subcommand(
            Command::new("init")
                .about(t!("cmd_init_about", locale = locale).to_string())
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .help(t!("arg_output", locale = locale).to_string())
                        .value_name("OUTPUT")
                        .default_value(DEFAULT_CONFIG_FILE)
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("force")
                        .long("force")
                        .help(t!("arg_force", locale = locale).to_string())
                        .action(ArgAction::SetTrue),
                ),
        )
}

/// Installs the `tracing` subscriber. `RUST_LOG` wins over `default_directive`.
pub fn init_logging(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Parses the command line and runs the selected command.
/// Returns `Ok(false)` when a test run did not pass.
pub async fn run() -> Result<bool> {
    // Pre-parse language and initialize i18n first.
    let explicit_language = pre_parse_language();
    let language = explicit_language.clone().unwrap_or_else(crate::detect_locale);
    rust_i18n::set_locale(&language);

    let matches = build_cli(&language).get_matches();
    let lang_override = explicit_language.clone();

    match matches.subcommand() {
        Some(("serve", serve_matches)) => {
            let config = serve_matches
                .get_one::<PathBuf>("config")
                .unwrap() // Has default
                .clone();
            let bind = serve_matches.get_one::<String>("bind").cloned();
            commands::serve::execute(config, bind, lang_override).await?;
            Ok(true)
        }
        Some(("run", run_matches)) => {
            let config = run_matches.get_one::<PathBuf>("config").unwrap().clone();
            let package = run_matches.get_one::<String>("package").cloned();
            let module = run_matches.get_one::<String>("module").cloned();
            commands::run::execute(config, package, module, lang_override).await
        }
        Some(("list", list_matches)) => {
            let config = list_matches.get_one::<PathBuf>("config").unwrap().clone();
            let package = list_matches.get_one::<String>("package").cloned();
            let module = list_matches.get_one::<String>("module").cloned();
            commands::list::execute(config, package, module, lang_override)
        }
        Some(("init", init_matches)) => {
            let output = init_matches.get_one::<PathBuf>("output").unwrap().clone();
            let force = init_matches.get_flag("force");

            // Show language detection message if it was auto-detected
            if explicit_language.is_none() {
                println!(
                    "🌐 {}",
                    t!("system_language_detected", locale = &language, lang = &language)
                );
            }
            commands::init::execute(output, force, language).await?;
            Ok(true)
        }
        // `subcommand_required` makes clap print help and exit before this point.
        _ => Ok(true),
    }
}
