#![forbid(unsafe_code)]

use std::fs;
use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser, Subcommand};
use miette::{IntoDiagnostic, NamedSource};
use safescript_ast::Block;
use safescript_js::EmitOptions;
use safescript_sema::{AnalysisOptions, Context};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod config;

use config::Config;

/// Environment variable holding a `tracing` filter directive.
const LOG_ENV: &str = "SAFESCRIPT_LOG";

#[derive(Parser, Debug)]
#[command(
    name = "safescript",
    version,
    about = "SafeScript compiler: borrow-checked scripts lowered to JavaScript"
)]
struct Cli {
    /// More log output (repeatable). `SAFESCRIPT_LOG` overrides this.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Config file to use instead of the nearest `safescript.toml`.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Parse and analyze a file without emitting anything
    Check {
        /// Input .ss file
        #[arg(default_value = "main.ss")]
        path: PathBuf,

        /// Skip the borrow checker
        #[arg(long, default_value_t = false)]
        no_borrow_check: bool,
    },

    /// Analyze a file and lower it to JavaScript
    Build {
        /// Input .ss file
        #[arg(default_value = "main.ss")]
        path: PathBuf,

        /// Output file (defaults to `<input>.js`, or `<out-dir>/<file>.js`)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Do not emit the deep-copy runtime helper
        #[arg(long, default_value_t = false)]
        no_preamble: bool,

        /// Skip the borrow checker
        #[arg(long, default_value_t = false)]
        no_borrow_check: bool,
    },

    /// Print a file in canonical form
    Fmt {
        /// Input .ss file
        #[arg(default_value = "main.ss")]
        path: PathBuf,

        /// Rewrite the file in place instead of printing it
        #[arg(long, default_value_t = false)]
        write: bool,
    },
}

fn main() -> miette::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.cmd {
        Cmd::Check {
            path,
            no_borrow_check,
        } => {
            let (config, _) = Config::resolve(&path, cli.config.as_deref())?;
            let options = AnalysisOptions {
                borrow_check: config.analysis.borrow_check && !no_borrow_check,
            };
            let (module, source) = parse_file(&path)?;
            analyze(&module, &source, &options)?;
            println!("ok: {}", display_path(&path));
            Ok(())
        }
        Cmd::Build {
            path,
            out,
            no_preamble,
            no_borrow_check,
        } => {
            let (config, config_path) = Config::resolve(&path, cli.config.as_deref())?;
            if let Some(p) = &config_path {
                debug!(config = %p.display(), "loaded config");
            }
            let options = AnalysisOptions {
                borrow_check: config.analysis.borrow_check && !no_borrow_check,
            };
            let (module, source) = parse_file(&path)?;
            analyze(&module, &source, &options)?;

            let emit = EmitOptions {
                preamble: config.build.preamble && !no_preamble,
            };
            let js = safescript_js::emit_module(&module, &emit);
            let out_path =
                out.unwrap_or_else(|| default_output(&path, config.build.out_dir.as_deref()));
            if let Some(dir) = out_path.parent() {
                if !dir.as_os_str().is_empty() {
                    fs::create_dir_all(dir).into_diagnostic()?;
                }
            }
            fs::write(&out_path, js).into_diagnostic()?;
            println!("wrote {}", display_path(&out_path));
            Ok(())
        }
        Cmd::Fmt { path, write } => {
            let (module, _) = parse_file(&path)?;
            let formatted = safescript_parse::format_module(&module);
            if write {
                fs::write(&path, formatted).into_diagnostic()?;
                info!(path = %path.display(), "formatted in place");
            } else {
                print!("{formatted}");
            }
            Ok(())
        }
    }
}

fn init_logging(verbose: u8) {
    let fallback = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn parse_file(path: &Path) -> miette::Result<(Block, NamedSource<String>)> {
    let src = fs::read_to_string(path).into_diagnostic()?;
    let source = NamedSource::new(display_path(path), src.clone());
    let module =
        safescript_parse::parse_source(&src).map_err(|e| e.with_source_code(source.clone()))?;
    debug!(statements = module.stmts.len(), "parsed module");
    Ok((module, source))
}

fn analyze(
    module: &Block,
    source: &NamedSource<String>,
    options: &AnalysisOptions,
) -> miette::Result<()> {
    let mut ctx = Context::new();
    safescript_sema::analyze_with(module, &mut ctx, options)
        .map_err(|e| miette::Report::new(e).with_source_code(source.clone()))?;
    debug!(?ctx, "analysis finished");
    Ok(())
}

/// `main.ss` becomes `main.ss.js`, next to the input or inside `out_dir`.
fn default_output(input: &Path, out_dir: Option<&Path>) -> PathBuf {
    let name = match input.file_name() {
        Some(name) => format!("{}.js", name.to_string_lossy()),
        None => "out.js".to_string(),
    };
    match out_dir {
        Some(dir) => dir.join(name),
        None => input.with_file_name(name),
    }
}

fn display_path(p: &Path) -> String {
    p.to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn output_defaults_next_to_input() {
        assert_eq!(
            default_output(Path::new("src/main.ss"), None),
            PathBuf::from("src/main.ss.js")
        );
        assert_eq!(
            default_output(Path::new("src/main.ss"), Some(Path::new("dist"))),
            PathBuf::from("dist/main.ss.js")
        );
    }

    #[test]
    fn verbosity_is_counted() {
        let cli = Cli::parse_from(["safescript", "-vv", "build", "a.ss", "--no-preamble"]);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(
            cli.cmd,
            Cmd::Build {
                no_preamble: true,
                no_borrow_check: false,
                ..
            }
        ));
    }
}
