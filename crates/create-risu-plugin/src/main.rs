//! create-risu-plugin - Project scaffolding for RISU AI plugins

use clap::{Parser, Subcommand};
use colored::Colorize;
use plugin_scaffold_core::tui::CreateArgs;
use plugin_scaffold_core::{Framework, Language};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "create-risu-plugin")]
#[command(about = "CLI for scaffolding RISU AI plugin projects")]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub create: CliCreateArgs,

    /// Show debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new plugin project (default)
    Create(CliCreateArgs),
}

#[derive(Parser, Debug, Default)]
pub struct CliCreateArgs {
    /// Project name in kebab-case; also the directory that gets created
    #[arg(long)]
    pub name: Option<String>,

    /// Project description
    #[arg(long)]
    pub description: Option<String>,

    /// UI framework
    #[arg(long, value_enum)]
    pub framework: Option<Framework>,

    /// Source language
    #[arg(long, value_enum)]
    pub language: Option<Language>,

    /// WebSocket port of the hot-reload dev server
    #[arg(long, value_parser = clap::value_parser!(u16).range(1024..))]
    pub port: Option<u16>,

    /// Serve the dev server through a Caddy proxy on this domain
    #[arg(long = "proxy-domain")]
    pub proxy_domain: Option<String>,

    /// Email for the proxy's TLS certificates
    #[arg(long = "proxy-email", requires = "proxy_domain")]
    pub proxy_email: Option<String>,

    /// Local directory to use for templates instead of the bundled ones (for development use)
    #[arg(long = "template-dir")]
    pub template_dir: Option<PathBuf>,

    /// Do not run npm install after generating
    #[arg(long = "skip-install")]
    pub skip_install: bool,

    /// Do not check whether the name is already published on npm
    #[arg(long = "skip-registry-check")]
    pub skip_registry_check: bool,

    /// Auto-confirm all prompts (non-interactive mode)
    #[arg(short, long)]
    pub yes: bool,
}

impl From<CliCreateArgs> for CreateArgs {
    fn from(args: CliCreateArgs) -> Self {
        CreateArgs {
            name: args.name,
            description: args.description,
            framework: args.framework,
            language: args.language,
            port: args.port,
            proxy_domain: args.proxy_domain,
            proxy_email: args.proxy_email,
            template_dir: args.template_dir,
            skip_install: args.skip_install,
            skip_registry_check: args.skip_registry_check,
            yes: args.yes,
        }
    }
}

/// Warnings by default so spinner output stays clean, debug with `--verbose`; `RUST_LOG` wins when set
fn init_logger(verbose: bool) {
    env_logger::Builder::new()
        .filter_level(if verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        })
        .format_timestamp(None)
        .format_target(false)
        .parse_default_env()
        .init();
}

#[tokio::main]
async fn main() {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();
    init_logger(args.verbose);

    let create_args = match args.command {
        Some(Command::Create(create_args)) => create_args,
        None => args.create,
    };

    let result = plugin_scaffold_core::run(create_args.into()).await;

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    if let Err(e) = result {
        eprintln!("{} {:#}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}
