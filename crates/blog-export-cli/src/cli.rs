//! Argument parsing and command dispatch.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use reqwest::Url;
use uuid::Uuid;

use crate::client::{
    AppContext, CliDependencies, CliResult, init_logging, parse_session, parse_url,
};
use crate::commands::blogs::{handle_add, handle_blog, handle_blogs};
use crate::commands::jobs::{handle_download, handle_generate};
use crate::commands::pdfs::{handle_fetch_pdf, handle_pdfs};
use crate::commands::session::{handle_logout, handle_whoami};

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_API_URL: &str = "http://127.0.0.1:8080/blog-export";

/// Parses CLI arguments and executes the requested command.
/// Returns the process exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();
    init_logging();
    let trace_id = Uuid::new_v4().to_string();
    let command = command_label(&cli.command);
    tracing::debug!(command, trace_id = %trace_id, api_url = %cli.api_url, "running command");

    match execute(cli, &trace_id).await {
        Ok(()) => 0,
        Err(err) => {
            let exit_code = err.exit_code();
            tracing::debug!(command, exit_code, "command failed");
            eprintln!("error: {}", err.display_message());
            exit_code
        }
    }
}

async fn execute(mut cli: Cli, trace_id: &str) -> CliResult<()> {
    let session = parse_session(cli.session.take())?;
    let deps = CliDependencies::from_cli(&cli, session.as_deref(), trace_id)?;
    dispatch(cli, deps).await
}

async fn dispatch(cli: Cli, deps: CliDependencies) -> CliResult<()> {
    let ctx = AppContext {
        client: deps.client,
        stream_client: deps.stream_client,
        base_url: cli.api_url,
    };

    match cli.command {
        Command::Blogs => handle_blogs(&ctx, cli.output).await,
        Command::Blog(args) => handle_blog(&ctx, args, cli.output).await,
        Command::Add(args) => handle_add(&ctx, args, cli.output).await,
        Command::Download(args) => handle_download(&ctx, args, cli.output).await,
        Command::Generate(args) => handle_generate(&ctx, args, cli.output).await,
        Command::Pdfs(args) => handle_pdfs(&ctx, args, cli.output).await,
        Command::FetchPdf(args) => handle_fetch_pdf(&ctx, args).await,
        Command::Whoami => handle_whoami(&ctx, cli.output).await,
        Command::Logout => handle_logout(&ctx).await,
    }
}

#[derive(Parser)]
#[command(name = "blog-export", about = "Command-line client for the Blog Export service")]
pub(crate) struct Cli {
    #[arg(
        long,
        global = true,
        env = "BLOG_EXPORT_API_URL",
        value_parser = parse_url,
        default_value = DEFAULT_API_URL
    )]
    pub(crate) api_url: Url,
    #[arg(
        long,
        global = true,
        env = "BLOG_EXPORT_SESSION",
        hide_env_values = true,
        help = "Cookie header value for an authenticated session (e.g. JSESSIONID=...)"
    )]
    pub(crate) session: Option<String>,
    #[arg(
        long,
        global = true,
        env = "BLOG_EXPORT_HTTP_TIMEOUT_SECS",
        default_value_t = DEFAULT_TIMEOUT_SECS
    )]
    pub(crate) timeout: u64,
    #[arg(
        long = "output",
        alias = "format",
        global = true,
        value_enum,
        default_value_t = OutputFormat::Table,
        help = "Select output format for commands that render structured data"
    )]
    pub(crate) output: OutputFormat,
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// List tracked blogs.
    Blogs,
    /// Show one blog.
    Blog(BlogArgs),
    /// Add a blog by URL.
    Add(AddArgs),
    /// Download a blog's content, streaming job progress.
    Download(BlogArgs),
    /// Generate a PDF for a date range, streaming job progress.
    Generate(GenerateArgs),
    /// List generated PDFs for a blog.
    Pdfs(BlogArgs),
    /// Save a generated PDF to disk.
    FetchPdf(FetchPdfArgs),
    /// Show the signed-in user.
    Whoami,
    /// End the current session.
    Logout,
}

#[derive(Args, Debug, Clone)]
pub(crate) struct BlogArgs {
    /// Blog identifier.
    pub(crate) id: String,
}

#[derive(Args, Debug, Clone)]
pub(crate) struct AddArgs {
    /// Blog URL (http or https).
    pub(crate) url: String,
}

#[derive(Args, Debug, Clone)]
pub(crate) struct GenerateArgs {
    /// Blog identifier.
    pub(crate) id: String,
    #[arg(long, help = "First day to include (yyyy-MM-dd)")]
    pub(crate) from: String,
    #[arg(long, help = "Last day to include (yyyy-MM-dd)")]
    pub(crate) to: String,
}

#[derive(Args, Debug, Clone)]
pub(crate) struct FetchPdfArgs {
    /// Blog identifier.
    pub(crate) id: String,
    /// File name as listed by `pdfs`.
    pub(crate) filename: String,
    #[arg(long, help = "Destination path (defaults to the file name)")]
    pub(crate) out: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Table,
    Json,
}

const fn command_label(command: &Command) -> &'static str {
    match command {
        Command::Blogs => "blogs",
        Command::Blog(_) => "blog",
        Command::Add(_) => "add",
        Command::Download(_) => "download",
        Command::Generate(_) => "generate",
        Command::Pdfs(_) => "pdfs",
        Command::FetchPdf(_) => "fetch_pdf",
        Command::Whoami => "whoami",
        Command::Logout => "logout",
    }
}
