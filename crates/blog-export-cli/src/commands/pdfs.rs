use std::path::{Path, PathBuf};

use anyhow::anyhow;
use blog_export_api_models::{PdfDownload, paths};

use crate::cli::{BlogArgs, FetchPdfArgs, OutputFormat};
use crate::client::{AppContext, CliError, CliResult, send};
use crate::commands::blogs::require_id;
use crate::output::render_pdfs;

pub(crate) async fn handle_pdfs(
    ctx: &AppContext,
    args: BlogArgs,
    format: OutputFormat,
) -> CliResult<()> {
    let id = require_id(&args.id)?;
    let response = send(ctx.get(&paths::list_downloads(id))?, "list PDFs").await?;
    let downloads = response
        .json::<Vec<PdfDownload>>()
        .await
        .map_err(|err| CliError::failure(anyhow!("failed to parse PDF list: {err}")))?;
    render_pdfs(&downloads, format)
}

pub(crate) async fn handle_fetch_pdf(ctx: &AppContext, args: FetchPdfArgs) -> CliResult<()> {
    let id = require_id(&args.id)?;
    let download = PdfDownload::new(args.filename.trim());
    let file_name = download.file_name();
    if file_name.is_empty() {
        return Err(CliError::validation("PDF file name must not be empty"));
    }
    let destination = destination(args.out, file_name);

    let response = send(ctx.get(&paths::pdf(id, file_name))?, "fetch PDF").await?;
    let bytes = response
        .bytes()
        .await
        .map_err(|err| CliError::failure(anyhow!("failed to read PDF body: {err}")))?;
    tokio::fs::write(&destination, &bytes).await.map_err(|err| {
        CliError::failure(anyhow!(
            "failed to write '{}': {err}",
            destination.display()
        ))
    })?;
    tracing::info!(
        path = %destination.display(),
        bytes = bytes.len(),
        "PDF saved"
    );
    Ok(())
}

fn destination(out: Option<PathBuf>, file_name: &str) -> PathBuf {
    out.unwrap_or_else(|| Path::new(file_name).to_path_buf())
}
