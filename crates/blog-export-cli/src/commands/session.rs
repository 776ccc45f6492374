use anyhow::anyhow;
use blog_export_api_models::{UserDto, paths};

use crate::cli::OutputFormat;
use crate::client::{AppContext, CliError, CliResult, classify_problem, send};
use crate::output::{emit, render_user};

pub(crate) async fn handle_whoami(ctx: &AppContext, format: OutputFormat) -> CliResult<()> {
    let response = send(ctx.get(&paths::user())?, "fetch user").await?;
    let user = response
        .json::<UserDto>()
        .await
        .map_err(|err| CliError::failure(anyhow!("failed to parse user: {err}")))?;
    render_user(&user, format)
}

/// Logout answers with a redirect to the sign-in page; either that or a 2xx counts as done.
pub(crate) async fn handle_logout(ctx: &AppContext) -> CliResult<()> {
    let response = ctx
        .get(&paths::logout())?
        .send()
        .await
        .map_err(|err| CliError::failure(anyhow!("failed to log out: {err}")))?;
    let status = response.status();
    if !(status.is_success() || status.is_redirection()) {
        return Err(classify_problem(response).await);
    }
    tracing::info!(%status, "session ended");
    emit("logged out\n")
}
