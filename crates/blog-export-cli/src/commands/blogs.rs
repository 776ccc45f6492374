use anyhow::anyhow;
use blog_export_api_models::{BlogDto, paths};

use crate::cli::{AddArgs, BlogArgs, OutputFormat};
use crate::client::{AppContext, CliError, CliResult, send};
use crate::output::{render_blog, render_blogs};

pub(crate) async fn handle_blogs(ctx: &AppContext, format: OutputFormat) -> CliResult<()> {
    let blogs = fetch_blogs(ctx).await?;
    render_blogs(&blogs, format)
}

pub(crate) async fn handle_blog(
    ctx: &AppContext,
    args: BlogArgs,
    format: OutputFormat,
) -> CliResult<()> {
    let id = require_id(&args.id)?;
    let response = send(ctx.get(&paths::blog(id))?, "fetch blog").await?;
    let blog = response
        .json::<BlogDto>()
        .await
        .map_err(|err| CliError::failure(anyhow!("failed to parse blog: {err}")))?;
    render_blog(&blog, format)
}

pub(crate) async fn handle_add(
    ctx: &AppContext,
    args: AddArgs,
    format: OutputFormat,
) -> CliResult<()> {
    let url = validate_blog_url(&args.url)?;
    let response = send(ctx.get(&paths::add_blog(url))?, "add blog").await?;
    let blogs = response
        .json::<Vec<BlogDto>>()
        .await
        .map_err(|err| CliError::failure(anyhow!("failed to parse blog list: {err}")))?;
    tracing::info!(url, blogs = blogs.len(), "blog added");
    render_blogs(&blogs, format)
}

async fn fetch_blogs(ctx: &AppContext) -> CliResult<Vec<BlogDto>> {
    let response = send(ctx.get(&paths::blogs())?, "list blogs").await?;
    response
        .json::<Vec<BlogDto>>()
        .await
        .map_err(|err| CliError::failure(anyhow!("failed to parse blog list: {err}")))
}

pub(crate) fn require_id(raw: &str) -> CliResult<&str> {
    let id = raw.trim();
    if id.is_empty() {
        return Err(CliError::validation("blog id must not be empty"));
    }
    Ok(id)
}

fn validate_blog_url(raw: &str) -> CliResult<&str> {
    let url = raw.trim();
    if url.is_empty() {
        return Err(CliError::validation("blog URL must not be empty"));
    }
    let parsed = url
        .parse::<reqwest::Url>()
        .map_err(|err| CliError::validation(format!("invalid blog URL '{url}': {err}")))?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(CliError::validation(
            "blog URL must start with http:// or https://",
        ));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::context_with;
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn blogs_lists_from_base_path() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET).path("/blog-export/blogs");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!([
                    {"id": "b1", "url": "https://a.blogspot.com", "name": "A", "lastDownload": "01 Jan 2017"}
                ]));
        });

        let ctx = context_with(&server);
        handle_blogs(&ctx, OutputFormat::Table)
            .await
            .expect("list should succeed");
        mock.assert();
    }

    #[tokio::test]
    async fn blog_fetches_single_entry() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET).path("/blog-export/blogs/b1");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({"id": "b1", "name": "Travel", "lastDownload": ""}));
        });

        let ctx = context_with(&server);
        handle_blog(&ctx, BlogArgs { id: " b1 ".into() }, OutputFormat::Json)
            .await
            .expect("fetch should succeed");
        mock.assert();
    }

    #[tokio::test]
    async fn add_sends_encoded_url() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/blog-export/addBlog")
                .query_param("url", "https://new.blogspot.com/");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!([
                    {"id": null, "url": "https://new.blogspot.com/", "name": null, "lastDownload": ""}
                ]));
        });

        let ctx = context_with(&server);
        let args = AddArgs {
            url: "  https://new.blogspot.com/ ".into(),
        };
        handle_add(&ctx, args, OutputFormat::Table)
            .await
            .expect("add should succeed");
        mock.assert();
    }

    #[tokio::test]
    async fn add_rejects_invalid_urls_without_request() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET).path("/blog-export/addBlog");
            then.status(200);
        });

        let ctx = context_with(&server);
        for url in ["", "   ", "ftp://files.example.com", "example.com"] {
            let err = handle_add(&ctx, AddArgs { url: url.into() }, OutputFormat::Table)
                .await
                .expect_err("invalid URL should be rejected");
            assert_eq!(err.exit_code(), 2, "{url}");
        }
        mock.assert_calls(0);
    }

    #[tokio::test]
    async fn missing_blog_is_a_validation_error() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/blog-export/blogs/nope");
            then.status(404);
        });

        let ctx = context_with(&server);
        let err = handle_blog(&ctx, BlogArgs { id: "nope".into() }, OutputFormat::Table)
            .await
            .expect_err("missing blog should fail");
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn require_id_rejects_blank() {
        assert!(require_id("  ").is_err());
        assert_eq!(require_id(" abc ").ok(), Some("abc"));
    }
}
