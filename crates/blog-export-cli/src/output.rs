//! Output renderers and formatting helpers for CLI commands.

use std::io::{self, Write};

use anyhow::anyhow;
use blog_export_api_models::{BlogDto, JobKind, PdfDownload, ReadStatusEvent, UserDto};
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::client::{CliError, CliResult};

pub(crate) fn render_blogs(blogs: &[BlogDto], format: OutputFormat) -> CliResult<()> {
    emit(&format_blogs(blogs, format)?)
}

pub(crate) fn format_blogs(blogs: &[BlogDto], format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Json => to_json(&blogs),
        OutputFormat::Table => {
            let mut text = format!("{:<26} {:<30} {:<14} URL\n", "ID", "NAME", "LAST DOWNLOAD");
            for blog in blogs {
                text.push_str(&format!(
                    "{:<26} {:<30} {:<14} {}\n",
                    blog.id.as_deref().unwrap_or("<pending>"),
                    truncate(blog.display_name(), 30),
                    last_download(blog),
                    blog.url.as_deref().unwrap_or("")
                ));
            }
            Ok(text)
        }
    }
}

pub(crate) fn render_blog(blog: &BlogDto, format: OutputFormat) -> CliResult<()> {
    let text = match format {
        OutputFormat::Json => to_json(blog)?,
        OutputFormat::Table => {
            let mut text = String::new();
            text.push_str(&format!("id: {}\n", blog.id.as_deref().unwrap_or("<pending>")));
            text.push_str(&format!("name: {}\n", blog.display_name()));
            if let Some(url) = &blog.url {
                text.push_str(&format!("url: {url}\n"));
            }
            text.push_str(&format!("last download: {}\n", last_download(blog)));
            text
        }
    };
    emit(&text)
}

pub(crate) fn format_pdfs(downloads: &[PdfDownload], format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Json => to_json(&downloads),
        OutputFormat::Table if downloads.is_empty() => Ok("no PDFs generated yet\n".to_string()),
        OutputFormat::Table => Ok(downloads
            .iter()
            .map(|download| format!("{}\n", download.file_name()))
            .collect()),
    }
}

pub(crate) fn render_pdfs(downloads: &[PdfDownload], format: OutputFormat) -> CliResult<()> {
    emit(&format_pdfs(downloads, format)?)
}

pub(crate) fn render_user(user: &UserDto, format: OutputFormat) -> CliResult<()> {
    let text = match format {
        OutputFormat::Json => to_json(user)?,
        OutputFormat::Table => format!("{} <{}>\n", user.full_name(), user.email),
    };
    emit(&text)
}

/// One status line per job event; JSON mode emits newline-delimited objects.
pub(crate) fn format_status(
    kind: JobKind,
    event: &ReadStatusEvent,
    format: OutputFormat,
) -> CliResult<String> {
    match format {
        OutputFormat::Json => serde_json::to_string(event)
            .map(|line| format!("{line}\n"))
            .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}"))),
        OutputFormat::Table => Ok(format!("[{}] {}\n", kind.as_str(), event.status)),
    }
}

pub(crate) fn emit(text: &str) -> CliResult<()> {
    let mut stdout = io::stdout().lock();
    stdout
        .write_all(text.as_bytes())
        .and_then(|()| stdout.flush())
        .map_err(|err| CliError::failure(anyhow!("failed to write output: {err}")))
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> CliResult<String> {
    serde_json::to_string_pretty(value)
        .map(|text| format!("{text}\n"))
        .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))
}

fn last_download(blog: &BlogDto) -> &str {
    if blog.has_downloaded() {
        blog.last_download.as_str()
    } else {
        "never"
    }
}

#[must_use]
pub(crate) fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let kept: String = value.chars().take(width.saturating_sub(1)).collect();
    format!("{kept}…")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blog(id: Option<&str>, name: Option<&str>, last: &str) -> BlogDto {
        BlogDto {
            id: id.map(str::to_string),
            url: Some("https://example.blogspot.com/".into()),
            name: name.map(str::to_string),
            last_download: last.into(),
        }
    }

    #[test]
    fn blog_table_shows_pending_and_never() {
        let text = format_blogs(
            &[
                blog(Some("b1"), Some("Travel"), "01 Jan 2017"),
                blog(None, None, ""),
            ],
            OutputFormat::Table,
        )
        .expect("table renders");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("ID"));
        assert!(lines[1].contains("Travel") && lines[1].contains("01 Jan 2017"));
        assert!(lines[2].contains("<pending>") && lines[2].contains("never"));
        assert!(lines[2].contains("https://example.blogspot.com/"));
    }

    #[test]
    fn blog_json_uses_wire_names() {
        let text = format_blogs(&[blog(Some("b1"), Some("Travel"), "")], OutputFormat::Json)
            .expect("json renders");
        assert!(text.contains("\"lastDownload\""));
    }

    #[test]
    fn pdf_table_lists_file_names() {
        let downloads = vec![PdfDownload::new("output/Travel-20170101-20170331.pdf")];
        assert_eq!(
            format_pdfs(&downloads, OutputFormat::Table).expect("renders"),
            "Travel-20170101-20170331.pdf\n"
        );
        assert_eq!(
            format_pdfs(&[], OutputFormat::Table).expect("renders"),
            "no PDFs generated yet\n"
        );
    }

    #[test]
    fn status_lines_are_tagged_with_job() {
        let event = ReadStatusEvent {
            status: "Processing post 3".into(),
        };
        assert_eq!(
            format_status(JobKind::Download, &event, OutputFormat::Table).expect("renders"),
            "[download] Processing post 3\n"
        );
        assert_eq!(
            format_status(JobKind::GeneratePdf, &event, OutputFormat::Json).expect("renders"),
            "{\"status\":\"Processing post 3\"}\n"
        );
    }

    #[test]
    fn truncate_respects_width() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 5), "abcd…");
    }
}
