use crate::repository::RemoteRepository;
use crate::Result;
use chrono::{DateTime, Local, SecondsFormat, Utc};
use clap::ValueEnum;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Json,
    Csv,
    Markdown,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Markdown => "md",
        }
    }
}

/// Fields kept in a JSON export
#[derive(Debug, Serialize)]
struct ExportRecord<'a> {
    full_name: &'a str,
    html_url: &'a str,
    description: &'a str,
    language: &'a str,
    stargazers_count: u64,
    forks_count: u64,
    updated_at: String,
    topics: &'a [String],
}

impl<'a> From<&'a RemoteRepository> for ExportRecord<'a> {
    fn from(repo: &'a RemoteRepository) -> Self {
        Self {
            full_name: &repo.full_name,
            html_url: &repo.html_url,
            description: repo.description.as_deref().unwrap_or(""),
            language: repo.language.as_deref().unwrap_or(""),
            stargazers_count: repo.star_count,
            forks_count: repo.fork_count,
            updated_at: timestamp(&repo.updated_at),
            topics: &repo.topics,
        }
    }
}

fn timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Render repositories in `format`
pub fn render(repos: &[RemoteRepository], format: ExportFormat, title: &str) -> Result<String> {
    match format {
        ExportFormat::Json => render_json(repos),
        ExportFormat::Csv => Ok(render_csv(repos)),
        ExportFormat::Markdown => Ok(render_markdown(repos, title, Local::now())),
    }
}

fn render_json(repos: &[RemoteRepository]) -> Result<String> {
    let records: Vec<ExportRecord> = repos.iter().map(ExportRecord::from).collect();
    Ok(serde_json::to_string_pretty(&records)?)
}

fn render_csv(repos: &[RemoteRepository]) -> String {
    let mut out = String::from("Repository,URL,Description,Language,Stars,Forks,Updated\n");
    for repo in repos {
        let row = [
            csv_field(&repo.full_name),
            csv_field(&repo.html_url),
            csv_field(repo.description.as_deref().unwrap_or("")),
            csv_field(repo.language.as_deref().unwrap_or("")),
            repo.star_count.to_string(),
            repo.fork_count.to_string(),
            timestamp(&repo.updated_at),
        ];
        out.push_str(&row.join(","));
        out.push('\n');
    }
    out
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn render_markdown(repos: &[RemoteRepository], title: &str, now: DateTime<Local>) -> String {
    let mut out = format!(
        "# {title}\n\nExported on: {}\n\n",
        now.format("%Y-%m-%d %H:%M:%S")
    );
    out.push_str("| # | Repository | Description | Language | Stars | Forks |\n");
    out.push_str("|---|------------|-------------|----------|-------|-------|\n");

    for (i, repo) in repos.iter().enumerate() {
        let description = repo
            .description
            .as_deref()
            .filter(|d| !d.is_empty())
            .unwrap_or("No description");
        let description = truncate(description, 60)
            .replace('|', "\\|")
            .replace('\n', " ");

        out.push_str(&format!(
            "| {} | [{}]({}) | {} | {} | {} | {} |\n",
            i + 1,
            repo.full_name,
            repo.html_url,
            description,
            repo.language.as_deref().unwrap_or("N/A"),
            repo.star_count,
            repo.fork_count
        ));
    }
    out
}

/// Shorten to at most `max_len` characters, ending in `...` when cut
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

/// Write `repos` to `github_<label>_<timestamp>.<ext>` inside `dir`
pub fn export_repositories(
    repos: &[RemoteRepository],
    format: ExportFormat,
    dir: &Path,
    label: &str,
    title: &str,
) -> Result<PathBuf> {
    let content = render(repos, format, title)?;

    std::fs::create_dir_all(dir)?;
    let filename = format!(
        "github_{}_{}.{}",
        label,
        Local::now().format("%Y%m%d_%H%M%S"),
        format.extension()
    );
    let path = dir.join(filename);
    std::fs::write(&path, content)?;

    info!("Exported {} repositories to {}", repos.len(), path.display());
    Ok(path)
}
