//! Deployment to Vercel.
//!
//! The site is built, a `vercel.json` is written into the output directory,
//! and the `vercel` CLI is run against that directory. Nothing here talks to
//! the Vercel API directly; failures are recognized from the CLI's output and
//! mapped to remediation hints.

use crate::config::Config;
use crate::generate::{self, BuildReport, GenerateError};
use regex::Regex;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::LazyLock;
use thiserror::Error;
use tracing::{debug, info, warn};

pub const VERCEL_CONFIG_FILE: &str = "vercel.json";
/// Directory where the Vercel CLI stores the project link.
pub const VERCEL_LINK_DIR: &str = ".vercel";

const VERCEL_BIN: &str = "vercel";

static DEPLOY_URL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"https://[^\s]+").unwrap());

#[derive(Error, Debug)]
pub enum DeployError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Build(#[from] GenerateError),
    #[error("Vercel CLI not found. Install it with: npm install -g vercel")]
    CliMissing,
    #[error("Vercel deployment failed: {0}")]
    Failed(DeployFailure),
}

/// Known ways `vercel deploy` fails, recognized from its output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployFailure {
    MissingCredentials,
    StaleProjectLink,
    MissingProjectSettings,
    Unknown,
}

impl DeployFailure {
    /// What the user should do about it.
    pub fn remedy(self) -> &'static str {
        match self {
            DeployFailure::MissingCredentials => {
                "not logged in to Vercel. Run `vercel login` and deploy again"
            }
            DeployFailure::StaleProjectLink => {
                "the linked Vercel project no longer exists. Run `doc-builder reset-vercel` and deploy again"
            }
            DeployFailure::MissingProjectSettings => {
                "the Vercel project settings could not be loaded. Run `doc-builder reset-vercel` to re-link, then check the project in the Vercel dashboard"
            }
            DeployFailure::Unknown => "see the Vercel CLI output above",
        }
    }
}

impl std::fmt::Display for DeployFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.remedy())
    }
}

/// Classify failed CLI output. First matching signature wins.
pub fn diagnose(output: &str) -> DeployFailure {
    const SIGNATURES: &[(&str, DeployFailure)] = &[
        ("no existing credentials", DeployFailure::MissingCredentials),
        ("vercel login", DeployFailure::MissingCredentials),
        ("the specified token is not valid", DeployFailure::MissingCredentials),
        ("project not found", DeployFailure::StaleProjectLink),
        ("project_not_found", DeployFailure::StaleProjectLink),
        ("could not retrieve project settings", DeployFailure::MissingProjectSettings),
        ("missing project settings", DeployFailure::MissingProjectSettings),
    ];
    let lower = output.to_lowercase();
    SIGNATURES
        .iter()
        .find(|(needle, _)| lower.contains(needle))
        .map_or(DeployFailure::Unknown, |&(_, failure)| failure)
}

#[derive(Debug, Clone, Default)]
pub struct DeployOptions {
    /// Production deploy; `--no-prod` makes a preview deploy.
    pub prod: bool,
    pub force: bool,
    /// Overrides `productionUrl` from the config.
    pub production_url: Option<String>,
}

#[derive(Debug)]
pub struct DeployOutcome {
    pub build: BuildReport,
    /// First URL the CLI printed.
    pub url: Option<String>,
    /// Configured production URL, reported for production deploys.
    pub production_url: Option<String>,
    pub prod: bool,
}

/// Build, prepare and deploy the site.
pub fn deploy(
    config: &Config,
    options: &DeployOptions,
    project_dir: &Path,
) -> Result<DeployOutcome, DeployError> {
    check_cli()?;
    let build = generate::build(config)?;
    write_vercel_config(&config.output_dir)?;
    ensure_gitignored(project_dir)?;

    let args = vercel_args(&config.output_dir, options.prod, options.force);
    info!(command = %format!("{VERCEL_BIN} {}", args.join(" ")), "deploying");
    let output = Command::new(VERCEL_BIN).args(&args).current_dir(project_dir).output()?;
    let text = format!(
        "{}\n{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );

    if !output.status.success() {
        eprintln!("{}", text.trim());
        let failure = diagnose(&text);
        warn!(?failure, status = ?output.status.code(), "vercel deploy failed");
        return Err(DeployError::Failed(failure));
    }

    let production_url = options
        .production_url
        .clone()
        .or_else(|| config.production_url.clone())
        .filter(|_| options.prod);
    Ok(DeployOutcome {
        build,
        url: extract_url(&text),
        production_url,
        prod: options.prod,
    })
}

fn check_cli() -> Result<(), DeployError> {
    match Command::new(VERCEL_BIN).arg("--version").output() {
        Ok(out) if out.status.success() => {
            debug!(version = %String::from_utf8_lossy(&out.stdout).trim(), "found vercel CLI");
            Ok(())
        }
        _ => Err(DeployError::CliMissing),
    }
}

/// Arguments for `vercel`: `deploy <dir> --yes [--prod] [--force]`.
pub fn vercel_args(output_dir: &Path, prod: bool, force: bool) -> Vec<String> {
    let mut args = vec![
        "deploy".to_string(),
        output_dir.display().to_string(),
        "--yes".to_string(),
    ];
    if prod {
        args.push("--prod".to_string());
    }
    if force {
        args.push("--force".to_string());
    }
    args
}

/// Contents of `vercel.json`. The output directory is deployed as the
/// project root, so the static files are served from `.`.
pub fn vercel_config() -> serde_json::Value {
    json!({
        "cleanUrls": true,
        "trailingSlash": false,
        "outputDirectory": ".",
    })
}

pub fn write_vercel_config(output_dir: &Path) -> Result<PathBuf, DeployError> {
    let path = output_dir.join(VERCEL_CONFIG_FILE);
    fs::write(&path, serde_json::to_string_pretty(&vercel_config())? + "\n")?;
    debug!(path = %path.display(), "wrote vercel.json");
    Ok(path)
}

/// Append `.vercel` to an existing `.gitignore` that does not list it.
pub fn ensure_gitignored(project_dir: &Path) -> std::io::Result<bool> {
    let path = project_dir.join(".gitignore");
    let Ok(current) = fs::read_to_string(&path) else {
        return Ok(false);
    };
    if current.lines().any(|l| l.trim().trim_end_matches('/') == VERCEL_LINK_DIR) {
        return Ok(false);
    }
    let separator = if current.is_empty() || current.ends_with('\n') { "" } else { "\n" };
    fs::write(&path, format!("{current}{separator}\n# Vercel\n{VERCEL_LINK_DIR}\n"))?;
    info!("added .vercel to .gitignore");
    Ok(true)
}

/// First `https://` URL in CLI output.
pub fn extract_url(output: &str) -> Option<String> {
    DEPLOY_URL.find(output).map(|m| m.as_str().to_string())
}

/// Remove the Vercel project link from the project and output directories.
/// Returns the directories that were removed.
pub fn reset_vercel(project_dir: &Path, output_dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut removed = Vec::new();
    for dir in [project_dir.join(VERCEL_LINK_DIR), output_dir.join(VERCEL_LINK_DIR)] {
        if dir.is_dir() {
            fs::remove_dir_all(&dir)?;
            info!(dir = %dir.display(), "removed Vercel link");
            removed.push(dir);
        }
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn args_follow_flags() {
        let dir = Path::new("html");
        assert_eq!(vercel_args(dir, true, false), vec!["deploy", "html", "--yes", "--prod"]);
        assert_eq!(vercel_args(dir, false, true), vec!["deploy", "html", "--yes", "--force"]);
    }

    #[test]
    fn url_extracted_from_output() {
        let out = "Vercel CLI 33.0.0\nInspect: https://vercel.com/acme/docs/abc\nProduction: https://docs-acme.vercel.app [2s]\n";
        assert_eq!(extract_url(out).as_deref(), Some("https://vercel.com/acme/docs/abc"));
        assert_eq!(extract_url("nothing here"), None);
    }

    #[test]
    fn failures_diagnosed() {
        assert_eq!(
            diagnose("Error: No existing credentials found. Please run `vercel login`"),
            DeployFailure::MissingCredentials
        );
        assert_eq!(diagnose("Error: Project not found"), DeployFailure::StaleProjectLink);
        assert_eq!(
            diagnose("Error: Could not retrieve Project Settings."),
            DeployFailure::MissingProjectSettings
        );
        assert_eq!(diagnose("segfault"), DeployFailure::Unknown);
    }

    #[test]
    fn failure_message_carries_remedy() {
        let err = DeployError::Failed(DeployFailure::StaleProjectLink);
        assert!(err.to_string().contains("reset-vercel"));
    }

    #[test]
    fn vercel_json_written() {
        let tmp = TempDir::new().unwrap();
        let path = write_vercel_config(tmp.path()).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(value["cleanUrls"], json!(true));
        assert_eq!(value["trailingSlash"], json!(false));
    }

    #[test]
    fn gitignore_gets_vercel_once() {
        let tmp = TempDir::new().unwrap();
        assert!(!ensure_gitignored(tmp.path()).unwrap());

        fs::write(tmp.path().join(".gitignore"), "target").unwrap();
        assert!(ensure_gitignored(tmp.path()).unwrap());
        assert!(!ensure_gitignored(tmp.path()).unwrap());
        let text = fs::read_to_string(tmp.path().join(".gitignore")).unwrap();
        assert_eq!(text, "target\n\n# Vercel\n.vercel\n");
    }

    #[test]
    fn reset_removes_links() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("html");
        fs::create_dir_all(tmp.path().join(".vercel")).unwrap();
        fs::create_dir_all(out.join(".vercel")).unwrap();
        fs::write(tmp.path().join(".vercel/project.json"), "{}").unwrap();

        let removed = reset_vercel(tmp.path(), &out).unwrap();
        assert_eq!(removed.len(), 2);
        assert!(!tmp.path().join(".vercel").exists());
        assert!(reset_vercel(tmp.path(), &out).unwrap().is_empty());
    }
}
