//! Step version download: archive locations first (or git first when
//! configured), extracted into the library's step cache.

use std::fs;
use std::io::{Cursor, Read};
use std::path::Path;
use std::time::Duration;

use indicatif::ProgressBar;
use reqwest::{Client, Response};

use stepman_core::config::DownloadConfig;
use stepman_core::spec::{DownloadLocation, Step, StepLibSpec};
use stepman_util::errors::StepmanError;

use crate::git;
use crate::source::file_uri_path;

const RETRY_DELAY: Duration = Duration::from_secs(2);
const PROGRESS_THRESHOLD: u64 = 100_000;

/// Download behaviour, usually derived from `[download]` in config.
#[derive(Debug, Clone)]
pub struct DownloadSettings {
    pub timeout: Duration,
    pub retries: u32,
    pub prefer_git: bool,
}

impl Default for DownloadSettings {
    fn default() -> Self {
        Self::from(&DownloadConfig::default())
    }
}

impl From<&DownloadConfig> for DownloadSettings {
    fn from(config: &DownloadConfig) -> Self {
        Self {
            timeout: Duration::from_secs(config.timeout_secs),
            retries: config.retries.max(1),
            prefer_git: config.prefer_git,
        }
    }
}

/// Build a shared reqwest client for step downloads.
pub fn build_client(settings: &DownloadSettings) -> miette::Result<Client> {
    Client::builder()
        .timeout(settings.timeout)
        .user_agent(concat!("stepman/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| {
            StepmanError::Network {
                message: format!("Failed to create HTTP client: {e}"),
            }
            .into()
        })
}

/// URL of a step archive below a zip location.
pub fn zip_url(src: &str, id: &str, version: &str) -> String {
    format!("{}/{id}/{version}/step.zip", src.trim_end_matches('/'))
}

/// Download `id@version` into `dest`, trying each location of `spec` in turn.
///
/// Files are staged next to `dest` and moved into place only on success,
/// so an interrupted download never leaves a half-filled cache entry.
pub async fn download_step(
    client: &Client,
    spec: &StepLibSpec,
    id: &str,
    version: &str,
    step: &Step,
    dest: &Path,
    settings: &DownloadSettings,
) -> miette::Result<()> {
    let parent = dest.parent().ok_or_else(|| StepmanError::Generic {
        message: format!("Invalid step cache path {}", dest.display()),
    })?;
    stepman_util::fs::ensure_dir(parent).map_err(StepmanError::Io)?;

    let mut locations: Vec<&DownloadLocation> = spec.download_locations.iter().collect();
    if settings.prefer_git {
        locations.sort_by_key(|l| !matches!(l, DownloadLocation::Git { .. }));
    }

    let mut failures = Vec::new();
    for location in locations {
        let staging = tempfile::Builder::new()
            .prefix(".download-")
            .tempdir_in(parent)
            .map_err(StepmanError::Io)?;
        let staged = staging.path().join("step");

        let outcome = match location {
            DownloadLocation::Zip { src } => {
                let url = zip_url(src, id, version);
                match fetch_archive(client, &url, settings).await {
                    Ok(Some(bytes)) => extract_zip(&bytes, &staged),
                    Ok(None) => Err(StepmanError::Network {
                        message: format!("{url} not found"),
                    }
                    .into()),
                    Err(e) => Err(e),
                }
            }
            DownloadLocation::Git { .. } => match step.source.clone() {
                Some(source) => {
                    let target = staged.clone();
                    tokio::task::spawn_blocking(move || {
                        git::clone_at_commit(&source.git, &source.commit, &target)
                    })
                    .await
                    .map_err(|e| StepmanError::Generic {
                        message: format!("Background task failed: {e}"),
                    })?
                }
                None => Err(StepmanError::Manifest {
                    message: format!("`{id}@{version}` has no git source"),
                }
                .into()),
            },
        };

        match outcome {
            Ok(()) => {
                if dest.exists() {
                    fs::remove_dir_all(dest).map_err(StepmanError::Io)?;
                }
                fs::rename(&staged, dest).map_err(StepmanError::Io)?;
                tracing::info!("Downloaded {id}@{version} to {}", dest.display());
                return Ok(());
            }
            Err(e) => {
                tracing::debug!("Download location {location:?} failed: {e}");
                failures.push(e.to_string());
            }
        }
    }

    if failures.is_empty() {
        return Err(StepmanError::Manifest {
            message: "Library manifest declares no download locations".to_string(),
        }
        .into());
    }
    Err(StepmanError::Network {
        message: format!(
            "Could not download {id}@{version}:\n  - {}",
            failures.join("\n  - ")
        ),
    }
    .into())
}

/// Fetch an archive from an `http(s)://` or `file://` URL.
///
/// Returns `Ok(None)` if the archive does not exist at that location.
async fn fetch_archive(
    client: &Client,
    url: &str,
    settings: &DownloadSettings,
) -> miette::Result<Option<Vec<u8>>> {
    if let Some(path) = file_uri_path(url) {
        return match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StepmanError::Io(e).into()),
        };
    }
    download_bytes(client, url, settings.retries).await
}

/// Download raw bytes from a URL, retrying on timeouts, connection errors and 5xx.
///
/// Returns `Ok(None)` for 404.
pub async fn download_bytes(
    client: &Client,
    url: &str,
    retries: u32,
) -> miette::Result<Option<Vec<u8>>> {
    let mut last_err = String::new();

    for attempt in 0..retries {
        if attempt > 0 {
            tokio::time::sleep(RETRY_DELAY * attempt).await;
        }

        match client.get(url).send().await {
            Ok(resp) => {
                let status = resp.status();
                if status == reqwest::StatusCode::NOT_FOUND {
                    return Ok(None);
                }
                if status.is_server_error() {
                    last_err = format!("HTTP {status} from {url}");
                    continue;
                }
                if !status.is_success() {
                    return Err(StepmanError::Network {
                        message: format!("HTTP {status} fetching {url}"),
                    }
                    .into());
                }

                let total = resp.content_length().unwrap_or(0);
                let pb = (total > PROGRESS_THRESHOLD)
                    .then(|| stepman_util::progress::download_bar(total, "step.zip"));
                let body = read_body(resp, pb.as_ref()).await;
                if let Some(pb) = pb {
                    pb.finish_and_clear();
                }
                let body = body.map_err(|e| StepmanError::Network {
                    message: format!("Failed to read response from {url}: {e}"),
                })?;
                return Ok(Some(body));
            }
            Err(e) if e.is_timeout() || e.is_connect() => {
                last_err = format!("{e}");
                continue;
            }
            Err(e) => {
                return Err(StepmanError::Network {
                    message: format!("Request to {url} failed: {e}"),
                }
                .into());
            }
        }
    }

    Err(StepmanError::Network {
        message: format!("Failed after {retries} attempts for {url}: {last_err}"),
    }
    .into())
}

/// Read a response body chunk by chunk, advancing `pb` as bytes arrive.
async fn read_body(mut resp: Response, pb: Option<&ProgressBar>) -> reqwest::Result<Vec<u8>> {
    let mut body = Vec::new();
    while let Some(chunk) = resp.chunk().await? {
        if let Some(pb) = pb {
            pb.inc(chunk.len() as u64);
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}

/// Extract a zip archive held in memory to `dest`, then flatten a single
/// wrapper folder if the archive has one.
pub fn extract_zip(data: &[u8], dest: &Path) -> miette::Result<()> {
    let mut archive = zip::ZipArchive::new(Cursor::new(data)).map_err(|e| StepmanError::Network {
        message: format!("Failed to open step archive: {e}"),
    })?;
    fs::create_dir_all(dest).map_err(StepmanError::Io)?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).map_err(|e| StepmanError::Network {
            message: format!("Zip entry error: {e}"),
        })?;

        let out_path = dest.join(entry.mangled_name());

        if entry.is_dir() {
            fs::create_dir_all(&out_path).map_err(StepmanError::Io)?;
        } else {
            if let Some(parent) = out_path.parent() {
                fs::create_dir_all(parent).map_err(StepmanError::Io)?;
            }
            let mut buf = Vec::new();
            entry
                .read_to_end(&mut buf)
                .map_err(|e| StepmanError::Network {
                    message: format!("Failed to read zip entry: {e}"),
                })?;
            fs::write(&out_path, &buf).map_err(StepmanError::Io)?;

            // Preserve executable bit on Unix
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                if let Some(mode) = entry.unix_mode() {
                    fs::set_permissions(&out_path, fs::Permissions::from_mode(mode))
                        .map_err(StepmanError::Io)?;
                }
            }
        }
    }

    flatten_single_child(dest)
}

/// If `dir` contains exactly one child directory, move its contents up to `dir`.
fn flatten_single_child(dir: &Path) -> miette::Result<()> {
    let entries: Vec<_> = fs::read_dir(dir)
        .map_err(StepmanError::Io)?
        .filter_map(|e| e.ok())
        .collect();

    if entries.len() == 1 && entries[0].path().is_dir() {
        let child = entries[0].path();
        let tmp_name = dir.with_file_name(format!(
            ".stepman-flatten-{}",
            dir.file_name().unwrap_or_default().to_string_lossy()
        ));
        fs::rename(dir, &tmp_name).map_err(StepmanError::Io)?;
        let Some(child_name) = child.file_name() else {
            return Ok(());
        };
        fs::rename(tmp_name.join(child_name), dir).map_err(StepmanError::Io)?;
        fs::remove_dir_all(&tmp_name).map_err(StepmanError::Io)?;
    }
    Ok(())
}
