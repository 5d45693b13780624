//! Configuration loading and resolution.

use std::path::{Path, PathBuf};

use trending_coins::{Source, DEFAULT_URL};

/// Environment variable overriding the default listing URL.
pub const URL_ENV: &str = "TRENDING_COINS_URL";

/// Snapshot checked by `--test` when no `--file` is given.
pub const DEFAULT_SNAPSHOT: &str = "page.html";

/// Resolve the listing URL: explicit flag, then environment, then default.
pub fn resolve_url(explicit: Option<&str>) -> String {
    if let Some(url) = explicit {
        return url.to_string();
    }

    if let Ok(env_url) = std::env::var(URL_ENV) {
        if !env_url.trim().is_empty() {
            return env_url;
        }
    }

    DEFAULT_URL.to_string()
}

/// Pick the acquisition source from the mutually exclusive `--file` / `--url`.
pub fn resolve_source(file: Option<&Path>, url: Option<&str>) -> Source {
    match (file, url) {
        (Some(path), _) => Source::File(path.to_path_buf()),
        (None, Some(url)) => Source::Url(url.to_string()),
        (None, None) => {
            let url = resolve_url(None);
            if url == DEFAULT_URL {
                Source::Default
            } else {
                Source::Url(url)
            }
        }
    }
}

/// Snapshot path for the self-check.
pub fn resolve_snapshot(explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SNAPSHOT))
}
