//! Chrome executable discovery for the pa11y runner.

use crate::config::ScannerConfig;
use std::fs;
use std::path::{Path, PathBuf};

const MAX_SEARCH_DEPTH: usize = 5;
const EXECUTABLE_NAMES: [&str; 2] = ["chrome", "chromium"];
const RENDER_CHROME_CACHE: &str = "/opt/render/.cache/puppeteer/chrome";
const SYSTEM_CHROME_PATHS: [&str; 4] = [
    "/usr/bin/google-chrome",
    "/usr/bin/google-chrome-stable",
    "/usr/bin/chromium",
    "/usr/bin/chromium-browser",
];

/// Finds a Chrome binary, checking an explicit path, then puppeteer cache
/// roots, then well-known system locations.
#[derive(Debug, Clone)]
pub struct ChromeLocator {
    executable_override: Option<PathBuf>,
    cache_roots: Vec<PathBuf>,
    system_paths: Vec<PathBuf>,
}

impl ChromeLocator {
    pub fn new(
        executable_override: Option<PathBuf>,
        cache_roots: Vec<PathBuf>,
        system_paths: Vec<PathBuf>,
    ) -> Self {
        Self {
            executable_override,
            cache_roots,
            system_paths,
        }
    }

    pub fn from_config(config: &ScannerConfig) -> Self {
        let home = std::env::var_os("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("/opt/render"));

        let mut cache_roots = vec![
            config.cache_dir.clone(),
            home.join(".cache").join("puppeteer").join("chrome"),
        ];
        if let Ok(cwd) = std::env::current_dir() {
            cache_roots.push(cwd.join(".cache").join("puppeteer").join("chrome"));
        }
        cache_roots.push(PathBuf::from(RENDER_CHROME_CACHE));

        Self::new(
            config.executable_path.clone(),
            cache_roots,
            SYSTEM_CHROME_PATHS.iter().map(PathBuf::from).collect(),
        )
    }

    /// Blocking search. Returns `None` to leave discovery to puppeteer.
    pub fn discover(&self) -> Option<PathBuf> {
        if let Some(path) = &self.executable_override {
            if is_regular_file(path) {
                tracing::info!(path = %path.display(), "Using configured Chrome executable");
                return Some(path.clone());
            }
            tracing::warn!(
                path = %path.display(),
                "Configured Chrome executable does not exist or is not a file"
            );
        }

        for root in &self.cache_roots {
            if !root.is_dir() {
                continue;
            }
            if let Some(found) = find_in_dir(root, 0) {
                tracing::info!(path = %found.display(), "Found Chrome in puppeteer cache");
                return Some(found);
            }
        }

        if let Some(found) = self.system_paths.iter().find(|path| is_regular_file(path)) {
            tracing::info!(path = %found.display(), "Found system Chrome");
            return Some(found.clone());
        }

        tracing::info!("Chrome executable not found; puppeteer will handle discovery");
        None
    }

    /// Run [`discover`](Self::discover) off the async runtime.
    pub async fn discover_executable(&self) -> Option<PathBuf> {
        let locator = self.clone();
        match tokio::task::spawn_blocking(move || locator.discover()).await {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!(error = %e, "Chrome discovery task failed");
                None
            }
        }
    }
}

fn is_regular_file(path: &Path) -> bool {
    fs::metadata(path).map(|meta| meta.is_file()).unwrap_or(false)
}

fn find_in_dir(dir: &Path, depth: usize) -> Option<PathBuf> {
    if depth > MAX_SEARCH_DEPTH {
        return None;
    }

    let entries = fs::read_dir(dir).ok()?;
    for entry in entries.flatten() {
        let path = entry.path();
        let Ok(file_type) = entry.file_type() else {
            continue;
        };

        if file_type.is_dir() {
            if let Some(found) = find_in_dir(&path, depth + 1) {
                return Some(found);
            }
        } else if entry
            .file_name()
            .to_str()
            .is_some_and(|name| EXECUTABLE_NAMES.contains(&name))
            && is_regular_file(&path)
        {
            return Some(path);
        }
    }

    None
}
