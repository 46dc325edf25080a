//! Startup-time discovery of loose documentation files.
//!
//! Files named `README<sep><name>.md` (case-insensitive, `<sep>` one of `-`, `_` or `.`) in the
//! discovery directory become resources at `<scheme>://<category>/<name>`, where `<name>` is
//! lower-cased with runs of other characters collapsed to `-`. Only metadata is gathered here; file
//! bodies are read when a resource is first loaded.

use std::{
    path::{Path, PathBuf},
    sync::OnceLock,
};

use folio_protocol::resource::Resource;
use glob::{glob_with, MatchOptions, Pattern};
use regex::Regex;

use crate::{
    errors::DiscoveryError,
    producer::FileContent,
    registry::{ResourceDescriptor, SCHEME_SEPARATOR},
};

/// Category segment reserved for discovered documents.
pub const DEFAULT_CATEGORY: &str = "readme";

const FILE_GLOB: &str = "README*.md";

/// Where to look for documents, and which category to file them under.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveryConfig {
    pub base_dir: PathBuf,
    pub category: String,
}

impl DiscoveryConfig {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        DiscoveryConfig {
            base_dir: base_dir.into(),
            category: DEFAULT_CATEGORY.to_string(),
        }
    }

    /// Resolve `relative` against the directory holding the running executable, so the scan
    /// doesn't depend on the process's working directory.
    pub fn beside_executable(relative: impl AsRef<Path>) -> Result<Self, DiscoveryError> {
        let exe = std::env::current_exe()?;
        let dir = exe
            .parent()
            .ok_or_else(|| DiscoveryError::MissingDirectory(exe.clone()))?;
        Ok(DiscoveryConfig::new(dir.join(relative)))
    }

    pub fn with_category<S: Into<String>>(mut self, category: S) -> Self {
        self.category = category.into();
        self
    }
}

/// Scan for documents, logging and swallowing any failure of the scan itself.
pub fn discover(config: &DiscoveryConfig, scheme: &str) -> Vec<ResourceDescriptor> {
    match scan(config, scheme) {
        Ok(found) => found,
        Err(e) => {
            tracing::warn!(
                error = %e,
                dir = %config.base_dir.display(),
                "Resource discovery failed, continuing without discovered resources"
            );
            Vec::new()
        }
    }
}

/// Scan for documents. Entries are returned in file name order.
pub fn scan(config: &DiscoveryConfig, scheme: &str) -> Result<Vec<ResourceDescriptor>, DiscoveryError> {
    check_category(&config.category, scheme)?;

    let dir = &config.base_dir;
    if !dir.is_dir() {
        return Err(DiscoveryError::MissingDirectory(dir.clone()));
    }
    let dir_str = dir
        .to_str()
        .ok_or_else(|| DiscoveryError::NonUtf8Path(dir.clone()))?;
    let pattern = format!("{}/{}", Pattern::escape(dir_str), FILE_GLOB);
    let options = MatchOptions {
        case_sensitive: false,
        require_literal_separator: true,
        require_literal_leading_dot: true,
    };

    let mut paths = Vec::new();
    for entry in glob_with(&pattern, options)? {
        match entry {
            Ok(path) if path.is_file() => paths.push(path),
            Ok(_) => {}
            Err(e) => tracing::warn!(error = %e, "Skipping unreadable discovery entry"),
        }
    }
    paths.sort();

    let mut found = Vec::with_capacity(paths.len());
    for path in paths {
        let Some(file_name) = path.file_name().and_then(|f| f.to_str()) else {
            continue;
        };
        let Some(name) = derive_name(file_name) else {
            tracing::debug!(file = %file_name, "File name has no usable resource name, skipping");
            continue;
        };
        let identifier = format!("{scheme}{SCHEME_SEPARATOR}{}/{name}", config.category);
        tracing::debug!(%identifier, file = %path.display(), "Discovered resource");
        let description = format!("Discovered documentation from {file_name}");
        found.push(ResourceDescriptor::new(
            identifier,
            format!("README: {name}"),
            description,
            FileContent::new(path),
        ));
    }
    Ok(found)
}

/// A category must be a single segment that forms a valid URI under `scheme`, otherwise every
/// discovered identifier would be rejected at registration.
fn check_category(category: &str, scheme: &str) -> Result<(), DiscoveryError> {
    let invalid = |reason: String| DiscoveryError::InvalidCategory {
        category: category.to_string(),
        reason,
    };
    if category.is_empty() || category.contains('/') {
        return Err(invalid("expected a single path segment".to_string()));
    }
    Resource::new(format!("{scheme}{SCHEME_SEPARATOR}{category}/name"), None, None, None)
        .map(|_| ())
        .map_err(|e| invalid(e.to_string()))
}

/// Derive a resource name from a file name, eg `README_Dialog Patterns.md` -> `dialog-patterns`.
pub fn derive_name(file_name: &str) -> Option<String> {
    static FILE_NAME: OnceLock<Regex> = OnceLock::new();
    static SEPARATORS: OnceLock<Regex> = OnceLock::new();

    let file_name_re = FILE_NAME.get_or_init(|| {
        Regex::new(r"(?i)^readme[-_.](?P<name>.+)\.md$").expect("valid file name pattern")
    });
    let separators_re =
        SEPARATORS.get_or_init(|| Regex::new(r"[^a-z0-9]+").expect("valid separator pattern"));

    let raw = file_name_re.captures(file_name)?.name("name")?.as_str();
    let lowered = raw.to_lowercase();
    let name = separators_re.replace_all(&lowered, "-");
    let name = name.trim_matches('-');
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}
