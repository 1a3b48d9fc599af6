//! Resolution and caching of the utility framework's rule context.
//!
//! Building a rule context from a resolved configuration is expensive by
//! contract, so contexts are cached per configuration source and reused as
//! long as the content hash of the resolved configuration is unchanged.
//! Discovery and loading are best-effort: a missing or broken configuration
//! file falls back to the empty configuration, it is never an error.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use log::{debug, warn};
use serde_json::{json, Value};
use twox_hash::XxHash3_128;

use crate::session::FormatOptions;

/// Recognized framework configuration filenames for the upward search, in
/// probe order.
const CONFIG_FILE_NAMES: [&str; 2] = ["tailwind.config.json", ".tailwindrc.json"];

/// Scan list forced onto every loaded configuration so the collaborator does
/// not warn about absent content globs.
const NO_OP_CONTENT: &str = "no-op";

/// Opaque product of building the framework's matching rules from a resolved
/// configuration. Cheap to share, expensive to build.
#[derive(Debug)]
pub struct RuleContext {
    resolved: Value,
}

impl RuleContext {
    pub fn new(resolved: Value) -> Self {
        Self { resolved }
    }

    /// The resolved configuration this context was built from.
    pub fn resolved_config(&self) -> &Value {
        &self.resolved
    }
}

/// Boundary to the external class framework.
pub trait FrameworkAdapter {
    /// Expand a raw configuration into its effective form.
    fn resolve_config(&self, raw: Value) -> Value;

    /// Build the rule context for a resolved configuration.
    fn build_context(&self, resolved: &Value) -> Arc<RuleContext>;

    /// Generate matching rules for candidate class names. Reserved for class
    /// validation; the sorter itself never calls it.
    fn generate_rules(&self, context: &RuleContext, classes: &[String]) -> Vec<Value> {
        let _ = (context, classes);
        Vec::new()
    }
}

/// Inert adapter used when no real framework integration is wired in.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAdapter;

impl FrameworkAdapter for NullAdapter {
    fn resolve_config(&self, raw: Value) -> Value {
        raw
    }

    fn build_context(&self, resolved: &Value) -> Arc<RuleContext> {
        Arc::new(RuleContext::new(resolved.clone()))
    }
}

/// Where a configuration came from. Used as the cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConfigSource {
    /// No configuration file was found; the empty configuration applies.
    Default,
    /// A configuration file on disk.
    Path(PathBuf),
}

struct CacheEntry {
    hash: u128,
    context: Arc<RuleContext>,
}

/// Session-owned cache of built rule contexts, keyed by configuration source
/// and validated by the content hash of the resolved configuration.
#[derive(Default)]
pub struct ContextCache {
    entries: HashMap<ConfigSource, CacheEntry>,
}

impl ContextCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Resolve the rule context for the configuration active under `options`,
/// reusing the cached context when the configuration is unchanged.
pub fn resolve_context<A: FrameworkAdapter>(
    cache: &mut ContextCache,
    adapter: &A,
    options: &FormatOptions,
) -> Arc<RuleContext> {
    let base_dir = base_directory(options);
    let (source, mut raw_config) = match load_configuration(&base_dir, options) {
        Ok(found) => found,
        Err(error) => {
            warn!("failed to load utility configuration: {error:#}; using defaults");
            (ConfigSource::Default, json!({}))
        }
    };

    if let Some(object) = raw_config.as_object_mut() {
        object.insert("content".to_string(), json!([NO_OP_CONTENT]));
    }

    let resolved = adapter.resolve_config(raw_config);
    let hash = content_hash(&resolved);

    if let Some(entry) = cache.entries.get(&source) {
        if entry.hash == hash {
            debug!("reusing cached rule context for {source:?}");
            return Arc::clone(&entry.context);
        }
    }

    debug!("building rule context for {source:?}");
    let context = adapter.build_context(&resolved);
    cache.entries.insert(
        source,
        CacheEntry {
            hash,
            context: Arc::clone(&context),
        },
    );
    context
}

/// Directory that relative configuration paths and the upward search start
/// from: the host formatter's project configuration location when known, else
/// the source file's directory, else the working directory.
fn base_directory(options: &FormatOptions) -> PathBuf {
    if let Some(host_config) = &options.host_config_path {
        if let Some(dir) = host_config.parent() {
            return dir.to_path_buf();
        }
    }
    if options.utility_config.is_none() {
        if let Some(filepath) = &options.filepath {
            if let Some(dir) = filepath.parent() {
                return dir.to_path_buf();
            }
        }
    }
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

fn load_configuration(
    base_dir: &Path,
    options: &FormatOptions,
) -> anyhow::Result<(ConfigSource, Value)> {
    if let Some(explicit) = &options.utility_config {
        let path = base_dir.join(explicit);
        let config =
            read_config(&path).with_context(|| format!("reading {}", path.display()))?;
        return Ok((ConfigSource::Path(path), config));
    }

    match find_config_file(base_dir) {
        Some(path) => {
            let config =
                read_config(&path).with_context(|| format!("reading {}", path.display()))?;
            Ok((ConfigSource::Path(path), config))
        }
        None => Ok((ConfigSource::Default, json!({}))),
    }
}

/// Read and parse a configuration file. Always re-reads from disk; the file
/// may change between invocations within a long-lived process.
fn read_config(path: &Path) -> anyhow::Result<Value> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Search ancestor directories for the first recognized configuration file.
fn find_config_file(start: &Path) -> Option<PathBuf> {
    start.ancestors().find_map(|dir| {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|candidate| candidate.is_file())
    })
}

/// Deterministic fingerprint of a resolved configuration.
fn content_hash(resolved: &Value) -> u128 {
    let bytes = serde_json::to_vec(resolved).unwrap_or_default();
    XxHash3_128::oneshot(&bytes)
}
