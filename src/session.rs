//! Host-formatter boundary: the options bag, the parser seam and the
//! formatting session.

use std::path::PathBuf;
use std::sync::Arc;

use log::debug;
use serde::Deserialize;
use serde_json::Value;

use crate::context::{resolve_context, ContextCache, FrameworkAdapter, NullAdapter, RuleContext};
use crate::error::Result;
use crate::groups::GroupTable;
use crate::transform::{transform_tree, TransformEnv};

/// Options recognized by the plugin, deserialized from the host formatter's
/// option object. Unknown options are ignored.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FormatOptions {
    /// Path of the source file being formatted.
    pub filepath: Option<PathBuf>,
    /// Explicit framework configuration path, resolved against the base
    /// directory and re-read on every invocation.
    pub utility_config: Option<PathBuf>,
    /// The host formatter's resolved project configuration file, used to
    /// derive the base directory.
    pub host_config_path: Option<PathBuf>,
}

/// The host formatter's parse capability. Rendering the mutated tree back to
/// text stays on the host side.
pub trait SourceParser {
    fn parse(&self, text: &str, options: &FormatOptions) -> Result<Value>;
}

/// One formatting session. Owns the group table, the framework adapter and
/// the rule-context cache shared across invocations; independent sessions
/// share nothing.
pub struct FormatSession<A: FrameworkAdapter = NullAdapter> {
    table: GroupTable,
    adapter: A,
    cache: ContextCache,
}

impl FormatSession<NullAdapter> {
    pub fn new() -> Self {
        Self::with_adapter(NullAdapter)
    }
}

impl Default for FormatSession<NullAdapter> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: FrameworkAdapter> FormatSession<A> {
    pub fn with_adapter(adapter: A) -> Self {
        Self::with_table(adapter, GroupTable::default())
    }

    pub fn with_table(adapter: A, table: GroupTable) -> Self {
        Self {
            table,
            adapter,
            cache: ContextCache::new(),
        }
    }

    pub fn group_table(&self) -> &GroupTable {
        &self.table
    }

    pub fn context_cache(&self) -> &ContextCache {
        &self.cache
    }

    /// Parse `text` with the host parser and sort every recognized class
    /// list in the resulting tree. The mutated tree is returned for the host
    /// to render.
    pub fn process<P: SourceParser>(
        &mut self,
        parser: &P,
        text: &str,
        options: &FormatOptions,
    ) -> Result<Value> {
        let mut tree = parser.parse(text, options)?;
        self.sort_tree(&mut tree, options);
        Ok(tree)
    }

    /// Sort class lists in an already-parsed tree. Returns whether any node
    /// changed.
    pub fn sort_tree(&mut self, tree: &mut Value, options: &FormatOptions) -> bool {
        let context = self.resolve(options);
        let env = TransformEnv {
            table: &self.table,
            context: &context,
        };
        let changed = transform_tree(tree, &env);
        if changed {
            debug!("reordered class lists in {:?}", options.filepath);
        }
        changed
    }

    /// Resolve (or reuse) the rule context for the active configuration.
    pub fn resolve(&mut self, options: &FormatOptions) -> Arc<RuleContext> {
        resolve_context(&mut self.cache, &self.adapter, options)
    }
}
