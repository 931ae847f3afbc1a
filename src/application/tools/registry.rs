use super::{
    CheckLicensesTool, GetProfileTool, InstallPackagesTool, ListPackagesTool, ListProfilesTool,
    NewProjectTool, SearchPackagesTool,
};
use crate::ports::inbound::Tool;
use std::collections::BTreeMap;
use std::sync::Arc;

/// ToolRegistry - Name-keyed collection of tools exposed by the server
///
/// Listing is ordered by tool name.
#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every package-manager tool this crate provides.
    pub fn with_builtin_tools() -> Self {
        let mut registry = Self::new();
        registry.register(SearchPackagesTool);
        registry.register(ListPackagesTool);
        registry.register(GetProfileTool);
        registry.register(ListProfilesTool);
        registry.register(NewProjectTool);
        registry.register(InstallPackagesTool);
        registry.register(CheckLicensesTool);
        registry
    }

    /// Adds a tool, replacing any tool already registered under the same name.
    pub fn register<T: Tool + 'static>(&mut self, tool: T) -> Option<Arc<dyn Tool>> {
        self.register_arc(Arc::new(tool))
    }

    pub fn register_arc(&mut self, tool: Arc<dyn Tool>) -> Option<Arc<dyn Tool>> {
        tracing::debug!(tool = tool.name(), "registered tool");
        self.tools.insert(tool.name().to_string(), tool)
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    pub fn list(&self) -> impl Iterator<Item = &Arc<dyn Tool>> {
        self.tools.values()
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
