use crate::registry::{Component, ComponentHandle, FlatRegistry, Rendered};
use marionette_common::{Diagnostic, DiagnosticKind};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::debug;

pub use crate::context::ROOT_ADAPTER_NAME;

/// Wraps the root component so ambient attributes reach it at render time.
///
/// Attributes the adapter receives from the markup win over ambient ones
/// with the same name.
#[derive(Debug)]
pub struct RootAdapter {
    root_name: String,
    root: ComponentHandle,
    ambient: Map<String, Value>,
}

impl RootAdapter {
    pub fn new(root_name: impl Into<String>, root: ComponentHandle, ambient: Map<String, Value>) -> Self {
        Self {
            root_name: root_name.into(),
            root,
            ambient,
        }
    }
}

impl Component for RootAdapter {
    fn default_attributes(&self) -> Option<&Map<String, Value>> {
        self.root.default_attributes()
    }

    fn render(&self, attributes: Map<String, Value>) -> Rendered {
        debug!(
            "forwarding {} ambient attributes to `{}`",
            self.ambient.len(),
            self.root_name
        );
        let mut merged = attributes;
        for (name, value) in &self.ambient {
            if !merged.contains_key(name) {
                merged.insert(name.clone(), value.clone());
            }
        }
        self.root.render(merged)
    }
}

/// Registry with the root adapter installed
#[derive(Debug, Clone, Default)]
pub struct RootBinding {
    pub registry: FlatRegistry,
    /// Name the tree's root node must reference
    pub root: String,
    pub diagnostics: Vec<Diagnostic>,
}

/// Install a `RootAdapter` for `root_name` under `adapter_name`.
///
/// An existing entry under `adapter_name` is overridden with a diagnostic.
/// When `root_name` is not registered nothing is installed and the binding
/// keeps pointing at `root_name`, leaving the compiler to report it.
pub fn bind_root(
    registry: &FlatRegistry,
    root_name: &str,
    ambient: Map<String, Value>,
    adapter_name: &str,
) -> RootBinding {
    let mut registry = registry.clone();
    let mut diagnostics = Vec::new();

    let Some(root) = registry.get(root_name).cloned() else {
        debug!("root `{}` is not registered; no adapter installed", root_name);
        return RootBinding {
            registry,
            root: root_name.to_string(),
            diagnostics,
        };
    };

    if registry.contains(adapter_name) {
        let diagnostic = Diagnostic::warning(
            DiagnosticKind::ReservedNameCollision,
            format!(
                "`{}` is a reserved component name; the registered entry will be overridden",
                adapter_name
            ),
        );
        diagnostic.emit();
        diagnostics.push(diagnostic);
    }

    debug!("binding root `{}` as `{}`", root_name, adapter_name);
    registry.insert(
        adapter_name,
        Arc::new(RootAdapter::new(root_name, root, ambient)),
    );

    RootBinding {
        registry,
        root: adapter_name.to_string(),
        diagnostics,
    }
}
