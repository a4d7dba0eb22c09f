use crate::alias::resolve_aliases;
use crate::binder::bind_root;
use crate::compiler::compile;
use crate::context::CompileOptions;
use crate::node::{NodeDefinition, COMPONENT_KEYS};
use crate::path::{flatten, unflatten, FlatMap, PathError};
use crate::registry::{FlatRegistry, Registry};
use marionette_common::{Diagnostic, DiagnosticKind, DiagnosticLevel};
use serde_json::{Map, Value};
use tracing::{debug, instrument};

/// Compiled markup together with the registry it must be bound against
#[derive(Debug, Clone, Default)]
pub struct Compilation {
    pub registry: FlatRegistry,
    pub markup: String,
    pub diagnostics: Vec<Diagnostic>,
}

impl Compilation {
    fn rejected(message: impl Into<String>) -> Self {
        let diagnostic = Diagnostic::error(DiagnosticKind::MalformedInput, message);
        diagnostic.emit();
        Self {
            diagnostics: vec![diagnostic],
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.markup.is_empty() && self.registry.is_empty()
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|diagnostic| diagnostic.level == DiagnosticLevel::Warning)
    }
}

/// Compile a data tree into markup bound to `registry`.
///
/// The root component is wrapped in a `RootAdapter` installed under
/// `options.root_adapter_name` so `ambient` attributes reach it at render
/// time. Aliases rename flattened tree paths before compilation. Malformed
/// input yields an empty compilation, never an error.
#[instrument(skip_all)]
pub fn build_markup(
    tree: &Value,
    registry: &Registry,
    aliases: &Value,
    ambient: &Map<String, Value>,
    options: &CompileOptions,
) -> Compilation {
    let Some(tree) = tree.as_object() else {
        return Compilation::rejected("The data tree must be an object");
    };
    let Some(root_name) = COMPONENT_KEYS
        .iter()
        .find_map(|key| tree.get(*key))
        .and_then(Value::as_str)
    else {
        return Compilation::rejected("The data tree root must name its component with a string");
    };

    let flat_registry = match registry.flatten() {
        Ok(flat) => flat,
        Err(err) => return Compilation::rejected(format!("Unable to flatten the registry: {}", err)),
    };
    debug!("registry holds {} components", flat_registry.len());

    let binding = bind_root(&flat_registry, root_name, ambient.clone(), &options.root_adapter_name);

    let resolved = match alias_tree(tree, aliases) {
        Ok(resolved) => resolved,
        Err(err) => return Compilation::rejected(format!("Unable to resolve aliases: {}", err)),
    };

    let root = NodeDefinition::from_map(&resolved).with_component(binding.root.as_str());
    let compiled = compile(&root, &binding.registry, options);

    let mut diagnostics = binding.diagnostics;
    diagnostics.extend(compiled.diagnostics);

    Compilation {
        registry: binding.registry,
        markup: compiled.markup,
        diagnostics,
    }
}

fn alias_tree(tree: &Map<String, Value>, aliases: &Value) -> Result<Map<String, Value>, PathError> {
    let flat_tree = flatten(tree)?;
    let flat_aliases = match aliases {
        Value::Object(aliases) => flatten(aliases)?,
        _ => FlatMap::new(),
    };
    debug!(
        "resolving {} tree paths against {} aliases",
        flat_tree.len(),
        flat_aliases.len()
    );
    unflatten(&resolve_aliases(&flat_tree, &flat_aliases))
}
