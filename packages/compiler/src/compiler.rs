use crate::attribute::serialize_attribute;
use crate::context::{CompileOptions, CompilerContext};
use crate::node::NodeDefinition;
use crate::path::Path;
use crate::registry::FlatRegistry;
use marionette_common::{Diagnostic, DiagnosticKind};
use tracing::debug;

/// Markup produced from one node tree
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompiledMarkup {
    pub markup: String,
    pub diagnostics: Vec<Diagnostic>,
}

/// Compile a node tree against an already adapted registry
pub fn compile(
    node: &NodeDefinition,
    registry: &FlatRegistry,
    options: &CompileOptions,
) -> CompiledMarkup {
    let mut ctx = CompilerContext::new(registry, options);
    let markup = compile_node(node, &mut ctx, 0, &Path::root());

    CompiledMarkup {
        markup,
        diagnostics: ctx.into_diagnostics(),
    }
}

/// Compile one node at `level`, returning an empty string when its
/// component cannot be resolved.
///
/// ```text
/// <List
///   gap={4}
/// >
///   <Item/>
/// </List>
/// ```
pub fn compile_node(
    node: &NodeDefinition,
    ctx: &mut CompilerContext,
    level: usize,
    path: &Path,
) -> String {
    let registry = ctx.registry();
    let Some((name, component)) = node
        .component
        .as_deref()
        .and_then(|name| registry.get(name).map(|component| (name, component)))
    else {
        let missing = node.component.as_deref().unwrap_or("<none>");
        ctx.report(
            Diagnostic::warning(
                DiagnosticKind::UnresolvedComponent,
                format!("Unable to find definition of `{}`; ignored", missing),
            )
            .at(path.to_string()),
        );
        return String::new();
    };

    debug!("compiling `{}` at level {}", name, level);

    let indent = ctx.indentation(level);
    let attribute_indent = ctx.indentation(level + 1);
    let attributes: Vec<String> = node
        .merged_attributes(component.default_attributes())
        .iter()
        .map(|attribute| serialize_attribute(attribute, ctx, level + 1, path))
        .filter(|attribute| !attribute.is_empty())
        .collect();

    let mut output = format!("{}<{}", indent, name);

    if !attributes.is_empty() {
        output.push('\n');
        for attribute in &attributes {
            output.push_str(&attribute_indent);
            output.push_str(attribute);
            output.push('\n');
        }
        output.push_str(&indent);
    }

    match node.child_nodes() {
        Some(children) => {
            output.push('>');
            let children_path = path.child(node.children_key);
            for (index, child) in children.iter().enumerate() {
                let compiled = compile_node(child, ctx, level + 1, &children_path.index(index));
                if !compiled.is_empty() {
                    output.push('\n');
                    output.push_str(&compiled);
                }
            }
            output.push('\n');
            output.push_str(&indent);
            output.push_str(&format!("</{}>", name));
        }
        None => output.push_str("/>"),
    }

    output
}
