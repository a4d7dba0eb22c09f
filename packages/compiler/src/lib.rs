//! # Marionette Compiler
//!
//! Compiles component trees described as JSON data into markup bound to a
//! registry of components.
//!
//! A tree names its component under `_` (or `component`), lists children
//! under `$` (or `children`), and treats every other key as an attribute:
//!
//! ```rust
//! use marionette_compiler::{build_markup, CompileOptions, Registry};
//! use serde_json::{json, Map};
//!
//! let registry = Registry::new().with_host("List").with_host("Item");
//! let tree = json!({ "_": "List", "$": [{ "_": "Item", "label": "One" }] });
//!
//! let compilation = build_markup(&tree, &registry, &json!({}), &Map::new(), &CompileOptions::default());
//!
//! assert_eq!(
//!     compilation.markup,
//!     "<RootAdapter>\n  <Item\n    label=\"One\"\n  />\n</RootAdapter>"
//! );
//! ```
//!
//! ## Pipeline
//!
//! 1. The registry is flattened to dotted paths (`Forms.Input`).
//! 2. The root component is wrapped in a [`RootAdapter`] so ambient
//!    attributes supplied at render time reach it.
//! 3. The tree and alias table are flattened, tree paths are renamed by the
//!    aliases, and the tree is rebuilt.
//! 4. Nodes are compiled recursively; default attributes of each component
//!    fill in whatever the tree leaves unset.
//!
//! Nothing in the pipeline fails. Unknown components, unevaluable attributes
//! and reserved-name collisions become [`Diagnostic`]s returned with the
//! output, and malformed input produces an empty [`Compilation`].

pub mod alias;
pub mod attribute;
pub mod binder;
pub mod compiler;
mod context;
mod markup;
pub mod node;
pub mod path;
pub mod registry;

pub use alias::resolve_aliases;
pub use attribute::serialize_attribute;
pub use binder::{bind_root, RootAdapter, RootBinding};
pub use compiler::{compile, compile_node, CompiledMarkup};
pub use context::{CompileOptions, CompilerContext, ROOT_ADAPTER_NAME};
pub use markup::{build_markup, Compilation};
pub use node::{Attribute, AttributeValue, NodeDefinition};
pub use path::{flatten, unflatten, FlatMap, Path, PathError, MAX_INDEX};
pub use registry::{
    Component, ComponentHandle, FlatRegistry, HostComponent, Registry, RegistryEntry,
    RegistryError, Rendered,
};

pub use marionette_common::{Diagnostic, DiagnosticKind, DiagnosticLevel};

#[cfg(test)]
mod tests;
