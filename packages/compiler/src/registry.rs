use crate::path::{validate_key, Path, PathError};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Key marking a manifest entry as a component with default attributes
pub const DEFAULT_ATTRIBUTES_KEY: &str = "defaultAttributes";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegistryError {
    #[error("Invalid registry path: {0}")]
    Path(#[from] PathError),

    #[error("Registry manifest must be an object, found {found}")]
    NotAnObject { found: String },

    #[error("Entry `{path}` is not a component or namespace: {found}")]
    InvalidEntry { path: String, found: String },

    #[error("Default attributes of `{path}` must be an object")]
    InvalidDefaults { path: String },
}

/// What a renderer receives when a component is invoked
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    pub component: String,
    pub attributes: Map<String, Value>,
}

/// A renderable component handle.
///
/// The compiler only consults `default_attributes`; `render` is the hook the
/// external renderer calls once the markup has been bound.
pub trait Component: fmt::Debug + Send + Sync {
    fn default_attributes(&self) -> Option<&Map<String, Value>> {
        None
    }

    fn render(&self, attributes: Map<String, Value>) -> Rendered;
}

pub type ComponentHandle = Arc<dyn Component>;

/// Component that renders to itself with the attributes it receives
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HostComponent {
    name: String,
    defaults: Map<String, Value>,
}

impl HostComponent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            defaults: Map::new(),
        }
    }

    pub fn with_defaults(mut self, defaults: Map<String, Value>) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn with_default(mut self, name: impl Into<String>, value: Value) -> Self {
        self.defaults.insert(name.into(), value);
        self
    }

    pub fn handle(self) -> ComponentHandle {
        Arc::new(self)
    }
}

impl Component for HostComponent {
    fn default_attributes(&self) -> Option<&Map<String, Value>> {
        if self.defaults.is_empty() {
            None
        } else {
            Some(&self.defaults)
        }
    }

    fn render(&self, attributes: Map<String, Value>) -> Rendered {
        Rendered {
            component: self.name.clone(),
            attributes,
        }
    }
}

#[derive(Debug, Clone)]
pub enum RegistryEntry {
    Component(ComponentHandle),
    Namespace(Registry),
}

/// Nested namespace of component handles
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: BTreeMap<String, RegistryEntry>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_component(mut self, name: impl Into<String>, component: ComponentHandle) -> Self {
        self.insert(name, RegistryEntry::Component(component));
        self
    }

    /// Register a `HostComponent` named after its registry key
    pub fn with_host(self, name: &str) -> Self {
        self.with_component(name, HostComponent::new(name).handle())
    }

    pub fn with_namespace(mut self, name: impl Into<String>, namespace: Registry) -> Self {
        self.insert(name, RegistryEntry::Namespace(namespace));
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, entry: RegistryEntry) -> Option<RegistryEntry> {
        self.entries.insert(name.into(), entry)
    }

    pub fn get(&self, name: &str) -> Option<&RegistryEntry> {
        self.entries.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Flatten the namespace tree into dotted-path lookups
    pub fn flatten(&self) -> Result<FlatRegistry, RegistryError> {
        let mut flat = FlatRegistry::default();
        self.flatten_into(&Path::root(), &mut flat)?;
        Ok(flat)
    }

    fn flatten_into(&self, path: &Path, flat: &mut FlatRegistry) -> Result<(), RegistryError> {
        for (name, entry) in &self.entries {
            validate_key(name, path)?;
            let path = path.child(name.as_str());
            match entry {
                RegistryEntry::Component(component) => {
                    flat.insert(path.to_string(), component.clone());
                }
                RegistryEntry::Namespace(namespace) => namespace.flatten_into(&path, flat)?,
            }
        }
        Ok(())
    }

    /// Build a registry of `HostComponent`s from a JSON manifest.
    ///
    /// `true` or `null` declares a component without defaults, an object
    /// holding a `defaultAttributes` object declares a component with
    /// defaults, and any other object opens a namespace.
    pub fn from_manifest(manifest: &Value) -> Result<Self, RegistryError> {
        match manifest {
            Value::Object(map) => Self::from_manifest_object(map, &Path::root()),
            other => Err(RegistryError::NotAnObject {
                found: other.to_string(),
            }),
        }
    }

    fn from_manifest_object(map: &Map<String, Value>, path: &Path) -> Result<Self, RegistryError> {
        let mut registry = Registry::new();

        for (name, value) in map {
            validate_key(name, path)?;
            let entry_path = path.child(name.as_str());
            let component_name = entry_path.to_string();

            let entry = match value {
                Value::Null | Value::Bool(true) => {
                    RegistryEntry::Component(HostComponent::new(component_name).handle())
                }
                Value::Object(entry) if entry.contains_key(DEFAULT_ATTRIBUTES_KEY) => {
                    let Some(Value::Object(defaults)) = entry.get(DEFAULT_ATTRIBUTES_KEY) else {
                        return Err(RegistryError::InvalidDefaults {
                            path: component_name,
                        });
                    };
                    RegistryEntry::Component(
                        HostComponent::new(component_name)
                            .with_defaults(defaults.clone())
                            .handle(),
                    )
                }
                Value::Object(namespace) => {
                    RegistryEntry::Namespace(Self::from_manifest_object(namespace, &entry_path)?)
                }
                other => {
                    return Err(RegistryError::InvalidEntry {
                        path: component_name,
                        found: other.to_string(),
                    })
                }
            };

            registry.insert(name.clone(), entry);
        }

        Ok(registry)
    }
}

/// Registry flattened to dotted-path keys, the form markup is bound against
#[derive(Debug, Clone, Default)]
pub struct FlatRegistry {
    components: BTreeMap<String, ComponentHandle>,
}

impl FlatRegistry {
    pub fn get(&self, name: &str) -> Option<&ComponentHandle> {
        self.components.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.components.contains_key(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, component: ComponentHandle) -> Option<ComponentHandle> {
        self.components.insert(name.into(), component)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.components.keys().map(String::as_str)
    }

    /// Invoke the component registered under `name`
    pub fn render(&self, name: &str, attributes: Map<String, Value>) -> Option<Rendered> {
        self.get(name).map(|component| component.render(attributes))
    }
}
