use serde_json::{Map, Number, Value};

/// Keys naming the component of a node, highest precedence first
pub const COMPONENT_KEYS: [&str; 2] = ["_", "component"];

/// Keys holding the children of a node, highest precedence first
pub const CHILDREN_KEYS: [&str; 2] = ["$", "children"];

/// Attribute value tagged with the form it will be written in.
///
/// Uppercase attribute names mark component-reference attributes; the tag is
/// decided once here so the serializer never re-inspects raw values.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    String(String),
    Number(Number),
    Null,
    Boolean(bool),
    /// Name of a registered component, bound by reference
    ComponentRef(String),
    /// Node definition compiled into a braced block
    NestedNode(Box<NodeDefinition>),
    /// Object written out as JSON
    PlainObject(Map<String, Value>),
    /// Component-reference attribute whose value cannot describe a component
    Unevaluable,
    /// Value with no attribute form, such as an array
    Unsupported,
}

impl AttributeValue {
    pub fn classify(name: &str, value: &Value) -> Self {
        if is_component_attribute(name) {
            return match value {
                Value::String(component) => AttributeValue::ComponentRef(component.clone()),
                Value::Object(map) => {
                    AttributeValue::NestedNode(Box::new(NodeDefinition::from_map(map)))
                }
                _ => AttributeValue::Unevaluable,
            };
        }

        match value {
            Value::Bool(flag) => AttributeValue::Boolean(*flag),
            Value::Number(number) => AttributeValue::Number(number.clone()),
            Value::Null => AttributeValue::Null,
            Value::Object(map) => AttributeValue::PlainObject(map.clone()),
            Value::String(text) => AttributeValue::String(text.clone()),
            Value::Array(_) => AttributeValue::Unsupported,
        }
    }
}

/// Attribute names starting with an uppercase letter reference components
pub fn is_component_attribute(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub value: AttributeValue,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: &Value) -> Self {
        let name = name.into();
        let value = AttributeValue::classify(&name, value);
        Self { name, value }
    }
}

/// One markup node, normalized from its data form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeDefinition {
    /// `None` when the component key is missing or not a string
    pub component: Option<String>,
    /// Attributes in data order, reserved keys removed
    pub attributes: Vec<Attribute>,
    /// `None` when absent or not an array
    pub children: Option<Vec<NodeDefinition>>,
    /// Key the children were read from, used to locate diagnostics
    pub children_key: &'static str,
}

impl NodeDefinition {
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(map) => Self::from_map(map),
            _ => Self {
                children_key: CHILDREN_KEYS[1],
                ..Self::default()
            },
        }
    }

    pub fn from_map(map: &Map<String, Value>) -> Self {
        let component = COMPONENT_KEYS
            .iter()
            .find_map(|key| map.get(*key))
            .and_then(Value::as_str)
            .map(str::to_string);

        let (children_key, children) = match CHILDREN_KEYS
            .iter()
            .find_map(|key| map.get(*key).map(|value| (*key, value)))
        {
            Some((key, Value::Array(items))) => {
                (key, Some(items.iter().map(Self::from_value).collect()))
            }
            Some((key, _)) => (key, None),
            None => (CHILDREN_KEYS[1], None),
        };

        let attributes = map
            .iter()
            .filter(|(key, _)| !is_reserved_key(key))
            .map(|(name, value)| Attribute::new(name.as_str(), value))
            .collect();

        Self {
            component,
            attributes,
            children,
            children_key,
        }
    }

    pub fn with_component(mut self, component: impl Into<String>) -> Self {
        self.component = Some(component.into());
        self
    }

    /// Explicit attributes followed by the defaults they do not already set.
    ///
    /// The merge is shallow: an explicit object replaces a default object
    /// wholesale.
    pub fn merged_attributes(&self, defaults: Option<&Map<String, Value>>) -> Vec<Attribute> {
        let mut merged = self.attributes.clone();
        if let Some(defaults) = defaults {
            for (name, value) in defaults {
                if !is_reserved_key(name) && !merged.iter().any(|attr| &attr.name == name) {
                    merged.push(Attribute::new(name.as_str(), value));
                }
            }
        }
        merged
    }

    /// Non-empty children, if any
    pub fn child_nodes(&self) -> Option<&[NodeDefinition]> {
        self.children.as_deref().filter(|children| !children.is_empty())
    }
}

pub fn is_reserved_key(key: &str) -> bool {
    COMPONENT_KEYS.contains(&key) || CHILDREN_KEYS.contains(&key)
}
