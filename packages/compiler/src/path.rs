//! Conversion between nested JSON objects and flat path-keyed maps.
//!
//! Object members are joined with `.` and array elements are written as
//! `[index]`, so `{"a": {"b": [1, 2]}}` flattens to `a.b[0]` and `a.b[1]`.
//! Keeping the two separators distinct means an object key `"0"` never turns
//! into an array on the way back. Empty objects and arrays are stored as leaf
//! values.

use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

/// A flattened tree: path string to leaf value, in traversal order
pub type FlatMap = Map<String, Value>;

/// Characters that cannot appear inside an object key
pub const DELIMITERS: [char; 3] = ['.', '[', ']'];

/// Largest array index a path may address. Unflattening fills gaps with
/// `null`, so this also bounds how much a single key can allocate.
pub const MAX_INDEX: usize = u16::MAX as usize;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("Key `{key}` contains a reserved path delimiter (one of `.`, `[`, `]`)")]
    DelimiterCollision { key: String },

    #[error("Empty key under `{parent}`")]
    EmptyKey { parent: String },

    #[error("Invalid path `{path}`: {reason}")]
    InvalidPath { path: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Key(String),
    Index(usize),
}

/// Location inside a tree. The first segment is always a key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Path {
    segments: Vec<Segment>,
}

impl Path {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn child(&self, key: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(Segment::Key(key.into()));
        Self { segments }
    }

    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(Segment::Index(index));
        Self { segments }
    }

    /// Parse a flat key such as `children[1].title`
    pub fn parse(path: &str) -> Result<Self, PathError> {
        let invalid = |reason: &str| PathError::InvalidPath {
            path: path.to_string(),
            reason: reason.to_string(),
        };

        if path.is_empty() {
            return Err(invalid("empty path"));
        }

        #[derive(Clone, Copy)]
        enum State {
            NeedKey,
            InKey,
            AfterIndex,
        }

        let mut segments = Vec::new();
        let mut key = String::new();
        let mut state = State::NeedKey;
        let mut chars = path.chars();

        while let Some(c) = chars.next() {
            match (c, state) {
                ('.', State::InKey) => {
                    segments.push(Segment::Key(std::mem::take(&mut key)));
                    state = State::NeedKey;
                }
                ('.', State::AfterIndex) => state = State::NeedKey,
                ('.', State::NeedKey) => return Err(invalid("empty key segment")),
                ('[', State::NeedKey) => return Err(invalid("index must follow a key")),
                ('[', _) => {
                    if matches!(state, State::InKey) {
                        segments.push(Segment::Key(std::mem::take(&mut key)));
                    }
                    let mut digits = String::new();
                    let mut closed = false;
                    for d in chars.by_ref() {
                        if d == ']' {
                            closed = true;
                            break;
                        }
                        digits.push(d);
                    }
                    if !closed {
                        return Err(invalid("unterminated `[`"));
                    }
                    if digits.is_empty() || !digits.chars().all(|d| d.is_ascii_digit()) {
                        return Err(invalid("array index must be a non-negative integer"));
                    }
                    let index = digits
                        .parse::<usize>()
                        .ok()
                        .filter(|index| *index <= MAX_INDEX)
                        .ok_or_else(|| invalid("array index out of range"))?;
                    segments.push(Segment::Index(index));
                    state = State::AfterIndex;
                }
                (']', _) => return Err(invalid("unbalanced `]`")),
                (_, State::AfterIndex) => {
                    return Err(invalid("expected `.` or `[` after an index"))
                }
                (c, _) => {
                    key.push(c);
                    state = State::InKey;
                }
            }
        }

        match state {
            State::InKey => segments.push(Segment::Key(key)),
            State::AfterIndex => {}
            State::NeedKey => return Err(invalid("trailing `.`")),
        }

        Ok(Self { segments })
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Key(key) => {
                    if i > 0 {
                        f.write_str(".")?;
                    }
                    f.write_str(key)?;
                }
                Segment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

/// Reject keys that could not survive a flatten/unflatten round trip
pub fn validate_key(key: &str, parent: &Path) -> Result<(), PathError> {
    if key.is_empty() {
        return Err(PathError::EmptyKey {
            parent: parent.to_string(),
        });
    }
    if key.contains(DELIMITERS) {
        return Err(PathError::DelimiterCollision {
            key: key.to_string(),
        });
    }
    Ok(())
}

/// Flatten a nested object into a path-keyed map
pub fn flatten(tree: &Map<String, Value>) -> Result<FlatMap, PathError> {
    let mut flat = FlatMap::new();
    flatten_object(tree, &Path::root(), &mut flat)?;
    Ok(flat)
}

fn flatten_object(
    map: &Map<String, Value>,
    path: &Path,
    flat: &mut FlatMap,
) -> Result<(), PathError> {
    for (key, value) in map {
        validate_key(key, path)?;
        flatten_value(value, path.child(key.as_str()), flat)?;
    }
    Ok(())
}

fn flatten_value(value: &Value, path: Path, flat: &mut FlatMap) -> Result<(), PathError> {
    match value {
        Value::Object(map) if !map.is_empty() => flatten_object(map, &path, flat),
        Value::Array(items) if !items.is_empty() => {
            if items.len() > MAX_INDEX + 1 {
                return Err(PathError::InvalidPath {
                    path: path.to_string(),
                    reason: format!("array holds more than {} items", MAX_INDEX + 1),
                });
            }
            for (index, item) in items.iter().enumerate() {
                flatten_value(item, path.index(index), flat)?;
            }
            Ok(())
        }
        leaf => {
            flat.insert(path.to_string(), leaf.clone());
            Ok(())
        }
    }
}

/// Rebuild a nested object from a path-keyed map.
///
/// Entries are applied in order. When two entries disagree about the shape
/// at a path (a leaf at `a` and a member at `a.b`), the later one wins.
/// Gaps left in arrays are filled with `null`.
pub fn unflatten(flat: &FlatMap) -> Result<Map<String, Value>, PathError> {
    let mut root = Value::Object(Map::new());
    for (key, value) in flat {
        let path = Path::parse(key)?;
        insert(&mut root, path.segments(), value.clone()).map_err(|reason| {
            PathError::InvalidPath {
                path: key.clone(),
                reason: reason.to_string(),
            }
        })?;
    }
    match root {
        Value::Object(map) => Ok(map),
        _ => Ok(Map::new()),
    }
}

fn insert(slot: &mut Value, segments: &[Segment], value: Value) -> Result<(), &'static str> {
    let Some((head, rest)) = segments.split_first() else {
        *slot = value;
        return Ok(());
    };

    match head {
        Segment::Key(key) => {
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            if let Value::Object(map) = slot {
                let child = map.entry(key.clone()).or_insert(Value::Null);
                return insert(child, rest, value);
            }
            Ok(())
        }
        Segment::Index(index) => {
            if !slot.is_array() {
                *slot = Value::Array(Vec::new());
            }
            let len = index
                .checked_add(1)
                .filter(|len| *len <= MAX_INDEX + 1)
                .ok_or("array index out of range")?;
            if let Value::Array(items) = slot {
                if items.len() < len {
                    items.resize(len, Value::Null);
                }
                return insert(&mut items[*index], rest, value);
            }
            Ok(())
        }
    }
}
