use crate::path::{FlatMap, Path};
use serde_json::Value;
use tracing::{debug, warn};

/// Rename the keys of a flattened tree according to a flattened alias table.
///
/// Keys without an alias pass through unchanged and values are never touched.
/// When two keys end up with the same name the later one wins, keeping the
/// position of the first. Alias targets that are not strings or do not parse
/// as paths are ignored.
pub fn resolve_aliases(flat_tree: &FlatMap, flat_aliases: &FlatMap) -> FlatMap {
    let mut resolved = FlatMap::new();

    for (key, value) in flat_tree {
        let target = match flat_aliases.get(key) {
            Some(Value::String(target)) => match Path::parse(target) {
                Ok(_) => {
                    debug!("aliasing `{}` to `{}`", key, target);
                    target.clone()
                }
                Err(err) => {
                    warn!("Ignoring alias for `{}`: {}", key, err);
                    key.clone()
                }
            },
            Some(other) => {
                warn!("Ignoring alias for `{}`: expected a path string, found {}", key, other);
                key.clone()
            }
            None => key.clone(),
        };

        resolved.insert(target, value.clone());
    }

    resolved
}
