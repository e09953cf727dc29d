use thiserror::Error;

/// Failure reading an accessor.
///
/// Missing keys and `null` array entries are never errors; they resolve to
/// the accessor's default or to an empty node.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccessError {
    #[error("node type `{node_type}` declares no accessor named `{name}`")]
    UnknownAccessor { node_type: String, name: String },

    /// An object accessor found a string, number or boolean where it expected
    /// an object, an array of objects, or `null`.
    #[error("{}", unexpected_fragment_message(.key, .index, .found))]
    UnexpectedFragment {
        key: String,
        index: Option<usize>,
        found: &'static str,
    },
}

fn unexpected_fragment_message(key: &str, index: &Option<usize>, found: &str) -> String {
    match index {
        Some(index) => format!("expected object at `{key}[{index}]`, found {found}"),
        None => format!("expected object or array at `{key}`, found {found}"),
    }
}
