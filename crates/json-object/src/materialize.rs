//! First-read computation of accessor results.
//!
//! Callers cache the returned result; nothing here is memoized.

use serde_json::Value;
use std::sync::Arc;
use tracing::trace;

use crate::descriptor::{AccessorDescriptor, AccessorKind, FactoryRef};
use crate::error::AccessError;
use crate::factory::{default_factory, NodeFactory};
use crate::node::{Accessed, Node};

pub(crate) fn materialize(
    node: &Node,
    descriptor: &AccessorDescriptor,
) -> Result<Accessed, AccessError> {
    trace!(
        node_type = node.node_type().name(),
        accessor = descriptor.name.as_str(),
        source_key = descriptor.source_key.as_str(),
        kind = descriptor.kind_name(),
        "materializing accessor"
    );
    match &descriptor.kind {
        AccessorKind::Value { default, transform } => {
            // Presence, not truthiness, decides whether the default applies.
            let value = match node.get(&descriptor.source_key) {
                Some(value) => Some(value.clone()),
                None => default.clone(),
            };
            let value = match transform {
                Some(transform) => (transform.0)(node, value),
                None => value,
            };
            Ok(value.into())
        }
        AccessorKind::Object { factory } => {
            let fragment = match node.get(&descriptor.source_key) {
                None | Some(Value::Null) => return Ok(Accessed::Absent),
                Some(fragment) => fragment,
            };
            match factory {
                FactoryRef::Default => build(node, descriptor, fragment, &*default_factory()),
                FactoryRef::SameType => build(node, descriptor, fragment, node.node_type()),
                FactoryRef::Custom(factory) => build(node, descriptor, fragment, &**factory),
            }
        }
    }
}

fn build(
    node: &Node,
    descriptor: &AccessorDescriptor,
    fragment: &Value,
    factory: &dyn NodeFactory,
) -> Result<Accessed, AccessError> {
    let parent = node.handle();
    match fragment {
        Value::Array(items) => {
            let nodes = items
                .iter()
                .enumerate()
                .map(|(index, item)| -> Result<Arc<Node>, AccessError> {
                    check_fragment(descriptor, item, Some(index))?;
                    Ok(factory.create(item, parent.as_ref()))
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Accessed::Nodes(nodes))
        }
        _ => {
            check_fragment(descriptor, fragment, None)?;
            Ok(Accessed::Node(factory.create(fragment, parent.as_ref())))
        }
    }
}

fn check_fragment(
    descriptor: &AccessorDescriptor,
    fragment: &Value,
    index: Option<usize>,
) -> Result<(), AccessError> {
    let found = match fragment {
        Value::Object(_) | Value::Null => return Ok(()),
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
    };
    Err(AccessError::UnexpectedFragment {
        key: descriptor.source_key.clone(),
        index,
        found,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{ObjectOptions, ValueOptions};
    use crate::node::NodeType;
    use crate::registry::AccessorRegistry;
    use serde_json::json;

    fn descriptor(node: &Node, name: &str) -> AccessorDescriptor {
        node.node_type().registry().get(name).unwrap().clone()
    }

    #[test]
    fn present_false_beats_default() {
        let kind = NodeType::anonymous(
            AccessorRegistry::new().value_accessor("flag", ValueOptions::new().with_default(true)),
        );
        let node = kind.root(json!({"flag": false}));
        let result = materialize(&node, &descriptor(&node, "flag")).unwrap();
        assert_eq!(result.as_value(), Some(&json!(false)));
    }

    #[test]
    fn stored_null_is_present() {
        let kind = NodeType::anonymous(
            AccessorRegistry::new().value_accessor("note", ValueOptions::new().with_default("n/a")),
        );
        let node = kind.root(json!({"note": null}));
        let result = materialize(&node, &descriptor(&node, "note")).unwrap();
        assert_eq!(result.as_value(), Some(&Value::Null));
    }

    #[test]
    fn missing_key_without_default_is_absent() {
        let kind = NodeType::anonymous(
            AccessorRegistry::new().value_accessor("gone", ValueOptions::new()),
        );
        let node = kind.root(json!({}));
        assert!(materialize(&node, &descriptor(&node, "gone")).unwrap().is_absent());
    }

    #[test]
    fn nested_arrays_are_rejected() {
        let kind = NodeType::anonymous(
            AccessorRegistry::new().object_accessor("grid", ObjectOptions::new()),
        );
        let node = kind.root(json!({"grid": [{"a": 1}, [1, 2]]}));
        assert_eq!(
            materialize(&node, &descriptor(&node, "grid")).unwrap_err(),
            AccessError::UnexpectedFragment {
                key: "grid".into(),
                index: Some(1),
                found: "array",
            }
        );
    }

    #[test]
    fn scalar_object_fragment_is_rejected() {
        let kind = NodeType::anonymous(
            AccessorRegistry::new().object_accessor("owner", ObjectOptions::new()),
        );
        let node = kind.root(json!({"owner": "alice"}));
        assert_eq!(
            materialize(&node, &descriptor(&node, "owner")).unwrap_err(),
            AccessError::UnexpectedFragment {
                key: "owner".into(),
                index: None,
                found: "string",
            }
        );
    }
}
