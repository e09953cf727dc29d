//! Nodes, node types and accessor results.

use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock, Weak};

use crate::error::AccessError;
use crate::materialize;
use crate::registry::AccessorRegistry;

/// Result of reading an accessor.
#[derive(Debug, Clone)]
pub enum Accessed {
    /// Missing key without default, or a missing/`null` object fragment.
    Absent,
    Value(Value),
    Node(Arc<Node>),
    Nodes(Vec<Arc<Node>>),
}

impl Accessed {
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_node(&self) -> Option<&Arc<Node>> {
        match self {
            Self::Node(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_nodes(&self) -> Option<&[Arc<Node>]> {
        match self {
            Self::Nodes(nodes) => Some(nodes),
            _ => None,
        }
    }
}

impl From<Option<Value>> for Accessed {
    fn from(value: Option<Value>) -> Self {
        value.map_or(Self::Absent, Self::Value)
    }
}

struct NodeTypeInner {
    name: String,
    registry: AccessorRegistry,
    open: bool,
}

/// A named node type: the accessors its nodes expose.
///
/// Cheap to clone; clones are the same type (see [`NodeType::same`]).
#[derive(Clone)]
pub struct NodeType {
    inner: Arc<NodeTypeInner>,
}

impl NodeType {
    pub fn new(name: impl Into<String>, registry: AccessorRegistry) -> Self {
        Self::build(name.into(), registry, false)
    }

    /// A type whose undeclared names resolve against the raw fragment, so
    /// [`Node::value`] works for any key.
    pub fn open(name: impl Into<String>, registry: AccessorRegistry) -> Self {
        Self::build(name.into(), registry, true)
    }

    /// An unnamed type, for one-off node shapes.
    pub fn anonymous(registry: AccessorRegistry) -> Self {
        Self::new("<anonymous>", registry)
    }

    /// The open type with no declared accessors backing
    /// [`crate::GenericFactory`].
    pub fn generic() -> Self {
        static GENERIC: OnceLock<NodeType> = OnceLock::new();
        GENERIC
            .get_or_init(|| Self::open("JsonObject", AccessorRegistry::new()))
            .clone()
    }

    fn build(name: String, registry: AccessorRegistry, open: bool) -> Self {
        Self {
            inner: Arc::new(NodeTypeInner {
                name,
                registry,
                open,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn registry(&self) -> &AccessorRegistry {
        &self.inner.registry
    }

    pub fn is_open(&self) -> bool {
        self.inner.open
    }

    /// Identity comparison; two types built from equal registries differ.
    pub fn same(&self, other: &NodeType) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Wrap a decoded document as a root node.
    pub fn root(&self, fragment: Value) -> Arc<Node> {
        Node::new(self.clone(), fragment, None)
    }
}

impl fmt::Debug for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeType")
            .field("name", &self.inner.name)
            .field("accessors", &self.inner.registry.names().collect::<Vec<_>>())
            .field("open", &self.inner.open)
            .finish()
    }
}

type Cell = OnceLock<Result<Accessed, AccessError>>;

/// One fragment of a decoded document, with lazily computed accessors.
pub struct Node {
    raw: Value,
    parent: Option<Weak<Node>>,
    this: Weak<Node>,
    node_type: NodeType,
    cache: HashMap<String, Cell>,
}

impl Node {
    /// Build a node of `node_type`. A `null` fragment becomes `{}`.
    pub fn new(node_type: NodeType, fragment: Value, parent: Option<&Arc<Node>>) -> Arc<Node> {
        let raw = match fragment {
            Value::Null => Value::Object(Map::new()),
            other => other,
        };
        let cache = node_type
            .registry()
            .names()
            .map(|name| (name.to_string(), Cell::new()))
            .collect();
        Arc::new_cyclic(|this| Node {
            raw,
            parent: parent.map(Arc::downgrade),
            this: this.clone(),
            node_type,
            cache,
        })
    }

    /// A root node of the generic open type.
    pub fn generic(fragment: Value) -> Arc<Node> {
        NodeType::generic().root(fragment)
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// The node whose object accessor produced this one, if it is still alive.
    pub fn parent(&self) -> Option<Arc<Node>> {
        self.parent.as_ref().and_then(Weak::upgrade)
    }

    pub fn node_type(&self) -> &NodeType {
        &self.node_type
    }

    pub fn is_instance_of(&self, node_type: &NodeType) -> bool {
        self.node_type.same(node_type)
    }

    /// Raw property lookup; no accessor involved.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.raw.get(key)
    }

    /// Whether the accessor `name` has been read on this node.
    pub fn is_computed(&self, name: &str) -> bool {
        self.cache.get(name).is_some_and(|cell| cell.get().is_some())
    }

    /// Read accessor `name`, computing it on first use.
    ///
    /// A transform must not read its own accessor; the cell is still being
    /// initialized at that point.
    pub fn read(&self, name: &str) -> Result<&Accessed, AccessError> {
        let (Some(descriptor), Some(cell)) =
            (self.node_type.registry().get(name), self.cache.get(name))
        else {
            return Err(AccessError::UnknownAccessor {
                node_type: self.node_type.name().to_string(),
                name: name.to_string(),
            });
        };
        cell.get_or_init(|| materialize::materialize(self, descriptor))
            .as_ref()
            .map_err(Clone::clone)
    }

    /// Value accessor `name`; on open types an undeclared name reads the raw
    /// property of that name.
    pub fn value(&self, name: &str) -> Option<&Value> {
        if !self.node_type.registry().contains(name) {
            return if self.node_type.is_open() {
                self.get(name)
            } else {
                None
            };
        }
        self.read(name).ok().and_then(Accessed::as_value)
    }

    /// Object accessor `name` that resolved to a single node.
    pub fn object(&self, name: &str) -> Option<&Arc<Node>> {
        self.read(name).ok().and_then(Accessed::as_node)
    }

    /// Object accessor `name` that resolved to a list of nodes.
    pub fn objects(&self, name: &str) -> Option<&[Arc<Node>]> {
        self.read(name).ok().and_then(Accessed::as_nodes)
    }

    pub(crate) fn handle(&self) -> Option<Arc<Node>> {
        self.this.upgrade()
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("node_type", &self.node_type.name())
            .field("raw", &self.raw)
            .field("has_parent", &self.parent.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{ObjectOptions, ValueOptions};
    use serde_json::json;

    #[test]
    fn null_fragment_becomes_empty_object() {
        let node = Node::generic(Value::Null);
        assert_eq!(node.raw(), &json!({}));
        assert!(node.parent().is_none());
        assert_eq!(node.value("anything"), None);
    }

    #[test]
    fn scalar_root_has_no_keys() {
        let node = Node::generic(json!(42));
        assert_eq!(node.raw(), &json!(42));
        assert_eq!(node.get("x"), None);
    }

    #[test]
    fn typed_nodes_reject_undeclared_names() {
        let record = NodeType::new(
            "Record",
            AccessorRegistry::new().value_accessor("id", ValueOptions::new()),
        );
        let node = record.root(json!({"id": 1, "name": "x"}));
        assert_eq!(node.value("id"), Some(&json!(1)));
        assert_eq!(node.value("name"), None);
        assert_eq!(
            node.read("name").unwrap_err(),
            AccessError::UnknownAccessor {
                node_type: "Record".into(),
                name: "name".into(),
            }
        );
        assert!(!node.is_computed("name"));
    }

    #[test]
    fn open_types_fall_back_to_raw() {
        let open = NodeType::open(
            "Open",
            AccessorRegistry::new().value_accessor("id", ValueOptions::new().with_default(0)),
        );
        let node = open.root(json!({"name": "x"}));
        assert_eq!(node.value("id"), Some(&json!(0)));
        assert_eq!(node.value("name"), Some(&json!("x")));
        assert_eq!(node.value("missing"), None);
    }

    #[test]
    fn type_identity() {
        let a = NodeType::anonymous(AccessorRegistry::new());
        let b = NodeType::anonymous(AccessorRegistry::new());
        assert!(a.same(&a.clone()));
        assert!(!a.same(&b));
        assert!(NodeType::generic().same(&NodeType::generic()));
        assert!(a.root(json!({})).is_instance_of(&a));
    }

    #[test]
    fn accessed_helpers() {
        let node = Node::generic(json!({}));
        assert!(Accessed::from(None::<Value>).is_absent());
        assert_eq!(Accessed::from(Some(json!(1))).as_value(), Some(&json!(1)));
        assert!(Accessed::Node(node.clone()).as_node().is_some());
        assert_eq!(Accessed::Nodes(vec![node]).as_nodes().map(<[_]>::len), Some(1));
        assert!(Accessed::Absent.as_nodes().is_none());
    }

    #[test]
    fn debug_output_names_the_type() {
        let kind = NodeType::new(
            "Record",
            AccessorRegistry::new().object_accessor("child", ObjectOptions::new()),
        );
        let rendered = format!("{:?}", kind);
        assert!(rendered.contains("Record"));
        assert!(rendered.contains("child"));
        assert!(format!("{:?}", kind.root(json!({}))).contains("Record"));
    }
}
