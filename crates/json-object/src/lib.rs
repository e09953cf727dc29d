//! json-object — declarative, lazily-materialized accessors over decoded JSON.
//!
//! A [`NodeType`] declares accessors in an [`AccessorRegistry`]: value
//! accessors read a key with an optional default and transform, object
//! accessors turn nested objects (or arrays of objects) into child [`Node`]s
//! through a [`NodeFactory`]. Every accessor is computed on first read and
//! cached on the node; children keep a weak link back to the node that built
//! them.
//!
//! ```
//! use json_object::{AccessorRegistry, NodeType, ObjectOptions, ValueOptions};
//! use serde_json::json;
//!
//! let item = NodeType::new("Item", AccessorRegistry::new().value_accessors(["id", "name"]));
//! let order = NodeType::new(
//!     "Order",
//!     AccessorRegistry::new()
//!         .value_accessor("status", ValueOptions::new().with_default("pending"))
//!         .object_accessor("items", ObjectOptions::new().factory(item.clone())),
//! );
//!
//! let root = order.root(json!({"items": [{"id": 1, "name": "pen"}, null]}));
//! assert_eq!(root.value("status"), Some(&json!("pending")));
//!
//! let items = root.objects("items").unwrap();
//! assert_eq!(items[0].value("id"), Some(&json!(1)));
//! assert_eq!(items[1].value("id"), None);
//! ```

mod descriptor;
mod error;
mod factory;
mod materialize;
mod node;
mod registry;

pub use descriptor::{
    AccessorDescriptor, AccessorKind, AccessorSpec, FactoryRef, ObjectOptions, ObjectSpec,
    Transform, TransformFn, ValueOptions, ValueSpec,
};
pub use error::AccessError;
pub use factory::{
    default_factory, reset_default_factory, set_default_factory, GenericFactory, NodeFactory,
};
pub use node::{Accessed, Node, NodeType};
pub use registry::AccessorRegistry;
