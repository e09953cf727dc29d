//! Accessor descriptors and the option builders used to register them.

use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use crate::factory::NodeFactory;
use crate::node::Node;

/// Value transform, called with the owning node and the value after default
/// substitution (`None` when the key is missing and no default is set).
pub type Transform = Arc<dyn Fn(&Node, Option<Value>) -> Option<Value> + Send + Sync>;

/// Which factory an object accessor hands its fragments to.
#[derive(Clone, Default)]
pub enum FactoryRef {
    /// Whatever [`crate::default_factory`] returns at read time.
    #[default]
    Default,
    /// The node type of the node being read.
    SameType,
    Custom(Arc<dyn NodeFactory>),
}

impl fmt::Debug for FactoryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => f.write_str("Default"),
            Self::SameType => f.write_str("SameType"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

#[derive(Clone, Debug)]
pub enum AccessorKind {
    Value {
        default: Option<Value>,
        transform: Option<TransformFn>,
    },
    Object {
        factory: FactoryRef,
    },
}

/// Debug-printable wrapper around a [`Transform`].
#[derive(Clone)]
pub struct TransformFn(pub Transform);

impl fmt::Debug for TransformFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TransformFn(..)")
    }
}

/// One registered accessor: where it reads from, what it is called, and how
/// its result is produced.
#[derive(Clone, Debug)]
pub struct AccessorDescriptor {
    pub source_key: String,
    pub name: String,
    pub kind: AccessorKind,
}

impl AccessorDescriptor {
    pub fn value(source_key: impl Into<String>, opts: ValueOptions) -> Self {
        let source_key = source_key.into();
        Self {
            name: opts.name.unwrap_or_else(|| source_key.clone()),
            source_key,
            kind: AccessorKind::Value {
                default: opts.default,
                transform: opts.transform.map(TransformFn),
            },
        }
    }

    pub fn object(source_key: impl Into<String>, opts: ObjectOptions) -> Self {
        let source_key = source_key.into();
        Self {
            name: opts.name.unwrap_or_else(|| source_key.clone()),
            source_key,
            kind: AccessorKind::Object {
                factory: opts.factory,
            },
        }
    }

    pub fn is_object(&self) -> bool {
        matches!(self.kind, AccessorKind::Object { .. })
    }

    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            AccessorKind::Value { .. } => "value",
            AccessorKind::Object { .. } => "object",
        }
    }
}

/// Options for [`crate::AccessorRegistry::value_accessor`].
#[derive(Clone, Default)]
pub struct ValueOptions {
    name: Option<String>,
    default: Option<Value>,
    transform: Option<Transform>,
}

impl ValueOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expose the accessor under `name` instead of the source key.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Used when the source key is missing from the fragment.
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn transform<F>(mut self, f: F) -> Self
    where
        F: Fn(&Node, Option<Value>) -> Option<Value> + Send + Sync + 'static,
    {
        self.transform = Some(Arc::new(f));
        self
    }
}

/// Options for [`crate::AccessorRegistry::object_accessor`].
#[derive(Clone, Default, Debug)]
pub struct ObjectOptions {
    name: Option<String>,
    factory: FactoryRef,
}

impl ObjectOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn factory(mut self, factory: impl NodeFactory + 'static) -> Self {
        self.factory = FactoryRef::Custom(Arc::new(factory));
        self
    }

    pub fn shared_factory(mut self, factory: Arc<dyn NodeFactory>) -> Self {
        self.factory = FactoryRef::Custom(factory);
        self
    }

    /// Materialize nested fragments with the reading node's own type.
    pub fn same_type(mut self) -> Self {
        self.factory = FactoryRef::SameType;
        self
    }
}

/// Element of the bulk registration forms: a bare key, or a key with options.
pub struct AccessorSpec<O> {
    pub source_key: String,
    pub opts: O,
}

pub type ValueSpec = AccessorSpec<ValueOptions>;
pub type ObjectSpec = AccessorSpec<ObjectOptions>;

impl<O: Default> From<&str> for AccessorSpec<O> {
    fn from(source_key: &str) -> Self {
        Self {
            source_key: source_key.to_string(),
            opts: O::default(),
        }
    }
}

impl<O: Default> From<String> for AccessorSpec<O> {
    fn from(source_key: String) -> Self {
        Self {
            source_key,
            opts: O::default(),
        }
    }
}

impl<O> From<(&str, O)> for AccessorSpec<O> {
    fn from((source_key, opts): (&str, O)) -> Self {
        Self {
            source_key: source_key.to_string(),
            opts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn name_defaults_to_source_key() {
        let d = AccessorDescriptor::value("an_integer", ValueOptions::new());
        assert_eq!(d.name, "an_integer");
        assert_eq!(d.source_key, "an_integer");
        assert_eq!(d.kind_name(), "value");

        let d = AccessorDescriptor::object("objects", ObjectOptions::new().name("cool_objects"));
        assert_eq!(d.name, "cool_objects");
        assert_eq!(d.source_key, "objects");
        assert!(d.is_object());
    }

    #[test]
    fn value_options_are_recorded() {
        let d = AccessorDescriptor::value(
            "selected",
            ValueOptions::new().with_default(false).transform(|_, v| v),
        );
        match d.kind {
            AccessorKind::Value { default, transform } => {
                assert_eq!(default, Some(json!(false)));
                assert!(transform.is_some());
            }
            AccessorKind::Object { .. } => panic!("expected value accessor"),
        }
    }

    #[test]
    fn specs_from_keys_and_pairs() {
        let bare: ValueSpec = "age".into();
        assert_eq!(bare.source_key, "age");
        let pair: ObjectSpec = ("owner", ObjectOptions::new().same_type()).into();
        assert_eq!(pair.source_key, "owner");
        assert!(matches!(pair.opts.factory, FactoryRef::SameType));
    }
}
