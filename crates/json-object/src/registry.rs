//! AccessorRegistry: the per-type table of accessor descriptors.

use indexmap::IndexMap;

use crate::descriptor::{AccessorDescriptor, ObjectOptions, ObjectSpec, ValueOptions, ValueSpec};

/// Accessor descriptors of one node type, keyed by exposed name, in
/// registration order.
///
/// Registering a name twice replaces the earlier descriptor in place.
#[derive(Debug, Clone, Default)]
pub struct AccessorRegistry {
    descriptors: IndexMap<String, AccessorDescriptor>,
}

impl AccessorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an accessor returning the (defaulted, transformed) value
    /// stored under `source_key`.
    pub fn value_accessor(self, source_key: impl Into<String>, opts: ValueOptions) -> Self {
        self.register(AccessorDescriptor::value(source_key, opts))
    }

    /// Register several value accessors at once.
    ///
    /// ```
    /// use json_object::{AccessorRegistry, ValueOptions, ValueSpec};
    ///
    /// let registry = AccessorRegistry::new().value_accessors([
    ///     ValueSpec::from("an_integer"),
    ///     ("a_string", ValueOptions::new().name("custom_name")).into(),
    /// ]);
    /// assert_eq!(registry.names().collect::<Vec<_>>(), ["an_integer", "custom_name"]);
    /// ```
    pub fn value_accessors<I, S>(self, specs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ValueSpec>,
    {
        let mut registry = self;
        for spec in specs {
            let spec: ValueSpec = spec.into();
            registry = registry.value_accessor(spec.source_key, spec.opts);
        }
        registry
    }

    /// Register an accessor materializing the fragment under `source_key` as
    /// a node (object) or a list of nodes (array).
    pub fn object_accessor(self, source_key: impl Into<String>, opts: ObjectOptions) -> Self {
        self.register(AccessorDescriptor::object(source_key, opts))
    }

    pub fn object_accessors<I, S>(self, specs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ObjectSpec>,
    {
        let mut registry = self;
        for spec in specs {
            let spec: ObjectSpec = spec.into();
            registry = registry.object_accessor(spec.source_key, spec.opts);
        }
        registry
    }

    pub fn register(mut self, descriptor: AccessorDescriptor) -> Self {
        self.descriptors.insert(descriptor.name.clone(), descriptor);
        self
    }

    pub fn get(&self, name: &str) -> Option<&AccessorDescriptor> {
        self.descriptors.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.descriptors.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.descriptors.keys().map(String::as_str)
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &AccessorDescriptor> {
        self.descriptors.values()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}
