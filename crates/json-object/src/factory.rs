//! Node factories and the process-wide default used by object accessors that
//! do not name one.

use serde_json::Value;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};
use tracing::debug;

use crate::node::{Node, NodeType};

/// Turns a fragment and an optional parent into a node.
///
/// Implemented by [`NodeType`], [`GenericFactory`] and any
/// `Fn(&Value, Option<&Arc<Node>>) -> Arc<Node>`.
pub trait NodeFactory: Send + Sync {
    fn create(&self, fragment: &Value, parent: Option<&Arc<Node>>) -> Arc<Node>;
}

impl NodeFactory for NodeType {
    fn create(&self, fragment: &Value, parent: Option<&Arc<Node>>) -> Arc<Node> {
        Node::new(self.clone(), fragment.clone(), parent)
    }
}

impl<F> NodeFactory for F
where
    F: Fn(&Value, Option<&Arc<Node>>) -> Arc<Node> + Send + Sync,
{
    fn create(&self, fragment: &Value, parent: Option<&Arc<Node>>) -> Arc<Node> {
        self(fragment, parent)
    }
}

/// Builds nodes of the open [`NodeType::generic`] type: no declared
/// accessors, every key readable through [`Node::get`] and [`Node::value`].
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericFactory;

impl NodeFactory for GenericFactory {
    fn create(&self, fragment: &Value, parent: Option<&Arc<Node>>) -> Arc<Node> {
        NodeType::generic().create(fragment, parent)
    }
}

static DEFAULT_FACTORY: RwLock<Option<Arc<dyn NodeFactory>>> = RwLock::new(None);

fn generic_factory() -> &'static Arc<dyn NodeFactory> {
    static GENERIC: OnceLock<Arc<dyn NodeFactory>> = OnceLock::new();
    GENERIC.get_or_init(|| Arc::new(GenericFactory))
}

/// The factory object accessors use when none was registered with them.
///
/// [`GenericFactory`] unless replaced with [`set_default_factory`].
pub fn default_factory() -> Arc<dyn NodeFactory> {
    let slot = DEFAULT_FACTORY.read().unwrap_or_else(PoisonError::into_inner);
    match slot.as_ref() {
        Some(factory) => factory.clone(),
        None => generic_factory().clone(),
    }
}

/// Replace the process-wide default factory.
///
/// Applies to object accessors read after the call; results already cached on
/// existing nodes keep the nodes they were built with.
pub fn set_default_factory(factory: Arc<dyn NodeFactory>) {
    debug!("overriding default node factory");
    *DEFAULT_FACTORY
        .write()
        .unwrap_or_else(PoisonError::into_inner) = Some(factory);
}

/// Restore [`GenericFactory`] as the default.
pub fn reset_default_factory() {
    debug!("resetting default node factory");
    *DEFAULT_FACTORY
        .write()
        .unwrap_or_else(PoisonError::into_inner) = None;
}
