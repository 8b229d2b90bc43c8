use std::sync::Arc;

use dashmap::DashMap;

use qualname_core::error::{QualnameError, Result};
use qualname_core::protocol::{Envelope, InvocationSpec, IDENTIFIER};

use crate::build::InvocationBuilder;
use crate::object::Transform;

/// Reconstructs a transform from an envelope of one payload format.
pub trait PayloadHandler: Send + Sync {
    fn identifier(&self) -> &'static str;
    fn handle(&self, envelope: &Envelope) -> Result<Arc<dyn Transform>>;
}

/// Registry and router keyed by envelope identifier.
#[derive(Default)]
pub struct PayloadRouter {
    handlers: DashMap<&'static str, Arc<dyn PayloadHandler>>,
}

impl PayloadRouter {
    pub fn new() -> Self {
        Self {
            handlers: DashMap::new(),
        }
    }

    pub fn register(&self, handler: Arc<dyn PayloadHandler>) {
        self.handlers.insert(handler.identifier(), handler);
    }

    pub fn registered_identifiers(&self) -> Vec<&'static str> {
        self.handlers.iter().map(|e| *e.key()).collect()
    }

    pub fn route(&self, envelope: &Envelope) -> Result<Arc<dyn Transform>> {
        let id = envelope.identifier.as_str();
        let handler = match self.handlers.get(id) {
            Some(h) => Arc::clone(h.value()),
            None => {
                tracing::warn!(identifier = %id, "no handler for payload identifier");
                return Err(QualnameError::CodecFailure(format!(
                    "unknown payload identifier: {id}"
                )));
            }
        };
        handler.handle(envelope)
    }
}

/// Handler for [`IDENTIFIER`]: decode the invocation, then build it.
pub struct FullyQualifiedNamedHandler {
    builder: Arc<InvocationBuilder>,
}

impl FullyQualifiedNamedHandler {
    pub fn new(builder: Arc<InvocationBuilder>) -> Self {
        Self { builder }
    }
}

impl PayloadHandler for FullyQualifiedNamedHandler {
    fn identifier(&self) -> &'static str {
        IDENTIFIER
    }

    fn handle(&self, envelope: &Envelope) -> Result<Arc<dyn Transform>> {
        let spec = InvocationSpec::decode(envelope)?;
        tracing::info!(constructor = %spec.constructor(), "building fully qualified named transform");
        self.builder.build(spec)
    }
}
