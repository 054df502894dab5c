//! Request-scoped propagation context
//!
//! A [`PropagationContext`] is an immutable chain of key/value scopes. Every
//! derivation allocates one new node pointing at its parent, so contexts can
//! be cloned and handed across threads freely and a derived context never
//! changes the one it was derived from.

use std::fmt;
use std::sync::Arc;

/// Keys a context can carry
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ContextKey {
    /// The trace identifier injected as `traceId`
    TraceId,
    Custom(String),
}

impl ContextKey {
    pub fn custom(name: impl Into<String>) -> Self {
        ContextKey::Custom(name.into())
    }
}

impl fmt::Display for ContextKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextKey::TraceId => write!(f, "traceId"),
            ContextKey::Custom(name) => write!(f, "{}", name),
        }
    }
}

#[derive(Debug)]
struct Scope {
    key: ContextKey,
    value: String,
    parent: Option<Arc<Scope>>,
}

/// Immutable, cheaply clonable key/value scope
///
/// # Examples
///
/// ```
/// use trace_logger_system::core::{ContextKey, PropagationContext};
///
/// let root = PropagationContext::background();
/// let ctx = root
///     .with_trace_id("req-42")
///     .with_value(ContextKey::custom("tenant"), "acme");
///
/// assert_eq!(ctx.trace_id(), Some("req-42"));
/// assert_eq!(ctx.value(&ContextKey::custom("tenant")), Some("acme"));
/// assert_eq!(root.trace_id(), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PropagationContext {
    head: Option<Arc<Scope>>,
}

impl PropagationContext {
    /// Empty root context
    pub fn new() -> Self {
        Self::default()
    }

    /// Alias of [`PropagationContext::new`] for call sites that start a
    /// fresh request scope
    pub fn background() -> Self {
        Self::default()
    }

    /// Derive a context with `key` bound to `value`, shadowing any binding
    /// inherited from the parent
    #[must_use]
    pub fn with_value(&self, key: ContextKey, value: impl Into<String>) -> Self {
        Self {
            head: Some(Arc::new(Scope {
                key,
                value: value.into(),
                parent: self.head.clone(),
            })),
        }
    }

    #[must_use]
    pub fn with_trace_id(&self, trace_id: impl Into<String>) -> Self {
        self.with_value(ContextKey::TraceId, trace_id)
    }

    /// Nearest binding for `key`
    pub fn value(&self, key: &ContextKey) -> Option<&str> {
        let mut scope = self.head.as_deref();
        while let Some(node) = scope {
            if node.key == *key {
                return Some(&node.value);
            }
            scope = node.parent.as_deref();
        }
        None
    }

    pub fn trace_id(&self) -> Option<&str> {
        self.value(&ContextKey::TraceId)
    }

    /// Return the bound trace identifier, or derive a context carrying a
    /// freshly generated one
    pub fn ensure_trace_id(&self) -> (Self, String) {
        match self.trace_id() {
            Some(id) => (self.clone(), id.to_string()),
            None => {
                let id = generate_trace_id();
                (self.with_trace_id(id.clone()), id)
            }
        }
    }

    /// Number of bindings in the chain, shadowed ones included
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut scope = self.head.as_deref();
        while let Some(node) = scope {
            depth += 1;
            scope = node.parent.as_deref();
        }
        depth
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }
}

/// New random (v4) UUID in hyphenated form
pub fn generate_trace_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
