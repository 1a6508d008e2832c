//! Optional notification hooks.
//!
//! Each notification class has zero or one handler. Firing a class with no
//! handler does nothing. Handlers run on the cycle task, so they should return
//! quickly and must not block on the pulse itself.

use std::fmt;

use crate::error::PulseError;
use crate::nodes::types::{Endpoint, ServiceType};

pub type UpdateHook = Box<dyn Fn(&[Endpoint]) + Send + Sync>;
pub type ErrorHook = Box<dyn Fn(&PulseError) + Send + Sync>;
pub type FallbackHook = Box<dyn Fn(ServiceType, &[Endpoint]) + Send + Sync>;

#[derive(Default)]
pub struct Subscribers {
    pub(crate) on_node_update: Option<UpdateHook>,
    pub(crate) on_error: Option<ErrorHook>,
    pub(crate) on_fallback: Option<FallbackHook>,
}

impl Subscribers {
    pub fn node_update(&self, nodes: &[Endpoint]) {
        if let Some(hook) = &self.on_node_update {
            hook(nodes);
        }
    }

    pub fn error(&self, error: &PulseError) {
        if let Some(hook) = &self.on_error {
            hook(error);
        }
    }

    /// `active` is the service type whose pool just became active.
    pub fn fallback(&self, active: ServiceType, nodes: &[Endpoint]) {
        if let Some(hook) = &self.on_fallback {
            hook(active, nodes);
        }
    }
}

impl fmt::Debug for Subscribers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscribers")
            .field("on_node_update", &self.on_node_update.is_some())
            .field("on_error", &self.on_error.is_some())
            .field("on_fallback", &self.on_fallback.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_missing_hooks_are_noops() {
        let subs = Subscribers::default();
        subs.node_update(&[Endpoint::new("a")]);
        subs.fallback(ServiceType::Hyperion, &[]);
    }

    #[test]
    fn test_registered_hook_fires() {
        let calls = Arc::new(AtomicUsize::new(0));
        let c = calls.clone();
        let subs = Subscribers {
            on_node_update: Some(Box::new(move |nodes| {
                c.fetch_add(nodes.len(), Ordering::SeqCst);
            })),
            ..Subscribers::default()
        };
        subs.node_update(&[Endpoint::new("a"), Endpoint::new("b")]);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
