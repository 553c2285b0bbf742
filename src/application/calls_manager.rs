//! Call state fan-out
//!
//! Drives [`Call`] state transitions and notifies registered listeners of
//! each change, in registration order, on the calling thread.

use crate::domain::call::{Call, CallInfo, CallState};
use crate::domain::shared::result::Result;
use std::sync::{Arc, RwLock};
use tracing::{debug, info};

/// Observer of call state transitions.
///
/// Called synchronously on the thread that changed the state; implementations
/// must return quickly and must not panic.
pub trait CallsManagerListener: Send + Sync {
    fn on_call_state_changed(&self, call: &dyn CallInfo, old_state: CallState, new_state: CallState);
}

#[derive(Default)]
pub struct CallsManager {
    listeners: RwLock<Vec<Arc<dyn CallsManagerListener>>>,
}

impl CallsManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_listener(&self, listener: Arc<dyn CallsManagerListener>) {
        let mut listeners = self.listeners.write().unwrap_or_else(|e| e.into_inner());
        listeners.push(listener);
        info!("Registered calls manager listener ({} total)", listeners.len());
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Move `call` to `new_state` and notify listeners.
    ///
    /// Setting the state a call already has is a no-op.
    pub fn set_call_state(&self, call: &mut Call, new_state: CallState) -> Result<()> {
        if call.state() == new_state {
            return Ok(());
        }

        let old_state = call.transition_to(new_state)?;
        debug!("Call {} state {} -> {}", call.id(), old_state, new_state);

        let listeners = self.listeners.read().unwrap_or_else(|e| e.into_inner()).clone();
        for listener in listeners {
            listener.on_call_state_changed(&*call, old_state, new_state);
        }
        Ok(())
    }
}
