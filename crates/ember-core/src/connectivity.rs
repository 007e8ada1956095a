//! Connectivity oracle contract.

use std::sync::atomic::{AtomicBool, Ordering};

/// Reports whether network access is currently available.
///
/// The sync engine consults this before every pass; offline passes are
/// trivially-successful no-ops.
pub trait Connectivity: Send + Sync {
    /// Whether the network is currently reachable
    fn is_online(&self) -> bool;
}

/// Oracle that always reports the network as available.
///
/// Suits environments without a platform connectivity signal; the engine
/// then discovers outages through transport errors, which leave records
/// dirty for the next pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeOnline;

impl Connectivity for AssumeOnline {
    fn is_online(&self) -> bool {
        true
    }
}

/// Manually switched oracle, for hosts that receive connectivity events.
#[derive(Debug, Default)]
pub struct NetworkSwitch {
    online: AtomicBool,
}

impl NetworkSwitch {
    /// Create a switch in the given state
    #[must_use]
    pub fn new(online: bool) -> Self {
        Self {
            online: AtomicBool::new(online),
        }
    }

    /// Record a connectivity change
    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::Release);
    }
}

impl Connectivity for NetworkSwitch {
    fn is_online(&self) -> bool {
        self.online.load(Ordering::Acquire)
    }
}
