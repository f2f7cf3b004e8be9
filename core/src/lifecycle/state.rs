//! Lifecycle state machine

use std::fmt;

/// Bootstrap/shutdown phases, in the only order they may occur.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LifecycleState {
    Uninitialized,
    /// Surface format applied
    Configured,
    /// Main window constructed
    WindowCreated,
    /// All capability providers registered
    ProvidersRegistered,
    /// Event loop active
    Running,
    /// Waiting for detached tasks
    Draining,
    Terminated,
}

impl LifecycleState {
    /// The state that must follow this one, if any.
    pub fn next(&self) -> Option<LifecycleState> {
        match self {
            LifecycleState::Uninitialized => Some(LifecycleState::Configured),
            LifecycleState::Configured => Some(LifecycleState::WindowCreated),
            LifecycleState::WindowCreated => Some(LifecycleState::ProvidersRegistered),
            LifecycleState::ProvidersRegistered => Some(LifecycleState::Running),
            LifecycleState::Running => Some(LifecycleState::Draining),
            LifecycleState::Draining => Some(LifecycleState::Terminated),
            LifecycleState::Terminated => None,
        }
    }

    pub fn can_transition_to(&self, to: LifecycleState) -> bool {
        self.next() == Some(to)
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LifecycleState::Uninitialized => "uninitialized",
            LifecycleState::Configured => "configured",
            LifecycleState::WindowCreated => "window created",
            LifecycleState::ProvidersRegistered => "providers registered",
            LifecycleState::Running => "running",
            LifecycleState::Draining => "draining",
            LifecycleState::Terminated => "terminated",
        };
        f.write_str(name)
    }
}
