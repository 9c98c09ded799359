//! Application layer for votum
//!
//! This crate contains use cases, registries, port definitions and
//! application configuration. It depends only on the domain layer.
//!
//! Every mutation of a council or an election happens while holding that
//! entity's lock. Notifications and finish actions run after the lock is
//! released.

pub mod config;
pub mod ports;
pub mod registry;
pub mod use_cases;

// Re-export commonly used types
pub use config::ElectionDefaults;
pub use ports::{
    clock::{Clock, ManualClock, SystemClock},
    finish_action::{
        FinishActionError, FinishActionOutcome, FinishActionPort, FinishActionRequest,
        NoFinishActions,
    },
    notification::{CompositeNotifier, GovernanceEvent, GovernanceNotifier, NoNotifications},
};
pub use registry::{CouncilRegistry, ElectionRegistry};
pub use use_cases::election::{ElectionError, ElectionRef, ElectionUseCase};
pub use use_cases::forward::RegistryForwarder;
pub use use_cases::motion::{MotionError, MotionUseCase};
