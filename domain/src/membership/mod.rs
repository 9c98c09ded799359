//! Council membership and vote weights.

pub mod member;
pub mod weights;

pub use member::{Member, MemberId, RoleId};
pub use weights::{DEFAULT_WEIGHT, WeightOverrides, WeightTable, compute_weights};
