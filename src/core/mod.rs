//! Core module - identity, sampling and session logic

pub mod identity;
pub mod registry;
pub mod sampling;
pub mod session;

pub use identity::{EntityId, EntityPrefix, IdParseError};
pub use registry::{ExigencePayload, OrderPayload, Registry};
pub use sampling::required_samples;
pub use session::{ActiveControl, ControlSession, SessionError, SessionProgress};
