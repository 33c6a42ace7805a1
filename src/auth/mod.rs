//! Session management
//!
//! Credential persistence, the invalidation state machine and the events it
//! emits when a session starts or ends.

pub mod events;
pub mod session;
pub mod storage;

pub use events::{SessionEvent, SessionEvents, SessionObserver, SIGN_IN_ROUTE};
pub use session::{SessionGuard, SessionPhase};
pub use storage::{Credential, CredentialStore, UserIdentity};
