//! Client-side authentication session for the Banquet dashboard
//!
//! [`Session`] owns the token lifecycle, [`RouteGuard`] decides what a
//! protected view may show, and [`AuthBackend`] is the seam to the auth API.

pub mod backend;
pub mod context;
pub mod error;
pub mod guard;

pub use backend::AuthBackend;
pub use context::{AuthAction, AuthState, Phase, Session, SessionEvent};
pub use error::SessionError;
pub use guard::{GuardDecision, RouteGuard, RouteTargets};
