//! Authentication — hosted auth service client, session resolution and
//! the route-access middleware guarding the dashboard.

pub mod access;
pub mod client;
pub mod session;

pub use access::{access_guard, decide, Access};
pub use client::{AuthError, AuthProvider, AuthSession, AuthUser, HostedAuth};
pub use session::{session_token, HostedSessions, SessionResolver, SessionUser, SESSION_COOKIE};
