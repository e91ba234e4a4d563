//! Operation names
//!
//! Fully-qualified RPC names. The HTTP router mounts each operation at its
//! name, so the request path is what the middleware sees.

pub const REGISTER: &str = "/auth.Auth/Register";
pub const LOGIN: &str = "/auth.Auth/Login";
pub const IS_ADMIN: &str = "/auth.Auth/IsAdmin";
pub const LIST_USERS: &str = "/auth.Auth/ListUsers";

/// Callable without a bearer token
pub const PUBLIC: [&str; 2] = [REGISTER, LOGIN];

pub const ALL: [&str; 4] = [REGISTER, LOGIN, IS_ADMIN, LIST_USERS];

#[inline]
pub fn is_public(operation: &str) -> bool {
    PUBLIC.contains(&operation)
}

#[inline]
pub fn is_known(operation: &str) -> bool {
    ALL.contains(&operation)
}
