/// Request middleware
///
/// - [`session`]: resolves the session cookie into a [`session::CurrentPrincipal`]
/// - [`access`]: enforces the admin access policy

pub mod access;
pub mod session;
