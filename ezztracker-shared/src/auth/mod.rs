/// Authentication and authorization
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`login`]: Email/password authentication
/// - [`session`]: Signed session tokens for the login cookie
/// - [`policy`]: Role-based access policy and the request principal

pub mod login;
pub mod password;
pub mod policy;
pub mod session;
