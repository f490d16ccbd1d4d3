/// Route handlers
///
/// - `index`: Landing page
/// - `health`: Health check endpoint
/// - `auth`: Login and logout
/// - `admin`: Admin index
///
/// Entity CRUD handlers live in [`crate::views`].

pub mod admin;
pub mod auth;
pub mod health;
pub mod index;
