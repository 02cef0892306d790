/// Authentication primitives
///
/// - `password`: Argon2id password hashing and strength validation
/// - `session`: HS256 session token creation and validation
/// - `middleware`: Auth context and credential extraction for axum

pub mod middleware;
pub mod password;
pub mod session;
