//! Authentication: password hashing, bearer tokens, and the admin guard.

pub mod middleware;
pub mod password;
pub mod token;

pub use middleware::{AdminSession, AppState};
pub use password::{hash_password, verify_password};
pub use token::{InvalidToken, TokenIssuer};
