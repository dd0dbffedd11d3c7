//! Authentication: salted-hash primitive, bearer-token sessions, endpoints.

pub mod handlers;
pub mod password;
pub mod tokens;
