pub mod auth;

pub use auth::{auth_middleware, require_admin, require_role, require_staff, AuthUser};
