pub mod jwt;
pub mod middleware;
pub mod password;

pub use jwt::{Claims, JwtConfig, JwtService};
pub use middleware::{admin_middleware, auth_middleware, AuthUser};
