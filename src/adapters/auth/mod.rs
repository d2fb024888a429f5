//! Authentication adapters.
//!
//! Implementations of the `SessionValidator` port:
//!
//! - `jwt` - HS256 tokens issued by the shelter's auth service
//! - `mock` - Test implementation that needs no signed tokens

mod jwt;
mod mock;

pub use jwt::{ClaimId, JwtSessionValidator, SessionClaims};
pub use mock::MockSessionValidator;
