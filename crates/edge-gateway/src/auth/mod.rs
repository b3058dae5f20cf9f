//! Authentication building blocks for the edge gateway.
//!
//! # Components
//!
//! - `claims` - Access token claims with lenient claim coercion
//! - `codec` - HMAC-SHA512 token codec (verify, read claims, issue)
//! - `whitelist` - Token-exempt route whitelist with prefix normalization

pub mod claims;
pub mod codec;
pub mod whitelist;

pub use claims::Claims;
pub use codec::{CodecError, TokenCodec};
pub use whitelist::Whitelist;
