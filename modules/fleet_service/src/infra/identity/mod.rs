//! Identity providers that turn a bearer token into a subject id

mod firebase;
mod static_tokens;

pub use firebase::FirebaseIdentityProvider;
pub use static_tokens::StaticTokenIdentityProvider;
