pub mod identity;
pub mod provider;
pub mod token;

pub use identity::RequestIdentity;
pub use provider::{CredentialError, CredentialVerifier, VerifiedIdentity};
pub use token::{
    decode_unverified, issue_token, issue_token_with_claims, verify_token, Claims, TokenError,
};
