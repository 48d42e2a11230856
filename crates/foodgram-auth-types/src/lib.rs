//! Auth types shared across Foodgram services.
//!
//! Token issuance lives in the identity provider; services only see the
//! identity headers the gateway injects after verifying a token.

pub mod identity;
