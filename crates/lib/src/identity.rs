//! Caller principals.
//!
//! Real authentication is handled by an external identity provider; this
//! module only hands out principal-shaped identifiers for the `whoami`
//! endpoint. The principal is an opaque string everywhere else.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Principal reported for callers that present no identity.
pub const ANONYMOUS_PRINCIPAL: &str = "2vxsx-fae";

const PRINCIPAL_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const PRINCIPAL_GROUPS: [usize; 5] = [5, 5, 5, 5, 3];

/// Response of `GET /api/whoami`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhoAmI {
    pub principal: String,
}

/// Resolves the principal for an `Authorization` header value.
///
/// Anything other than a non-empty `Bearer` token (or the literal
/// `anonymous` token) is treated as anonymous.
pub fn whoami(authorization: Option<&str>) -> WhoAmI {
    let identity = authorization
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty() && *token != "anonymous");

    let principal = match identity {
        Some(_) => random_principal(&mut rand::thread_rng()),
        None => ANONYMOUS_PRINCIPAL.to_string(),
    };
    WhoAmI { principal }
}

/// Generates a principal-shaped string: `xxxxx-xxxxx-xxxxx-xxxxx-xxx`.
pub fn random_principal(rng: &mut impl Rng) -> String {
    PRINCIPAL_GROUPS
        .iter()
        .map(|&len| {
            (0..len)
                .map(|_| PRINCIPAL_ALPHABET[rng.gen_range(0..PRINCIPAL_ALPHABET.len())] as char)
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("-")
}
