//! `tasktrack-auth` — authentication and authorization core.
//!
//! Token issuance/verification, the per-request authentication gate, the
//! access rules and the registration/login flow. Decoupled from HTTP; storage
//! is reached through the `CredentialStore` and `TaskOwnership` ports.

pub mod accounts;
pub mod authorize;
pub mod claims;
pub mod credential;
pub mod gate;
pub mod password;
pub mod principal;
pub mod roles;
pub mod token;

#[cfg(test)]
mod testing;

pub use accounts::{AccountService, ProfileUpdate, Registration};
pub use authorize::{AuthzError, OwnershipFact, Rule, TaskOwnership, authorize};
pub use claims::{TokenClaims, TokenError, validate_claims};
pub use credential::{
    Credential, CredentialError, CredentialStore, NewCredential, PasswordHash, normalize_email,
};
pub use gate::{AuthenticationGate, GateRejection};
pub use password::PasswordHasher;
pub use principal::{AuthenticatedPrincipal, SecurityContext};
pub use roles::{Role, RoleSet, UnknownRole};
pub use token::{DEFAULT_TOKEN_VALIDITY_HOURS, IssuedToken, TokenService};
