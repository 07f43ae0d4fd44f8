//! Signed admin session tokens.
//!
//! There is exactly one operator. A session token carries no per-user state: it
//! is a fixed payload (`1`) signed with the server secret, so any token that
//! verifies proves the bearer logged in with the admin credentials.

use crate::error::AppError;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

const SESSION_PAYLOAD: &str = "1";

/// The single admin credential pair.
#[derive(Clone)]
pub struct AdminIdentity {
    username: String,
    password: String,
}

impl std::fmt::Debug for AdminIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminIdentity")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl AdminIdentity {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Check submitted credentials. The username is trimmed before comparison.
    pub fn matches(&self, username: &str, password: &str) -> bool {
        let user_ok = constant_time_eq(username.trim().as_bytes(), self.username.as_bytes());
        let pass_ok = constant_time_eq(password.as_bytes(), self.password.as_bytes());
        user_ok & pass_ok
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Issues and verifies session tokens with HMAC-SHA256.
#[derive(Clone)]
pub struct SessionSigner {
    secret: Vec<u8>,
}

impl std::fmt::Debug for SessionSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionSigner").finish_non_exhaustive()
    }
}

impl SessionSigner {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            secret: secret.as_ref().to_vec(),
        }
    }

    fn mac(&self) -> Result<HmacSha256, AppError> {
        let mut mac = HmacSha256::new_from_slice(&self.secret).map_err(|e| {
            tracing::error!("Failed to initialize session HMAC: {}", e);
            AppError::Internal
        })?;
        mac.update(SESSION_PAYLOAD.as_bytes());
        Ok(mac)
    }

    /// Produce a fresh token of the form `1.<base64url signature>`.
    ///
    /// # Errors
    /// Returns [`AppError::Internal`] if the MAC cannot be keyed.
    pub fn issue(&self) -> Result<String, AppError> {
        let signature = self.mac()?.finalize().into_bytes();
        Ok(format!(
            "{}.{}",
            SESSION_PAYLOAD,
            URL_SAFE_NO_PAD.encode(signature)
        ))
    }

    /// Whether `token` carries a valid signature for this secret.
    ///
    /// Signature comparison is constant-time.
    pub fn verify(&self, token: &str) -> bool {
        let Some((payload, signature)) = token.split_once('.') else {
            return false;
        };
        if payload != SESSION_PAYLOAD {
            return false;
        }
        let Ok(signature) = URL_SAFE_NO_PAD.decode(signature) else {
            return false;
        };
        match self.mac() {
            Ok(mac) => mac.verify_slice(&signature).is_ok(),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AdminIdentity, SessionSigner};

    #[test]
    fn issued_token_verifies() {
        let signer = SessionSigner::new("kitchen-secret");
        let token = signer.issue().expect("issue");
        assert!(token.starts_with("1."));
        assert!(!token.contains('='));
        assert!(signer.verify(&token));
    }

    #[test]
    fn token_from_other_secret_is_rejected() {
        let token = SessionSigner::new("one").issue().expect("issue");
        assert!(!SessionSigner::new("two").verify(&token));
    }

    #[test]
    fn malformed_tokens_are_rejected() {
        let signer = SessionSigner::new("secret");
        let token = signer.issue().expect("issue");
        let (_, signature) = token.split_once('.').expect("dot");
        for bad in [
            "",
            "1",
            "1.",
            "garbage",
            "1.!!!not-base64!!!",
            &format!("2.{}", signature),
            &format!("{}x", token),
        ] {
            assert!(!signer.verify(bad), "accepted {:?}", bad);
        }
    }

    #[test]
    fn identity_trims_username_only() {
        let identity = AdminIdentity::new("chef", "pa ss");
        assert!(identity.matches("  chef ", "pa ss"));
        assert!(!identity.matches("chef", " pa ss"));
        assert!(!identity.matches("chef", "wrong"));
        assert!(!identity.matches("cook", "pa ss"));
    }

    #[test]
    fn debug_output_hides_password() {
        let identity = AdminIdentity::new("chef", "hunter2");
        assert!(!format!("{:?}", identity).contains("hunter2"));
    }
}
