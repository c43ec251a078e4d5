//! Firebase ID token verification (RS256, keys selected by `kid`)

use crate::domain::auth::{IdentityError, IdentityProvider};
use anyhow::{Context, Result};
use async_trait::async_trait;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, decode_header, get_current_timestamp, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Deserialize)]
struct FirebaseClaims {
    sub: String,
    iat: u64,
}

pub struct FirebaseIdentityProvider {
    keys: HashMap<String, DecodingKey>,
    validation: Validation,
}

impl FirebaseIdentityProvider {
    /// `public_keys` maps key id to a PEM-encoded RSA public key
    pub fn new(project_id: &str, public_keys: &HashMap<String, String>) -> Result<Self> {
        let keys = public_keys
            .iter()
            .map(|(kid, pem)| {
                DecodingKey::from_rsa_pem(pem.as_bytes())
                    .map(|key| (kid.clone(), key))
                    .with_context(|| format!("invalid public key '{kid}'"))
            })
            .collect::<Result<HashMap<_, _>>>()?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[project_id]);
        validation.set_issuer(&[format!("https://securetoken.google.com/{project_id}")]);
        validation.set_required_spec_claims(&["exp", "iat", "sub", "aud", "iss"]);

        Ok(Self { keys, validation })
    }
}

#[async_trait]
impl IdentityProvider for FirebaseIdentityProvider {
    async fn verify(&self, token: &str) -> Result<String, IdentityError> {
        let header = decode_header(token).map_err(|e| IdentityError::Invalid(e.to_string()))?;
        let kid = header
            .kid
            .ok_or_else(|| IdentityError::Invalid("token header has no key id".to_owned()))?;
        let key = self
            .keys
            .get(&kid)
            .ok_or_else(|| IdentityError::Invalid(format!("unknown key id '{kid}'")))?;

        let data = decode::<FirebaseClaims>(token, key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ImmatureSignature => IdentityError::NotYetValid,
                _ => IdentityError::Invalid(e.to_string()),
            }
        })?;

        if data.claims.iat > get_current_timestamp() {
            return Err(IdentityError::NotYetValid);
        }
        Ok(data.claims.sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    const PRIVATE_KEY: &str = include_str!("../../../testdata/identity_test_key.pem");
    const PUBLIC_KEY: &str = include_str!("../../../testdata/identity_test_key.pub.pem");
    const PROJECT: &str = "fleet-test";

    fn provider() -> FirebaseIdentityProvider {
        let keys = HashMap::from([("k1".to_owned(), PUBLIC_KEY.to_owned())]);
        FirebaseIdentityProvider::new(PROJECT, &keys).unwrap()
    }

    fn sign(kid: &str, claims: serde_json::Value) -> String {
        let header = Header {
            kid: Some(kid.to_owned()),
            ..Header::new(Algorithm::RS256)
        };
        let key = EncodingKey::from_rsa_pem(PRIVATE_KEY.as_bytes()).unwrap();
        encode(&header, &claims, &key).unwrap()
    }

    fn claims(iat: u64, aud: &str) -> serde_json::Value {
        json!({
            "sub": "uid-42",
            "iat": iat,
            "exp": iat + 3600,
            "aud": aud,
            "iss": format!("https://securetoken.google.com/{aud}"),
        })
    }

    #[tokio::test]
    async fn accepts_valid_token() {
        let now = get_current_timestamp();
        let token = sign("k1", claims(now, PROJECT));
        assert_eq!(provider().verify(&token).await.unwrap(), "uid-42");
    }

    #[tokio::test]
    async fn rejects_foreign_project() {
        let now = get_current_timestamp();
        let token = sign("k1", claims(now, "other-project"));
        assert!(matches!(
            provider().verify(&token).await,
            Err(IdentityError::Invalid(_))
        ));
    }

    #[tokio::test]
    async fn rejects_unknown_key_id() {
        let now = get_current_timestamp();
        let token = sign("k2", claims(now, PROJECT));
        assert!(matches!(
            provider().verify(&token).await,
            Err(IdentityError::Invalid(_))
        ));
    }

    #[tokio::test]
    async fn future_issue_time_is_not_yet_valid() {
        let later = get_current_timestamp() + 600;
        let token = sign("k1", claims(later, PROJECT));
        assert_eq!(
            provider().verify(&token).await,
            Err(IdentityError::NotYetValid)
        );
    }

    #[test]
    fn rejects_malformed_key_material() {
        let keys = HashMap::from([("k1".to_owned(), "not a pem".to_owned())]);
        assert!(FirebaseIdentityProvider::new(PROJECT, &keys).is_err());
    }

    #[tokio::test]
    async fn rejects_garbage() {
        assert!(provider().verify("not-a-jwt").await.is_err());
    }
}
