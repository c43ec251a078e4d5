//! Auth gate: bearer credential -> verified subject -> application caller

use super::repository::{Collection, FieldFilter};
use crate::contract::{Caller, FleetError, User};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, instrument, warn};

/// Why the identity provider refused a token
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    /// Token issued slightly in the future relative to our clock
    #[error("token used too early")]
    NotYetValid,
    #[error("invalid token: {0}")]
    Invalid(String),
}

/// External issuer/verifier of bearer credentials
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Verify `token` and return its stable subject id
    async fn verify(&self, token: &str) -> Result<String, IdentityError>;
}

/// Extract the token from an `Authorization: Bearer <token>` header value
pub fn extract_bearer(header: Option<&str>) -> Result<&str, FleetError> {
    let header = header.ok_or_else(|| FleetError::unauthenticated("Missing authorization header"))?;
    let token = header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .ok_or_else(|| FleetError::unauthenticated("Invalid authentication scheme"))?;
    if token.is_empty() {
        return Err(FleetError::unauthenticated("Empty bearer token"));
    }
    Ok(token)
}

/// Resolves every inbound request to a `Caller` before handlers run
pub struct AuthGate {
    identity: Arc<dyn IdentityProvider>,
    users: Collection<User>,
    clock_skew_retry: Duration,
}

impl AuthGate {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        users: Collection<User>,
        clock_skew_retry: Duration,
    ) -> Self {
        Self {
            identity,
            users,
            clock_skew_retry,
        }
    }

    /// Authenticate a raw `Authorization` header value
    #[instrument(skip_all)]
    pub async fn authenticate(&self, authorization: Option<&str>) -> Result<Caller, FleetError> {
        let token = extract_bearer(authorization)?;
        let uid = self.verify_with_retry(token).await?;
        if uid.is_empty() {
            return Err(FleetError::unauthenticated("Invalid token: missing subject"));
        }

        let user = self
            .users
            .find(&[FieldFilter::eq("firebase_uid", &uid)])
            .await
            .map_err(FleetError::internal)?
            .into_iter()
            .next()
            .ok_or_else(|| FleetError::not_found("User", uid.clone()))?;

        if !user.active {
            return Err(FleetError::forbidden("User account is inactive"));
        }

        debug!(user_id = %user.id, role = ?user.role, "caller authenticated");
        Ok(Caller::from(&user))
    }

    /// One retry, after a short pause, for tokens that are not yet valid
    async fn verify_with_retry(&self, token: &str) -> Result<String, FleetError> {
        match self.identity.verify(token).await {
            Ok(uid) => Ok(uid),
            Err(IdentityError::NotYetValid) => {
                warn!(
                    delay_ms = self.clock_skew_retry.as_millis() as u64,
                    "token used too early, retrying once"
                );
                tokio::time::sleep(self.clock_skew_retry).await;
                self.identity
                    .verify(token)
                    .await
                    .map_err(|e| FleetError::unauthenticated(e.to_string()))
            }
            Err(e) => Err(FleetError::unauthenticated(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::Role;
    use crate::domain::repository::DocumentStore;
    use crate::infra::storage::InMemoryDocumentStore;
    use chrono::Utc;
    use parking_lot::Mutex;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const SKEW: Duration = Duration::from_millis(1500);

    /// Replays scripted verification outcomes and counts calls
    struct ScriptedIdentity {
        outcomes: Mutex<VecDeque<Result<String, IdentityError>>>,
        calls: AtomicUsize,
    }

    impl ScriptedIdentity {
        fn new(outcomes: impl IntoIterator<Item = Result<String, IdentityError>>) -> Arc<Self> {
            Arc::new(Self {
                outcomes: Mutex::new(outcomes.into_iter().collect()),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl IdentityProvider for ScriptedIdentity {
        async fn verify(&self, _token: &str) -> Result<String, IdentityError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcomes
                .lock()
                .pop_front()
                .unwrap_or_else(|| Err(IdentityError::Invalid("script exhausted".into())))
        }
    }

    async fn gate_with(identity: Arc<ScriptedIdentity>) -> AuthGate {
        let store: Arc<dyn DocumentStore> = Arc::new(InMemoryDocumentStore::new());
        let users = Collection::<User>::new(store);
        let now = Utc::now();
        users
            .insert(&User {
                id: String::new(),
                email: "bosun@fleet.io".into(),
                name: "Bosun".into(),
                role: Role::Crew,
                ship_id: None,
                phone: None,
                position: None,
                active: true,
                firebase_uid: Some("uid-bosun".into()),
                ship_name: None,
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();
        AuthGate::new(identity, users, SKEW)
    }

    #[tokio::test(start_paused = true)]
    async fn early_token_succeeds_on_single_retry() {
        let identity = ScriptedIdentity::new([Err(IdentityError::NotYetValid), Ok("uid-bosun".into())]);
        let gate = gate_with(identity.clone()).await;

        let started = tokio::time::Instant::now();
        let caller = gate.authenticate(Some("Bearer early")).await.unwrap();
        assert_eq!(caller.name, "Bosun");
        assert_eq!(identity.calls(), 2);
        assert!(started.elapsed() >= SKEW);
    }

    #[tokio::test(start_paused = true)]
    async fn still_early_after_retry_is_unauthenticated() {
        let identity = ScriptedIdentity::new([
            Err(IdentityError::NotYetValid),
            Err(IdentityError::NotYetValid),
            Ok("uid-bosun".into()),
        ]);
        let gate = gate_with(identity.clone()).await;

        assert!(matches!(
            gate.authenticate(Some("Bearer early")).await,
            Err(FleetError::Unauthenticated { .. })
        ));
        assert_eq!(identity.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_token_is_not_retried() {
        let identity = ScriptedIdentity::new([
            Err(IdentityError::Invalid("bad signature".into())),
            Ok("uid-bosun".into()),
        ]);
        let gate = gate_with(identity.clone()).await;

        let started = tokio::time::Instant::now();
        assert!(matches!(
            gate.authenticate(Some("Bearer forged")).await,
            Err(FleetError::Unauthenticated { .. })
        ));
        assert_eq!(identity.calls(), 1);
        assert!(started.elapsed() < SKEW);
    }

    #[tokio::test]
    async fn unknown_subject_is_user_not_found() {
        let gate = gate_with(ScriptedIdentity::new([Ok("uid-nobody".into())])).await;
        match gate.authenticate(Some("Bearer stranger")).await {
            Err(FleetError::NotFound { resource, id }) => {
                assert_eq!(resource, "User");
                assert_eq!(id, "uid-nobody");
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn bearer_extraction() {
        assert_eq!(extract_bearer(Some("Bearer abc")).unwrap(), "abc");
        assert!(matches!(
            extract_bearer(None),
            Err(FleetError::Unauthenticated { .. })
        ));
        assert!(matches!(
            extract_bearer(Some("Basic abc")),
            Err(FleetError::Unauthenticated { .. })
        ));
        assert!(extract_bearer(Some("Bearer ")).is_err());
    }
}
