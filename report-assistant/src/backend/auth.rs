// Session / identity provider
//
// `Authenticator` lets the login flow run against a stub today and a real directory or
// SQL login later. Callers go through `authenticate_with_retry`, which bounds every attempt
// with the provider's timeout and retries only transient failures.

use crate::models::requests::Credentials;
use crate::models::responses::Session;
use crate::utils::logging::{mask_connection_string, mask_sensitive};
use async_trait::async_trait;
use chrono::Utc;
use log::{info, warn};
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tokio::time::timeout;
use tokio_retry::strategy::{jitter, ExponentialBackoff};
use tokio_retry::RetryIf;
use uuid::Uuid;

/// Login failures. `Display` is the user-facing text; `internal_details` is for logs only.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials. Check your user name and password.")]
    InvalidCredentials { internal_details: String },
    #[error("Connection timed out. Check network connectivity and firewall.")]
    ConnectionTimeout { attempts: u32 },
    #[error("The authentication service is unavailable. Try again later.")]
    Unavailable { internal_details: String },
}

impl AuthError {
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    pub fn internal_details(&self) -> String {
        match self {
            AuthError::InvalidCredentials { internal_details }
            | AuthError::Unavailable { internal_details } => internal_details.clone(),
            AuthError::ConnectionTimeout { attempts } => {
                format!("Timed out on attempt {}", attempts)
            }
        }
    }

    /// Worth another attempt. Rejected credentials never are.
    pub fn is_transient(&self) -> bool {
        !matches!(self, AuthError::InvalidCredentials { .. })
    }
}

#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, credentials: &Credentials) -> Result<Session, AuthError>;

    /// Upper bound for a single attempt.
    fn timeout_duration(&self) -> Duration {
        Duration::from_secs(5)
    }

    /// Total attempts, including the first.
    fn max_retries(&self) -> u32 {
        3
    }
}

/// Accepts any well-formed credentials after a fixed delay.
#[derive(Debug, Clone)]
pub struct StubAuthenticator {
    pub delay: Duration,
    pub timeout: Duration,
    pub max_retries: u32,
}

impl Default for StubAuthenticator {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(1000),
            timeout: Duration::from_secs(5),
            max_retries: 3,
        }
    }
}

#[async_trait]
impl Authenticator for StubAuthenticator {
    async fn authenticate(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        credentials
            .validate()
            .map_err(|e| AuthError::InvalidCredentials {
                internal_details: e.to_string(),
            })?;

        tokio::time::sleep(self.delay).await;

        Ok(Session {
            session_id: Uuid::new_v4(),
            username: credentials.username().to_string(),
            mode: credentials.mode(),
            established_at: Utc::now(),
        })
    }

    fn timeout_duration(&self) -> Duration {
        self.timeout
    }

    fn max_retries(&self) -> u32 {
        self.max_retries
    }
}

pub async fn authenticate_with_retry<A: Authenticator + ?Sized>(
    authenticator: &A,
    credentials: &Credentials,
) -> Result<Session, AuthError> {
    let masked_user = mask_sensitive(credentials.username());
    info!(
        "[PHASE: auth] [STEP: login] Authenticating (mode={}, target={})",
        credentials.mode().as_str(),
        mask_connection_string(&credentials.connection_string())
    );

    let counter = AtomicU32::new(0);
    let counter = &counter;
    let attempt = || async move {
        let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
        match timeout(
            authenticator.timeout_duration(),
            authenticator.authenticate(credentials),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(AuthError::ConnectionTimeout { attempts: n }),
        }
    };

    let retries = authenticator.max_retries().saturating_sub(1) as usize;
    let retry_strategy = ExponentialBackoff::from_millis(100)
        .factor(2)
        .max_delay(Duration::from_secs(2))
        .take(retries)
        .map(jitter);

    let result = RetryIf::spawn(retry_strategy, attempt, AuthError::is_transient).await;
    match &result {
        Ok(session) => info!(
            "[PHASE: auth] [STEP: login] Session {} established for user={}",
            session.session_id, masked_user
        ),
        Err(e) => warn!(
            "[PHASE: auth] [STEP: login] Authentication failed after {} attempt(s): {}",
            counter.load(Ordering::SeqCst),
            e.internal_details()
        ),
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::requests::AuthMode;
    use std::time::Instant;

    fn windows_user() -> Credentials {
        Credentials::Windows {
            username: "PLANT\\operator".to_string(),
        }
    }

    /// Fails with a fixed error every time.
    struct AlwaysFailStub {
        error: AuthError,
        call_count: AtomicU32,
    }

    impl AlwaysFailStub {
        fn new(error: AuthError) -> Self {
            Self {
                error,
                call_count: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl Authenticator for AlwaysFailStub {
        async fn authenticate(&self, _credentials: &Credentials) -> Result<Session, AuthError> {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            Err(self.error.clone())
        }

        fn timeout_duration(&self) -> Duration {
            Duration::from_millis(100)
        }
    }

    /// Never answers; the caller's timeout must fire.
    struct HangingStub {
        call_count: AtomicU32,
    }

    #[async_trait]
    impl Authenticator for HangingStub {
        async fn authenticate(&self, _credentials: &Credentials) -> Result<Session, AuthError> {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            std::future::pending::<()>().await;
            unreachable!()
        }

        fn timeout_duration(&self) -> Duration {
            Duration::from_millis(100)
        }

        fn max_retries(&self) -> u32 {
            1
        }
    }

    /// Unavailable `failures` times, then delegates to the stub.
    struct FlakyStub {
        failures: u32,
        call_count: AtomicU32,
        inner: StubAuthenticator,
    }

    #[async_trait]
    impl Authenticator for FlakyStub {
        async fn authenticate(&self, credentials: &Credentials) -> Result<Session, AuthError> {
            let count = self.call_count.fetch_add(1, Ordering::SeqCst);
            if count < self.failures {
                return Err(AuthError::Unavailable {
                    internal_details: format!("attempt {} refused", count + 1),
                });
            }
            self.inner.authenticate(credentials).await
        }

        fn max_retries(&self) -> u32 {
            5
        }
    }

    fn fast_stub() -> StubAuthenticator {
        StubAuthenticator {
            delay: Duration::from_millis(5),
            ..StubAuthenticator::default()
        }
    }

    #[tokio::test]
    async fn stub_accepts_well_formed_credentials() {
        let session = authenticate_with_retry(&fast_stub(), &windows_user())
            .await
            .unwrap();
        assert_eq!(session.username, "PLANT\\operator");
        assert_eq!(session.mode, AuthMode::Windows);
    }

    #[tokio::test]
    async fn stub_rejects_incomplete_credentials_without_retrying() {
        let creds = Credentials::Sql {
            server: "SCADA01".to_string(),
            database: String::new(),
            username: "sa".to_string(),
            password: String::new(),
        };
        let err = authenticate_with_retry(&fast_stub(), &creds)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials { .. }));
        assert!(err.internal_details().contains("database"));
    }

    #[tokio::test]
    async fn invalid_credentials_are_not_retried() {
        let stub = AlwaysFailStub::new(AuthError::InvalidCredentials {
            internal_details: "login failed for user 'sa'".to_string(),
        });
        let err = authenticate_with_retry(&stub, &windows_user())
            .await
            .unwrap_err();

        assert_eq!(stub.call_count.load(Ordering::SeqCst), 1);
        assert!(!err.user_message().contains("'sa'"));
    }

    #[tokio::test]
    async fn transient_failures_are_retried_a_bounded_number_of_times() {
        let start = Instant::now();
        let stub = AlwaysFailStub::new(AuthError::Unavailable {
            internal_details: "connection refused".to_string(),
        });
        let err = authenticate_with_retry(&stub, &windows_user())
            .await
            .unwrap_err();

        assert!(start.elapsed() < Duration::from_secs(2));
        assert_eq!(stub.call_count.load(Ordering::SeqCst), 3);
        assert_eq!(err.internal_details(), "connection refused");
    }

    #[tokio::test]
    async fn hanging_provider_times_out_within_budget() {
        let start = Instant::now();
        let stub = HangingStub {
            call_count: AtomicU32::new(0),
        };
        let err = authenticate_with_retry(&stub, &windows_user())
            .await
            .unwrap_err();

        assert!(start.elapsed() < Duration::from_secs(3));
        assert!(matches!(err, AuthError::ConnectionTimeout { attempts: 1 }));
        assert!(err.user_message().contains("timed out"));
        assert_eq!(stub.call_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn recovers_after_transient_failures() {
        let stub = FlakyStub {
            failures: 2,
            call_count: AtomicU32::new(0),
            inner: fast_stub(),
        };
        let session = authenticate_with_retry(&stub, &windows_user()).await;
        assert!(session.is_ok());
        assert_eq!(stub.call_count.load(Ordering::SeqCst), 3);
    }
}
