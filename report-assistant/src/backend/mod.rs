// Backend contracts (session provider, reporting service) and their stub implementations.

pub mod auth;
pub mod reporting;
pub mod smoke;

pub use auth::{authenticate_with_retry, AuthError, Authenticator, StubAuthenticator};
pub use reporting::{submit_with_timeout, GenerationError, ReportBackend, StubReportBackend};
