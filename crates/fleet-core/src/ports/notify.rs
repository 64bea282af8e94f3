use async_trait::async_trait;

/// Notification collaborator - delivers one-time codes to users.
///
/// OTP issuance blocks on this call; a hard failure rolls the freshly
/// stored code back so no undeliverable challenge stays live.
#[async_trait]
pub trait OtpMailer: Send + Sync {
    async fn send_code(&self, recipient: &str, code: u32) -> Result<(), NotifyError>;
}

/// Notification dispatch errors.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("Dispatch failed: {0}")]
    Dispatch(String),
}
