//! OTP mailer implementations.
//!
//! Real delivery (SMTP, a transactional provider) sits outside this
//! system; the development adapter writes the code to the log stream
//! instead, and tests swap in a failing mailer to exercise the rollback
//! path.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use async_trait::async_trait;

use fleet_core::ports::{NotifyError, OtpMailer};

/// Development mailer - emits the code via `tracing` instead of email.
pub struct TracingOtpMailer;

#[async_trait]
impl OtpMailer for TracingOtpMailer {
    async fn send_code(&self, recipient: &str, code: u32) -> Result<(), NotifyError> {
        tracing::info!(recipient = %recipient, code, "login code issued");
        Ok(())
    }
}

/// Test mailer: captures the last delivered code and can be told to fail
/// the next dispatch.
pub struct CapturingOtpMailer {
    fail_next: AtomicBool,
    last_code: AtomicU32,
}

impl CapturingOtpMailer {
    pub fn new() -> Self {
        Self {
            fail_next: AtomicBool::new(false),
            last_code: AtomicU32::new(0),
        }
    }

    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    /// Last code that was successfully "delivered"; 0 when none was.
    pub fn last_code(&self) -> u32 {
        self.last_code.load(Ordering::SeqCst)
    }
}

impl Default for CapturingOtpMailer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OtpMailer for CapturingOtpMailer {
    async fn send_code(&self, _recipient: &str, code: u32) -> Result<(), NotifyError> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(NotifyError::Dispatch("smtp connection refused".to_string()));
        }
        self.last_code.store(code, Ordering::SeqCst);
        Ok(())
    }
}
