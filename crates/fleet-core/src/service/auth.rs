//! Authentication engine: registration, the two-step OTP login, and the
//! password-gated role toggle.

use std::sync::Arc;

use chrono::TimeDelta;
use rand::Rng;
use uuid::Uuid;

use crate::domain::{OtpRecord, User};
use crate::error::DomainError;
use crate::ports::{Clock, OtpMailer, OtpRepository, PasswordService, TokenService, UserRepository};

/// Minutes a freshly issued code stays valid.
const OTP_TTL_MINUTES: i64 = 5;

/// Registration input, raw password included. Never logged.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub name: String,
    pub location: Option<String>,
    pub phone: String,
}

pub struct AuthService {
    users: Arc<dyn UserRepository>,
    otps: Arc<dyn OtpRepository>,
    passwords: Arc<dyn PasswordService>,
    tokens: Arc<dyn TokenService>,
    mailer: Arc<dyn OtpMailer>,
    clock: Arc<dyn Clock>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        otps: Arc<dyn OtpRepository>,
        passwords: Arc<dyn PasswordService>,
        tokens: Arc<dyn TokenService>,
        mailer: Arc<dyn OtpMailer>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            otps,
            passwords,
            tokens,
            mailer,
            clock,
        }
    }

    /// Register a new account. The password is stored only as an argon2
    /// hash; duplicate email or phone fails with `Conflict`.
    pub async fn register(&self, new_user: NewUser) -> Result<User, DomainError> {
        if self.users.find_by_email(&new_user.email).await?.is_some() {
            return Err(DomainError::Conflict("email".to_string()));
        }
        if self.users.find_by_phone(&new_user.phone).await?.is_some() {
            return Err(DomainError::Conflict("phone".to_string()));
        }

        let password_hash = self
            .passwords
            .hash(&new_user.password)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        let user = User::new(
            new_user.email,
            password_hash,
            new_user.name,
            new_user.location,
            new_user.phone,
        );

        let saved = self.users.save(user).await?;
        tracing::info!(user_id = %saved.id, "user registered");
        Ok(saved)
    }

    /// First login step: check the password, then issue and dispatch a
    /// fresh one-time code.
    ///
    /// Unknown email and wrong password surface identically as
    /// `InvalidCredentials`. A prior unexpired code is superseded before
    /// the new one is stored. When dispatch fails the stored code is
    /// rolled back and `NotificationFailed` returned, so no code the user
    /// never received stays live.
    pub async fn initiate_login(&self, email: &str, password: &str) -> Result<(), DomainError> {
        let user = self.verify_password(email, password).await?;

        let code = generate_code();
        let expires_at = self.clock.now() + TimeDelta::minutes(OTP_TTL_MINUTES);
        self.otps
            .replace_for_user(OtpRecord::new(user.id, code, expires_at))
            .await?;

        if let Err(e) = self.mailer.send_code(&user.email, code).await {
            tracing::warn!(user_id = %user.id, error = %e, "otp dispatch failed, rolling back");
            self.otps.delete_for_user(user.id).await?;
            return Err(DomainError::NotificationFailed(e.to_string()));
        }

        tracing::debug!(user_id = %user.id, "otp challenge issued");
        Ok(())
    }

    /// Second login step: verify the submitted code and mint a session
    /// token.
    ///
    /// Expiry is checked before code equality, so an expired-but-correct
    /// code reports `OtpExpired`. A mismatched code does not consume the
    /// challenge; consumption happens only on success and is atomic, so a
    /// replayed code finds the record gone.
    pub async fn complete_login(&self, email: &str, code: u32) -> Result<String, DomainError> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(DomainError::NotFound("user"))?;

        let challenge = self
            .otps
            .find_by_user(user.id)
            .await?
            .ok_or(DomainError::NotFound("login challenge"))?;

        if challenge.is_expired(self.clock.now()) {
            return Err(DomainError::OtpExpired);
        }
        if challenge.code != code {
            return Err(DomainError::OtpMismatch);
        }

        // Single-use: lose the race and the record is already gone.
        self.otps
            .take_matching(user.id, code)
            .await?
            .ok_or(DomainError::NotFound("login challenge"))?;

        let token = self
            .tokens
            .generate_token(user.id, user.role, &user.name)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        tracing::info!(user_id = %user.id, "login completed");
        Ok(token)
    }

    /// Flip the account between user and host.
    ///
    /// Re-validates the password even for an authenticated caller, so a
    /// stolen unexpired token alone cannot change the role. Admin
    /// accounts are outside the toggle pair and refuse with `Forbidden`.
    pub async fn toggle_role(&self, email: &str, password: &str) -> Result<String, DomainError> {
        let mut user = self.verify_password(email, password).await?;

        user.role = user.role.toggled().ok_or(DomainError::Forbidden)?;
        user.updated_at = self.clock.now();
        let user = self.users.save(user).await?;

        let token = self
            .tokens
            .generate_token(user.id, user.role, &user.name)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        tracing::info!(user_id = %user.id, role = user.role.as_str(), "role toggled");
        Ok(token)
    }

    pub async fn get_user(&self, id: Uuid) -> Result<User, DomainError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or(DomainError::NotFound("user"))
    }

    pub async fn list_users(&self) -> Result<Vec<User>, DomainError> {
        Ok(self.users.list_all().await?)
    }

    async fn verify_password(&self, email: &str, password: &str) -> Result<User, DomainError> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(DomainError::InvalidCredentials)?;

        let valid = self
            .passwords
            .verify(password, &user.password_hash)
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        if !valid {
            return Err(DomainError::InvalidCredentials);
        }
        Ok(user)
    }
}

/// Uniform random draw over the six-digit range.
fn generate_code() -> u32 {
    rand::thread_rng().gen_range(100_000..=999_999)
}
