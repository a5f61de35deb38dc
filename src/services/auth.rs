//! Authentication service: registration, sign-in and sign-out

use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use validator::Validate;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::{
        document::{to_document_data, CollectionQuery, Direction},
        user::{
            Credential, LoginRequest, LoginResponse, RegisterUser, Role, SessionClaims, User,
            CREDENTIALS, USERS,
        },
    },
    repository::{new_id, SharedStore},
    session::{EndReason, Session, SessionManager},
};

use super::settings::SettingsService;

const INVALID_CREDENTIALS: &str = "Invalid email or password.";
const ADMIN_KEY_TOO_SHORT: &str = "Admin Key must be at least 4 characters long.";

#[derive(Clone)]
pub struct AuthService {
    store: SharedStore,
    settings: SettingsService,
    sessions: SessionManager,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(
        store: SharedStore,
        settings: SettingsService,
        sessions: SessionManager,
        config: AuthConfig,
    ) -> Self {
        Self {
            store,
            settings,
            sessions,
            config,
        }
    }

    /// Create an account and sign it in.
    ///
    /// The very first account becomes Admin and sets the shared admin key;
    /// every later account is a plain User.
    pub async fn register(&self, request: RegisterUser) -> AppResult<LoginResponse> {
        request.validate()?;

        let email = request.email.trim().to_string();
        if self.find_credential(&email).await?.is_some() {
            return Err(AppError::Conflict(
                "An account with this email already exists.".to_string(),
            ));
        }

        let is_first = self
            .store
            .list(&CollectionQuery::new(USERS, "name", Direction::Asc))
            .await?
            .is_empty();

        let role = if is_first {
            let key = request.admin_key.as_deref().unwrap_or_default().trim();
            if key.chars().count() < 4 {
                return Err(AppError::Validation(ADMIN_KEY_TOO_SHORT.to_string()));
            }
            self.settings.store_admin_key(key).await?;
            Role::Admin
        } else {
            Role::User
        };

        let uid = new_id();
        let credential = Credential {
            id: uid.clone(),
            email: email.clone(),
            password_hash: hash_password(&request.password)?,
        };
        self.store
            .set(CREDENTIALS, &uid, to_document_data(&credential)?)
            .await?;

        let user = User {
            id: uid.clone(),
            name: request.name.trim().to_string(),
            email,
            role,
            avatar: User::avatar_for(request.name.trim()),
        };
        self.store.set(USERS, &uid, to_document_data(&user)?).await?;
        tracing::info!(user = %user.email, role = %user.role, "Account registered");

        self.sign_in(user).await
    }

    /// Verify the password, load the profile and open a session
    pub async fn login(&self, request: LoginRequest) -> AppResult<LoginResponse> {
        let credential = self
            .find_credential(request.email.trim())
            .await?
            .ok_or_else(|| AppError::Authentication(INVALID_CREDENTIALS.to_string()))?;

        if !verify_password(&credential.password_hash, &request.password)? {
            tracing::warn!(email = %request.email, "Failed sign-in");
            return Err(AppError::Authentication(INVALID_CREDENTIALS.to_string()));
        }

        let user: User = match self.store.get(USERS, &credential.id).await? {
            Some(document) => document.to_entity()?,
            None => {
                tracing::warn!(uid = %credential.id, "Credential without user profile");
                return Err(AppError::Authentication(
                    EndReason::ProfileMissing.message().to_string(),
                ));
            }
        };

        self.sign_in(user).await
    }

    pub async fn logout(&self, session: &Session) -> AppResult<()> {
        self.sessions.end(&session.id, EndReason::SignedOut).await
    }

    /// Resolve a bearer token to its live session
    pub async fn authenticate(&self, token: &str) -> AppResult<Arc<Session>> {
        let claims = SessionClaims::from_token(token, &self.config.jwt_secret)?;
        let session = self.sessions.get(&claims.sid).await?;
        if session.user.id != claims.sub {
            return Err(AppError::Authentication("Token does not match session".to_string()));
        }
        Ok(session)
    }

    async fn sign_in(&self, user: User) -> AppResult<LoginResponse> {
        let session = self.sessions.open(user).await;

        let now = Utc::now().timestamp();
        let expires_in = (self.config.jwt_expiration_hours * 3600) as i64;
        let claims = SessionClaims {
            sub: session.user.id.clone(),
            sid: session.id.clone(),
            role: session.user.role,
            exp: now + expires_in,
            iat: now,
        };
        let token = claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))?;

        Ok(LoginResponse {
            token,
            token_type: "Bearer".to_string(),
            expires_in,
            session_id: session.id.clone(),
            user: session.user.clone(),
        })
    }

    /// Credentials are matched on email, case-insensitively
    async fn find_credential(&self, email: &str) -> AppResult<Option<Credential>> {
        let wanted = email.to_lowercase();
        let documents = self
            .store
            .list(&CollectionQuery::new(CREDENTIALS, "email", Direction::Asc))
            .await?;
        for document in documents {
            let matches = document
                .str_field("email")
                .map(|e| e.to_lowercase() == wanted)
                .unwrap_or(false);
            if matches {
                return Ok(Some(document.to_entity()?));
            }
        }
        Ok(None)
    }
}

/// Hash a password using Argon2
fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

fn verify_password(hash: &str, password: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(format!("Invalid password hash: {}", e)))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
