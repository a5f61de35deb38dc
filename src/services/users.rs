//! User profile management

use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        document::{to_document_data, Document},
        log_entry::ActionType,
        user::{UpdateUser, User, USERS},
    },
    repository::SharedStore,
    session::Session,
};

use super::{delete_entity, update_entity};

const ENTITY: &str = "User";

#[derive(Clone)]
pub struct UsersService {
    store: SharedStore,
}

impl UsersService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    pub async fn list(&self, session: &Session) -> Vec<User> {
        session.mirror().list(USERS).await
    }

    pub async fn get(&self, session: &Session, id: &str) -> AppResult<User> {
        session.mirror().get(USERS, id).await
    }

    /// Update a profile (admin only)
    pub async fn update(&self, session: &Session, id: &str, request: UpdateUser) -> AppResult<User> {
        session.require_admin()?;
        session
            .perform(
                ActionType::Update,
                ENTITY,
                async {
                    request.validate()?;
                    let mut data = to_document_data(&request)?;
                    if request.avatar.is_none() {
                        data.remove("avatar");
                    }
                    update_entity(&self.store, USERS, id, data).await
                },
                |u: &User| format!("Updated user {} ({})", u.name, u.email),
            )
            .await
    }

    /// Delete a profile. The sign-in credential is kept, so the account can
    /// still authenticate but is refused for lack of a profile.
    pub async fn delete(&self, session: &Session, id: &str) -> AppResult<()> {
        session.require_admin()?;
        session
            .perform(
                ActionType::Delete,
                ENTITY,
                delete_entity(&self.store, USERS, id),
                |removed: &Document| {
                    format!("Deleted user {}", removed.str_field("name").unwrap_or(id))
                },
            )
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::AppError,
        models::user::{LoginRequest, RegisterUser, Role},
        services::tests::{admin_session, fixture, settle},
        session::EndReason,
    };

    #[tokio::test]
    async fn test_admin_promotes_user() {
        let (services, _) = fixture().await;
        let admin = admin_session(&services).await;
        let staff = services
            .auth
            .register(RegisterUser {
                name: "Sam".into(),
                email: "sam@example.com".into(),
                password: "pass1234".into(),
                admin_key: None,
            })
            .await
            .unwrap();
        let staff_session = services.sessions.get(&staff.session_id).await.unwrap();

        let request = UpdateUser {
            name: "Sam".into(),
            email: "sam@example.com".into(),
            role: Role::Admin,
            avatar: None,
        };
        assert!(matches!(
            services.users.update(&staff_session, &staff.user.id, request.clone()).await,
            Err(AppError::Authorization(_))
        ));

        let promoted = services.users.update(&admin, &staff.user.id, request).await.unwrap();
        assert_eq!(promoted.role, Role::Admin);
        assert_eq!(promoted.avatar, staff.user.avatar);

        settle(admin.mirror(), USERS, |docs| docs.len() == 2).await;
        assert_eq!(services.users.list(&admin).await[0].name, "Ada Admin");
    }

    #[tokio::test]
    async fn test_deleted_profile_cannot_sign_in() {
        let (services, _) = fixture().await;
        let admin = admin_session(&services).await;
        let staff = services
            .auth
            .register(RegisterUser {
                name: "Sam".into(),
                email: "sam@example.com".into(),
                password: "pass1234".into(),
                admin_key: None,
            })
            .await
            .unwrap();

        services.users.delete(&admin, &staff.user.id).await.unwrap();
        let err = services
            .auth
            .login(LoginRequest {
                email: "sam@example.com".into(),
                password: "pass1234".into(),
            })
            .await
            .unwrap_err();
        assert!(
            matches!(err, AppError::Authentication(msg) if msg == EndReason::ProfileMissing.message())
        );
    }
}
