use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::{User, UserProfile},
};

#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
}

impl UserService {
    pub fn new(user_repo: UserRepository) -> Self {
        Self { user_repo }
    }

    // Só campos "seguros"; senha e roles nunca passam por aqui.
    pub async fn update_user(
        &self,
        id: Uuid,
        username: Option<&str>,
        phone: Option<&str>,
    ) -> Result<UserProfile, AppError> {
        let user: User = self
            .user_repo
            .update_profile(id, username, phone)
            .await?
            .ok_or(AppError::NotFound("User"))?;
        Ok(UserProfile::from(&user))
    }
}
