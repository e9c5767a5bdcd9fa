use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::{Claims, User, UserProfile},
};

const TOKEN_TTL_HOURS: i64 = 12;

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    jwt_secret: String,
}

impl AuthService {
    pub fn new(user_repo: UserRepository, jwt_secret: String) -> Self {
        Self {
            user_repo,
            jwt_secret,
        }
    }

    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<UserProfile, AppError> {
        if self.user_repo.find_by_email(email).await?.is_some() {
            return Err(AppError::Conflict("E-mail already registered".to_string()));
        }

        // O hashing é pesado; sai da thread do runtime.
        let password_owned = password.to_owned();
        let password_hash =
            tokio::task::spawn_blocking(move || hash(&password_owned, bcrypt::DEFAULT_COST))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {e}"))??;

        let user = self.user_repo.create(username, email, &password_hash).await?;
        Ok(UserProfile::from(&user))
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<String, AppError> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_owned = password.to_owned();
        let hash_owned = user.password_hash.clone();
        let matches =
            tokio::task::spawn_blocking(move || verify(&password_owned, &hash_owned))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de verificação: {e}"))??;

        if !matches {
            return Err(AppError::InvalidCredentials);
        }

        self.issue_token(&user)
    }

    pub async fn me(&self, user_id: Uuid) -> Result<UserProfile, AppError> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::NotFound("User"))?;
        Ok(UserProfile::from(&user))
    }

    // O token carrega o conjunto de roles do momento do login; a camada de
    // autorização reconsulta o usuário a cada requisição de todo modo.
    pub fn issue_token(&self, user: &User) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id,
            roles: user.roles.clone(),
            iat: now.timestamp() as usize,
            exp: (now + chrono::Duration::hours(TOKEN_TTL_HOURS)).timestamp() as usize,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )?;
        Ok(token)
    }

    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::TokenExpired,
            _ => AppError::InvalidToken,
        })?;

        self.user_repo
            .find_by_id(data.claims.sub)
            .await?
            .ok_or(AppError::NotFound("User"))
    }
}
