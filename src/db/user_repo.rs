use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::{common::error::AppError, models::auth::{Role, User}};

// Repositório de usuários, responsável pela tabela 'users'.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn create(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (username, email, password_hash) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            // Violação de chave única no e-mail vira 409.
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::Conflict("E-mail already registered".to_string());
                }
            }
            AppError::Database(e)
        })
    }

    // Atualização de perfil: só os campos "seguros". Senha e roles têm
    // caminhos próprios.
    pub async fn update_profile(
        &self,
        id: Uuid,
        username: Option<&str>,
        phone: Option<&str>,
    ) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"UPDATE users
               SET username = COALESCE($2, username),
                   phone = COALESCE($3, phone),
                   updated_at = now()
               WHERE id = $1
               RETURNING *"#,
        )
        .bind(id)
        .bind(username)
        .bind(phone)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    // Reescreve o cache de roles. Sempre chamado dentro da mesma transação
    // que mexe em employees, para o cache não descolar das linhas reais.
    pub async fn set_roles(
        &self,
        conn: &mut PgConnection,
        id: Uuid,
        roles: &[Role],
    ) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET roles = $2, updated_at = now() WHERE id = $1")
            .bind(id)
            .bind(roles.to_vec())
            .execute(conn)
            .await?;
        Ok(())
    }
}
