use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Ordem total de privilégio, definida uma única vez: a posição na
// declaração É o rank (user < stylist < cashier < staff < admin).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type,
    ToSchema,
)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Stylist,
    Cashier,
    Staff,
    Admin,
}

// Rank mais alto do conjunto; quem não tem nenhum role é tratado como user.
pub fn highest_role(roles: &[Role]) -> Role {
    roles.iter().copied().max().unwrap_or(Role::User)
}

// Representa um usuário vindo do banco de dados.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub phone: Option<String>,

    #[serde(skip_serializing)] // nunca sai na API
    pub password_hash: String,

    pub roles: Vec<Role>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        roles.iter().any(|r| self.has_role(*r))
    }
}

// Dados para registro de um novo usuário.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserPayload {
    #[validate(length(min = 2, message = "username must have at least 2 characters"))]
    #[schema(example = "maria.silva")]
    pub username: String,

    #[validate(email(message = "invalid_email"))]
    #[schema(example = "maria@email.com")]
    pub email: String,

    #[validate(length(min = 6, message = "password must have at least 6 characters"))]
    pub password: String,
}

// Dados para login.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginUserPayload {
    #[validate(email(message = "invalid_email"))]
    pub email: String,

    #[validate(length(min = 6, message = "password must have at least 6 characters"))]
    pub password: String,
}

// Resposta de autenticação com o token.
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
}

// Estrutura de dados ("claims") dentro do JWT.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,        // ID do usuário
    pub roles: Vec<Role>, // conjunto de roles no momento do login
    pub iat: usize,
    pub exp: usize,
}

// Perfil público devolvido por GET /users/me.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub phone: Option<String>,
    pub roles: Vec<Role>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            roles: user.roles.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_order_matches_privilege_ranking() {
        assert!(Role::User < Role::Stylist);
        assert!(Role::Stylist < Role::Cashier);
        assert!(Role::Cashier < Role::Staff);
        assert!(Role::Staff < Role::Admin);
    }

    #[test]
    fn highest_role_picks_the_max_rank() {
        assert_eq!(
            highest_role(&[Role::User, Role::Staff, Role::Stylist]),
            Role::Staff
        );
        assert_eq!(highest_role(&[Role::Admin, Role::User]), Role::Admin);
        assert_eq!(highest_role(&[]), Role::User);
    }

    #[test]
    fn role_serializes_as_lowercase_token() {
        assert_eq!(serde_json::to_value(Role::Staff).unwrap(), "staff");
        let parsed: Role = serde_json::from_value(serde_json::json!("admin")).unwrap();
        assert_eq!(parsed, Role::Admin);
        assert!(serde_json::from_value::<Role>(serde_json::json!("barber")).is_err());
    }
}
