use sqlx::{PgPool, postgres::PgPoolOptions};
use std::{env, time::Duration};

use crate::{
    db::{
        AppointmentRepository, BranchRepository, EmployeeRepository, ReviewRepository,
        ServiceRepository, TransactionRepository, UserRepository,
    },
    services::{
        appointment_service::AppointmentService, auth::AuthService, branch_service::BranchService,
        catalog_service::CatalogService, employee_service::EmployeeService,
        review_service::ReviewService, transaction_service::TransactionService,
        user_service::UserService,
    },
};

// O estado compartilhado, acessível em toda a aplicação.
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub jwt_secret: String,
    pub auth_service: AuthService,
    pub user_service: UserService,
    pub employee_service: EmployeeService,
    pub appointment_service: AppointmentService,
    pub review_service: ReviewService,
    pub branch_service: BranchService,
    pub catalog_service: CatalogService,
    pub transaction_service: TransactionService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");

        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let employee_repo = EmployeeRepository::new(db_pool.clone());
        let appointment_repo = AppointmentRepository::new(db_pool.clone());
        let review_repo = ReviewRepository::new(db_pool.clone());
        let branch_repo = BranchRepository::new(db_pool.clone());
        let service_repo = ServiceRepository::new(db_pool.clone());
        let transaction_repo = TransactionRepository::new(db_pool.clone());

        let auth_service = AuthService::new(user_repo.clone(), jwt_secret.clone());
        let user_service = UserService::new(user_repo.clone());
        let employee_service = EmployeeService::new(
            employee_repo.clone(),
            user_repo.clone(),
            db_pool.clone(),
        );
        let appointment_service = AppointmentService::new(
            appointment_repo.clone(),
            employee_repo.clone(),
            user_repo.clone(),
            service_repo.clone(),
            review_repo.clone(),
            db_pool.clone(),
        );
        let review_service = ReviewService::new(review_repo.clone(), appointment_repo.clone());
        let branch_service = BranchService::new(branch_repo);
        let catalog_service = CatalogService::new(service_repo.clone());
        let transaction_service = TransactionService::new(
            transaction_repo,
            appointment_repo,
            employee_repo,
            user_repo,
            service_repo,
            db_pool.clone(),
        );

        Ok(Self {
            db_pool,
            jwt_secret,
            auth_service,
            user_service,
            employee_service,
            appointment_service,
            review_service,
            branch_service,
            catalog_service,
            transaction_service,
        })
    }
}
