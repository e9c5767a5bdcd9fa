use axum::{
    Router,
    middleware as axum_middleware,
    routing::{get, patch, post},
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).compact().init();

    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização.
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Rotas públicas de autenticação
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login));

    // Perfil do usuário autenticado
    let user_routes = Router::new()
        .route(
            "/me",
            get(handlers::auth::get_me).patch(handlers::users::update_me),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let appointment_routes = Router::new()
        .route("/", post(handlers::appointments::create_appointment))
        .route("/force", post(handlers::appointments::force_create_appointment))
        .route("/me", get(handlers::appointments::get_my_appointments))
        .route(
            "/{appointmentId}",
            get(handlers::appointments::get_appointment)
                .delete(handlers::appointments::delete_appointment),
        )
        .route(
            "/{appointmentId}/cancel",
            patch(handlers::appointments::cancel_appointment),
        )
        .route(
            "/{appointmentId}/approve",
            patch(handlers::appointments::approve_appointment),
        )
        .route(
            "/{appointmentId}/complete",
            patch(handlers::appointments::complete_appointment),
        )
        .route(
            "/{appointmentId}/status",
            patch(handlers::appointments::change_appointment_status),
        )
        .route(
            "/{appointmentId}/services",
            patch(handlers::appointments::update_appointment_services),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let review_routes = Router::new()
        .route("/recent", get(handlers::reviews::get_recent_reviews))
        .route(
            "/{id}",
            post(handlers::reviews::submit_review).delete(handlers::reviews::delete_review),
        )
        .route("/{target}/{id}", get(handlers::reviews::get_reviews_by))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let employee_routes = Router::new()
        .route(
            "/",
            get(handlers::employees::list_all_employees)
                .post(handlers::employees::add_employee),
        )
        .route(
            "/switch-role",
            patch(handlers::employees::switch_employee_role),
        )
        .route(
            "/{kind}",
            get(handlers::employees::list_employees_by_kind)
                .post(handlers::employees::create_employee),
        )
        .route(
            "/{kind}/{userId}",
            get(handlers::employees::get_employee)
                .patch(handlers::employees::update_employee)
                .delete(handlers::employees::remove_employee),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let branch_routes = Router::new()
        .route(
            "/",
            post(handlers::branches::create_branch).get(handlers::branches::get_all_branches),
        )
        .route(
            "/{branchId}",
            get(handlers::branches::get_branch)
                .patch(handlers::branches::update_branch)
                .delete(handlers::branches::delete_branch),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let service_routes = Router::new()
        .route(
            "/",
            post(handlers::services::create_service).get(handlers::services::get_all_services),
        )
        .route(
            "/{serviceId}",
            get(handlers::services::get_service)
                .patch(handlers::services::update_service)
                .delete(handlers::services::delete_service),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let transaction_routes = Router::new()
        .route(
            "/",
            post(handlers::transactions::create_transaction)
                .get(handlers::transactions::list_transactions),
        )
        .route(
            "/{transactionId}",
            get(handlers::transactions::get_transaction),
        )
        .route(
            "/{transactionId}/confirm",
            patch(handlers::transactions::confirm_transaction),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Combina tudo no router principal
    let app = Router::new()
        .merge(
            SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", docs::ApiDoc::openapi()),
        )
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api/users", user_routes)
        .nest("/api/appointments", appointment_routes)
        .nest("/api/reviews", review_routes)
        .nest("/api/employees", employee_routes)
        .nest("/api/branches", branch_routes)
        .nest("/api/services", service_routes)
        .nest("/api/transactions", transaction_routes)
        .with_state(app_state);

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("0.0.0.0:{port}");
    let listener = TcpListener::bind(&addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app).await.expect("Erro no servidor Axum");
}
