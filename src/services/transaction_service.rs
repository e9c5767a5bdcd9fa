use rust_decimal::Decimal;

use crate::{
    common::{error::AppError, pagination::Page, validation::parse_id},
    db::{
        AppointmentRepository, EmployeeRepository, NewTransaction, ServiceRepository,
        TransactionRepository, UserRepository,
    },
    models::{
        appointment::AppointmentStatus,
        employee::EmployeeKind,
        transaction::{ChargedService, PaymentMethod, Transaction, TransactionDetails},
    },
};

#[derive(Clone)]
pub struct TransactionService {
    transaction_repo: TransactionRepository,
    appointment_repo: AppointmentRepository,
    employee_repo: EmployeeRepository,
    user_repo: UserRepository,
    service_repo: ServiceRepository,
    pool: sqlx::PgPool,
}

impl TransactionService {
    pub fn new(
        transaction_repo: TransactionRepository,
        appointment_repo: AppointmentRepository,
        employee_repo: EmployeeRepository,
        user_repo: UserRepository,
        service_repo: ServiceRepository,
        pool: sqlx::PgPool,
    ) -> Self {
        Self {
            transaction_repo,
            appointment_repo,
            employee_repo,
            user_repo,
            service_repo,
            pool,
        }
    }

    // Registra o pagamento de um atendimento concluído. O valor é a soma
    // dos serviços ainda disponíveis no catálogo, congelada no snapshot.
    pub async fn create_transaction(
        &self,
        appointment_id: &str,
        cashier_user_id: &str,
        payment_method: PaymentMethod,
        note: Option<String>,
    ) -> Result<Transaction, AppError> {
        let appointment_id = parse_id(appointment_id, "appointment ID")?;
        let cashier_user_id = parse_id(cashier_user_id, "cashier ID")?;

        let appointment = self
            .appointment_repo
            .find_by_id(appointment_id)
            .await?
            .ok_or(AppError::NotFound("Appointment"))?;

        // Um pagamento por agendamento. Ponteiro pendurado (transação
        // apagada por fora) é limpo e o fluxo segue.
        if let Some(existing_id) = appointment.transaction_id {
            if self.transaction_repo.find_by_id(existing_id).await?.is_some() {
                return Err(AppError::Conflict(
                    "Transaction already exists for this appointment".to_string(),
                ));
            }
            let mut conn = self.pool.acquire().await?;
            self.appointment_repo
                .set_transaction(&mut *conn, appointment.id, None)
                .await?;
        }

        if appointment.status != AppointmentStatus::Completed {
            return Err(AppError::Validation(
                "Appointment is not completed yet".to_string(),
            ));
        }

        let cashier = self
            .employee_repo
            .find_by_user_and_kind(cashier_user_id, EmployeeKind::Cashier)
            .await?
            .ok_or(AppError::NotFound("Cashier"))?;

        let customer = self
            .user_repo
            .find_by_id(appointment.customer_id)
            .await?
            .ok_or(AppError::NotFound("Customer"))?;

        let services = self
            .service_repo
            .available_summaries(&appointment.service_ids)
            .await?;

        let amount: Decimal = services.iter().map(|s| s.price).sum();
        let details = TransactionDetails {
            customer_name: customer.username.clone(),
            services: services
                .iter()
                .map(|s| ChargedService {
                    name: s.name.clone(),
                    price: s.price,
                })
                .collect(),
        };

        let mut tx = self.pool.begin().await?;
        let transaction = self
            .transaction_repo
            .insert(
                &mut *tx,
                &NewTransaction {
                    appointment_id: appointment.id,
                    customer_id: customer.id,
                    cashier_id: cashier.id,
                    amount,
                    payment_method,
                    details,
                    note,
                },
            )
            .await?;
        self.appointment_repo
            .set_transaction(&mut *tx, appointment.id, Some(transaction.id))
            .await?;
        tx.commit().await?;

        Ok(transaction)
    }

    pub async fn get_transaction(&self, id: &str) -> Result<Transaction, AppError> {
        let id = parse_id(id, "transaction ID")?;
        self.transaction_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Transaction"))
    }

    pub async fn list_transactions(
        &self,
        page: i64,
        limit: i64,
    ) -> Result<Page<Transaction>, AppError> {
        let (items, total) = self
            .transaction_repo
            .list(limit, (page - 1) * limit)
            .await?;
        Ok(Page::new(items, total, page, limit))
    }

    pub async fn confirm_transaction(&self, id: &str) -> Result<Transaction, AppError> {
        let id = parse_id(id, "transaction ID")?;
        self.transaction_repo
            .confirm(id)
            .await?
            .ok_or(AppError::NotFound("Transaction"))
    }
}
