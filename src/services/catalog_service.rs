use rust_decimal::Decimal;

use crate::{
    common::{error::AppError, validation::parse_id},
    db::ServiceRepository,
    models::service::Service,
};

// CRUD do catálogo de serviços do salão.
#[derive(Clone)]
pub struct CatalogService {
    service_repo: ServiceRepository,
}

impl CatalogService {
    pub fn new(service_repo: ServiceRepository) -> Self {
        Self { service_repo }
    }

    pub async fn create_service(
        &self,
        name: &str,
        description: Option<&str>,
        price: Decimal,
        duration_minutes: i32,
    ) -> Result<Service, AppError> {
        if price < Decimal::ZERO {
            return Err(AppError::Validation(
                "Price must not be negative".to_string(),
            ));
        }
        if duration_minutes <= 0 {
            return Err(AppError::Validation(
                "Duration must be a positive number of minutes".to_string(),
            ));
        }
        self.service_repo
            .insert(name, description, price, duration_minutes)
            .await
    }

    pub async fn get_all_services(&self, only_available: bool) -> Result<Vec<Service>, AppError> {
        self.service_repo.list(only_available).await
    }

    pub async fn get_service_by_id(&self, id: &str) -> Result<Service, AppError> {
        let id = parse_id(id, "service ID")?;
        self.service_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Service"))
    }

    pub async fn update_service(
        &self,
        id: &str,
        name: Option<&str>,
        description: Option<&str>,
        price: Option<Decimal>,
        duration_minutes: Option<i32>,
        available: Option<bool>,
    ) -> Result<Service, AppError> {
        let id = parse_id(id, "service ID")?;
        if let Some(price) = price {
            if price < Decimal::ZERO {
                return Err(AppError::Validation(
                    "Price must not be negative".to_string(),
                ));
            }
        }
        if let Some(duration) = duration_minutes {
            if duration <= 0 {
                return Err(AppError::Validation(
                    "Duration must be a positive number of minutes".to_string(),
                ));
            }
        }
        self.service_repo
            .update(id, name, description, price, duration_minutes, available)
            .await?
            .ok_or(AppError::NotFound("Service"))
    }

    pub async fn delete_service(&self, id: &str) -> Result<(), AppError> {
        let id = parse_id(id, "service ID")?;
        let deleted = self.service_repo.delete(id).await?;
        if deleted == 0 {
            return Err(AppError::NotFound("Service"));
        }
        Ok(())
    }
}
