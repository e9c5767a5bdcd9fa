use uuid::Uuid;

use crate::{
    common::{error::AppError, pagination::Page, validation::parse_id},
    db::{AppointmentRepository, ReviewRepository},
    models::{
        appointment::AppointmentStatus,
        review::{Review, ReviewDetails, ReviewTarget},
    },
};

#[derive(Clone)]
pub struct ReviewService {
    review_repo: ReviewRepository,
    appointment_repo: AppointmentRepository,
}

impl ReviewService {
    pub fn new(review_repo: ReviewRepository, appointment_repo: AppointmentRepository) -> Self {
        Self {
            review_repo,
            appointment_repo,
        }
    }

    // Avaliação só para atendimento concluído, só pelo próprio cliente e
    // só uma por (cliente, agendamento).
    pub async fn submit_review(
        &self,
        customer_id: Uuid,
        appointment_id: &str,
        rating: i16,
        comment: Option<&str>,
    ) -> Result<Review, AppError> {
        let appointment_id = parse_id(appointment_id, "appointment ID")?;

        if !(1..=5).contains(&rating) {
            return Err(AppError::Validation(
                "Rating must be an integer between 1 and 5".to_string(),
            ));
        }

        let appointment = self
            .appointment_repo
            .find_by_id(appointment_id)
            .await?
            .ok_or(AppError::NotFound("Appointment"))?;

        if appointment.status != AppointmentStatus::Completed {
            return Err(AppError::Validation(
                "Only completed appointments can be reviewed".to_string(),
            ));
        }

        if appointment.customer_id != customer_id {
            return Err(AppError::Forbidden(
                "You can only review your own appointments".to_string(),
            ));
        }

        if self.review_repo.exists(customer_id, appointment_id).await? {
            return Err(AppError::Conflict(
                "You have already reviewed this appointment".to_string(),
            ));
        }

        self.review_repo
            .insert(customer_id, appointment_id, rating, comment)
            .await
    }

    pub async fn get_reviews_by(
        &self,
        target: &str,
        id: &str,
        page: i64,
        limit: i64,
    ) -> Result<Page<ReviewDetails>, AppError> {
        let target = ReviewTarget::parse(target)
            .ok_or_else(|| AppError::Validation("Invalid review target".to_string()))?;
        let id = parse_id(id, "target ID")?;
        let offset = (page - 1) * limit;

        let (items, total) = match target {
            ReviewTarget::Appointment => {
                self.review_repo.list_by_appointment(id, limit, offset).await?
            }
            ReviewTarget::Customer => {
                self.review_repo.list_by_customer(id, limit, offset).await?
            }
        };

        Ok(Page::new(items, total, page, limit))
    }

    pub async fn get_recent_reviews(
        &self,
        page: i64,
        limit: i64,
    ) -> Result<Page<ReviewDetails>, AppError> {
        let (items, total) = self
            .review_repo
            .list_recent(limit, (page - 1) * limit)
            .await?;
        Ok(Page::new(items, total, page, limit))
    }

    pub async fn delete_review(&self, review_id: &str) -> Result<(), AppError> {
        let review_id = parse_id(review_id, "review ID")?;
        let deleted = self.review_repo.delete(review_id).await?;
        if deleted == 0 {
            return Err(AppError::NotFound("Review"));
        }
        Ok(())
    }
}
