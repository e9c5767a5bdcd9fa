pub mod appointment_service;
pub mod auth;
pub mod branch_service;
pub mod catalog_service;
pub mod employee_service;
pub mod review_service;
pub mod transaction_service;
pub mod user_service;
