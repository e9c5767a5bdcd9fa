pub mod appointments;
pub mod auth;
pub mod branches;
pub mod employees;
pub mod reviews;
pub mod services;
pub mod transactions;
pub mod users;
