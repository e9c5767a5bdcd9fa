mod appointment_repo;
mod branch_repo;
mod employee_repo;
mod review_repo;
mod service_repo;
mod transaction_repo;
mod user_repo;

pub use appointment_repo::{AppointmentRepository, NewAppointment};
pub use branch_repo::BranchRepository;
pub use employee_repo::{EmployeeChanges, EmployeeFilter, EmployeeRepository, NewEmployee};
pub use review_repo::ReviewRepository;
pub use service_repo::ServiceRepository;
pub use transaction_repo::{NewTransaction, TransactionRepository};
pub use user_repo::UserRepository;
