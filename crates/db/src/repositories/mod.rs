//! Repository layer: all database access goes through these types.

pub mod balance;
pub mod chemical;
pub mod facility;
pub mod operation;
pub mod report;
pub mod transaction;
pub mod user;

pub use balance::BalanceRepository;
pub use chemical::ChemicalRepository;
pub use facility::FacilityRepository;
pub use operation::OperationRepository;
pub use report::ReportRepository;
pub use transaction::TransactionRepository;
pub use user::UserRepository;
