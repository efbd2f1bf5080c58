//! `SeaORM` entity definitions.

pub mod balances;
pub mod chemicals;
pub mod facilities;
pub mod sea_orm_active_enums;
pub mod transactions;
pub mod users;
