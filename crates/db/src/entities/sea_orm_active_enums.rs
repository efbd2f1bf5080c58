//! Database enum mappings.
//!
//! Postgres enum types with conversions to and from the plain domain enums
//! used by `chemstock-core` and `chemstock-shared`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use chemstock_core::inventory::TransactionType as CoreTransactionType;
use chemstock_shared::types::Role;

/// Facility classification.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "facility_type")]
#[serde(rename_all = "lowercase")]
pub enum FacilityType {
    /// Storage warehouse.
    #[sea_orm(string_value = "warehouse")]
    Warehouse,
    /// Production well.
    #[sea_orm(string_value = "well")]
    Well,
    /// Anything else.
    #[sea_orm(string_value = "other")]
    Other,
}

/// Ledger transaction type.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "transaction_type")]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Incoming stock.
    #[sea_orm(string_value = "add")]
    Add,
    /// Stock written off.
    #[sea_orm(string_value = "consume")]
    Consume,
    /// Stock moved between facilities.
    #[sea_orm(string_value = "transfer")]
    Transfer,
}

impl From<CoreTransactionType> for TransactionType {
    fn from(value: CoreTransactionType) -> Self {
        match value {
            CoreTransactionType::Add => Self::Add,
            CoreTransactionType::Consume => Self::Consume,
            CoreTransactionType::Transfer => Self::Transfer,
        }
    }
}

impl From<TransactionType> for CoreTransactionType {
    fn from(value: TransactionType) -> Self {
        match value {
            TransactionType::Add => Self::Add,
            TransactionType::Consume => Self::Consume,
            TransactionType::Transfer => Self::Transfer,
        }
    }
}

/// User role.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "user_role")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Full access.
    #[sea_orm(string_value = "admin")]
    Admin,
    /// Field engineer tied to one facility.
    #[sea_orm(string_value = "engineer")]
    Engineer,
    /// Warehouse logistician.
    #[sea_orm(string_value = "logistician")]
    Logistician,
}

impl From<Role> for UserRole {
    fn from(value: Role) -> Self {
        match value {
            Role::Admin => Self::Admin,
            Role::Engineer => Self::Engineer,
            Role::Logistician => Self::Logistician,
        }
    }
}

impl From<UserRole> for Role {
    fn from(value: UserRole) -> Self {
        match value {
            UserRole::Admin => Self::Admin,
            UserRole::Engineer => Self::Engineer,
            UserRole::Logistician => Self::Logistician,
        }
    }
}
