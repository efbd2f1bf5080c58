//! `SeaORM` Entity for transactions table.
//!
//! One persisted ledger row: one chemical, one positive quantity, one
//! direction. Rows sharing an `operation_uuid` form one logical operation
//! and are only ever created or deleted together.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::TransactionType;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub operation_uuid: Uuid,
    pub transaction_type: TransactionType,
    pub chemical_id: Uuid,
    pub quantity: Decimal,
    pub from_facility_id: Option<Uuid>,
    pub to_facility_id: Option<Uuid>,
    pub performed_by: Option<Uuid>,
    /// Logical effective time, caller-supplied.
    pub operation_date: DateTimeWithTimeZone,
    /// Record creation time, system-assigned, immutable.
    pub timestamp: DateTimeWithTimeZone,
    pub document_name: Option<String>,
    pub document_file: Option<String>,
    pub comment: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::chemicals::Entity",
        from = "Column::ChemicalId",
        to = "super::chemicals::Column::Id"
    )]
    Chemicals,
    #[sea_orm(
        belongs_to = "super::facilities::Entity",
        from = "Column::FromFacilityId",
        to = "super::facilities::Column::Id"
    )]
    FromFacility,
    #[sea_orm(
        belongs_to = "super::facilities::Entity",
        from = "Column::ToFacilityId",
        to = "super::facilities::Column::Id"
    )]
    ToFacility,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::PerformedBy",
        to = "super::users::Column::Id"
    )]
    Users,
}

impl Related<super::chemicals::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Chemicals.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
