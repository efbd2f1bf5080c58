//! `SeaORM` Entity for balances table.
//!
//! Derived cache of the recalculation engine's output, unique per
//! (facility, chemical) pair. Ground truth is always the transaction log.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "balances")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub facility_id: Uuid,
    pub chemical_id: Uuid,
    pub quantity: Decimal,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::facilities::Entity",
        from = "Column::FacilityId",
        to = "super::facilities::Column::Id"
    )]
    Facilities,
    #[sea_orm(
        belongs_to = "super::chemicals::Entity",
        from = "Column::ChemicalId",
        to = "super::chemicals::Column::Id"
    )]
    Chemicals,
}

impl Related<super::facilities::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Facilities.def()
    }
}

impl Related<super::chemicals::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Chemicals.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
