//! Facility repository for storage-location reference data.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::{balances, facilities, sea_orm_active_enums::FacilityType};

/// Error types for facility operations.
#[derive(Debug, thiserror::Error)]
pub enum FacilityError {
    /// Facility not found.
    #[error("Facility not found: {0}")]
    NotFound(Uuid),

    /// Facility still holds non-zero stock of at least one chemical.
    #[error("Facility {0} still has stock and cannot be deleted")]
    HasStock(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl FacilityError {
    /// Machine-readable error code for the API envelope.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::HasStock(_) => "INVALID_OPERATION",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// HTTP status code matching the error code.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::HasStock(_) => 400,
            Self::Database(_) => 500,
        }
    }
}

/// Input for creating or updating a facility.
#[derive(Debug, Clone)]
pub struct FacilityInput {
    /// Display name.
    pub name: String,
    /// Kind of storage location.
    pub facility_type: FacilityType,
    /// Optional free-form location description.
    pub location: Option<String>,
}

/// Facility repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct FacilityRepository {
    db: DatabaseConnection,
}

impl FacilityRepository {
    /// Creates a new facility repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists all facilities ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<facilities::Model>, FacilityError> {
        let rows = facilities::Entity::find()
            .order_by_asc(facilities::Column::Name)
            .all(&self.db)
            .await?;
        Ok(rows)
    }

    /// Gets a facility by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the facility is not found or the query fails.
    pub async fn get(&self, id: Uuid) -> Result<facilities::Model, FacilityError> {
        facilities::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(FacilityError::NotFound(id))
    }

    /// Creates a new facility.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn create(&self, input: FacilityInput) -> Result<facilities::Model, FacilityError> {
        let facility = facilities::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            facility_type: Set(input.facility_type),
            location: Set(input.location),
            created_at: Set(Utc::now().into()),
        };
        Ok(facility.insert(&self.db).await?)
    }

    /// Updates an existing facility.
    ///
    /// # Errors
    ///
    /// Returns an error if the facility is not found or the update fails.
    pub async fn update(
        &self,
        id: Uuid,
        input: FacilityInput,
    ) -> Result<facilities::Model, FacilityError> {
        let existing = self.get(id).await?;
        let mut active: facilities::ActiveModel = existing.into();
        active.name = Set(input.name);
        active.facility_type = Set(input.facility_type);
        active.location = Set(input.location);
        Ok(active.update(&self.db).await?)
    }

    /// Deletes a facility.
    ///
    /// Deletion is refused while the facility still holds non-zero stock;
    /// the transaction log referencing it survives with the facility column
    /// nulled out by the foreign key.
    ///
    /// # Errors
    ///
    /// Returns an error if the facility is not found, still has stock, or
    /// the delete fails.
    pub async fn delete(&self, id: Uuid) -> Result<(), FacilityError> {
        self.get(id).await?;

        let stocked = balances::Entity::find()
            .filter(balances::Column::FacilityId.eq(id))
            .filter(balances::Column::Quantity.ne(rust_decimal::Decimal::ZERO))
            .count(&self.db)
            .await?;
        if stocked > 0 {
            return Err(FacilityError::HasStock(id));
        }

        facilities::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(())
    }
}
