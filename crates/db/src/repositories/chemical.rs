//! Chemical repository for catalog reference data.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::{chemicals, transactions};

/// Error types for chemical operations.
#[derive(Debug, thiserror::Error)]
pub enum ChemicalError {
    /// Chemical not found.
    #[error("Chemical not found: {0}")]
    NotFound(Uuid),

    /// Chemical is referenced by ledger history and cannot be removed.
    #[error("Chemical {0} is referenced by transactions and cannot be deleted")]
    InUse(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl ChemicalError {
    /// Machine-readable error code for the API envelope.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::InUse(_) => "INVALID_OPERATION",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// HTTP status code matching the error code.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::InUse(_) => 400,
            Self::Database(_) => 500,
        }
    }
}

/// Input for creating or updating a chemical.
#[derive(Debug, Clone)]
pub struct ChemicalInput {
    /// Unique display name.
    pub name: String,
    /// Unit the quantities are expressed in (kg, l, t).
    pub unit_of_measurement: String,
    /// Optional description.
    pub description: Option<String>,
}

/// Chemical repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct ChemicalRepository {
    db: DatabaseConnection,
}

impl ChemicalRepository {
    /// Creates a new chemical repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists all chemicals ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<chemicals::Model>, ChemicalError> {
        let rows = chemicals::Entity::find()
            .order_by_asc(chemicals::Column::Name)
            .all(&self.db)
            .await?;
        Ok(rows)
    }

    /// Gets a chemical by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the chemical is not found or the query fails.
    pub async fn get(&self, id: Uuid) -> Result<chemicals::Model, ChemicalError> {
        chemicals::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(ChemicalError::NotFound(id))
    }

    /// Creates a new chemical.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn create(&self, input: ChemicalInput) -> Result<chemicals::Model, ChemicalError> {
        let chemical = chemicals::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            unit_of_measurement: Set(input.unit_of_measurement),
            description: Set(input.description),
        };
        Ok(chemical.insert(&self.db).await?)
    }

    /// Updates an existing chemical.
    ///
    /// # Errors
    ///
    /// Returns an error if the chemical is not found or the update fails.
    pub async fn update(
        &self,
        id: Uuid,
        input: ChemicalInput,
    ) -> Result<chemicals::Model, ChemicalError> {
        let existing = self.get(id).await?;
        let mut active: chemicals::ActiveModel = existing.into();
        active.name = Set(input.name);
        active.unit_of_measurement = Set(input.unit_of_measurement);
        active.description = Set(input.description);
        Ok(active.update(&self.db).await?)
    }

    /// Deletes a chemical.
    ///
    /// Refused while any transaction references it; ledger history never
    /// loses its chemical.
    ///
    /// # Errors
    ///
    /// Returns an error if the chemical is not found, is still referenced,
    /// or the delete fails.
    pub async fn delete(&self, id: Uuid) -> Result<(), ChemicalError> {
        self.get(id).await?;

        let referenced = transactions::Entity::find()
            .filter(transactions::Column::ChemicalId.eq(id))
            .count(&self.db)
            .await?;
        if referenced > 0 {
            return Err(ChemicalError::InUse(id));
        }

        chemicals::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(())
    }
}
