//! Initial schema: reference tables, the transaction log and the balance cache.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

const CREATE_ENUMS: &str = r"
CREATE TYPE facility_type AS ENUM ('warehouse', 'well', 'other');
CREATE TYPE transaction_type AS ENUM ('add', 'consume', 'transfer');
CREATE TYPE user_role AS ENUM ('admin', 'engineer', 'logistician');
";

const CREATE_FACILITIES: &str = r"
CREATE TABLE facilities (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL,
    facility_type facility_type NOT NULL,
    location VARCHAR(255),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const CREATE_CHEMICALS: &str = r"
CREATE TABLE chemicals (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL UNIQUE,
    unit_of_measurement VARCHAR(32) NOT NULL,
    description TEXT
);
";

const CREATE_USERS: &str = r"
CREATE TABLE users (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    username VARCHAR(150) NOT NULL UNIQUE,
    role user_role NOT NULL,
    assigned_facility_id UUID REFERENCES facilities(id) ON DELETE SET NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const CREATE_TRANSACTIONS: &str = r"
CREATE TABLE transactions (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    operation_uuid UUID NOT NULL,
    transaction_type transaction_type NOT NULL,
    chemical_id UUID NOT NULL REFERENCES chemicals(id) ON DELETE RESTRICT,
    quantity NUMERIC(12, 2) NOT NULL CHECK (quantity > 0),
    from_facility_id UUID REFERENCES facilities(id) ON DELETE SET NULL,
    to_facility_id UUID REFERENCES facilities(id) ON DELETE SET NULL,
    performed_by UUID REFERENCES users(id) ON DELETE SET NULL,
    operation_date TIMESTAMPTZ NOT NULL,
    timestamp TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    document_name VARCHAR(255),
    document_file VARCHAR(512),
    comment TEXT
);

CREATE INDEX idx_transactions_operation_uuid ON transactions(operation_uuid);
CREATE INDEX idx_transactions_chemical ON transactions(chemical_id);
CREATE INDEX idx_transactions_from_facility ON transactions(from_facility_id);
CREATE INDEX idx_transactions_to_facility ON transactions(to_facility_id);
CREATE INDEX idx_transactions_replay_order ON transactions(operation_date, timestamp);
";

const CREATE_BALANCES: &str = r"
CREATE TABLE balances (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    facility_id UUID NOT NULL REFERENCES facilities(id) ON DELETE CASCADE,
    chemical_id UUID NOT NULL REFERENCES chemicals(id) ON DELETE RESTRICT,
    quantity NUMERIC(12, 2) NOT NULL DEFAULT 0,
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    UNIQUE (facility_id, chemical_id)
);
";

const DROP_ALL: &str = r"
DROP TABLE IF EXISTS balances;
DROP TABLE IF EXISTS transactions;
DROP TABLE IF EXISTS users;
DROP TABLE IF EXISTS chemicals;
DROP TABLE IF EXISTS facilities;
DROP TYPE IF EXISTS user_role;
DROP TYPE IF EXISTS transaction_type;
DROP TYPE IF EXISTS facility_type;
";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(CREATE_ENUMS).await?;
        db.execute_unprepared(CREATE_FACILITIES).await?;
        db.execute_unprepared(CREATE_CHEMICALS).await?;
        db.execute_unprepared(CREATE_USERS).await?;
        db.execute_unprepared(CREATE_TRANSACTIONS).await?;
        db.execute_unprepared(CREATE_BALANCES).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.get_connection().execute_unprepared(DROP_ALL).await?;
        Ok(())
    }
}
