//! Initial database migration.
//!
//! Creates geography, profiles, the seven report tables, ROI, assets,
//! payments and support tables. Status columns are TEXT guarded by CHECK
//! constraints; the values match the `as_str` forms in `yaracheck-core`.

use sea_orm_migration::prelude::*;

/// Creates the whole schema.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: FUNCTIONS
        // ============================================================
        db.execute_unprepared(FUNCTIONS_SQL).await?;

        // ============================================================
        // PART 2: GEOGRAPHY & PROFILES
        // ============================================================
        db.execute_unprepared(GEOGRAPHY_SQL).await?;
        db.execute_unprepared(PROFILES_SQL).await?;

        // ============================================================
        // PART 3: REPORT TABLES
        // ============================================================
        db.execute_unprepared(PERSONS_SQL).await?;
        db.execute_unprepared(DEVICES_SQL).await?;
        db.execute_unprepared(VEHICLES_SQL).await?;
        db.execute_unprepared(HOUSEHOLD_ITEMS_SQL).await?;
        db.execute_unprepared(PERSONAL_BELONGINGS_SQL).await?;
        db.execute_unprepared(HACKED_ACCOUNTS_SQL).await?;
        db.execute_unprepared(BUSINESS_REPUTATION_SQL).await?;

        // ============================================================
        // PART 4: ROI, ASSETS, PAYMENTS, SUPPORT
        // ============================================================
        db.execute_unprepared(ROI_SQL).await?;
        db.execute_unprepared(COMPANY_ASSETS_SQL).await?;
        db.execute_unprepared(TRANSACTIONS_SQL).await?;
        db.execute_unprepared(SUPPORT_SQL).await?;

        // ============================================================
        // PART 5: TRIGGERS
        // ============================================================
        db.execute_unprepared(TRIGGERS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const FUNCTIONS_SQL: &str = r"
CREATE OR REPLACE FUNCTION set_updated_at()
RETURNS TRIGGER AS $$
BEGIN
    NEW.updated_at = NOW();
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;
";

const GEOGRAPHY_SQL: &str = r"
CREATE TABLE countries (
    id UUID PRIMARY KEY,
    name VARCHAR(120) NOT NULL UNIQUE,
    iso_code CHAR(2) NOT NULL UNIQUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE TABLE provinces (
    id UUID PRIMARY KEY,
    country_id UUID NOT NULL REFERENCES countries(id) ON DELETE CASCADE,
    name VARCHAR(120) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    UNIQUE (country_id, name)
);

CREATE INDEX idx_provinces_country ON provinces(country_id);
";

const PROFILES_SQL: &str = r"
CREATE TABLE profiles (
    id UUID PRIMARY KEY,
    email VARCHAR(255) NOT NULL UNIQUE,
    full_name VARCHAR(255) NOT NULL,
    password_hash TEXT NOT NULL,
    role VARCHAR(20) NOT NULL DEFAULT 'user'
        CHECK (role IN ('user', 'admin', 'super_admin')),
    admin_role VARCHAR(40)
        CHECK (admin_role IN ('director', 'country_rep', 'province_manager',
                              'shareholder', 'customer_support_executive', 'investor')),
    permissions JSONB NOT NULL DEFAULT '{}'::jsonb,
    country_id UUID REFERENCES countries(id) ON DELETE SET NULL,
    province_id UUID REFERENCES provinces(id) ON DELETE SET NULL,
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_profiles_role ON profiles(role);
";

const PERSONS_SQL: &str = r"
CREATE TABLE persons (
    id UUID PRIMARY KEY,
    tracking_code VARCHAR(20) NOT NULL UNIQUE,
    status VARCHAR(20) NOT NULL DEFAULT 'pending_payment'
        CHECK (status IN ('pending_payment', 'open', 'investigating', 'resolved', 'closed')),
    reporter_id UUID NOT NULL REFERENCES profiles(id),
    country_id UUID REFERENCES countries(id) ON DELETE SET NULL,
    province_id UUID REFERENCES provinces(id) ON DELETE SET NULL,
    price_cents BIGINT NOT NULL CHECK (price_cents >= 0),
    currency CHAR(3) NOT NULL DEFAULT 'USD',
    full_name VARCHAR(500) NOT NULL,
    age INTEGER,
    gender VARCHAR(500),
    last_seen_location VARCHAR(500),
    description VARCHAR(500),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_persons_country ON persons(country_id);
CREATE INDEX idx_persons_reporter ON persons(reporter_id);
CREATE INDEX idx_persons_created ON persons(created_at DESC);
";

const DEVICES_SQL: &str = r"
CREATE TABLE devices (
    id UUID PRIMARY KEY,
    tracking_code VARCHAR(20) NOT NULL UNIQUE,
    status VARCHAR(20) NOT NULL DEFAULT 'pending_payment'
        CHECK (status IN ('pending_payment', 'open', 'investigating', 'resolved', 'closed')),
    reporter_id UUID NOT NULL REFERENCES profiles(id),
    country_id UUID REFERENCES countries(id) ON DELETE SET NULL,
    province_id UUID REFERENCES provinces(id) ON DELETE SET NULL,
    price_cents BIGINT NOT NULL CHECK (price_cents >= 0),
    currency CHAR(3) NOT NULL DEFAULT 'USD',
    device_type VARCHAR(500) NOT NULL,
    brand VARCHAR(500) NOT NULL,
    model VARCHAR(500) NOT NULL,
    imei VARCHAR(500),
    serial_number VARCHAR(500),
    year INTEGER,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_devices_country ON devices(country_id);
CREATE INDEX idx_devices_reporter ON devices(reporter_id);
CREATE INDEX idx_devices_created ON devices(created_at DESC);
CREATE INDEX idx_devices_imei ON devices(imei);
";

const VEHICLES_SQL: &str = r"
CREATE TABLE vehicles (
    id UUID PRIMARY KEY,
    tracking_code VARCHAR(20) NOT NULL UNIQUE,
    status VARCHAR(20) NOT NULL DEFAULT 'pending_payment'
        CHECK (status IN ('pending_payment', 'open', 'investigating', 'resolved', 'closed')),
    reporter_id UUID NOT NULL REFERENCES profiles(id),
    country_id UUID REFERENCES countries(id) ON DELETE SET NULL,
    province_id UUID REFERENCES provinces(id) ON DELETE SET NULL,
    price_cents BIGINT NOT NULL CHECK (price_cents >= 0),
    currency CHAR(3) NOT NULL DEFAULT 'USD',
    vehicle_type VARCHAR(500) NOT NULL,
    brand VARCHAR(500) NOT NULL,
    model VARCHAR(500) NOT NULL,
    year INTEGER,
    chassis_number VARCHAR(500),
    plate_number VARCHAR(500),
    color VARCHAR(500),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_vehicles_country ON vehicles(country_id);
CREATE INDEX idx_vehicles_reporter ON vehicles(reporter_id);
CREATE INDEX idx_vehicles_created ON vehicles(created_at DESC);
CREATE INDEX idx_vehicles_plate ON vehicles(plate_number);
";

const HOUSEHOLD_ITEMS_SQL: &str = r"
CREATE TABLE household_items (
    id UUID PRIMARY KEY,
    tracking_code VARCHAR(20) NOT NULL UNIQUE,
    status VARCHAR(20) NOT NULL DEFAULT 'pending_payment'
        CHECK (status IN ('pending_payment', 'open', 'investigating', 'resolved', 'closed')),
    reporter_id UUID NOT NULL REFERENCES profiles(id),
    country_id UUID REFERENCES countries(id) ON DELETE SET NULL,
    province_id UUID REFERENCES provinces(id) ON DELETE SET NULL,
    price_cents BIGINT NOT NULL CHECK (price_cents >= 0),
    currency CHAR(3) NOT NULL DEFAULT 'USD',
    item_name VARCHAR(500) NOT NULL,
    brand VARCHAR(500),
    model VARCHAR(500),
    serial_number VARCHAR(500),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_household_items_country ON household_items(country_id);
CREATE INDEX idx_household_items_reporter ON household_items(reporter_id);
CREATE INDEX idx_household_items_created ON household_items(created_at DESC);
";

const PERSONAL_BELONGINGS_SQL: &str = r"
CREATE TABLE personal_belongings (
    id UUID PRIMARY KEY,
    tracking_code VARCHAR(20) NOT NULL UNIQUE,
    status VARCHAR(20) NOT NULL DEFAULT 'pending_payment'
        CHECK (status IN ('pending_payment', 'open', 'investigating', 'resolved', 'closed')),
    reporter_id UUID NOT NULL REFERENCES profiles(id),
    country_id UUID REFERENCES countries(id) ON DELETE SET NULL,
    province_id UUID REFERENCES provinces(id) ON DELETE SET NULL,
    price_cents BIGINT NOT NULL CHECK (price_cents >= 0),
    currency CHAR(3) NOT NULL DEFAULT 'USD',
    item_name VARCHAR(500) NOT NULL,
    brand VARCHAR(500),
    description VARCHAR(500),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_personal_belongings_country ON personal_belongings(country_id);
CREATE INDEX idx_personal_belongings_reporter ON personal_belongings(reporter_id);
CREATE INDEX idx_personal_belongings_created ON personal_belongings(created_at DESC);
";

const HACKED_ACCOUNTS_SQL: &str = r"
CREATE TABLE hacked_accounts (
    id UUID PRIMARY KEY,
    tracking_code VARCHAR(20) NOT NULL UNIQUE,
    status VARCHAR(20) NOT NULL DEFAULT 'pending_payment'
        CHECK (status IN ('pending_payment', 'open', 'investigating', 'resolved', 'closed')),
    reporter_id UUID NOT NULL REFERENCES profiles(id),
    country_id UUID REFERENCES countries(id) ON DELETE SET NULL,
    province_id UUID REFERENCES provinces(id) ON DELETE SET NULL,
    price_cents BIGINT NOT NULL CHECK (price_cents >= 0),
    currency CHAR(3) NOT NULL DEFAULT 'USD',
    platform VARCHAR(500) NOT NULL,
    account_identifier VARCHAR(500) NOT NULL,
    description VARCHAR(500),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_hacked_accounts_country ON hacked_accounts(country_id);
CREATE INDEX idx_hacked_accounts_reporter ON hacked_accounts(reporter_id);
CREATE INDEX idx_hacked_accounts_created ON hacked_accounts(created_at DESC);
";

const BUSINESS_REPUTATION_SQL: &str = r"
CREATE TABLE business_reputation_reports (
    id UUID PRIMARY KEY,
    tracking_code VARCHAR(20) NOT NULL UNIQUE,
    status VARCHAR(20) NOT NULL DEFAULT 'pending_payment'
        CHECK (status IN ('pending_payment', 'open', 'investigating', 'resolved', 'closed')),
    reporter_id UUID NOT NULL REFERENCES profiles(id),
    country_id UUID REFERENCES countries(id) ON DELETE SET NULL,
    province_id UUID REFERENCES provinces(id) ON DELETE SET NULL,
    price_cents BIGINT NOT NULL CHECK (price_cents >= 0),
    currency CHAR(3) NOT NULL DEFAULT 'USD',
    business_name VARCHAR(500) NOT NULL,
    reported_name VARCHAR(500),
    description VARCHAR(500),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_business_reputation_country ON business_reputation_reports(country_id);
CREATE INDEX idx_business_reputation_reporter ON business_reputation_reports(reporter_id);
CREATE INDEX idx_business_reputation_created ON business_reputation_reports(created_at DESC);
";

const ROI_SQL: &str = r"
CREATE TABLE roi_distributions (
    id UUID PRIMARY KEY,
    shareholder_id UUID NOT NULL REFERENCES profiles(id),
    pool_amount NUMERIC(19, 4) NOT NULL CHECK (pool_amount > 0),
    percentage NUMERIC(7, 4) NOT NULL CHECK (percentage > 0 AND percentage <= 100),
    amount NUMERIC(19, 2) NOT NULL CHECK (amount >= 0),
    period_start DATE NOT NULL,
    period_end DATE NOT NULL,
    enabled BOOLEAN NOT NULL DEFAULT FALSE,
    notes TEXT,
    created_by UUID NOT NULL REFERENCES profiles(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    CHECK (period_start <= period_end)
);

CREATE INDEX idx_roi_distributions_shareholder ON roi_distributions(shareholder_id);

CREATE TABLE roi_withdrawal_requests (
    id UUID PRIMARY KEY,
    distribution_id UUID NOT NULL REFERENCES roi_distributions(id),
    shareholder_id UUID NOT NULL REFERENCES profiles(id),
    amount NUMERIC(19, 2) NOT NULL CHECK (amount > 0),
    status VARCHAR(20) NOT NULL DEFAULT 'pending'
        CHECK (status IN ('pending', 'approved', 'sent', 'completed')),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_roi_withdrawals_distribution ON roi_withdrawal_requests(distribution_id);
CREATE INDEX idx_roi_withdrawals_shareholder ON roi_withdrawal_requests(shareholder_id);
";

const COMPANY_ASSETS_SQL: &str = r"
CREATE TABLE company_assets (
    id UUID PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    category VARCHAR(100) NOT NULL,
    value NUMERIC(19, 2) NOT NULL CHECK (value >= 0),
    acquired_on DATE,
    notes TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const TRANSACTIONS_SQL: &str = r"
CREATE TABLE transactions (
    id UUID PRIMARY KEY,
    reference VARCHAR(64) NOT NULL UNIQUE,
    provider VARCHAR(20) NOT NULL
        CHECK (provider IN ('stripe', 'paystack', 'flutterwave')),
    report_kind VARCHAR(40) NOT NULL,
    report_id UUID NOT NULL,
    user_id UUID NOT NULL REFERENCES profiles(id),
    amount_cents BIGINT NOT NULL CHECK (amount_cents > 0),
    currency CHAR(3) NOT NULL,
    status VARCHAR(20) NOT NULL DEFAULT 'pending'
        CHECK (status IN ('pending', 'success', 'failed')),
    checkout_url TEXT,
    provider_payload JSONB,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_transactions_user ON transactions(user_id);
CREATE INDEX idx_transactions_report ON transactions(report_kind, report_id);
";

const SUPPORT_SQL: &str = r"
CREATE TABLE support_tickets (
    id UUID PRIMARY KEY,
    user_id UUID NOT NULL REFERENCES profiles(id),
    subject VARCHAR(200) NOT NULL,
    message TEXT NOT NULL,
    status VARCHAR(20) NOT NULL DEFAULT 'open'
        CHECK (status IN ('open', 'in_progress', 'resolved', 'closed')),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_support_tickets_user ON support_tickets(user_id);

CREATE TABLE anonymous_messages (
    id UUID PRIMARY KEY,
    message TEXT NOT NULL,
    contact VARCHAR(255),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const TRIGGERS_SQL: &str = r"
DO $$
DECLARE
    t TEXT;
BEGIN
    FOREACH t IN ARRAY ARRAY[
        'profiles', 'persons', 'devices', 'vehicles', 'household_items',
        'personal_belongings', 'hacked_accounts', 'business_reputation_reports',
        'roi_distributions', 'roi_withdrawal_requests', 'company_assets',
        'transactions', 'support_tickets'
    ]
    LOOP
        EXECUTE format(
            'CREATE TRIGGER trg_%s_updated_at BEFORE UPDATE ON %I
             FOR EACH ROW EXECUTE FUNCTION set_updated_at()',
            t, t
        );
    END LOOP;
END;
$$;
";

const DROP_ALL_SQL: &str = r"
-- ============================================================
-- DROP ALL: Rollback migration
-- Order matters due to foreign key constraints
-- ============================================================

DROP TABLE IF EXISTS anonymous_messages CASCADE;
DROP TABLE IF EXISTS support_tickets CASCADE;
DROP TABLE IF EXISTS transactions CASCADE;
DROP TABLE IF EXISTS company_assets CASCADE;
DROP TABLE IF EXISTS roi_withdrawal_requests CASCADE;
DROP TABLE IF EXISTS roi_distributions CASCADE;
DROP TABLE IF EXISTS business_reputation_reports CASCADE;
DROP TABLE IF EXISTS hacked_accounts CASCADE;
DROP TABLE IF EXISTS personal_belongings CASCADE;
DROP TABLE IF EXISTS household_items CASCADE;
DROP TABLE IF EXISTS vehicles CASCADE;
DROP TABLE IF EXISTS devices CASCADE;
DROP TABLE IF EXISTS persons CASCADE;
DROP TABLE IF EXISTS profiles CASCADE;
DROP TABLE IF EXISTS provinces CASCADE;
DROP TABLE IF EXISTS countries CASCADE;

DROP FUNCTION IF EXISTS set_updated_at();
";
