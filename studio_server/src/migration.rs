//! Schema migration for the studio tables.

use diesel_async::AsyncPgConnection;
use diesel_async::SimpleAsyncConnection;

/// SQL migration for all studio tables. Idempotent.
///
/// Database-level invariants live here: unique settings keys, unique
/// gateway order ids, one active legal document per type, and the
/// allowed pipeline stages.
pub const MIGRATION_SQL: &str = r#"
-- ================================================================
-- Studio tables
-- ================================================================

CREATE TABLE IF NOT EXISTS profiles (
    id              UUID PRIMARY KEY,
    email           VARCHAR(254) NOT NULL,
    full_name       VARCHAR(120),
    phone           VARCHAR(40),
    role            VARCHAR(16) NOT NULL DEFAULT 'client'
                    CHECK (role IN ('admin', 'staff', 'client')),
    active          BOOLEAN NOT NULL DEFAULT TRUE,
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at      TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX IF NOT EXISTS idx_profiles_role ON profiles (role);

CREATE TABLE IF NOT EXISTS packages (
    id              BIGSERIAL PRIMARY KEY,
    name            VARCHAR(120) NOT NULL,
    description     TEXT,
    price_cents     INTEGER NOT NULL DEFAULT 0 CHECK (price_cents >= 0),
    features        JSONB NOT NULL DEFAULT '[]'::jsonb,
    display_order   INTEGER NOT NULL DEFAULT 0,
    active          BOOLEAN NOT NULL DEFAULT TRUE,
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at      TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE TABLE IF NOT EXISTS events (
    id              BIGSERIAL PRIMARY KEY,
    name            VARCHAR(200) NOT NULL,
    organizer       VARCHAR(200),
    venue           VARCHAR(200),
    event_date      DATE NOT NULL,
    status          VARCHAR(16) NOT NULL DEFAULT 'upcoming'
                    CHECK (status IN ('upcoming', 'completed', 'cancelled')),
    active          BOOLEAN NOT NULL DEFAULT TRUE,
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at      TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX IF NOT EXISTS idx_events_date ON events (event_date);

CREATE TABLE IF NOT EXISTS orders (
    id               BIGSERIAL PRIMARY KEY,
    gateway_order_id VARCHAR(64) NOT NULL UNIQUE,
    payment_key      VARCHAR(200) NOT NULL,
    amount_cents     BIGINT NOT NULL DEFAULT 0,
    status           VARCHAR(32) NOT NULL,
    package_id       BIGINT REFERENCES packages(id) ON DELETE SET NULL,
    event_id         BIGINT REFERENCES events(id) ON DELETE SET NULL,
    profile_id       UUID REFERENCES profiles(id) ON DELETE SET NULL,
    athlete_name     VARCHAR(120),
    athlete_number   VARCHAR(20),
    contact_email    VARCHAR(254),
    contact_phone    VARCHAR(40),
    metadata         JSONB NOT NULL DEFAULT '{}'::jsonb,
    created_at       TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at       TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX IF NOT EXISTS idx_orders_created ON orders (created_at DESC);
CREATE INDEX IF NOT EXISTS idx_orders_package ON orders (package_id);

CREATE TABLE IF NOT EXISTS pipeline_cards (
    id              BIGSERIAL PRIMARY KEY,
    order_id        BIGINT REFERENCES orders(id) ON DELETE SET NULL,
    event_id        BIGINT REFERENCES events(id) ON DELETE SET NULL,
    package_id      BIGINT REFERENCES packages(id) ON DELETE SET NULL,
    athlete_name    VARCHAR(120) NOT NULL,
    athlete_number  VARCHAR(20),
    status          VARCHAR(16) NOT NULL DEFAULT 'WAITING'
                    CHECK (status IN ('WAITING', 'SHOOTING', 'EDITING', 'READY', 'DELIVERED')),
    position        INTEGER NOT NULL DEFAULT 0,
    assignee_id     UUID REFERENCES profiles(id) ON DELETE SET NULL,
    notes           TEXT,
    due_date        DATE,
    delivered_at    TIMESTAMPTZ,
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at      TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX IF NOT EXISTS idx_pipeline_cards_status ON pipeline_cards (status, position);

CREATE TABLE IF NOT EXISTS deliverables (
    id              BIGSERIAL PRIMARY KEY,
    card_id         BIGINT REFERENCES pipeline_cards(id) ON DELETE SET NULL,
    order_id        BIGINT REFERENCES orders(id) ON DELETE SET NULL,
    profile_id      UUID REFERENCES profiles(id) ON DELETE SET NULL,
    title           VARCHAR(200) NOT NULL,
    external_url    TEXT NOT NULL,
    expires_at      TIMESTAMPTZ,
    download_count  INTEGER NOT NULL DEFAULT 0,
    active          BOOLEAN NOT NULL DEFAULT TRUE,
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at      TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE TABLE IF NOT EXISTS download_logs (
    id              BIGSERIAL PRIMARY KEY,
    deliverable_id  BIGINT NOT NULL REFERENCES deliverables(id) ON DELETE CASCADE,
    ip_address      VARCHAR(64),
    user_agent      TEXT,
    downloaded_at   TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX IF NOT EXISTS idx_download_logs_deliverable ON download_logs (deliverable_id);
CREATE INDEX IF NOT EXISTS idx_download_logs_time ON download_logs (downloaded_at DESC);

CREATE TABLE IF NOT EXISTS portfolio_items (
    id              BIGSERIAL PRIMARY KEY,
    title           VARCHAR(200) NOT NULL,
    category        VARCHAR(60) NOT NULL,
    description     TEXT,
    media_url       TEXT NOT NULL,
    thumbnail_url   TEXT,
    display_order   INTEGER NOT NULL DEFAULT 0,
    published       BOOLEAN NOT NULL DEFAULT FALSE,
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at      TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE TABLE IF NOT EXISTS showcase_items (
    id              BIGSERIAL PRIMARY KEY,
    title           VARCHAR(200) NOT NULL,
    category        VARCHAR(60) NOT NULL,
    description     TEXT,
    media_url       TEXT NOT NULL,
    thumbnail_url   TEXT,
    display_order   INTEGER NOT NULL DEFAULT 0,
    published       BOOLEAN NOT NULL DEFAULT FALSE,
    featured        BOOLEAN NOT NULL DEFAULT FALSE,
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at      TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE TABLE IF NOT EXISTS settings (
    id              BIGSERIAL PRIMARY KEY,
    key             VARCHAR(64) NOT NULL UNIQUE,
    value           JSONB NOT NULL,
    description     TEXT,
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at      TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE TABLE IF NOT EXISTS legal_documents (
    id              BIGSERIAL PRIMARY KEY,
    doc_type        VARCHAR(16) NOT NULL CHECK (doc_type IN ('terms', 'privacy', 'refund')),
    title           VARCHAR(200) NOT NULL,
    body            TEXT NOT NULL,
    version         VARCHAR(20) NOT NULL,
    is_active       BOOLEAN NOT NULL DEFAULT FALSE,
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at      TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_legal_documents_one_active
    ON legal_documents (doc_type) WHERE is_active;

CREATE TABLE IF NOT EXISTS faqs (
    id              BIGSERIAL PRIMARY KEY,
    question        TEXT NOT NULL,
    answer          TEXT NOT NULL,
    category        VARCHAR(60),
    display_order   INTEGER NOT NULL DEFAULT 0,
    published       BOOLEAN NOT NULL DEFAULT TRUE,
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at      TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
"#;

/// Run the studio migration.
pub async fn run_migration(conn: &mut AsyncPgConnection) -> anyhow::Result<()> {
    conn.batch_execute(MIGRATION_SQL)
        .await
        .map_err(|e| anyhow::anyhow!("studio migration failed: {e}"))?;
    Ok(())
}
