//! SQL schema definitions.

/// Complete schema for the Atelier v1 database.
pub const SCHEMA_V1: &str = r#"
-- ============================================================
-- Creator registry
-- ============================================================

CREATE TABLE IF NOT EXISTS creators (
    account_id TEXT PRIMARY KEY,
    username TEXT NOT NULL,
    bio TEXT NOT NULL DEFAULT '',
    created_at INTEGER NOT NULL,
    active INTEGER NOT NULL DEFAULT 1
);

-- ============================================================
-- Content catalog
-- ============================================================

-- creator_id intentionally carries no foreign key: the ledger accepts
-- any non-empty creator id and leaves registry enforcement to the
-- marketplace façade.
CREATE TABLE IF NOT EXISTS content (
    content_id INTEGER PRIMARY KEY,
    creator_id TEXT NOT NULL,
    title TEXT NOT NULL,
    content_ref TEXT NOT NULL,
    price INTEGER NOT NULL,
    created_at INTEGER NOT NULL,
    active INTEGER NOT NULL DEFAULT 1
);

CREATE INDEX IF NOT EXISTS idx_content_creator ON content(creator_id);

-- ============================================================
-- Access grants
-- ============================================================

CREATE TABLE IF NOT EXISTS access_grants (
    content_id INTEGER NOT NULL REFERENCES content(content_id),
    buyer_id TEXT NOT NULL,
    granted_at INTEGER NOT NULL,
    price_paid INTEGER NOT NULL,
    PRIMARY KEY (content_id, buyer_id)
);

CREATE INDEX IF NOT EXISTS idx_grants_buyer ON access_grants(buyer_id);

-- ============================================================
-- Ledger totals (singleton row, seeded by the initial migration)
-- ============================================================

CREATE TABLE IF NOT EXISTS ledger_totals (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    total_creators INTEGER NOT NULL DEFAULT 0,
    total_content_created INTEGER NOT NULL DEFAULT 0,
    total_revenue INTEGER NOT NULL DEFAULT 0,
    next_content_id INTEGER NOT NULL DEFAULT 1
);
"#;
