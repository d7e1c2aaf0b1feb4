//! SQL schema for the till SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// The REFERENCES clauses are declarative only: the `foreign_keys` pragma
/// is pinned off (rusqlite's bundled SQLite compiles with
/// `SQLITE_DEFAULT_FOREIGN_KEYS=1`, flipping the stock default), so an
/// orphan sale inserts cleanly and simply drops out of the joined
/// breakdowns.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = OFF;

CREATE TABLE IF NOT EXISTS products (
    id        INTEGER PRIMARY KEY,
    name      TEXT NOT NULL,
    price     REAL NOT NULL,
    category  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS stores (
    id       INTEGER PRIMARY KEY,
    city     TEXT NOT NULL,
    region   TEXT NOT NULL,
    address  TEXT NOT NULL
);

-- Imported rows are append-only.
-- No UPDATE or DELETE is ever issued against these three tables.
CREATE TABLE IF NOT EXISTS sales (
    id          INTEGER PRIMARY KEY,
    product_id  INTEGER NOT NULL REFERENCES products(id),
    store_id    INTEGER NOT NULL REFERENCES stores(id),
    sale_date   TEXT NOT NULL,     -- YYYY-MM-DD
    quantity    INTEGER NOT NULL,
    amount      REAL NOT NULL
);

-- Append-only log of computed summary values.
CREATE TABLE IF NOT EXISTS analysis_results (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    analysis_type   TEXT NOT NULL,   -- label of AnalysisKind variant
    result_value    REAL NOT NULL,
    result_details  TEXT NOT NULL,
    created_at      TEXT NOT NULL    -- RFC 3339 UTC; store-assigned
);

CREATE INDEX IF NOT EXISTS sales_product_idx ON sales(product_id);
CREATE INDEX IF NOT EXISTS sales_store_idx   ON sales(store_id);
CREATE INDEX IF NOT EXISTS sales_date_idx    ON sales(sale_date);

PRAGMA user_version = 1;
";
