//! SQL schema for the Jamaat SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS` / `OR IGNORE`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS persons (
    person_id     TEXT PRIMARY KEY,
    first_name    TEXT NOT NULL,
    last_name     TEXT,
    gender        TEXT,            -- free text as entered in the CRM
    date_of_birth TEXT,            -- YYYY-MM-DD
    date_of_death TEXT,
    email         TEXT,
    phone         TEXT,
    status        TEXT NOT NULL DEFAULT 'ACTIVE',
    created_at    TEXT NOT NULL    -- RFC 3339 UTC
);

CREATE TABLE IF NOT EXISTS individuals (
    individual_id TEXT PRIMARY KEY,  -- @I<n>@
    given_name    TEXT NOT NULL,
    surname       TEXT,
    sex           TEXT,              -- 'M' | 'F' | NULL
    birth_date    TEXT,
    death_date    TEXT,
    living        INTEGER NOT NULL
);

-- At most one individual per person and one person per individual.
CREATE TABLE IF NOT EXISTS person_individual_links (
    person_id     TEXT PRIMARY KEY REFERENCES persons(person_id) ON DELETE CASCADE,
    individual_id TEXT NOT NULL UNIQUE REFERENCES individuals(individual_id) ON DELETE CASCADE,
    linked_by     TEXT NOT NULL,
    link_reason   TEXT,
    linked_at     TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS families (
    family_id  TEXT PRIMARY KEY,     -- @F<n>@ or @F<household key>@
    husband_id TEXT REFERENCES individuals(individual_id),
    wife_id    TEXT REFERENCES individuals(individual_id)
);

CREATE TABLE IF NOT EXISTS family_children (
    family_child_id INTEGER PRIMARY KEY AUTOINCREMENT,
    family_id       TEXT NOT NULL REFERENCES families(family_id),
    child_id        TEXT NOT NULL REFERENCES individuals(individual_id),
    relation        TEXT NOT NULL DEFAULT 'BIOLOGICAL',
    UNIQUE (family_id, child_id)
);

-- Monotonic id counters; advanced with UPDATE .. RETURNING.
CREATE TABLE IF NOT EXISTS sequences (
    name  TEXT PRIMARY KEY,
    value INTEGER NOT NULL
);

INSERT OR IGNORE INTO sequences (name, value) VALUES ('individual', 0), ('family', 0);

CREATE INDEX IF NOT EXISTS persons_email_idx          ON persons(email);
CREATE INDEX IF NOT EXISTS persons_name_idx           ON persons(first_name, last_name);
CREATE INDEX IF NOT EXISTS families_husband_idx       ON families(husband_id);
CREATE INDEX IF NOT EXISTS families_wife_idx          ON families(wife_id);
CREATE INDEX IF NOT EXISTS family_children_child_idx  ON family_children(child_id);

PRAGMA user_version = 1;
";
