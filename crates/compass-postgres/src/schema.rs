/// Postgres initialization SQL.
///
/// Executed once at pool creation via `sqlx::raw_sql`. All statements use
/// `IF NOT EXISTS` so they are safe to re-run on every startup (idempotent).
///
/// One wide append-only table, no unique constraints beyond the surrogate
/// primary key: duplicate beacons from flaky delivery intentionally produce
/// duplicate rows. Every optional column is nullable and is always bound
/// explicitly on insert (NULL rather than omitted).
pub const INIT_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS compass_events (
    id                UUID PRIMARY KEY,
    event_type        TEXT NOT NULL,
    path              TEXT,
    url               TEXT,
    title             TEXT,
    referrer          TEXT,
    -- Client-supplied instant; authoritative even with clock skew.
    event_timestamp   TIMESTAMPTZ NOT NULL,
    session_id        TEXT,
    anonymous_id      TEXT,
    device_type       TEXT,
    browser           TEXT,
    os                TEXT,
    utm_source        TEXT,
    utm_medium        TEXT,
    utm_campaign      TEXT,
    utm_term          TEXT,
    utm_content       TEXT,
    gclid             TEXT,
    fbclid            TEXT,
    "ref"             TEXT,
    page_load_time    DOUBLE PRECISION,
    ip                TEXT,
    country           TEXT,
    region            TEXT,
    city              TEXT,
    latitude          DOUBLE PRECISION,
    longitude         DOUBLE PRECISION,
    timezone          TEXT,
    element           TEXT,
    element_text      TEXT,
    element_id        TEXT,
    element_class     TEXT,
    href              TEXT,
    form_id           TEXT,
    form_action       TEXT,
    form_method       TEXT,
    scroll_depth      DOUBLE PRECISION,
    signup_method     TEXT,
    login_method      TEXT,
    purchase_amount   DOUBLE PRECISION,
    purchase_currency TEXT,
    custom_name       TEXT,
    -- Arbitrary custom payload, stored as its JSON text.
    custom_data       TEXT,
    received_at       TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX IF NOT EXISTS idx_compass_events_timestamp
    ON compass_events (event_timestamp);
CREATE INDEX IF NOT EXISTS idx_compass_events_session
    ON compass_events (session_id, event_timestamp);
CREATE INDEX IF NOT EXISTS idx_compass_events_type
    ON compass_events (event_type, event_timestamp);
"#;
