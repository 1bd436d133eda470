use anyhow::Result;
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

use compass_core::config::Config;
use compass_core::event::EventRow;
use compass_core::store::{EventStore, StoreError};

use crate::error::map_sqlx_err;
use crate::schema::INIT_SQL;

/// Postgres backend for the ingestion endpoint.
///
/// Holds a bounded connection pool: `db_max_connections` concurrent
/// connections, acquisition bounded by `db_acquire_timeout` (surfaces as a
/// transient error instead of hanging), idle connections recycled after
/// `db_idle_timeout`. Each insert checks a connection out for exactly one
/// statement; sqlx returns it to the pool when the acquired guard drops,
/// on the error path included.
pub struct PgBackend {
    pool: PgPool,
}

impl PgBackend {
    /// Connect and run the idempotent schema init.
    pub async fn connect(config: &Config) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(config.db_acquire_timeout())
            .idle_timeout(config.db_idle_timeout())
            .connect(&config.database_url)
            .await?;
        sqlx::raw_sql(INIT_SQL).execute(&pool).await?;
        info!(
            max_connections = config.db_max_connections,
            "Postgres pool ready, compass_events schema ensured"
        );
        Ok(Self { pool })
    }

    /// The underlying pool, exposed for size/idle assertions in tests.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

const INSERT_EVENT_SQL: &str = "\
    INSERT INTO compass_events (\
        id, event_type, path, url, title, referrer, event_timestamp, \
        session_id, anonymous_id, device_type, browser, os, \
        utm_source, utm_medium, utm_campaign, utm_term, utm_content, \
        gclid, fbclid, \"ref\", page_load_time, \
        ip, country, region, city, latitude, longitude, timezone, \
        element, element_text, element_id, element_class, href, \
        form_id, form_action, form_method, scroll_depth, \
        signup_method, login_method, purchase_amount, purchase_currency, \
        custom_name, custom_data, received_at\
    ) VALUES (\
        $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, \
        $16, $17, $18, $19, $20, $21, $22, $23, $24, $25, $26, $27, $28, \
        $29, $30, $31, $32, $33, $34, $35, $36, $37, $38, $39, $40, $41, \
        $42, $43, $44\
    )";

#[async_trait]
impl EventStore for PgBackend {
    async fn insert_event(&self, row: &EventRow) -> Result<(), StoreError> {
        sqlx::query(INSERT_EVENT_SQL)
            .bind(uuid::Uuid::new_v4())
            .bind(&row.event_type)
            .bind(row.path.as_deref())
            .bind(row.url.as_deref())
            .bind(row.title.as_deref())
            .bind(row.referrer.as_deref())
            .bind(row.timestamp)
            .bind(row.session_id.as_deref())
            .bind(row.anonymous_id.as_deref())
            .bind(row.device_type.as_deref())
            .bind(row.browser.as_deref())
            .bind(row.os.as_deref())
            .bind(row.utm_source.as_deref())
            .bind(row.utm_medium.as_deref())
            .bind(row.utm_campaign.as_deref())
            .bind(row.utm_term.as_deref())
            .bind(row.utm_content.as_deref())
            .bind(row.gclid.as_deref())
            .bind(row.fbclid.as_deref())
            .bind(row.ref_param.as_deref())
            .bind(row.page_load_time)
            .bind(row.ip.as_deref())
            .bind(row.country.as_deref())
            .bind(row.region.as_deref())
            .bind(row.city.as_deref())
            .bind(row.latitude)
            .bind(row.longitude)
            .bind(row.timezone.as_deref())
            .bind(row.element.as_deref())
            .bind(row.element_text.as_deref())
            .bind(row.element_id.as_deref())
            .bind(row.element_class.as_deref())
            .bind(row.href.as_deref())
            .bind(row.form_id.as_deref())
            .bind(row.form_action.as_deref())
            .bind(row.form_method.as_deref())
            .bind(row.scroll_depth)
            .bind(row.signup_method.as_deref())
            .bind(row.login_method.as_deref())
            .bind(row.purchase_amount)
            .bind(row.purchase_currency.as_deref())
            .bind(row.custom_name.as_deref())
            .bind(row.custom_data.as_deref())
            .bind(row.received_at)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_err)?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_err)?;
        Ok(())
    }
}
