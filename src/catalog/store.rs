use sqlx::{postgres::PgArguments, PgPool, Row};
use thiserror::Error;
use uuid::Uuid;

use super::product::{Product, ProductDraft};
use super::query::{Bind, ProductQuery};

/// Errors from the storage collaborator.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found")]
    NotFound,

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// All product persistence goes through here. Holds the connection pool;
/// every method is a single round-trip with per-row atomicity delegated to
/// Postgres. No retries; each statement is attempted exactly once.
#[derive(Clone)]
pub struct ProductStore {
    pool: PgPool,
}

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS products (
    id          UUID PRIMARY KEY,
    name        TEXT NOT NULL,
    description TEXT,
    category    TEXT NOT NULL DEFAULT 'Uncategorized',
    quantity    BIGINT NOT NULL DEFAULT 0,
    unit_price  DOUBLE PRECISION NOT NULL,
    image_url   TEXT,
    sku         TEXT,
    expiry      TIMESTAMPTZ,
    active      BOOLEAN NOT NULL DEFAULT TRUE,
    created_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at  TIMESTAMPTZ NOT NULL DEFAULT now()
)
"#;

impl ProductStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the products table if it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(SCHEMA_SQL).execute(&self.pool).await?;
        Ok(())
    }

    /// Pings the pool to ensure connectivity.
    pub async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Run a built query and return the matching products. No match is an
    /// empty vector, never an error.
    pub async fn select(&self, query: &ProductQuery) -> Result<Vec<Product>, StoreError> {
        let built = query.to_select_sql();
        let mut q = sqlx::query_as::<_, Product>(&built.sql);
        for bind in built.params.iter() {
            q = bind_param_query_as(q, bind);
        }
        Ok(q.fetch_all(&self.pool).await?)
    }

    /// Count the rows the query's predicates match, ignoring pagination.
    pub async fn count(&self, query: &ProductQuery) -> Result<i64, StoreError> {
        let built = query.to_count_sql();
        let mut q = sqlx::query(&built.sql);
        for bind in built.params.iter() {
            q = bind_param_query(q, bind);
        }
        let row = q.fetch_one(&self.pool).await?;
        Ok(row.try_get(0)?)
    }

    /// Distinct non-empty category values, for the facet listing.
    pub async fn distinct_categories(&self, active_only: bool) -> Result<Vec<String>, StoreError> {
        let sql = if active_only {
            "SELECT DISTINCT category FROM products \
             WHERE active = TRUE AND category IS NOT NULL AND category <> '' \
             ORDER BY category"
        } else {
            "SELECT DISTINCT category FROM products \
             WHERE category IS NOT NULL AND category <> '' \
             ORDER BY category"
        };
        Ok(sqlx::query_scalar(sql).fetch_all(&self.pool).await?)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, StoreError> {
        let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(product)
    }

    /// Insert a validated draft. The store assigns the id and both timestamps.
    pub async fn insert(&self, draft: &ProductDraft) -> Result<Product, StoreError> {
        let product = sqlx::query_as::<_, Product>(
            "INSERT INTO products \
             (id, name, description, category, quantity, unit_price, image_url, sku, expiry, active) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(&draft.category)
        .bind(draft.quantity)
        .bind(draft.unit_price)
        .bind(&draft.image_url)
        .bind(&draft.sku)
        .bind(draft.expiry)
        .bind(draft.active)
        .fetch_one(&self.pool)
        .await?;
        Ok(product)
    }

    /// Replace every caller-controlled field of the named record and refresh
    /// `updated_at`. The id and `created_at` are untouched.
    pub async fn replace(&self, id: Uuid, draft: &ProductDraft) -> Result<Product, StoreError> {
        let product = sqlx::query_as::<_, Product>(
            "UPDATE products SET \
             name = $1, description = $2, category = $3, quantity = $4, unit_price = $5, \
             image_url = $6, sku = $7, expiry = $8, active = $9, updated_at = now() \
             WHERE id = $10 \
             RETURNING *",
        )
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(&draft.category)
        .bind(draft.quantity)
        .bind(draft.unit_price)
        .bind(&draft.image_url)
        .bind(&draft.sku)
        .bind(draft.expiry)
        .bind(draft.active)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        product.ok_or(StoreError::NotFound)
    }

    /// Stock adjustment for one record. Used by the bulk update fan-out; each
    /// call stands alone with no coordination across the batch.
    pub async fn set_quantity(&self, id: Uuid, quantity: i64) -> Result<Product, StoreError> {
        let product = sqlx::query_as::<_, Product>(
            "UPDATE products SET quantity = $1, updated_at = now() WHERE id = $2 RETURNING *",
        )
        .bind(quantity)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        product.ok_or(StoreError::NotFound)
    }

    /// Hard delete. Returns the removed record.
    pub async fn delete(&self, id: Uuid) -> Result<Product, StoreError> {
        let product = sqlx::query_as::<_, Product>(
            "DELETE FROM products WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        product.ok_or(StoreError::NotFound)
    }
}

fn bind_param_query<'q>(
    q: sqlx::query::Query<'q, sqlx::Postgres, PgArguments>,
    bind: &'q Bind,
) -> sqlx::query::Query<'q, sqlx::Postgres, PgArguments> {
    match bind {
        Bind::Int(v) => q.bind(*v),
        Bind::Float(v) => q.bind(*v),
        Bind::Text(v) => q.bind(v),
        Bind::Timestamp(v) => q.bind(*v),
    }
}

fn bind_param_query_as<'q, O>(
    q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>,
    bind: &'q Bind,
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>
where
    O: for<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow>,
{
    match bind {
        Bind::Int(v) => q.bind(*v),
        Bind::Float(v) => q.bind(*v),
        Bind::Text(v) => q.bind(v),
        Bind::Timestamp(v) => q.bind(*v),
    }
}
