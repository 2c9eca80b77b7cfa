use chrono::{DateTime, Utc};

use crate::config::CatalogConfig;

/// A typed bind parameter for a generated query. Keeping binds typed (rather
/// than stringly) lets the store hand each one to sqlx with the right Postgres
/// type.
#[derive(Debug, Clone, PartialEq)]
pub enum Bind {
    Int(i64),
    Float(f64),
    Text(String),
    Timestamp(DateTime<Utc>),
}

/// Rendered SQL plus its positional parameters (`$1`..`$n`). Values are never
/// interpolated into the SQL text.
#[derive(Debug, Clone)]
pub struct SqlQuery {
    pub sql: String,
    pub params: Vec<Bind>,
}

/// One condition of a product query. Each route variant composes a handful of
/// these; rendering produces an `AND`-joined WHERE clause.
#[derive(Debug, Clone, PartialEq)]
enum Predicate {
    ActiveOnly,
    /// Case-insensitive substring over name, description, category and sku.
    KeywordAny(String),
    CategoryContains(String),
    QuantityGt(i64),
    QuantityLte(i64),
    QuantityEq(i64),
    /// Inclusive on both ends.
    PriceBetween(f64, f64),
    ExpiredBefore(DateTime<Utc>),
}

/// Sort keys permitted on the sort route. Anything outside this allow-list
/// silently falls back to `Name`; raw field names are never spliced into SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Name,
    UnitPrice,
    Quantity,
    Category,
    CreatedAt,
}

impl SortField {
    pub fn parse_or_default(raw: &str) -> Self {
        match raw {
            "name" => SortField::Name,
            "unitPrice" => SortField::UnitPrice,
            "quantity" => SortField::Quantity,
            "category" => SortField::Category,
            "createdAt" => SortField::CreatedAt,
            _ => SortField::Name,
        }
    }

    fn column(self) -> &'static str {
        match self {
            SortField::Name => "name",
            SortField::UnitPrice => "unit_price",
            SortField::Quantity => "quantity",
            SortField::Category => "category",
            SortField::CreatedAt => "created_at",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    /// `"desc"` sorts descending; any other value sorts ascending.
    pub fn parse(raw: &str) -> Self {
        if raw == "desc" {
            SortOrder::Desc
        } else {
            SortOrder::Asc
        }
    }

    fn sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Pagination as requested by the caller. Malformed numeric input falls back
/// to the defaults; a limit of 0 means "return everything, no pagination
/// metadata". Non-positive pages are deliberately not clamped, so their
/// negative skip surfaces as a storage error exactly as it always has.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSpec {
    pub page: i64,
    pub limit: i64,
}

impl PageSpec {
    pub fn from_params(page: Option<&str>, limit: Option<&str>) -> Self {
        Self {
            page: page.and_then(|p| p.parse().ok()).unwrap_or(1),
            limit: limit.and_then(|l| l.parse().ok()).unwrap_or(0),
        }
    }

    pub fn is_paginated(&self) -> bool {
        self.limit > 0
    }

    pub fn skip(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

/// The single internal representation every route variant maps onto:
/// a predicate list, an optional sort key, and an optional page spec.
#[derive(Debug, Clone)]
pub struct ProductQuery {
    predicates: Vec<Predicate>,
    sort: Option<(SortField, SortOrder)>,
    page: Option<PageSpec>,
}

impl ProductQuery {
    fn new() -> Self {
        Self {
            predicates: Vec::new(),
            sort: None,
            page: None,
        }
    }

    fn active_scoped(catalog: &CatalogConfig) -> Self {
        let mut query = Self::new();
        if catalog.filter_inactive {
            query.predicates.push(Predicate::ActiveOnly);
        }
        query
    }

    /// Default listing: newest first, optionally paginated.
    pub fn list(catalog: &CatalogConfig, page: PageSpec) -> Self {
        let mut query = Self::active_scoped(catalog);
        query.sort = Some((SortField::CreatedAt, SortOrder::Desc));
        query.page = Some(page);
        query
    }

    /// Keyword search across name, description, category and sku. An empty
    /// keyword is a substring of everything and matches every row.
    pub fn search(catalog: &CatalogConfig, keyword: &str) -> Self {
        let mut query = Self::active_scoped(catalog);
        query
            .predicates
            .push(Predicate::KeywordAny(keyword.to_string()));
        query
    }

    /// Substring (not exact) category match, case-insensitive.
    pub fn by_category(catalog: &CatalogConfig, category: &str) -> Self {
        let mut query = Self::active_scoped(catalog);
        query
            .predicates
            .push(Predicate::CategoryContains(category.to_string()));
        query
    }

    /// The explicit active filter always constrains to active rows, whatever
    /// the deployment's listing default is.
    pub fn active() -> Self {
        let mut query = Self::new();
        query.predicates.push(Predicate::ActiveOnly);
        query
    }

    /// `0 < quantity <= threshold`. Zero-quantity rows are out-of-stock, not
    /// low-stock. Not scoped to active rows. Threshold defaults to 10 when the
    /// path segment is not numeric.
    pub fn low_stock(raw_threshold: &str) -> Self {
        let threshold = raw_threshold.parse().unwrap_or(10);
        let mut query = Self::new();
        query.predicates.push(Predicate::QuantityGt(0));
        query.predicates.push(Predicate::QuantityLte(threshold));
        query
    }

    /// Rows whose expiry has passed. A row without an expiry never expires
    /// (SQL NULL comparison excludes it).
    pub fn expired(now: DateTime<Utc>) -> Self {
        let mut query = Self::new();
        query.predicates.push(Predicate::ExpiredBefore(now));
        query
    }

    /// Inclusive price range. Malformed or absent bounds fall back to 0 and
    /// the maximum representable value.
    pub fn price_range(catalog: &CatalogConfig, min: Option<&str>, max: Option<&str>) -> Self {
        let min = min.and_then(|v| v.parse().ok()).unwrap_or(0.0);
        let max = max.and_then(|v| v.parse().ok()).unwrap_or(f64::MAX);
        let mut query = Self::active_scoped(catalog);
        query.predicates.push(Predicate::PriceBetween(min, max));
        query
    }

    pub fn in_stock(catalog: &CatalogConfig) -> Self {
        let mut query = Self::active_scoped(catalog);
        query.predicates.push(Predicate::QuantityGt(0));
        query
    }

    pub fn out_of_stock(catalog: &CatalogConfig) -> Self {
        let mut query = Self::active_scoped(catalog);
        query.predicates.push(Predicate::QuantityEq(0));
        query
    }

    /// Sorted listing. The field goes through the allow-list; the order string
    /// only sorts descending on the literal `"desc"`.
    pub fn sorted(catalog: &CatalogConfig, field: &str, order: &str) -> Self {
        let mut query = Self::active_scoped(catalog);
        query.sort = Some((SortField::parse_or_default(field), SortOrder::parse(order)));
        query
    }

    pub fn to_select_sql(&self) -> SqlQuery {
        let mut params = Vec::new();
        let mut sql = String::from("SELECT * FROM products");

        let where_clause = self.render_where(&mut params);
        if !where_clause.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&where_clause);
        }

        if let Some((field, order)) = self.sort {
            sql.push_str(&format!(" ORDER BY {} {}", field.column(), order.sql()));
        }

        if let Some(page) = self.page {
            if page.is_paginated() {
                // Numeric values formatted inline; skip stays unclamped.
                sql.push_str(&format!(" LIMIT {} OFFSET {}", page.limit, page.skip()));
            }
        }

        SqlQuery { sql, params }
    }

    /// Same predicates, no sort or pagination. Used for the total that feeds
    /// pagination metadata.
    pub fn to_count_sql(&self) -> SqlQuery {
        let mut params = Vec::new();
        let mut sql = String::from("SELECT COUNT(*) FROM products");
        let where_clause = self.render_where(&mut params);
        if !where_clause.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&where_clause);
        }
        SqlQuery { sql, params }
    }

    fn render_where(&self, params: &mut Vec<Bind>) -> String {
        self.predicates
            .iter()
            .map(|p| p.render(params))
            .collect::<Vec<_>>()
            .join(" AND ")
    }
}

impl Predicate {
    fn render(&self, params: &mut Vec<Bind>) -> String {
        let mut param = |bind: Bind| {
            params.push(bind);
            format!("${}", params.len())
        };

        match self {
            Predicate::ActiveOnly => "active = TRUE".to_string(),
            Predicate::KeywordAny(keyword) => {
                let pattern = contains_pattern(keyword);
                format!(
                    "(name ILIKE {} OR description ILIKE {} OR category ILIKE {} OR sku ILIKE {})",
                    param(Bind::Text(pattern.clone())),
                    param(Bind::Text(pattern.clone())),
                    param(Bind::Text(pattern.clone())),
                    param(Bind::Text(pattern)),
                )
            }
            Predicate::CategoryContains(category) => {
                format!("category ILIKE {}", param(Bind::Text(contains_pattern(category))))
            }
            Predicate::QuantityGt(n) => format!("quantity > {}", param(Bind::Int(*n))),
            Predicate::QuantityLte(n) => format!("quantity <= {}", param(Bind::Int(*n))),
            Predicate::QuantityEq(n) => format!("quantity = {}", param(Bind::Int(*n))),
            Predicate::PriceBetween(min, max) => format!(
                "unit_price >= {} AND unit_price <= {}",
                param(Bind::Float(*min)),
                param(Bind::Float(*max)),
            ),
            Predicate::ExpiredBefore(now) => {
                format!("expiry < {}", param(Bind::Timestamp(*now)))
            }
        }
    }
}

/// Build an ILIKE pattern that matches the input as a literal substring.
/// LIKE metacharacters in the input are escaped so `50%` only matches rows
/// containing `50%`.
fn contains_pattern(input: &str) -> String {
    let escaped = input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}
