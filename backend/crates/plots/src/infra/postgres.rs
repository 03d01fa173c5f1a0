//! PostgreSQL Repository Implementation

use chrono::{DateTime, Utc};
use kernel::error::conversions::is_unique_violation;
use kernel::id::PlotId;
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::entities::{NewPlot, Plot, PlotChanges};
use crate::domain::repository::PlotRepository;
use crate::domain::value_objects::{PlotFilter, PlotStatus, escape_like};
use crate::error::{PlotError, PlotResult};

/// Column list shared by every query returning plots.
/// `price` is read back as FLOAT8 and NULL text columns are normalized.
const PLOT_COLUMNS: &str = r#"
    id,
    plot_number,
    location,
    size,
    price::FLOAT8 AS price,
    status,
    COALESCE(description, '') AS description,
    COALESCE(amenities, ARRAY[]::TEXT[]) AS amenities,
    created_at,
    updated_at
"#;

/// Example records inserted into an empty table
const SEED_PLOTS: [(&str, &str, &str, f64, PlotStatus, &str, &[&str]); 5] = [
    (
        "P001",
        "North Wing",
        "1000 sq ft",
        50000.00,
        PlotStatus::Available,
        "Prime location with excellent view",
        &["parking", "garden", "security"],
    ),
    (
        "P002",
        "South Wing",
        "1200 sq ft",
        60000.00,
        PlotStatus::Available,
        "Spacious plot with modern facilities",
        &["parking", "playground", "security"],
    ),
    (
        "P003",
        "East Wing",
        "800 sq ft",
        40000.00,
        PlotStatus::Reserved,
        "Compact plot suitable for small families",
        &["parking", "security"],
    ),
    (
        "P004",
        "West Wing",
        "1500 sq ft",
        75000.00,
        PlotStatus::Available,
        "Premium plot with all amenities",
        &["parking", "garden", "security", "playground"],
    ),
    (
        "P005",
        "Central Area",
        "900 sq ft",
        45000.00,
        PlotStatus::Sold,
        "Centrally located compact plot",
        &["parking", "security"],
    ),
];

/// PostgreSQL-backed plot repository
#[derive(Clone)]
pub struct PgPlotRepository {
    pool: PgPool,
}

impl PgPlotRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the `plots` table and its indexes if they do not exist
    pub async fn ensure_schema(&self) -> PlotResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS plots (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                plot_number VARCHAR(20) UNIQUE NOT NULL,
                location VARCHAR(200) NOT NULL,
                size VARCHAR(50) NOT NULL,
                price DECIMAL(12,2) NOT NULL CHECK (price > 0),
                status VARCHAR(20) NOT NULL DEFAULT 'available'
                    CHECK (status IN ('available', 'reserved', 'sold')),
                description TEXT,
                amenities TEXT[],
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        for ddl in [
            "CREATE INDEX IF NOT EXISTS idx_plots_status ON plots(status)",
            "CREATE INDEX IF NOT EXISTS idx_plots_location ON plots(location)",
            "CREATE INDEX IF NOT EXISTS idx_plots_price ON plots(price)",
        ] {
            sqlx::query(ddl).execute(&self.pool).await?;
        }

        Ok(())
    }

    /// Insert the example records when the table is empty.
    ///
    /// Returns the number of rows inserted (0 when seeding was skipped).
    pub async fn seed_if_empty(&self) -> PlotResult<u64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM plots")
            .fetch_one(&self.pool)
            .await?;

        if count > 0 {
            tracing::info!(existing = count, "Plots table already has data, skipping seed");
            return Ok(0);
        }

        let mut qb = QueryBuilder::<Postgres>::new(
            "INSERT INTO plots (id, plot_number, location, size, price, status, description, amenities) ",
        );
        qb.push_values(
            SEED_PLOTS,
            |mut row, (number, location, size, price, status, description, amenities)| {
                row.push_bind(PlotId::new().into_uuid())
                    .push_bind(number)
                    .push_bind(location)
                    .push_bind(size)
                    .push_bind(price)
                    .push_unseparated("::numeric")
                    .push_bind(status.as_str())
                    .push_bind(description)
                    .push_bind(
                        amenities
                            .iter()
                            .map(|a| a.to_string())
                            .collect::<Vec<String>>(),
                    );
            },
        );

        let inserted = qb.build().execute(&self.pool).await?.rows_affected();

        tracing::info!(inserted, "Inserted sample plots");

        Ok(inserted)
    }
}

impl PlotRepository for PgPlotRepository {
    async fn list(&self, filter: &PlotFilter) -> PlotResult<Vec<Plot>> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {PLOT_COLUMNS} FROM plots WHERE status = "
        ));
        qb.push_bind(filter.status.as_str());

        if let Some(location) = &filter.location {
            qb.push(" AND location ILIKE ")
                .push_bind(format!("%{}%", escape_like(location)));
        }
        if let Some(min_price) = filter.min_price {
            qb.push(" AND price >= ").push_bind(min_price).push("::numeric");
        }
        if let Some(max_price) = filter.max_price {
            qb.push(" AND price <= ").push_bind(max_price).push("::numeric");
        }

        qb.push(" ORDER BY created_at DESC");

        let rows = qb
            .build_query_as::<PlotRow>()
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(PlotRow::into_plot).collect()
    }

    async fn find_by_id(&self, id: PlotId) -> PlotResult<Option<Plot>> {
        let row = sqlx::query_as::<_, PlotRow>(&format!(
            "SELECT {PLOT_COLUMNS} FROM plots WHERE id = $1"
        ))
        .bind(id.into_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(PlotRow::into_plot).transpose()
    }

    async fn find_by_number(&self, plot_number: &str) -> PlotResult<Option<Plot>> {
        let row = sqlx::query_as::<_, PlotRow>(&format!(
            "SELECT {PLOT_COLUMNS} FROM plots WHERE plot_number = $1"
        ))
        .bind(plot_number)
        .fetch_optional(&self.pool)
        .await?;

        row.map(PlotRow::into_plot).transpose()
    }

    async fn create(&self, plot: &NewPlot) -> PlotResult<Plot> {
        let row = sqlx::query_as::<_, PlotRow>(&format!(
            r#"
            INSERT INTO plots (
                id,
                plot_number,
                location,
                size,
                price,
                status,
                description,
                amenities
            ) VALUES ($1, $2, $3, $4, $5::numeric, $6, $7, $8)
            RETURNING {PLOT_COLUMNS}
            "#
        ))
        .bind(PlotId::new().into_uuid())
        .bind(&plot.plot_number)
        .bind(&plot.location)
        .bind(&plot.size)
        .bind(plot.price)
        .bind(plot.status.as_str())
        .bind(&plot.description)
        .bind(&plot.amenities)
        .fetch_one(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        row.into_plot()
    }

    async fn update(&self, id: PlotId, changes: &PlotChanges) -> PlotResult<Option<Plot>> {
        if changes.is_empty() {
            return Err(PlotError::NothingToUpdate);
        }

        let mut qb = QueryBuilder::<Postgres>::new("UPDATE plots SET ");
        {
            let mut set = qb.separated(", ");
            if let Some(v) = &changes.plot_number {
                set.push("plot_number = ").push_bind_unseparated(v);
            }
            if let Some(v) = &changes.location {
                set.push("location = ").push_bind_unseparated(v);
            }
            if let Some(v) = &changes.size {
                set.push("size = ").push_bind_unseparated(v);
            }
            if let Some(v) = changes.price {
                set.push("price = ")
                    .push_bind_unseparated(v)
                    .push_unseparated("::numeric");
            }
            if let Some(v) = changes.status {
                set.push("status = ").push_bind_unseparated(v.as_str());
            }
            if let Some(v) = &changes.description {
                set.push("description = ").push_bind_unseparated(v);
            }
            if let Some(v) = &changes.amenities {
                set.push("amenities = ").push_bind_unseparated(v);
            }
            // Strictly increasing even within one clock tick
            set.push("updated_at = GREATEST(NOW(), updated_at + INTERVAL '1 microsecond')");
        }
        qb.push(" WHERE id = ").push_bind(id.into_uuid());
        qb.push(format!(" RETURNING {PLOT_COLUMNS}"));

        let row = qb
            .build_query_as::<PlotRow>()
            .fetch_optional(&self.pool)
            .await
            .map_err(map_unique_violation)?;

        row.map(PlotRow::into_plot).transpose()
    }

    async fn delete(&self, id: PlotId) -> PlotResult<Option<Plot>> {
        let row = sqlx::query_as::<_, PlotRow>(&format!(
            "DELETE FROM plots WHERE id = $1 RETURNING {PLOT_COLUMNS}"
        ))
        .bind(id.into_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(PlotRow::into_plot).transpose()
    }
}

fn map_unique_violation(err: sqlx::Error) -> PlotError {
    if is_unique_violation(&err) {
        PlotError::PlotNumberTaken
    } else {
        PlotError::Database(err)
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct PlotRow {
    id: Uuid,
    plot_number: String,
    location: String,
    size: String,
    price: f64,
    status: String,
    description: String,
    amenities: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PlotRow {
    fn into_plot(self) -> PlotResult<Plot> {
        let status = PlotStatus::from_str(&self.status)
            .map_err(|e| PlotError::Internal(format!("Invalid status: {}", e)))?;

        Ok(Plot {
            id: PlotId::from_uuid(self.id),
            plot_number: self.plot_number,
            location: self.location,
            size: self.size,
            price: self.price,
            status,
            description: self.description,
            amenities: self.amenities,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
