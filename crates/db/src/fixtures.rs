use crate::connection::DbPool;
use crate::repositories::RepositoryError;
use sqlx::Executor;

const SEED_PRODUCT_IDS: &[&str] = &[
    "vertex-15",
    "vertex-pro-17",
    "notae-air",
    "halo-x",
    "halo-lite",
    "aurora-buds",
    "drift-go",
    "pulse-max",
    "tempo-band",
    "tempo-watch",
    "orbit-tab",
    "orbit-tab-pro",
    "lux-frame",
    "lux-action",
    "keyline-mk2",
    "glide-mouse",
];

/// Order number, expected status, expected item count.
const SEED_ORDERS: &[(&str, &str, i64)] = &[
    ("ORD-10001-20002", "pending", 2),
    ("ORD-30003-40004", "processing", 1),
    ("ORD-50005-60006", "shipped", 2),
    ("ORD-70007-80008", "delivered", 2),
];

const SEED_CATEGORIES: &[&str] =
    &["laptops", "smartphones", "audio", "wearables", "tablets", "cameras", "accessories"];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeedResult {
    pub products_seeded: usize,
    pub orders_seeded: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerificationResult {
    pub passed: bool,
    pub checks: Vec<(String, bool)>,
}

/// Deterministic demo storefront dataset: full category coverage for the
/// search cascade plus one order per fulfilment state for the resolver.
pub struct DemoDataset;

impl DemoDataset {
    pub const SQL: &'static str = include_str!("../../../config/fixtures/demo_catalog.sql");

    /// Load the demo dataset. Idempotent: re-running replaces seed rows.
    pub async fn load(pool: &DbPool) -> Result<SeedResult, RepositoryError> {
        let mut tx = pool.begin().await?;
        tx.execute(sqlx::query(Self::SQL)).await?;
        tx.commit().await?;

        Ok(SeedResult {
            products_seeded: SEED_PRODUCT_IDS.len(),
            orders_seeded: SEED_ORDERS.len(),
        })
    }

    /// Verify that the seeded rows match the contract above.
    pub async fn verify(pool: &DbPool) -> Result<VerificationResult, RepositoryError> {
        let mut checks = Vec::new();

        let product_count: i64 = sqlx::query_scalar("SELECT COUNT(1) FROM product")
            .fetch_one(pool)
            .await?;
        checks.push((
            "product-count".to_string(),
            product_count >= SEED_PRODUCT_IDS.len() as i64,
        ));

        for category in SEED_CATEGORIES {
            let count: i64 =
                sqlx::query_scalar("SELECT COUNT(1) FROM product WHERE category = ?1")
                    .bind(category)
                    .fetch_one(pool)
                    .await?;
            checks.push((format!("category-{category}"), count >= 1));
        }

        for (order_number, status, item_count) in SEED_ORDERS {
            let order_ok: i64 = sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM customer_order WHERE order_number = ?1 AND status = ?2)",
            )
            .bind(order_number)
            .bind(status)
            .fetch_one(pool)
            .await?;
            checks.push((format!("order-{order_number}"), order_ok == 1));

            let items: i64 =
                sqlx::query_scalar("SELECT COUNT(1) FROM order_item WHERE order_number = ?1")
                    .bind(order_number)
                    .fetch_one(pool)
                    .await?;
            checks.push((format!("order-{order_number}-items"), items == *item_count));
        }

        let passed = checks.iter().all(|(_, ok)| *ok);
        Ok(VerificationResult { passed, checks })
    }
}
