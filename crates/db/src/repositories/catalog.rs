use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite};

use shopchat_core::domain::product::{Category, PriceSort, Product, ProductId};

use super::{CatalogFilter, CatalogRepository, RepositoryError};
use crate::DbPool;

const PRODUCT_COLUMNS: &str =
    "product_id, name, description, price_cents, category, image_url";

pub struct SqlCatalogRepository {
    pool: DbPool,
}

impl SqlCatalogRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl CatalogRepository for SqlCatalogRepository {
    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM product WHERE product_id = ?1"
        ))
        .bind(&id.0)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_product).transpose()
    }

    async fn list_filtered(
        &self,
        filter: &CatalogFilter,
    ) -> Result<Vec<Product>, RepositoryError> {
        let mut builder = select_products();
        if let Some(category) = filter.category {
            builder.push(" AND category = ").push_bind(category.as_str());
        }
        push_price_bounds(&mut builder, filter)?;
        push_order_and_limit(&mut builder, filter.sort, filter.limit);

        collect_products(builder, &self.pool).await
    }

    async fn search_text(
        &self,
        query: &str,
        filter: &CatalogFilter,
    ) -> Result<Vec<Product>, RepositoryError> {
        let needle = like_pattern(query);
        let mut builder = select_products();
        builder.push(" AND (lower(name) LIKE ").push_bind(needle.clone());
        builder.push(" OR lower(description) LIKE ").push_bind(needle);
        builder.push(")");
        push_price_bounds(&mut builder, filter)?;
        push_order_and_limit(&mut builder, filter.sort, filter.limit);

        collect_products(builder, &self.pool).await
    }

    async fn search_keywords(
        &self,
        words: &[String],
        filter: &CatalogFilter,
    ) -> Result<Vec<Product>, RepositoryError> {
        if words.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder = select_products();
        builder.push(" AND (");
        for (index, word) in words.iter().enumerate() {
            if index > 0 {
                builder.push(" OR ");
            }
            let needle = like_pattern(word);
            builder.push("(lower(name) LIKE ").push_bind(needle.clone());
            builder.push(" OR lower(description) LIKE ").push_bind(needle.clone());
            builder.push(" OR category LIKE ").push_bind(needle);
            builder.push(")");
        }
        builder.push(")");
        push_price_bounds(&mut builder, filter)?;
        push_order_and_limit(&mut builder, filter.sort, filter.limit);

        collect_products(builder, &self.pool).await
    }

    async fn cheapest(&self, limit: u32) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM product ORDER BY price_cents ASC, id ASC LIMIT ?1"
        ))
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_product).collect()
    }

    async fn save(&self, product: Product) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO product (product_id, name, description, price_cents, category, image_url)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(product_id) DO UPDATE SET
                 name = excluded.name,
                 description = excluded.description,
                 price_cents = excluded.price_cents,
                 category = excluded.category,
                 image_url = excluded.image_url",
        )
        .bind(&product.id.0)
        .bind(&product.name)
        .bind(&product.description)
        .bind(price_to_cents(&product.price)?)
        .bind(product.category.as_str())
        .bind(&product.image_url)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

fn select_products() -> QueryBuilder<'static, Sqlite> {
    QueryBuilder::new(format!("SELECT {PRODUCT_COLUMNS} FROM product WHERE 1 = 1"))
}

fn push_price_bounds(
    builder: &mut QueryBuilder<'_, Sqlite>,
    filter: &CatalogFilter,
) -> Result<(), RepositoryError> {
    if let Some(floor) = &filter.min_price {
        builder.push(" AND price_cents >= ").push_bind(price_to_cents(floor)?);
    }
    if let Some(ceiling) = &filter.max_price {
        builder.push(" AND price_cents <= ").push_bind(price_to_cents(ceiling)?);
    }
    Ok(())
}

fn push_order_and_limit(builder: &mut QueryBuilder<'_, Sqlite>, sort: PriceSort, limit: u32) {
    // `id ASC` keeps price ties in catalog natural order in both directions.
    match sort {
        PriceSort::Ascending => builder.push(" ORDER BY price_cents ASC, id ASC"),
        PriceSort::Descending => builder.push(" ORDER BY price_cents DESC, id ASC"),
    };
    builder.push(" LIMIT ").push_bind(i64::from(limit));
}

async fn collect_products(
    mut builder: QueryBuilder<'_, Sqlite>,
    pool: &DbPool,
) -> Result<Vec<Product>, RepositoryError> {
    let rows = builder.build().fetch_all(pool).await?;
    rows.iter().map(row_to_product).collect()
}

fn like_pattern(term: &str) -> String {
    format!("%{}%", term.trim().to_ascii_lowercase())
}

pub(crate) fn price_to_cents(price: &Decimal) -> Result<i64, RepositoryError> {
    let cents = (price * Decimal::ONE_HUNDRED).round();
    cents
        .to_i64()
        .filter(|value| *value >= 0)
        .ok_or_else(|| RepositoryError::Decode(format!("price out of range: {price}")))
}

fn row_to_product(row: &SqliteRow) -> Result<Product, RepositoryError> {
    let category: String = row.try_get("category")?;
    let category = category
        .parse::<Category>()
        .map_err(|error| RepositoryError::Decode(error.to_string()))?;
    let price_cents: i64 = row.try_get("price_cents")?;

    Ok(Product {
        id: ProductId(row.try_get("product_id")?),
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        price: Decimal::new(price_cents, 2),
        category,
        image_url: row.try_get("image_url")?,
    })
}
