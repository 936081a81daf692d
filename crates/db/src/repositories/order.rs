use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::Row;

use shopchat_core::domain::order::{Order, OrderId, OrderItem, OrderStatus, PaymentSummary};
use shopchat_core::domain::product::ProductId;

use super::catalog::price_to_cents;
use super::{CancellationOutcome, OrderRepository, RepositoryError};
use crate::DbPool;

pub struct SqlOrderRepository {
    pool: DbPool,
}

impl SqlOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl OrderRepository for SqlOrderRepository {
    async fn find_by_number(&self, id: &OrderId) -> Result<Option<Order>, RepositoryError> {
        let Some(header) = sqlx::query(
            "SELECT order_number, status, shipping_address, card_network, card_last_four,
                    created_at, estimated_delivery
             FROM customer_order WHERE order_number = ?1",
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await?
        else {
            return Ok(None);
        };

        let items = sqlx::query(
            "SELECT product_id, name, quantity, unit_price_cents
             FROM order_item WHERE order_number = ?1 ORDER BY id ASC",
        )
        .bind(id.as_str())
        .fetch_all(&self.pool)
        .await?
        .iter()
        .map(|row| {
            let quantity: i64 = row.try_get("quantity")?;
            let unit_price_cents: i64 = row.try_get("unit_price_cents")?;
            Ok(OrderItem {
                product_id: ProductId(row.try_get("product_id")?),
                name: row.try_get("name")?,
                quantity: quantity as u32,
                unit_price: Decimal::new(unit_price_cents, 2),
            })
        })
        .collect::<Result<Vec<_>, RepositoryError>>()?;

        let status: String = header.try_get("status")?;
        let status = status
            .parse::<OrderStatus>()
            .map_err(|error| RepositoryError::Decode(error.to_string()))?;

        Ok(Some(Order {
            id: OrderId::new(header.try_get::<String, _>("order_number")?),
            status,
            items,
            shipping_address: header.try_get("shipping_address")?,
            payment: PaymentSummary {
                card_network: header.try_get("card_network")?,
                last_four: header.try_get("card_last_four")?,
            },
            created_at: header.try_get::<DateTime<Utc>, _>("created_at")?,
            estimated_delivery: header.try_get::<DateTime<Utc>, _>("estimated_delivery")?,
        }))
    }

    async fn save(&self, order: Order) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO customer_order
                 (order_number, status, shipping_address, card_network, card_last_four,
                  created_at, estimated_delivery)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT(order_number) DO UPDATE SET
                 status = excluded.status,
                 shipping_address = excluded.shipping_address,
                 card_network = excluded.card_network,
                 card_last_four = excluded.card_last_four,
                 created_at = excluded.created_at,
                 estimated_delivery = excluded.estimated_delivery",
        )
        .bind(order.id.as_str())
        .bind(order.status.as_str())
        .bind(&order.shipping_address)
        .bind(&order.payment.card_network)
        .bind(&order.payment.last_four)
        .bind(order.created_at)
        .bind(order.estimated_delivery)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM order_item WHERE order_number = ?1")
            .bind(order.id.as_str())
            .execute(&mut *tx)
            .await?;

        for item in &order.items {
            sqlx::query(
                "INSERT INTO order_item (order_number, product_id, name, quantity, unit_price_cents)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )
            .bind(order.id.as_str())
            .bind(&item.product_id.0)
            .bind(&item.name)
            .bind(i64::from(item.quantity))
            .bind(price_to_cents(&item.unit_price)?)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn cancel_if_open(&self, id: &OrderId) -> Result<CancellationOutcome, RepositoryError> {
        // Single conditional write: only commits while the order is still
        // pending/processing, so a concurrent shipment update cannot be
        // overwritten.
        let updated = sqlx::query(
            "UPDATE customer_order SET status = 'cancelled'
             WHERE order_number = ?1 AND status IN ('pending', 'processing')",
        )
        .bind(id.as_str())
        .execute(&self.pool)
        .await?;

        if updated.rows_affected() > 0 {
            return Ok(CancellationOutcome::Cancelled);
        }

        let status: Option<String> =
            sqlx::query_scalar("SELECT status FROM customer_order WHERE order_number = ?1")
                .bind(id.as_str())
                .fetch_optional(&self.pool)
                .await?;

        match status {
            None => Ok(CancellationOutcome::NotFound),
            Some(raw) => {
                let status = raw
                    .parse::<OrderStatus>()
                    .map_err(|error| RepositoryError::Decode(error.to_string()))?;
                Ok(CancellationOutcome::NotCancellable(status))
            }
        }
    }
}
