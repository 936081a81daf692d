use std::collections::HashMap;

use tokio::sync::RwLock;

use shopchat_core::domain::order::{Order, OrderId, OrderStatus};
use shopchat_core::domain::product::{PriceSort, Product, ProductId};

use super::{
    CancellationOutcome, CatalogFilter, CatalogRepository, OrderRepository, RepositoryError,
};

/// Backing `Vec` preserves catalog natural order, which is what breaks
/// price ties after the stable sort.
#[derive(Default)]
pub struct InMemoryCatalogRepository {
    products: RwLock<Vec<Product>>,
}

impl InMemoryCatalogRepository {
    pub async fn with_products(products: Vec<Product>) -> Self {
        let repo = Self::default();
        {
            let mut guard = repo.products.write().await;
            *guard = products;
        }
        repo
    }
}

#[async_trait::async_trait]
impl CatalogRepository for InMemoryCatalogRepository {
    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, RepositoryError> {
        let products = self.products.read().await;
        Ok(products.iter().find(|product| &product.id == id).cloned())
    }

    async fn list_filtered(
        &self,
        filter: &CatalogFilter,
    ) -> Result<Vec<Product>, RepositoryError> {
        let products = self.products.read().await;
        let matched = products
            .iter()
            .filter(|product| {
                filter.category.map_or(true, |category| product.category == category)
                    && filter.admits_price(&product.price)
            })
            .cloned()
            .collect();
        Ok(sorted_and_limited(matched, filter.sort, filter.limit))
    }

    async fn search_text(
        &self,
        query: &str,
        filter: &CatalogFilter,
    ) -> Result<Vec<Product>, RepositoryError> {
        let needle = query.trim().to_ascii_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }

        let products = self.products.read().await;
        let matched = products
            .iter()
            .filter(|product| {
                (product.name.to_ascii_lowercase().contains(&needle)
                    || product.description.to_ascii_lowercase().contains(&needle))
                    && filter.admits_price(&product.price)
            })
            .cloned()
            .collect();
        Ok(sorted_and_limited(matched, filter.sort, filter.limit))
    }

    async fn search_keywords(
        &self,
        words: &[String],
        filter: &CatalogFilter,
    ) -> Result<Vec<Product>, RepositoryError> {
        if words.is_empty() {
            return Ok(Vec::new());
        }

        let needles: Vec<String> =
            words.iter().map(|word| word.to_ascii_lowercase()).collect();
        let products = self.products.read().await;
        let matched = products
            .iter()
            .filter(|product| {
                let name = product.name.to_ascii_lowercase();
                let description = product.description.to_ascii_lowercase();
                let category = product.category.as_str();
                needles.iter().any(|needle| {
                    name.contains(needle)
                        || description.contains(needle)
                        || category.contains(needle.as_str())
                }) && filter.admits_price(&product.price)
            })
            .cloned()
            .collect();
        Ok(sorted_and_limited(matched, filter.sort, filter.limit))
    }

    async fn cheapest(&self, limit: u32) -> Result<Vec<Product>, RepositoryError> {
        let products = self.products.read().await;
        Ok(sorted_and_limited(products.clone(), PriceSort::Ascending, limit))
    }

    async fn save(&self, product: Product) -> Result<(), RepositoryError> {
        let mut products = self.products.write().await;
        if let Some(existing) = products.iter_mut().find(|entry| entry.id == product.id) {
            *existing = product;
        } else {
            products.push(product);
        }
        Ok(())
    }
}

fn sorted_and_limited(mut products: Vec<Product>, sort: PriceSort, limit: u32) -> Vec<Product> {
    // Stable sort: equal prices keep catalog natural order.
    match sort {
        PriceSort::Ascending => products.sort_by(|a, b| a.price.cmp(&b.price)),
        PriceSort::Descending => products.sort_by(|a, b| b.price.cmp(&a.price)),
    }
    products.truncate(limit as usize);
    products
}

#[derive(Default)]
pub struct InMemoryOrderRepository {
    orders: RwLock<HashMap<String, Order>>,
}

#[async_trait::async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn find_by_number(&self, id: &OrderId) -> Result<Option<Order>, RepositoryError> {
        let orders = self.orders.read().await;
        Ok(orders.get(id.as_str()).cloned())
    }

    async fn save(&self, order: Order) -> Result<(), RepositoryError> {
        let mut orders = self.orders.write().await;
        orders.insert(order.id.as_str().to_string(), order);
        Ok(())
    }

    async fn cancel_if_open(&self, id: &OrderId) -> Result<CancellationOutcome, RepositoryError> {
        // Status is revalidated under the write lock, the in-memory
        // equivalent of the SQL conditional update.
        let mut orders = self.orders.write().await;
        let Some(order) = orders.get_mut(id.as_str()) else {
            return Ok(CancellationOutcome::NotFound);
        };

        if !order.status.can_cancel() {
            return Ok(CancellationOutcome::NotCancellable(order.status));
        }

        order.status = OrderStatus::Cancelled;
        Ok(CancellationOutcome::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use rust_decimal::Decimal;

    use shopchat_core::domain::order::{Order, OrderId, OrderStatus, PaymentSummary};
    use shopchat_core::domain::product::{Category, PriceSort, Product, ProductId};

    use crate::repositories::{
        CancellationOutcome, CatalogFilter, CatalogRepository, InMemoryCatalogRepository,
        InMemoryOrderRepository, OrderRepository,
    };

    fn product(id: &str, name: &str, cents: i64, category: Category) -> Product {
        Product {
            id: ProductId(id.to_string()),
            name: name.to_string(),
            description: format!("{name} demo unit"),
            price: Decimal::new(cents, 2),
            category,
            image_url: format!("/images/{id}.jpg"),
        }
    }

    fn order(reference: &str, status: OrderStatus) -> Order {
        Order {
            id: OrderId::new(reference),
            status,
            items: Vec::new(),
            shipping_address: "9 Mill Lane, Leeds".to_string(),
            payment: PaymentSummary {
                card_network: "Visa".to_string(),
                last_four: "0019".to_string(),
            },
            created_at: Utc::now(),
            estimated_delivery: Utc::now() + Duration::days(5),
        }
    }

    #[tokio::test]
    async fn category_filter_sorts_ascending_and_limits() {
        let repo = InMemoryCatalogRepository::with_products(vec![
            product("vertex-15", "Vertex 15", 129900, Category::Laptops),
            product("aurora-buds", "Aurora Buds", 7999, Category::Audio),
            product("drift-go", "Drift Go", 4999, Category::Audio),
            product("pulse-max", "Pulse Max", 24999, Category::Audio),
        ])
        .await;

        let found = repo
            .list_filtered(&CatalogFilter {
                category: Some(Category::Audio),
                limit: 2,
                ..CatalogFilter::all(2)
            })
            .await
            .expect("list");

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].id.0, "drift-go");
        assert_eq!(found[1].id.0, "aurora-buds");
    }

    #[tokio::test]
    async fn price_ties_keep_catalog_natural_order() {
        let repo = InMemoryCatalogRepository::with_products(vec![
            product("first-in", "First In", 9900, Category::Accessories),
            product("second-in", "Second In", 9900, Category::Accessories),
        ])
        .await;

        let found = repo.cheapest(5).await.expect("cheapest");
        assert_eq!(found[0].id.0, "first-in");
        assert_eq!(found[1].id.0, "second-in");
    }

    #[tokio::test]
    async fn descending_sort_is_stable_too() {
        let repo = InMemoryCatalogRepository::with_products(vec![
            product("tie-a", "Tie A", 5000, Category::Accessories),
            product("tie-b", "Tie B", 5000, Category::Accessories),
            product("peak", "Peak", 9000, Category::Accessories),
        ])
        .await;

        let found = repo
            .list_filtered(&CatalogFilter {
                sort: PriceSort::Descending,
                ..CatalogFilter::all(5)
            })
            .await
            .expect("list");

        assert_eq!(found[0].id.0, "peak");
        assert_eq!(found[1].id.0, "tie-a");
        assert_eq!(found[2].id.0, "tie-b");
    }

    #[tokio::test]
    async fn keyword_search_matches_category_names() {
        let repo = InMemoryCatalogRepository::with_products(vec![
            product("lux-frame", "Lux Frame", 15900, Category::Cameras),
            product("vertex-15", "Vertex 15", 129900, Category::Laptops),
        ])
        .await;

        let found = repo
            .search_keywords(&["cameras".to_string()], &CatalogFilter::all(10))
            .await
            .expect("search");

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id.0, "lux-frame");
    }

    #[tokio::test]
    async fn in_memory_order_repo_round_trip() {
        let repo = InMemoryOrderRepository::default();
        let saved = order("ORD-10001-20002", OrderStatus::Pending);
        repo.save(saved.clone()).await.expect("save order");

        let found = repo.find_by_number(&OrderId::new("ord-10001-20002")).await.expect("find");
        assert_eq!(found, Some(saved));
    }

    #[tokio::test]
    async fn cancel_revalidates_status_under_lock() {
        let repo = InMemoryOrderRepository::default();
        repo.save(order("ORD-10001-20002", OrderStatus::Shipped)).await.expect("save");

        let outcome =
            repo.cancel_if_open(&OrderId::new("ORD-10001-20002")).await.expect("cancel");
        assert_eq!(outcome, CancellationOutcome::NotCancellable(OrderStatus::Shipped));

        let found = repo
            .find_by_number(&OrderId::new("ORD-10001-20002"))
            .await
            .expect("find")
            .expect("order exists");
        assert_eq!(found.status, OrderStatus::Shipped);
    }
}
