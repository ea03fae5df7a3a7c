//! Order listing, status updates and dashboard statistics.

use reqwest::Method;
use serde_json::json;

use carhouse_core::{OrderStatus, ServiceError};

use crate::backend::{Backend, FailureKind};
use crate::model::{Order, Statistics};

impl Backend {
    /// All orders with the customer joined and items embedded.
    pub async fn get_orders(&self) -> Result<Vec<Order>, ServiceError> {
        let value = self.get_json("/rest/orders?include=user").await?;
        Self::items(value, "order")
    }

    /// Set an order's status. One call per change event, no coalescing.
    pub async fn update_order_status(
        &self,
        id: &str,
        status: OrderStatus,
    ) -> Result<Order, ServiceError> {
        let body = json!({"status": status});
        let value = self
            .execute(
                self.request(Method::PATCH, &format!("/rest/orders/{}/status", id))
                    .json(&body),
                FailureKind::Write,
            )
            .await?;
        Self::record(value, "order")
    }

    /// Aggregate counts and total revenue.
    pub async fn get_statistics(&self) -> Result<Statistics, ServiceError> {
        let value = self.get_json("/rest/statistics").await?;
        Self::record(value, "statistics")
    }
}
