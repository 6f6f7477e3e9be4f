use std::collections::HashMap;
use std::str::FromStr;

use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::delivery::DeliveryInfo;
use crate::domain::errors::DomainError;
use crate::domain::order::{
    page_offset, ConfirmationStatus, ConfirmationView, ListResult, NewOrder, OrderLineView,
    OrderStatus, OrderView,
};
use crate::domain::ports::OrderRepository;
use crate::schema::{order_lines, order_notifications, orders};

use super::models::{
    NewNotificationRow, NewOrderLineRow, NewOrderRow, NotificationRow, OrderLineRow, OrderRow,
};

pub const EMAIL_CHANNEL: &str = "email";

fn to_view(
    order: OrderRow,
    lines: Vec<OrderLineRow>,
    notification: Option<NotificationRow>,
) -> Result<OrderView, DomainError> {
    let status = OrderStatus::from_str(&order.status).map_err(DomainError::Internal)?;
    let confirmation = match notification {
        Some(n) => ConfirmationView {
            status: ConfirmationStatus::from_str(&n.status).map_err(DomainError::Internal)?,
            last_error: n.last_error,
        },
        None => ConfirmationView {
            status: ConfirmationStatus::Pending,
            last_error: None,
        },
    };

    Ok(OrderView {
        id: order.id,
        delivery: DeliveryInfo {
            full_name: order.full_name,
            email: order.email,
            address: order.address,
            city: order.city,
            zip: order.zip,
            country: order.country,
            phone: order.phone,
        },
        subtotal: order.subtotal,
        shipping: order.shipping,
        grand_total: order.grand_total,
        status,
        confirmation,
        created_at: order.created_at,
        updated_at: order.updated_at,
        lines: lines
            .into_iter()
            .map(|l| OrderLineView {
                id: l.id,
                product_id: l.product_id,
                name: l.name,
                quantity: l.quantity,
                unit_price: l.unit_price,
            })
            .collect(),
    })
}

pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn load_view(conn: &mut PgConnection, id: Uuid) -> Result<Option<OrderView>, DomainError> {
        let order = orders::table
            .find(id)
            .select(OrderRow::as_select())
            .first(conn)
            .optional()?;

        let Some(order) = order else {
            return Ok(None);
        };

        let lines = OrderLineRow::belonging_to(&order)
            .select(OrderLineRow::as_select())
            .order(order_lines::created_at.asc())
            .load(conn)?;

        let notification = NotificationRow::belonging_to(&order)
            .filter(order_notifications::channel.eq(EMAIL_CHANNEL))
            .select(NotificationRow::as_select())
            .first(conn)
            .optional()?;

        to_view(order, lines, notification).map(Some)
    }
}

impl OrderRepository for DieselOrderRepository {
    fn create(&self, order: NewOrder) -> Result<Uuid, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            // 1. Insert the order header with the delivery snapshot
            let order_id = Uuid::new_v4();
            let recipient = order.delivery.email.clone();
            diesel::insert_into(orders::table)
                .values(&NewOrderRow {
                    id: order_id,
                    full_name: order.delivery.full_name,
                    email: order.delivery.email,
                    address: order.delivery.address,
                    city: order.delivery.city,
                    zip: order.delivery.zip,
                    country: order.delivery.country,
                    phone: order.delivery.phone,
                    subtotal: order.subtotal,
                    shipping: order.shipping,
                    grand_total: order.grand_total,
                    status: OrderStatus::Pending.as_str().to_string(),
                })
                .execute(conn)?;

            // 2. Insert line snapshots
            let new_lines: Vec<NewOrderLineRow> = order
                .lines
                .into_iter()
                .map(|l| NewOrderLineRow {
                    id: Uuid::new_v4(),
                    order_id,
                    product_id: l.product_id,
                    name: l.name,
                    quantity: l.quantity,
                    unit_price: l.unit_price,
                })
                .collect();
            diesel::insert_into(order_lines::table)
                .values(&new_lines)
                .execute(conn)?;

            // 3. Pending confirmation in the same transaction, so every
            //    committed order has a row the admin view can flag.
            diesel::insert_into(order_notifications::table)
                .values(&NewNotificationRow {
                    id: Uuid::new_v4(),
                    order_id,
                    channel: EMAIL_CHANNEL.to_string(),
                    recipient,
                    status: ConfirmationStatus::Pending.as_str().to_string(),
                })
                .execute(conn)?;

            Ok(order_id)
        })
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<OrderView>, DomainError> {
        let mut conn = self.pool.get()?;
        Self::load_view(&mut conn, id)
    }

    fn list(&self, page: i64, limit: i64) -> Result<ListResult, DomainError> {
        let mut conn = self.pool.get()?;

        let offset = page_offset(page, limit);
        conn.transaction::<_, DomainError, _>(|conn| {
            let total: i64 = orders::table.count().get_result(conn)?;
            let Some(offset) = offset else {
                return Ok(ListResult {
                    items: Vec::new(),
                    total,
                });
            };

            let rows = orders::table
                .select(OrderRow::as_select())
                .order(orders::created_at.desc())
                .limit(limit)
                .offset(offset)
                .load(conn)?;

            let lines = OrderLineRow::belonging_to(&rows)
                .select(OrderLineRow::as_select())
                .order(order_lines::created_at.asc())
                .load(conn)?
                .grouped_by(&rows);

            let mut notifications: HashMap<Uuid, NotificationRow> =
                NotificationRow::belonging_to(&rows)
                    .filter(order_notifications::channel.eq(EMAIL_CHANNEL))
                    .select(NotificationRow::as_select())
                    .load(conn)?
                    .into_iter()
                    .map(|n| (n.order_id, n))
                    .collect();

            let items = rows
                .into_iter()
                .zip(lines)
                .map(|(order, lines)| {
                    let notification = notifications.remove(&order.id);
                    to_view(order, lines, notification)
                })
                .collect::<Result<Vec<_>, _>>()?;

            Ok(ListResult { items, total })
        })
    }

    fn update_status(
        &self,
        id: Uuid,
        status: OrderStatus,
    ) -> Result<Option<OrderView>, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let updated = diesel::update(orders::table.find(id))
                .set((
                    orders::status.eq(status.as_str()),
                    orders::updated_at.eq(Utc::now()),
                ))
                .execute(conn)?;

            if updated == 0 {
                return Ok(None);
            }
            Self::load_view(conn, id)
        })
    }

    fn record_confirmation(
        &self,
        id: Uuid,
        status: ConfirmationStatus,
        error: Option<String>,
    ) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;

        let updated = diesel::update(
            order_notifications::table
                .filter(order_notifications::order_id.eq(id))
                .filter(order_notifications::channel.eq(EMAIL_CHANNEL)),
        )
        .set((
            order_notifications::status.eq(status.as_str()),
            order_notifications::last_error.eq(error),
            order_notifications::updated_at.eq(Utc::now()),
        ))
        .execute(&mut conn)?;

        if updated == 0 {
            return Err(DomainError::NotFound("Order"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use bigdecimal::BigDecimal;
    use diesel::prelude::*;

    use super::DieselOrderRepository;
    use crate::domain::delivery::DeliveryInfo;
    use crate::domain::order::{ConfirmationStatus, NewOrder, OrderLineInput, OrderStatus};
    use crate::domain::ports::OrderRepository;
    use crate::infrastructure::models::NotificationRow;
    use crate::infrastructure::test_db::setup_db;
    use crate::schema::order_notifications;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).expect("valid decimal")
    }

    fn make_order(price: &str) -> NewOrder {
        NewOrder {
            delivery: DeliveryInfo {
                full_name: "Alan Turing".to_string(),
                email: "alan@example.com".to_string(),
                address: "Bletchley Park".to_string(),
                city: "Milton Keynes".to_string(),
                zip: "MK3 6EB".to_string(),
                country: "UK".to_string(),
                phone: "+44 1908 640404".to_string(),
            },
            lines: vec![OrderLineInput {
                product_id: "p1".to_string(),
                name: "Wireless Headphones".to_string(),
                quantity: 2,
                unit_price: dec(price),
            }],
            subtotal: dec(price) * BigDecimal::from(2),
            shipping: dec("5.00"),
            grand_total: dec(price) * BigDecimal::from(2) + dec("5.00"),
        }
    }

    #[tokio::test]
    #[ignore = "requires docker for the Postgres testcontainer"]
    async fn create_and_find_by_id_roundtrip() {
        let (_container, pool) = setup_db().await;
        let repo = DieselOrderRepository::new(pool);

        let order_id = repo.create(make_order("9.99")).expect("create failed");

        let order = repo
            .find_by_id(order_id)
            .expect("find failed")
            .expect("order should exist");

        assert_eq!(order.id, order_id);
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.confirmation.status, ConfirmationStatus::Pending);
        assert_eq!(order.lines.len(), 1);
        assert_eq!(order.lines[0].quantity, 2);
        assert_eq!(order.grand_total, dec("24.98"));
    }

    #[tokio::test]
    #[ignore = "requires docker for the Postgres testcontainer"]
    async fn create_writes_notification_in_same_transaction() {
        let (_container, pool) = setup_db().await;
        let repo = DieselOrderRepository::new(pool.clone());

        let order_id = repo.create(make_order("4.50")).expect("create failed");

        let mut conn = pool.get().expect("Failed to get connection");
        let rows: Vec<NotificationRow> = order_notifications::table
            .filter(order_notifications::order_id.eq(order_id))
            .select(NotificationRow::as_select())
            .load(&mut conn)
            .expect("query failed");

        assert_eq!(rows.len(), 1, "exactly one notification per order");
        assert_eq!(rows[0].channel, "email");
        assert_eq!(rows[0].recipient, "alan@example.com");
        assert_eq!(rows[0].status, "PENDING");
    }

    #[tokio::test]
    #[ignore = "requires docker for the Postgres testcontainer"]
    async fn record_confirmation_flags_failed_email() {
        let (_container, pool) = setup_db().await;
        let repo = DieselOrderRepository::new(pool);

        let order_id = repo.create(make_order("1.00")).expect("create failed");
        repo.record_confirmation(
            order_id,
            ConfirmationStatus::Failed,
            Some("smtp down".to_string()),
        )
        .expect("record failed");

        let order = repo.find_by_id(order_id).expect("find failed").expect("exists");
        assert_eq!(order.confirmation.status, ConfirmationStatus::Failed);
        assert_eq!(order.confirmation.last_error.as_deref(), Some("smtp down"));
    }

    #[tokio::test]
    #[ignore = "requires docker for the Postgres testcontainer"]
    async fn update_status_returns_none_for_unknown_id() {
        let (_container, pool) = setup_db().await;
        let repo = DieselOrderRepository::new(pool);

        let result = repo
            .update_status(uuid::Uuid::new_v4(), OrderStatus::Shipped)
            .expect("update should not error");
        assert!(result.is_none());
    }

    #[tokio::test]
    #[ignore = "requires docker for the Postgres testcontainer"]
    async fn list_paginates_correctly() {
        let (_container, pool) = setup_db().await;
        let repo = DieselOrderRepository::new(pool);

        for _ in 0..5 {
            repo.create(make_order("1.00")).expect("create failed");
        }

        let page1 = repo.list(1, 3).expect("list page 1 failed");
        assert_eq!(page1.total, 5);
        assert_eq!(page1.items.len(), 3);
        assert!(page1.items.iter().all(|o| o.lines.len() == 1));

        let page2 = repo.list(2, 3).expect("list page 2 failed");
        assert_eq!(page2.total, 5);
        assert_eq!(page2.items.len(), 2);

        let beyond = repo.list(i64::MAX, 100).expect("list past the end failed");
        assert_eq!(beyond.total, 5);
        assert!(beyond.items.is_empty());
    }
}
