use std::collections::HashMap;

use diesel::pg::PgConnection;
use diesel::prelude::*;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::order::{
    invoice_number, price_lines, InvoiceView, LineItem, OrderItemView, OrderView, PricedOrder,
};
use crate::domain::ports::OrderRepository;
use crate::schema::{books, order_invoices, order_items, orders, users};

use super::catalog_repo::find_book;
use super::models::{NewOrderInvoiceRow, NewOrderItemRow, NewOrderRow, OrderInvoiceRow, OrderRow};

// ── Error conversions (infrastructure concern only) ──────────────────────────

impl From<diesel::result::Error> for DomainError {
    fn from(e: diesel::result::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

impl From<r2d2::Error> for DomainError {
    fn from(e: r2d2::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

// ── Query helpers ─────────────────────────────────────────────────────────────

enum ViewScope {
    Order(i32),
    User(i32),
    All,
}

/// Writes the priced items and the invoice for an existing order row.
fn write_items(
    conn: &mut PgConnection,
    order_id: i32,
    priced: &PricedOrder,
) -> Result<(), DomainError> {
    let rows: Vec<NewOrderItemRow<'_>> = priced
        .items
        .iter()
        .map(|item| NewOrderItemRow {
            order_id,
            book_id: item.book_id,
            quantity: item.quantity,
            price: &item.price,
        })
        .collect();
    diesel::insert_into(order_items::table)
        .values(&rows)
        .execute(conn)?;

    let number = invoice_number(order_id);
    diesel::insert_into(order_invoices::table)
        .values(&NewOrderInvoiceRow {
            order_id,
            invoice_number: &number,
            total_amount: &priced.total_amount,
        })
        .execute(conn)?;

    Ok(())
}

/// Assembles orders with their owner's username, item titles and invoice.
fn load_views(conn: &mut PgConnection, scope: ViewScope) -> Result<Vec<OrderView>, DomainError> {
    let mut query = orders::table
        .inner_join(users::table)
        .select((OrderRow::as_select(), users::username))
        .order(orders::id.asc())
        .into_boxed();
    query = match scope {
        ViewScope::Order(id) => query.filter(orders::id.eq(id)),
        ViewScope::User(user_id) => query.filter(orders::user_id.eq(user_id)),
        ViewScope::All => query,
    };
    let rows: Vec<(OrderRow, String)> = query.load(conn)?;
    if rows.is_empty() {
        return Ok(vec![]);
    }

    let ids: Vec<i32> = rows.iter().map(|(order, _)| order.id).collect();

    let item_rows: Vec<(i32, String, i32)> = order_items::table
        .inner_join(books::table)
        .filter(order_items::order_id.eq_any(ids.clone()))
        .order(order_items::id.asc())
        .select((order_items::order_id, books::title, order_items::quantity))
        .load(conn)?;
    let mut items: HashMap<i32, Vec<OrderItemView>> = HashMap::new();
    for (order_id, book_title, quantity) in item_rows {
        items.entry(order_id).or_default().push(OrderItemView {
            book_title,
            quantity,
        });
    }

    let invoice_rows: Vec<OrderInvoiceRow> = order_invoices::table
        .filter(order_invoices::order_id.eq_any(ids))
        .select(OrderInvoiceRow::as_select())
        .load(conn)?;
    let mut invoices: HashMap<i32, InvoiceView> = invoice_rows
        .into_iter()
        .map(|inv| {
            (
                inv.order_id,
                InvoiceView {
                    invoice_number: inv.invoice_number,
                    billing_date: inv.billing_date,
                    total_amount: inv.total_amount,
                },
            )
        })
        .collect();

    Ok(rows
        .into_iter()
        .map(|(order, username)| OrderView {
            id: order.id,
            username,
            order_date: order.order_date,
            items: items.remove(&order.id).unwrap_or_default(),
            invoice: invoices.remove(&order.id),
        })
        .collect())
}

fn load_view(conn: &mut PgConnection, order_id: i32) -> Result<OrderView, DomainError> {
    load_views(conn, ViewScope::Order(order_id))?
        .into_iter()
        .next()
        .ok_or(DomainError::OrderNotFound)
}

// ── Repository ────────────────────────────────────────────────────────────────

pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl OrderRepository for DieselOrderRepository {
    fn place(&self, user_id: i32, lines: &[LineItem]) -> Result<OrderView, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            // 1. Resolve and price every line; an unknown ISBN aborts here
            let priced = price_lines(lines, |isbn| find_book(conn, isbn))?;

            // 2. Insert the order
            let order_id: i32 = diesel::insert_into(orders::table)
                .values(&NewOrderRow { user_id })
                .returning(orders::id)
                .get_result(conn)?;

            // 3. Insert items and invoice
            write_items(conn, order_id, &priced)?;

            load_view(conn, order_id)
        })
    }

    fn replace_items(
        &self,
        order_id: i32,
        user_id: i32,
        lines: &[LineItem],
    ) -> Result<OrderView, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let owned = orders::table
                .filter(orders::id.eq(order_id))
                .filter(orders::user_id.eq(user_id))
                .select(orders::id)
                .for_update()
                .first::<i32>(conn)
                .optional()?;
            if owned.is_none() {
                return Err(DomainError::OrderNotFound);
            }

            diesel::delete(order_items::table.filter(order_items::order_id.eq(order_id)))
                .execute(conn)?;
            diesel::delete(order_invoices::table.filter(order_invoices::order_id.eq(order_id)))
                .execute(conn)?;

            let priced = price_lines(lines, |isbn| find_book(conn, isbn))?;
            write_items(conn, order_id, &priced)?;

            load_view(conn, order_id)
        })
    }

    fn delete(&self, order_id: i32, user_id: i32) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            // Items and invoice go with it through ON DELETE CASCADE.
            let deleted = diesel::delete(
                orders::table
                    .filter(orders::id.eq(order_id))
                    .filter(orders::user_id.eq(user_id)),
            )
            .execute(conn)?;
            if deleted == 0 {
                return Err(DomainError::OrderNotFound);
            }
            Ok(())
        })
    }

    fn list_for_user(&self, user_id: i32) -> Result<Vec<OrderView>, DomainError> {
        let mut conn = self.pool.get()?;
        load_views(&mut conn, ViewScope::User(user_id))
    }

    fn list_all(&self) -> Result<Vec<OrderView>, DomainError> {
        let mut conn = self.pool.get()?;
        load_views(&mut conn, ViewScope::All)
    }
}
