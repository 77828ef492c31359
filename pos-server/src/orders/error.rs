//! Order engine errors

use shared::error::{AppError, ErrorCode};
use shared::models::OrderStatus;
use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Order must contain at least one item")]
    EmptyOrder,

    #[error("Item {index}: quantity must be at least 1, got {quantity}")]
    InvalidQuantity { index: usize, quantity: i64 },

    #[error("Item {index}: {reason}")]
    InvalidPrice { index: usize, reason: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Table not found: {0}")]
    TableNotFound(String),

    #[error("Courier not found: {0}")]
    CourierNotFound(String),

    #[error("Customer not found: {0}")]
    CustomerNotFound(String),

    #[error("Courier not available: {0}")]
    CourierUnavailable(String),

    #[error("Cannot move order from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    #[error("Order {0} is already closed")]
    OrderClosed(String),

    #[error("Order {0} is not a delivery order")]
    NotDeliverable(String),

    #[error("Order {0} already claimed")]
    AlreadyClaimed(String),

    #[error("Courier {courier_id} holds {active} active orders")]
    CourierBusy { courier_id: String, active: u64 },

    #[error("Order {order_id} is not assigned to courier {courier_id}")]
    NotAssigned { order_id: String, courier_id: String },

    #[error("Could not allocate an order number after {attempts} attempts")]
    NumberExhausted { attempts: u32 },

    #[error("Order {0} was modified concurrently")]
    Conflict(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type OrderResult<T> = Result<T, OrderError>;

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        let message = err.to_string();
        match err {
            OrderError::EmptyOrder => AppError::new(ErrorCode::OrderEmpty),
            OrderError::InvalidQuantity { index, quantity } => {
                AppError::with_message(ErrorCode::InvalidQuantity, message)
                    .with_detail("index", index)
                    .with_detail("quantity", quantity)
            }
            OrderError::InvalidPrice { index, .. } => {
                AppError::with_message(ErrorCode::InvalidPrice, message).with_detail("index", index)
            }
            OrderError::Validation(_) => AppError::validation(message),
            OrderError::OrderNotFound(id) => {
                AppError::with_message(ErrorCode::OrderNotFound, message).with_detail("id", id)
            }
            OrderError::TableNotFound(id) => {
                AppError::with_message(ErrorCode::TableNotFound, message).with_detail("id", id)
            }
            OrderError::CourierNotFound(id) => {
                AppError::with_message(ErrorCode::CourierNotFound, message).with_detail("id", id)
            }
            OrderError::CustomerNotFound(id) => {
                AppError::with_message(ErrorCode::CustomerNotFound, message).with_detail("id", id)
            }
            OrderError::CourierUnavailable(id) => {
                AppError::with_message(ErrorCode::CourierUnavailable, message)
                    .with_detail("courier_id", id)
            }
            OrderError::InvalidTransition { from, to } => {
                AppError::with_message(ErrorCode::InvalidStatusTransition, message)
                    .with_detail("from", from.as_str())
                    .with_detail("to", to.as_str())
            }
            OrderError::OrderClosed(_) => {
                AppError::with_message(ErrorCode::InvalidStatusTransition, message)
            }
            OrderError::NotDeliverable(_) => {
                AppError::with_message(ErrorCode::OrderNotDeliverable, message)
            }
            OrderError::AlreadyClaimed(id) => {
                AppError::with_message(ErrorCode::OrderAlreadyClaimed, message)
                    .with_detail("order_id", id)
            }
            OrderError::CourierBusy { courier_id, active } => {
                AppError::with_message(ErrorCode::CourierHasActiveOrders, message)
                    .with_detail("courier_id", courier_id)
                    .with_detail("active_orders", active)
            }
            OrderError::NotAssigned { .. } => {
                AppError::with_message(ErrorCode::NotAssignedCourier, message)
            }
            OrderError::NumberExhausted { .. } => {
                AppError::with_message(ErrorCode::OrderNumberExhausted, message)
            }
            OrderError::Conflict(_) => AppError::conflict(message),
            OrderError::Store(e) => e.into(),
        }
    }
}
