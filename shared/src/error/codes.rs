//! Unified error codes for the POS backend
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Customer errors
//! - 4xxx: Order errors
//! - 5xxx: Courier errors
//! - 6xxx: Catalog errors (products, categories)
//! - 7xxx: Table errors
//! - 8xxx: Report errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so clients can switch on
/// them without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Concurrent modification, retry with fresh data
    Conflict = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (username/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Account has not been approved by an administrator
    AccountNotApproved = 1005,
    /// Password too short
    PasswordTooShort = 1006,
    /// Username already taken
    UsernameExists = 1007,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Admin role required
    AdminRequired = 2002,
    /// Courier role required
    CourierRequired = 2003,
    /// Caller is not the courier assigned to the order
    NotAssignedCourier = 2004,

    // ==================== 3xxx: Customer ====================
    /// Customer not found
    CustomerNotFound = 3001,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order has no items
    OrderEmpty = 4002,
    /// Unknown order status value
    InvalidOrderStatus = 4003,
    /// Transition not allowed from the current status
    InvalidStatusTransition = 4004,
    /// Order already claimed by another courier
    OrderAlreadyClaimed = 4005,
    /// Order number could not be allocated
    OrderNumberExhausted = 4006,
    /// Item quantity must be at least 1
    InvalidQuantity = 4007,
    /// Item price must be non-negative
    InvalidPrice = 4008,
    /// Order is not fulfilled by couriers
    OrderNotDeliverable = 4009,

    // ==================== 5xxx: Courier ====================
    /// Courier not found
    CourierNotFound = 5001,
    /// Courier is unavailable or not approved
    CourierUnavailable = 5002,
    /// Courier still has active orders
    CourierHasActiveOrders = 5003,

    // ==================== 6xxx: Catalog ====================
    /// Product not found
    ProductNotFound = 6001,
    /// Product has invalid price
    ProductInvalidPrice = 6002,
    /// Category not found
    CategoryNotFound = 6101,

    // ==================== 7xxx: Table ====================
    /// Table not found
    TableNotFound = 7001,
    /// Table number already exists
    TableNumberExists = 7002,

    // ==================== 8xxx: Report ====================
    /// Receipt rendering failed
    ReceiptRenderFailed = 8001,
    /// Spreadsheet export failed
    ExportFailed = 8002,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Operation timeout
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the default message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Success",
            ErrorCode::Unknown => "Unknown error",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::Conflict => "Resource was modified concurrently",
            ErrorCode::RequiredField => "Required field missing",
            ErrorCode::ValueOutOfRange => "Value out of range",

            // Auth
            ErrorCode::NotAuthenticated => "Not authenticated",
            ErrorCode::InvalidCredentials => "Incorrect username or password",
            ErrorCode::TokenExpired => "Token expired",
            ErrorCode::TokenInvalid => "Invalid token",
            ErrorCode::AccountNotApproved => "Account pending admin approval",
            ErrorCode::PasswordTooShort => "Password too short",
            ErrorCode::UsernameExists => "Username already exists",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::AdminRequired => "Admin access required",
            ErrorCode::CourierRequired => "Courier access required",
            ErrorCode::NotAssignedCourier => "Order is not assigned to this courier",

            // Customer
            ErrorCode::CustomerNotFound => "Customer not found",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderEmpty => "Order must contain at least one item",
            ErrorCode::InvalidOrderStatus => "Invalid order status",
            ErrorCode::InvalidStatusTransition => "Status transition not allowed",
            ErrorCode::OrderAlreadyClaimed => "Order already claimed",
            ErrorCode::OrderNumberExhausted => "Could not allocate an order number",
            ErrorCode::InvalidQuantity => "Quantity must be at least 1",
            ErrorCode::InvalidPrice => "Price must be non-negative",
            ErrorCode::OrderNotDeliverable => "Order is not a delivery order",

            // Courier
            ErrorCode::CourierNotFound => "Courier not found",
            ErrorCode::CourierUnavailable => "Courier not available",
            ErrorCode::CourierHasActiveOrders => "Courier has active orders",

            // Catalog
            ErrorCode::ProductNotFound => "Product not found",
            ErrorCode::ProductInvalidPrice => "Invalid product price",
            ErrorCode::CategoryNotFound => "Category not found",

            // Table
            ErrorCode::TableNotFound => "Table not found",
            ErrorCode::TableNumberExists => "Table number already exists",

            // Report
            ErrorCode::ReceiptRenderFailed => "Failed to render receipt",
            ErrorCode::ExportFailed => "Failed to export orders",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when a u16 does not map to a known [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::Conflict),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1005 => Ok(ErrorCode::AccountNotApproved),
            1006 => Ok(ErrorCode::PasswordTooShort),
            1007 => Ok(ErrorCode::UsernameExists),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::AdminRequired),
            2003 => Ok(ErrorCode::CourierRequired),
            2004 => Ok(ErrorCode::NotAssignedCourier),

            // Customer
            3001 => Ok(ErrorCode::CustomerNotFound),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::OrderEmpty),
            4003 => Ok(ErrorCode::InvalidOrderStatus),
            4004 => Ok(ErrorCode::InvalidStatusTransition),
            4005 => Ok(ErrorCode::OrderAlreadyClaimed),
            4006 => Ok(ErrorCode::OrderNumberExhausted),
            4007 => Ok(ErrorCode::InvalidQuantity),
            4008 => Ok(ErrorCode::InvalidPrice),
            4009 => Ok(ErrorCode::OrderNotDeliverable),

            // Courier
            5001 => Ok(ErrorCode::CourierNotFound),
            5002 => Ok(ErrorCode::CourierUnavailable),
            5003 => Ok(ErrorCode::CourierHasActiveOrders),

            // Catalog
            6001 => Ok(ErrorCode::ProductNotFound),
            6002 => Ok(ErrorCode::ProductInvalidPrice),
            6101 => Ok(ErrorCode::CategoryNotFound),

            // Table
            7001 => Ok(ErrorCode::TableNotFound),
            7002 => Ok(ErrorCode::TableNumberExists),

            // Report
            8001 => Ok(ErrorCode::ReceiptRenderFailed),
            8002 => Ok(ErrorCode::ExportFailed),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9004 => Ok(ErrorCode::TimeoutError),
            9005 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::NotFound.code(), 3);
        assert_eq!(ErrorCode::Conflict.code(), 6);
        assert_eq!(ErrorCode::InvalidCredentials.code(), 1002);
        assert_eq!(ErrorCode::AdminRequired.code(), 2002);
        assert_eq!(ErrorCode::CustomerNotFound.code(), 3001);
        assert_eq!(ErrorCode::OrderAlreadyClaimed.code(), 4005);
        assert_eq!(ErrorCode::CourierUnavailable.code(), 5002);
        assert_eq!(ErrorCode::CategoryNotFound.code(), 6101);
        assert_eq!(ErrorCode::TableNotFound.code(), 7001);
        assert_eq!(ErrorCode::ReceiptRenderFailed.code(), 8001);
        assert_eq!(ErrorCode::TimeoutError.code(), 9004);
    }

    #[test]
    fn test_try_from_covers_every_variant() {
        let all = [
            ErrorCode::Success,
            ErrorCode::Unknown,
            ErrorCode::ValidationFailed,
            ErrorCode::NotFound,
            ErrorCode::AlreadyExists,
            ErrorCode::InvalidRequest,
            ErrorCode::Conflict,
            ErrorCode::RequiredField,
            ErrorCode::ValueOutOfRange,
            ErrorCode::NotAuthenticated,
            ErrorCode::InvalidCredentials,
            ErrorCode::TokenExpired,
            ErrorCode::TokenInvalid,
            ErrorCode::AccountNotApproved,
            ErrorCode::PasswordTooShort,
            ErrorCode::UsernameExists,
            ErrorCode::PermissionDenied,
            ErrorCode::AdminRequired,
            ErrorCode::CourierRequired,
            ErrorCode::NotAssignedCourier,
            ErrorCode::CustomerNotFound,
            ErrorCode::OrderNotFound,
            ErrorCode::OrderEmpty,
            ErrorCode::InvalidOrderStatus,
            ErrorCode::InvalidStatusTransition,
            ErrorCode::OrderAlreadyClaimed,
            ErrorCode::OrderNumberExhausted,
            ErrorCode::InvalidQuantity,
            ErrorCode::InvalidPrice,
            ErrorCode::OrderNotDeliverable,
            ErrorCode::CourierNotFound,
            ErrorCode::CourierUnavailable,
            ErrorCode::CourierHasActiveOrders,
            ErrorCode::ProductNotFound,
            ErrorCode::ProductInvalidPrice,
            ErrorCode::CategoryNotFound,
            ErrorCode::TableNotFound,
            ErrorCode::TableNumberExists,
            ErrorCode::ReceiptRenderFailed,
            ErrorCode::ExportFailed,
            ErrorCode::InternalError,
            ErrorCode::DatabaseError,
            ErrorCode::TimeoutError,
            ErrorCode::ConfigError,
        ];
        for code in all {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
    }

    #[test]
    fn test_invalid_code_rejected() {
        assert_eq!(ErrorCode::try_from(4242), Err(InvalidErrorCode(4242)));
    }

    #[test]
    fn test_serde_as_number() {
        let json = serde_json::to_string(&ErrorCode::OrderNotFound).unwrap();
        assert_eq!(json, "4001");
        let code: ErrorCode = serde_json::from_str("5002").unwrap();
        assert_eq!(code, ErrorCode::CourierUnavailable);
    }
}
