//! Domain records and request payloads
//!
//! All entities carry opaque string ids assigned at creation. Timestamps are
//! UTC milliseconds.

pub mod category;
pub mod courier;
pub mod customer;
pub mod dining_table;
pub mod order;
pub mod product;
pub mod stats;
pub mod user;

pub use category::{Category, CategoryCreate};
pub use courier::{Courier, CourierAvailabilityUpdate, CourierCreate};
pub use customer::{Customer, CustomerCreate};
pub use dining_table::{DiningTable, DiningTableCreate, TableStatusUpdate};
pub use order::{
    AssignCourier, Order, OrderCreate, OrderItem, OrderItemInput, OrderStatus, OrderType,
    StatusUpdate, UnknownStatus,
};
pub use product::{AvailabilityUpdate, Product, ProductCreate};
pub use stats::{CourierSelfStats, CourierStats, DashboardStats, PeriodStats};
pub use user::{LoginRequest, LoginResponse, RegisterRequest, UserAccount, UserInfo, UserRole};
