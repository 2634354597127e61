//! # Domain Types
//!
//! One struct per table of the bike shop schema.
//!
//! ## Entity Relationships
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Bike Shop Schema                                │
//! │                                                                         │
//! │   Category ──<  Product  >── Brand                                     │
//! │                   │  │                                                  │
//! │                   │  └──────────────<  Stock  >── Store                 │
//! │                   │                               │  │                  │
//! │              OrderItem >── Order >─────────────────┘  │                  │
//! │                            │  │                        │                  │
//! │                 Customer ──┘  └──< Staff >─────────────┘                  │
//! │                                     │ ^                                 │
//! │                                     └─┘ manager_id (self reference)     │
//! │                                                                         │
//! │   A ──< B   : one A has many B (B holds the foreign key)               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Keys
//! - Integer surrogate keys everywhere except:
//! - `OrderItem`: composite `(order_id, item_id)`
//! - `Stock`: composite `(store_id, product_id)`
//!
//! Customers and stores get their key from SQLite on insert, which is why
//! they also have a `New*` input type without the id. Products usually
//! arrive with an id from the fixtures; `NewProduct` covers the rest.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

// =============================================================================
// Category / Brand
// =============================================================================

/// A product category ("Mountain Bikes").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Category {
    pub category_id: i64,
    pub category_name: String,
}

/// A manufacturer brand ("Trek").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Brand {
    pub brand_id: i64,
    pub brand_name: String,
}

// =============================================================================
// Product
// =============================================================================

/// A bike model for sale.
///
/// Every product belongs to exactly one category and one brand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    pub product_id: i64,
    pub product_name: String,
    /// Foreign key to `brand`.
    pub brand_id: i64,
    /// Foreign key to `category`.
    pub category_id: i64,
    pub model_year: i64,
    pub list_price: f64,
}

/// A product whose id is assigned by the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub product_name: String,
    pub brand_id: i64,
    pub category_id: i64,
    pub model_year: i64,
    pub list_price: f64,
}

// =============================================================================
// Customer
// =============================================================================

/// A shop customer. Only names and email are mandatory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Customer {
    pub customer_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub email: String,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
}

impl Customer {
    /// "First Last".
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A customer before insertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCustomer {
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub email: String,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
}

impl NewCustomer {
    /// Attaches the id the database assigned.
    pub fn with_id(self, customer_id: i64) -> Customer {
        Customer {
            customer_id,
            first_name: self.first_name,
            last_name: self.last_name,
            phone: self.phone,
            email: self.email,
            street: self.street,
            city: self.city,
            state: self.state,
            zip_code: self.zip_code,
        }
    }
}

// =============================================================================
// Store
// =============================================================================

/// A physical shop location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Store {
    pub store_id: i64,
    pub store_name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
}

/// A store before insertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewStore {
    pub store_name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
}

impl NewStore {
    /// Attaches the id the database assigned.
    pub fn with_id(self, store_id: i64) -> Store {
        Store {
            store_id,
            store_name: self.store_name,
            phone: self.phone,
            email: self.email,
            street: self.street,
            city: self.city,
            state: self.state,
            zip_code: self.zip_code,
        }
    }
}

// =============================================================================
// Staff
// =============================================================================

/// An employee working at one store.
///
/// `manager_id` points back into the staff table; the top of the
/// hierarchy has no manager.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Staff {
    pub staff_id: i64,
    pub first_name: String,
    pub last_name: String,
    /// Unique across all staff.
    pub email: String,
    pub phone: Option<String>,
    pub active: bool,
    pub store_id: i64,
    pub manager_id: Option<i64>,
}

impl Staff {
    /// "First Last".
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

// =============================================================================
// Order Status
// =============================================================================

/// Fulfilment state of an order, stored as its integer code.
///
/// | Code | Status     |
/// |------|------------|
/// | 1    | Pending    |
/// | 2    | Processing |
/// | 3    | Rejected   |
/// | 4    | Completed  |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[serde(try_from = "i64", into = "i64")]
#[repr(i32)]
pub enum OrderStatus {
    Pending = 1,
    Processing = 2,
    Rejected = 3,
    Completed = 4,
}

impl OrderStatus {
    /// Integer code as stored in the `order_status` column.
    #[inline]
    pub const fn code(self) -> i64 {
        self as i64
    }
}

impl TryFrom<i64> for OrderStatus {
    type Error = ValidationError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(OrderStatus::Pending),
            2 => Ok(OrderStatus::Processing),
            3 => Ok(OrderStatus::Rejected),
            4 => Ok(OrderStatus::Completed),
            _ => Err(ValidationError::OutOfRange {
                field: "order_status".to_string(),
                min: 1,
                max: 4,
            }),
        }
    }
}

impl From<OrderStatus> for i64 {
    fn from(status: OrderStatus) -> Self {
        status.code()
    }
}

// =============================================================================
// Order
// =============================================================================

/// A customer order taken by a staff member at a store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Order {
    pub order_id: i64,
    /// Walk-in orders have no customer.
    pub customer_id: Option<i64>,
    pub order_status: OrderStatus,
    pub order_date: NaiveDate,
    pub required_date: NaiveDate,
    pub shipped_date: Option<NaiveDate>,
    pub store_id: i64,
    pub staff_id: i64,
}

impl Order {
    /// Whether the order has left the store.
    #[inline]
    pub fn is_shipped(&self) -> bool {
        self.shipped_date.is_some()
    }
}

// =============================================================================
// Order Item
// =============================================================================

/// One line of an order, keyed by `(order_id, item_id)`.
///
/// `list_price` is the price at the time of the order, not a reference to
/// the product's current price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub order_id: i64,
    pub item_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub list_price: f64,
    /// Fraction in `[0, 1]`; `0.2` is a 20% discount.
    pub discount: f64,
}

impl OrderItem {
    /// `quantity × list_price × (1 − discount)`.
    pub fn line_total(&self) -> f64 {
        self.quantity as f64 * self.list_price * (1.0 - self.discount)
    }
}

// =============================================================================
// Stock
// =============================================================================

/// On-hand quantity of one product at one store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Stock {
    pub store_id: i64,
    pub product_id: i64,
    pub quantity: Option<i64>,
}

// =============================================================================
// Unit Tests
// =============================================================================
