//! # Fixtures
//!
//! Sample data for the bike shop: small tables written out as literals and
//! record types for the larger CSV files.
//!
//! ## Fixture Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Table        Source              Columns (positional, no header)      │
//! │  ───────────  ──────────────────  ─────────────────────────────────    │
//! │  category     CATEGORIES literal                                       │
//! │  brand        BRANDS literal                                           │
//! │  product      products.csv        id,name,brand,category,year,price    │
//! │  customer     customers.csv       first,last,phone,email,street,       │
//! │                                   city,state,zip                        │
//! │  store        STORES literal                                           │
//! │  stock        stocks.csv          store,product,quantity               │
//! │  staff        STAFF literal                                            │
//! │  order        orders.csv          id,customer,status,ordered,          │
//! │                                   required,shipped,store,staff          │
//! │  order_item   order_items.csv     order,item,product,qty,price,disc    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Field Conventions
//! - The literal text `NULL` stands for an absent value.
//! - Dates are written `YYYYMMDD` (`20160101`).
//!
//! Opening the files is the loader's job (bikeshop-db); this module only
//! describes what a row looks like and how it becomes an entity.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

use crate::error::{CoreError, ValidationError};
use crate::types::{
    Brand, Category, NewCustomer, NewStore, Order, OrderItem, OrderStatus, Product,
    Staff, Stock,
};
use crate::validation;
use crate::{FIXTURE_DATE_FORMAT, NULL_SENTINEL};

// =============================================================================
// Fixture File Names
// =============================================================================

pub const PRODUCTS_FILE: &str = "products.csv";
pub const CUSTOMERS_FILE: &str = "customers.csv";
pub const STOCKS_FILE: &str = "stocks.csv";
pub const ORDERS_FILE: &str = "orders.csv";
pub const ORDER_ITEMS_FILE: &str = "order_items.csv";

// =============================================================================
// Literal Tables
// =============================================================================

/// `(category_id, category_name)`
pub const CATEGORIES: &[(i64, &str)] = &[
    (1, "Children Bicycles"),
    (2, "Comfort Bicycles"),
    (3, "Cruisers Bicycles"),
    (4, "Cyclocross Bicycles"),
    (5, "Electric Bikes"),
    (6, "Mountain Bikes"),
    (7, "Road Bikes"),
];

/// `(brand_id, brand_name)`
pub const BRANDS: &[(i64, &str)] = &[
    (1, "Electra"),
    (2, "Haro"),
    (3, "Heller"),
    (4, "Pure Cycles"),
    (5, "Ritchey"),
    (6, "Strider"),
    (7, "Sun Bicycles"),
    (8, "Surly"),
    (9, "Trek"),
];

/// `(store_name, phone, email, street, city, state, zip_code)`
///
/// Store ids are assigned by the database in this order (1, 2, 3).
pub const STORES: &[(&str, &str, &str, &str, &str, &str, &str)] = &[
    (
        "Santa Cruz Bikes",
        "(831) 476-4321",
        "santacruz@bikes.shop",
        "3700 Portola Drive",
        "Santa Cruz",
        "CA",
        "95060",
    ),
    (
        "Baldwin Bikes",
        "(516) 379-8888",
        "baldwin@bikes.shop",
        "4200 Chestnut Lane",
        "Baldwin",
        "NY",
        "11432",
    ),
    (
        "Rowlett Bikes",
        "(972) 530-5555",
        "rowlett@bikes.shop",
        "8000 Fairway Avenue",
        "Rowlett",
        "TX",
        "75088",
    ),
];

/// Staff rows in insertion order. A manager always precedes their reports.
pub type StaffRow = (i64, &'static str, &'static str, &'static str, &'static str, bool, i64, Option<i64>);

/// `(staff_id, first_name, last_name, email, phone, active, store_id, manager_id)`
pub const STAFF: &[StaffRow] = &[
    (1, "Fabiola", "Jackson", "fabiola.jackson@bikes.shop", "(831) 555-5554", true, 1, None),
    (2, "Mireya", "Copeland", "mireya.copeland@bikes.shop", "(831) 555-5555", true, 1, Some(1)),
    (3, "Genna", "Serrano", "genna.serrano@bikes.shop", "(831) 555-5556", true, 1, Some(2)),
    (4, "Virgie", "Wiggins", "virgie.wiggins@bikes.shop", "(831) 555-5557", true, 1, Some(2)),
    (5, "Jannette", "David", "jannette.david@bikes.shop", "(516) 379-4444", true, 2, Some(1)),
    (6, "Marcelene", "Boyer", "marcelene.boyer@bikes.shop", "(516) 379-4445", true, 2, Some(5)),
    (7, "Venita", "Daniel", "venita.daniel@bikes.shop", "(516) 379-4446", true, 2, Some(5)),
    (8, "Kali", "Vargas", "kali.vargas@bikes.shop", "(972) 530-5555", true, 3, Some(1)),
    (9, "Layla", "Terrell", "layla.terrell@bikes.shop", "(972) 530-5556", true, 3, Some(7)),
    (10, "Bernardine", "Houston", "bernardine.houston@bikes.shop", "(972) 530-5557", true, 3, Some(7)),
];

pub fn categories() -> Vec<Category> {
    CATEGORIES
        .iter()
        .map(|&(category_id, name)| Category {
            category_id,
            category_name: name.to_string(),
        })
        .collect()
}

pub fn brands() -> Vec<Brand> {
    BRANDS
        .iter()
        .map(|&(brand_id, name)| Brand {
            brand_id,
            brand_name: name.to_string(),
        })
        .collect()
}

pub fn stores() -> Vec<NewStore> {
    STORES
        .iter()
        .map(|&(name, phone, email, street, city, state, zip)| NewStore {
            store_name: name.to_string(),
            phone: Some(phone.to_string()),
            email: Some(email.to_string()),
            street: Some(street.to_string()),
            city: Some(city.to_string()),
            state: Some(state.to_string()),
            zip_code: Some(zip.to_string()),
        })
        .collect()
}

pub fn staff() -> Vec<Staff> {
    STAFF
        .iter()
        .map(
            |&(staff_id, first, last, email, phone, active, store_id, manager_id)| Staff {
                staff_id,
                first_name: first.to_string(),
                last_name: last.to_string(),
                email: email.to_string(),
                phone: Some(phone.to_string()),
                active,
                store_id,
                manager_id,
            },
        )
        .collect()
}

// =============================================================================
// Field Parsing
// =============================================================================

/// Maps the `NULL` sentinel to `None`. Surrounding whitespace is ignored.
#[inline]
pub fn parse_nullable(raw: &str) -> Option<&str> {
    let raw = raw.trim();
    if raw == NULL_SENTINEL {
        None
    } else {
        Some(raw)
    }
}

/// Parses a `YYYYMMDD` fixture date.
///
/// ## Example
/// ```rust
/// use bikeshop_core::fixtures::parse_fixture_date;
///
/// let date = parse_fixture_date("20180428").unwrap();
/// assert_eq!(date.to_string(), "2018-04-28");
/// assert!(parse_fixture_date("2018-04-28").is_err());
/// ```
pub fn parse_fixture_date(raw: &str) -> Result<NaiveDate, ValidationError> {
    let raw = raw.trim();
    // chrono accepts fewer digits for %m/%d, fixture dates are always 8
    if raw.len() != 8 {
        return Err(ValidationError::InvalidFormat {
            field: "date".to_string(),
            reason: format!("expected YYYYMMDD, got '{}'", raw),
        });
    }
    NaiveDate::parse_from_str(raw, FIXTURE_DATE_FORMAT).map_err(|e| {
        ValidationError::InvalidFormat {
            field: "date".to_string(),
            reason: format!("'{}': {}", raw, e),
        }
    })
}

fn nullable_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(parse_nullable(&raw).map(str::to_string))
}

fn nullable_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_nullable(&raw)
        .map(|value| value.parse::<i64>().map_err(serde::de::Error::custom))
        .transpose()
}

fn fixture_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_fixture_date(&raw).map_err(serde::de::Error::custom)
}

fn nullable_fixture_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_nullable(&raw)
        .map(|value| parse_fixture_date(value).map_err(serde::de::Error::custom))
        .transpose()
}

// =============================================================================
// CSV Records
// =============================================================================

/// One line of `products.csv`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductRecord {
    pub product_id: i64,
    pub product_name: String,
    pub brand_id: i64,
    pub category_id: i64,
    pub model_year: i64,
    pub list_price: f64,
}

impl TryFrom<ProductRecord> for Product {
    type Error = CoreError;

    fn try_from(record: ProductRecord) -> Result<Self, Self::Error> {
        let product = Product {
            product_id: record.product_id,
            product_name: record.product_name,
            brand_id: record.brand_id,
            category_id: record.category_id,
            model_year: record.model_year,
            list_price: record.list_price,
        };
        validation::validate_product(&product).map_err(|e| CoreError::invalid("product", e))?;
        Ok(product)
    }
}

/// One line of `customers.csv`. The customer id is assigned on insert.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomerRecord {
    pub first_name: String,
    pub last_name: String,
    #[serde(deserialize_with = "nullable_text")]
    pub phone: Option<String>,
    pub email: String,
    #[serde(deserialize_with = "nullable_text")]
    pub street: Option<String>,
    #[serde(deserialize_with = "nullable_text")]
    pub city: Option<String>,
    #[serde(deserialize_with = "nullable_text")]
    pub state: Option<String>,
    #[serde(deserialize_with = "nullable_text")]
    pub zip_code: Option<String>,
}

impl TryFrom<CustomerRecord> for NewCustomer {
    type Error = CoreError;

    fn try_from(record: CustomerRecord) -> Result<Self, Self::Error> {
        let customer = NewCustomer {
            first_name: record.first_name,
            last_name: record.last_name,
            phone: record.phone,
            email: record.email,
            street: record.street,
            city: record.city,
            state: record.state,
            zip_code: record.zip_code,
        };
        validation::validate_customer(&customer).map_err(|e| CoreError::invalid("customer", e))?;
        Ok(customer)
    }
}

/// One line of `stocks.csv`.
#[derive(Debug, Clone, Deserialize)]
pub struct StockRecord {
    pub store_id: i64,
    pub product_id: i64,
    #[serde(deserialize_with = "nullable_int")]
    pub quantity: Option<i64>,
}

impl TryFrom<StockRecord> for Stock {
    type Error = CoreError;

    fn try_from(record: StockRecord) -> Result<Self, Self::Error> {
        let stock = Stock {
            store_id: record.store_id,
            product_id: record.product_id,
            quantity: record.quantity,
        };
        validation::validate_stock(&stock).map_err(|e| CoreError::invalid("stock", e))?;
        Ok(stock)
    }
}

/// One line of `orders.csv`.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderRecord {
    pub order_id: i64,
    #[serde(deserialize_with = "nullable_int")]
    pub customer_id: Option<i64>,
    pub order_status: i64,
    #[serde(deserialize_with = "fixture_date")]
    pub order_date: NaiveDate,
    #[serde(deserialize_with = "fixture_date")]
    pub required_date: NaiveDate,
    #[serde(deserialize_with = "nullable_fixture_date")]
    pub shipped_date: Option<NaiveDate>,
    pub store_id: i64,
    pub staff_id: i64,
}

impl TryFrom<OrderRecord> for Order {
    type Error = CoreError;

    fn try_from(record: OrderRecord) -> Result<Self, Self::Error> {
        let order_status = OrderStatus::try_from(record.order_status)
            .map_err(|e| CoreError::invalid("order", e))?;

        Ok(Order {
            order_id: record.order_id,
            customer_id: record.customer_id,
            order_status,
            order_date: record.order_date,
            required_date: record.required_date,
            shipped_date: record.shipped_date,
            store_id: record.store_id,
            staff_id: record.staff_id,
        })
    }
}

/// One line of `order_items.csv`.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderItemRecord {
    pub order_id: i64,
    pub item_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub list_price: f64,
    pub discount: f64,
}

impl TryFrom<OrderItemRecord> for OrderItem {
    type Error = CoreError;

    fn try_from(record: OrderItemRecord) -> Result<Self, Self::Error> {
        let item = OrderItem {
            order_id: record.order_id,
            item_id: record.item_id,
            product_id: record.product_id,
            quantity: record.quantity,
            list_price: record.list_price,
            discount: record.discount,
        };
        validation::validate_order_item(&item).map_err(|e| CoreError::invalid("order_item", e))?;
        Ok(item)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn decode<T: serde::de::DeserializeOwned>(line: &str) -> Result<T, csv::Error> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .trim(csv::Trim::All)
            .from_reader(line.as_bytes());
        reader
            .deserialize()
            .next()
            .expect("one record in input")
    }

    #[test]
    fn test_parse_nullable() {
        assert_eq!(parse_nullable("NULL"), None);
        assert_eq!(parse_nullable(" NULL "), None);
        assert_eq!(parse_nullable("Santa Cruz"), Some("Santa Cruz"));
        // only the exact sentinel counts
        assert_eq!(parse_nullable("null"), Some("null"));
    }

    #[test]
    fn test_parse_fixture_date() {
        assert_eq!(
            parse_fixture_date("20160103").unwrap(),
            NaiveDate::from_ymd_opt(2016, 1, 3).unwrap()
        );
        assert!(parse_fixture_date("20161301").is_err());
        assert!(parse_fixture_date("2016013").is_err());
        assert!(parse_fixture_date("NULL").is_err());
    }

    #[test]
    fn test_literal_tables() {
        assert_eq!(categories().len(), 7);
        assert_eq!(brands().len(), 9);
        assert_eq!(stores().len(), 3);

        let staff = staff();
        assert_eq!(staff.len(), 10);
        assert_eq!(staff[0].manager_id, None);
        assert!(staff.iter().skip(1).all(|s| s.manager_id.is_some()));

        // managers precede their reports so inserts never dangle
        for (index, member) in staff.iter().enumerate() {
            if let Some(manager_id) = member.manager_id {
                assert!(staff[..index].iter().any(|s| s.staff_id == manager_id));
            }
        }
    }

    #[test]
    fn test_customer_record_maps_null_sentinel() {
        let record: CustomerRecord = decode(
            "Debra,Burks,NULL,debra.burks@yahoo.com,9273 Thorne Ave.,Orchard Park,NY,14127",
        )
        .unwrap();
        let customer = NewCustomer::try_from(record).unwrap();

        assert_eq!(customer.first_name, "Debra");
        assert_eq!(customer.phone, None);
        assert_eq!(customer.city.as_deref(), Some("Orchard Park"));
        assert_eq!(customer.zip_code.as_deref(), Some("14127"));
    }

    #[test]
    fn test_customer_record_rejects_long_zip() {
        let record: CustomerRecord =
            decode("Kasha,Todd,NULL,kasha.todd@yahoo.com,910 Vine Street,Campbell,CA,950081")
                .unwrap();
        let err = NewCustomer::try_from(record).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InvalidRecord {
                entity: "customer",
                source: ValidationError::TooLong { .. }
            }
        ));
    }

    #[test]
    fn test_order_record_parses_dates() {
        let record: OrderRecord = decode("1,259,4,20160101,20160103,20160103,1,2").unwrap();
        let order = Order::try_from(record).unwrap();

        assert_eq!(order.customer_id, Some(259));
        assert_eq!(order.order_status, OrderStatus::Completed);
        assert_eq!(order.order_date, NaiveDate::from_ymd_opt(2016, 1, 1).unwrap());
        assert_eq!(order.shipped_date, NaiveDate::from_ymd_opt(2016, 1, 3));
    }

    #[test]
    fn test_order_record_unshipped() {
        let record: OrderRecord = decode("3,17,3,20160215,20160219,NULL,3,9").unwrap();
        let order = Order::try_from(record).unwrap();
        assert_eq!(order.shipped_date, None);
        assert!(!order.is_shipped());
    }

    #[test]
    fn test_order_record_rejects_unknown_status() {
        let record: OrderRecord = decode("1,259,7,20160101,20160103,NULL,1,2").unwrap();
        assert!(Order::try_from(record).is_err());
    }

    #[test]
    fn test_order_record_rejects_bad_date() {
        let result: Result<OrderRecord, _> = decode("1,259,4,2016-01-01,20160103,NULL,1,2");
        assert!(result.is_err());
    }

    #[test]
    fn test_stock_record_allows_null_quantity() {
        let record: StockRecord = decode("2,17,NULL").unwrap();
        let stock = Stock::try_from(record).unwrap();
        assert_eq!(stock.quantity, None);

        let record: StockRecord = decode("2,17,-4").unwrap();
        assert!(Stock::try_from(record).is_err());
    }

    #[test]
    fn test_product_record() {
        let record: ProductRecord = decode("10,Surly Straggler - 2016,8,4,2016,1549.00").unwrap();
        let product = Product::try_from(record).unwrap();
        assert_eq!(product.product_name, "Surly Straggler - 2016");
        assert_eq!(product.list_price, 1549.0);
    }

    #[test]
    fn test_order_item_record_rejects_bad_discount() {
        let record: OrderItemRecord = decode("1,1,20,1,599.99,1.5").unwrap();
        assert!(OrderItem::try_from(record).is_err());
    }
}
