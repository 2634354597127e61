//! # Repository Module
//!
//! One repository per table, plus [`catalog`] for queries that span tables.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  Caller                                                                │
//! │       │  db.categories().products(1)                                   │
//! │       ▼                                                                 │
//! │  CategoryRepository                                                    │
//! │  ├── insert / get_by_id / list / count / delete                        │
//! │  └── relation navigation (products of a category)                      │
//! │       │                                                                 │
//! │       │  SQL Query → FromRow                                           │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Relations
//! Navigation that an ORM would expose as attributes (`category.products`,
//! `staff.manager`) is a method on the parent's repository taking the key.
//!
//! ## Inserts Inside Transactions
//! Every repository has an `insert_with(executor, row)` associated function
//! accepting any sqlx executor, so the fixture loader can insert a whole
//! table on one transaction. `insert(&self, row)` is the pool shorthand.
//!
//! ## Available Repositories
//!
//! - [`CategoryRepository`](category::CategoryRepository)
//! - [`BrandRepository`](brand::BrandRepository)
//! - [`ProductRepository`](product::ProductRepository)
//! - [`CustomerRepository`](customer::CustomerRepository)
//! - [`StoreRepository`](store::StoreRepository)
//! - [`StockRepository`](stock::StockRepository)
//! - [`StaffRepository`](staff::StaffRepository)
//! - [`OrderRepository`](order::OrderRepository)
//! - [`OrderItemRepository`](order_item::OrderItemRepository)
//! - [`CatalogRepository`](catalog::CatalogRepository)

pub mod brand;
pub mod catalog;
pub mod category;
pub mod customer;
pub mod order;
pub mod order_item;
pub mod product;
pub mod staff;
pub mod stock;
pub mod store;
