//! # Result Cardinality
//!
//! Helpers that turn a fetched row list into the shape a caller expects.
//!
//! ## Extraction Methods
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Method          0 rows            1 row          2+ rows              │
//! │  ──────────────  ────────────────  ─────────────  ──────────────────   │
//! │  all()           []                [row]          [row, row, ...]      │
//! │  first()         None              Some(row)      Some(first row)      │
//! │  one()           NoResultFound     row            MultipleResultsFound │
//! │  one_or_none()   None              Some(row)      MultipleResultsFound │
//! │  scalar()        None              Some(col 0)    MultipleResultsFound │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! let brand = Rows::from(db.brands().find_by_name("Electra").await?).one()?;
//! let first_name = Rows::from(db.customers().names_in_city("Brooklyn").await?).scalar()?;
//! ```

use bikeshop_core::{Brand, Category, Customer, Order, OrderItem, Product, Staff, Stock, Store};

use crate::error::{DbError, DbResult};

// =============================================================================
// First Column
// =============================================================================

/// The leading column of a row.
///
/// Tuple rows yield their first element; entity rows yield the entity
/// itself (a `SELECT <entity>` has the entity as its only column).
pub trait FirstColumn {
    type Output;

    fn first_column(self) -> Self::Output;
}

macro_rules! impl_first_column_for_tuple {
    ($head:ident $(, $tail:ident)*) => {
        impl<$head $(, $tail)*> FirstColumn for ($head, $($tail,)*) {
            type Output = $head;

            #[allow(non_snake_case, unused_variables)]
            fn first_column(self) -> Self::Output {
                let ($head, $($tail,)*) = self;
                $head
            }
        }
    };
}

impl_first_column_for_tuple!(A);
impl_first_column_for_tuple!(A, B);
impl_first_column_for_tuple!(A, B, C);
impl_first_column_for_tuple!(A, B, C, D);
impl_first_column_for_tuple!(A, B, C, D, E);

macro_rules! impl_first_column_for_entity {
    ($($entity:ty),* $(,)?) => {
        $(
            impl FirstColumn for $entity {
                type Output = $entity;

                #[inline]
                fn first_column(self) -> Self::Output {
                    self
                }
            }
        )*
    };
}

impl_first_column_for_entity!(Brand, Category, Customer, Order, OrderItem, Product, Staff, Stock, Store);

// =============================================================================
// Rows
// =============================================================================

/// An owned list of fetched rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Rows<T>(Vec<T>);

impl<T> From<Vec<T>> for Rows<T> {
    fn from(rows: Vec<T>) -> Self {
        Rows(rows)
    }
}

impl<T> Rows<T> {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Every row.
    pub fn all(self) -> Vec<T> {
        self.0
    }

    /// The first row, if any. Extra rows are discarded.
    pub fn first(self) -> Option<T> {
        self.0.into_iter().next()
    }

    /// Exactly one row.
    pub fn one(self) -> DbResult<T> {
        match self.one_or_none()? {
            Some(row) => Ok(row),
            None => Err(DbError::NoResultFound),
        }
    }

    /// At most one row.
    pub fn one_or_none(self) -> DbResult<Option<T>> {
        let count = self.0.len();
        if count > 1 {
            return Err(DbError::MultipleResultsFound { count });
        }
        Ok(self.0.into_iter().next())
    }
}

impl<T: FirstColumn> Rows<T> {
    /// First column of the single row; `None` when there are no rows.
    pub fn scalar(self) -> DbResult<Option<T::Output>> {
        Ok(self.one_or_none()?.map(FirstColumn::first_column))
    }
}

impl<T> IntoIterator for Rows<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
