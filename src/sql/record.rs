//! Record descriptors: the statically declared field table the mapper walks instead of inspecting types at runtime.

use super::value::{SqlType, SqlValue};
use crate::case::to_snake_case;

/// One entry of a record's field table: the field identifier and, when the field should be written, its value.
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    ident: &'static str,
    value: Option<SqlValue>,
}

impl Field {
    /// Plain field. Left out when it holds its type's zero value.
    pub fn value<T: SqlType + ?Sized>(ident: &'static str, v: &T) -> Self {
        Field {
            ident,
            value: (!v.is_zero()).then(|| v.to_sql_value()),
        }
    }

    /// Optional field. Written whenever it is `Some`, even if the wrapped value is zero.
    pub fn optional<T: SqlType>(ident: &'static str, v: &Option<T>) -> Self {
        Field {
            ident,
            value: v.as_ref().map(|v| v.to_sql_value_deref()),
        }
    }

    pub fn ident(&self) -> &'static str {
        self.ident
    }

    /// Column name for this field (snake_case of the identifier).
    pub fn column(&self) -> String {
        to_snake_case(self.ident)
    }

    pub fn value_ref(&self) -> Option<&SqlValue> {
        self.value.as_ref()
    }

    pub fn into_value(self) -> Option<SqlValue> {
        self.value
    }
}

/// A struct that can be written as a table row. Usually implemented with [`record!`](crate::record).
pub trait Record {
    /// Field table in declaration order.
    fn fields(&self) -> Vec<Field>;
}

impl<R: Record + ?Sized> Record for &R {
    fn fields(&self) -> Vec<Field> {
        (**self).fields()
    }
}

/// Implements [`Record`](crate::sql::Record) for a struct by listing its fields in declaration order.
/// Fields of type `Option<T>` are marked `: optional`.
///
/// ```ignore
/// record!(Task { id, title, description, updated_at: optional });
/// ```
#[macro_export]
macro_rules! record {
    (@field $self:ident, $field:ident) => {
        $crate::sql::Field::value(::core::stringify!($field), &$self.$field)
    };
    (@field $self:ident, $field:ident, optional) => {
        $crate::sql::Field::optional(::core::stringify!($field), &$self.$field)
    };
    ($ty:ty { $($field:ident $(: $kind:ident)?),* $(,)? }) => {
        impl $crate::sql::Record for $ty {
            fn fields(&self) -> ::std::vec::Vec<$crate::sql::Field> {
                ::std::vec![$($crate::record!(@field self, $field $(, $kind)?)),*]
            }
        }
    };
}
