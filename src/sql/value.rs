//! SQL value shapes: literal rendering for string-built statements and native binding through sqlx.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use sqlx::encode::{Encode, IsNull};
use sqlx::postgres::{PgTypeInfo, Postgres};
use sqlx::{Database, Type};
use std::fmt;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The unset timestamp, `0001-01-01 00:00:00`. Timestamp fields holding it are left out of statements.
pub fn zero_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1, 1, 1)
        .unwrap_or(NaiveDate::MIN)
        .and_time(NaiveTime::default())
}

/// A field value in one of the shapes the mapper knows how to write. `Display` renders the SQL literal.
#[derive(Clone, Debug, PartialEq)]
pub enum SqlValue {
    /// `$$text$$` (dollar quoting, no apostrophe escaping needed).
    Text(String),
    /// `'YYYY-MM-DD HH:MM:SS'`
    Timestamp(NaiveDateTime),
    /// Same literal as `Text`, around the wrapped string.
    NullText(NullString),
    /// Same literal as `Timestamp`, around the wrapped time. The validity flag is not consulted.
    NullTimestamp(NullTime),
    /// Float reached through an optional field: fixed notation, six decimals.
    Decimal(f64),
    Unsigned(u64),
    Integer(i64),
    Float(f64),
    Bool(bool),
    /// Postgres array literal: `'{"a", "b"}'`.
    TextArray(Vec<String>),
    /// Anything else, written exactly as its `Display` output.
    Raw(String),
}

impl SqlValue {
    /// Fallback arm for types the mapper has no dedicated shape for.
    pub fn raw(value: impl fmt::Display) -> Self {
        SqlValue::Raw(value.to_string())
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Text(s) => write!(f, "$${}$$", s),
            SqlValue::Timestamp(t) => write!(f, "'{}'", t.format(TIMESTAMP_FORMAT)),
            SqlValue::NullText(ns) => write!(f, "$${}$$", ns.string),
            SqlValue::NullTimestamp(nt) => write!(f, "'{}'", nt.time.format(TIMESTAMP_FORMAT)),
            SqlValue::Decimal(n) => write!(f, "{:.6}", n),
            SqlValue::Unsigned(n) => write!(f, "{}", n),
            SqlValue::Integer(n) => write!(f, "{}", n),
            SqlValue::Float(n) => write!(f, "{}", n),
            SqlValue::Bool(b) => write!(f, "{}", b),
            SqlValue::TextArray(items) => {
                let quoted: Vec<String> = items
                    .iter()
                    .map(|s| format!("\"{}\"", s).replace('\'', "''"))
                    .collect();
                write!(f, "'{{{}}}'", quoted.join(", "))
            }
            SqlValue::Raw(s) => f.write_str(s),
        }
    }
}

/// Nullable text column value with an explicit validity flag.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NullString {
    pub string: String,
    pub valid: bool,
}

impl From<Option<String>> for NullString {
    fn from(v: Option<String>) -> Self {
        match v {
            Some(string) => NullString { string, valid: true },
            None => NullString::default(),
        }
    }
}

/// Nullable timestamp column value with an explicit validity flag. Defaults to [`zero_time`], not valid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NullTime {
    pub time: NaiveDateTime,
    pub valid: bool,
}

impl Default for NullTime {
    fn default() -> Self {
        NullTime { time: zero_time(), valid: false }
    }
}

impl From<Option<NaiveDateTime>> for NullTime {
    fn from(v: Option<NaiveDateTime>) -> Self {
        match v {
            Some(time) => NullTime { time, valid: true },
            None => NullTime::default(),
        }
    }
}

/// Text array column value (`text[]`).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StringArray(pub Vec<String>);

impl From<Vec<String>> for StringArray {
    fn from(v: Vec<String>) -> Self {
        StringArray(v)
    }
}

/// A Rust type that can sit in a record field.
pub trait SqlType {
    /// Whether this is the type's zero value (such fields are left out of the statement).
    fn is_zero(&self) -> bool;

    fn to_sql_value(&self) -> SqlValue;

    /// Shape used when the value sits behind an `Option` field.
    fn to_sql_value_deref(&self) -> SqlValue {
        self.to_sql_value()
    }
}

impl SqlType for str {
    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn to_sql_value(&self) -> SqlValue {
        SqlValue::Text(self.to_string())
    }
}

impl SqlType for String {
    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn to_sql_value(&self) -> SqlValue {
        SqlValue::Text(self.clone())
    }
}

macro_rules! impl_sql_type_int {
    ($variant:ident, $wide:ty: $($t:ty),*) => {
        $(
            impl SqlType for $t {
                fn is_zero(&self) -> bool {
                    *self == 0
                }

                fn to_sql_value(&self) -> SqlValue {
                    SqlValue::$variant(<$wide>::from(*self))
                }
            }
        )*
    };
}

impl_sql_type_int!(Integer, i64: i8, i16, i32, i64);
impl_sql_type_int!(Unsigned, u64: u8, u16, u32, u64);

macro_rules! impl_sql_type_float {
    ($($t:ty),*) => {
        $(
            impl SqlType for $t {
                fn is_zero(&self) -> bool {
                    *self == 0.0
                }

                fn to_sql_value(&self) -> SqlValue {
                    SqlValue::Float(f64::from(*self))
                }

                fn to_sql_value_deref(&self) -> SqlValue {
                    SqlValue::Decimal(f64::from(*self))
                }
            }
        )*
    };
}

impl_sql_type_float!(f32, f64);

impl SqlType for bool {
    fn is_zero(&self) -> bool {
        !*self
    }

    fn to_sql_value(&self) -> SqlValue {
        SqlValue::Bool(*self)
    }
}

impl SqlType for NaiveDateTime {
    fn is_zero(&self) -> bool {
        *self == zero_time()
    }

    fn to_sql_value(&self) -> SqlValue {
        SqlValue::Timestamp(*self)
    }
}

impl SqlType for DateTime<Utc> {
    fn is_zero(&self) -> bool {
        self.naive_utc() == zero_time()
    }

    fn to_sql_value(&self) -> SqlValue {
        SqlValue::Timestamp(self.naive_utc())
    }
}

impl SqlType for NullString {
    fn is_zero(&self) -> bool {
        *self == NullString::default()
    }

    fn to_sql_value(&self) -> SqlValue {
        SqlValue::NullText(self.clone())
    }
}

impl SqlType for NullTime {
    fn is_zero(&self) -> bool {
        *self == NullTime::default()
    }

    fn to_sql_value(&self) -> SqlValue {
        SqlValue::NullTimestamp(self.clone())
    }
}

impl SqlType for Vec<String> {
    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn to_sql_value(&self) -> SqlValue {
        SqlValue::TextArray(self.clone())
    }
}

impl SqlType for StringArray {
    fn is_zero(&self) -> bool {
        self.0.is_empty()
    }

    fn to_sql_value(&self) -> SqlValue {
        SqlValue::TextArray(self.0.clone())
    }
}

// Bound parameters: nullable wrappers send NULL when not valid, unsigned values must fit BIGINT.
impl<'q> Encode<'q, Postgres> for SqlValue {
    fn encode_by_ref(
        &self,
        buf: &mut <Postgres as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, Box<dyn std::error::Error + Send + Sync>> {
        Ok(match self {
            SqlValue::Text(s) | SqlValue::Raw(s) => {
                <&str as Encode<Postgres>>::encode_by_ref(&s.as_str(), buf)?
            }
            SqlValue::Timestamp(t) => <NaiveDateTime as Encode<Postgres>>::encode_by_ref(t, buf)?,
            SqlValue::NullText(ns) => {
                let v = ns.valid.then_some(ns.string.as_str());
                <Option<&str> as Encode<Postgres>>::encode_by_ref(&v, buf)?
            }
            SqlValue::NullTimestamp(nt) => {
                let v = nt.valid.then_some(nt.time);
                <Option<NaiveDateTime> as Encode<Postgres>>::encode_by_ref(&v, buf)?
            }
            SqlValue::Decimal(n) | SqlValue::Float(n) => <f64 as Encode<Postgres>>::encode_by_ref(n, buf)?,
            SqlValue::Unsigned(n) => {
                let n = i64::try_from(*n)?;
                <i64 as Encode<Postgres>>::encode_by_ref(&n, buf)?
            }
            SqlValue::Integer(n) => <i64 as Encode<Postgres>>::encode_by_ref(n, buf)?,
            SqlValue::Bool(b) => <bool as Encode<Postgres>>::encode_by_ref(b, buf)?,
            SqlValue::TextArray(items) => <Vec<String> as Encode<Postgres>>::encode_by_ref(items, buf)?,
        })
    }

    fn produces(&self) -> Option<PgTypeInfo> {
        Some(match self {
            SqlValue::Text(_) | SqlValue::Raw(_) | SqlValue::NullText(_) => <String as Type<Postgres>>::type_info(),
            SqlValue::Timestamp(_) | SqlValue::NullTimestamp(_) => <NaiveDateTime as Type<Postgres>>::type_info(),
            SqlValue::Decimal(_) | SqlValue::Float(_) => <f64 as Type<Postgres>>::type_info(),
            SqlValue::Unsigned(_) | SqlValue::Integer(_) => <i64 as Type<Postgres>>::type_info(),
            SqlValue::Bool(_) => <bool as Type<Postgres>>::type_info(),
            SqlValue::TextArray(_) => <Vec<String> as Type<Postgres>>::type_info(),
        })
    }
}

impl Type<Postgres> for SqlValue {
    fn type_info() -> PgTypeInfo {
        PgTypeInfo::with_name("TEXT")
    }
}
