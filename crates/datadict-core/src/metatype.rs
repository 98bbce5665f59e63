//! Portable metatype codes and the native-type resolution table.
//!
//! Every supported database spells its column types differently; the
//! metatype layer collapses all of those spellings into a small closed set
//! of portable codes, and each dialect owns the inverse mapping back to its
//! native DDL keywords.

use serde::{Deserialize, Serialize};

use crate::config::Config;

/// Portable column type codes.
///
/// - `C`/`C2`: varchar (and its national-character variant)
/// - `X`/`X2`/`XL`: text / clob of increasing capacity
/// - `B`: blob
/// - `D`: date, `T`: datetime, `TS`: timestamp
/// - `L`: boolean / single bit
/// - `I`, `I1`, `I2`, `I4`, `I8`: integers of various widths
/// - `N`: numeric / decimal, `F`: float
/// - `R`: auto-increment-capable integer (serial, counter, identity)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetaType {
    C,
    C2,
    X,
    X2,
    XL,
    B,
    D,
    T,
    TS,
    L,
    I,
    I1,
    I2,
    I4,
    I8,
    N,
    F,
    R,
}

impl MetaType {
    /// The letter code used in field specs and structured metadata.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::C => "C",
            Self::C2 => "C2",
            Self::X => "X",
            Self::X2 => "X2",
            Self::XL => "XL",
            Self::B => "B",
            Self::D => "D",
            Self::T => "T",
            Self::TS => "TS",
            Self::L => "L",
            Self::I => "I",
            Self::I1 => "I1",
            Self::I2 => "I2",
            Self::I4 => "I4",
            Self::I8 => "I8",
            Self::N => "N",
            Self::F => "F",
            Self::R => "R",
        }
    }

    /// Parses a letter code (case-insensitive).
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_ascii_uppercase().as_str() {
            "C" => Some(Self::C),
            "C2" => Some(Self::C2),
            "X" => Some(Self::X),
            "X2" => Some(Self::X2),
            "XL" => Some(Self::XL),
            "B" => Some(Self::B),
            "D" => Some(Self::D),
            "T" => Some(Self::T),
            "TS" => Some(Self::TS),
            "L" => Some(Self::L),
            "I" => Some(Self::I),
            "I1" => Some(Self::I1),
            "I2" => Some(Self::I2),
            "I4" => Some(Self::I4),
            "I8" => Some(Self::I8),
            "N" => Some(Self::N),
            "F" => Some(Self::F),
            "R" => Some(Self::R),
            _ => None,
        }
    }

    /// True for the text/blob family (`X`, `X2`, `XL`, `B`) whose members
    /// cannot carry a size suffix and, on many dialects, cannot carry
    /// NOT NULL or DEFAULT either.
    #[must_use]
    pub fn is_blob_family(self) -> bool {
        matches!(self, Self::X | Self::X2 | Self::XL | Self::B)
    }

    /// True for the character family (`C`, `C2`) plus the text family,
    /// whose defaults are always quoted.
    #[must_use]
    pub fn is_char_family(self) -> bool {
        matches!(self, Self::C | Self::C2 | Self::X | Self::X2 | Self::XL)
    }
}

impl std::fmt::Display for MetaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Per-column hints that disambiguate native types during forward
/// resolution. All fields default to "no information".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColumnHints {
    /// The column participates in the table's primary key; promotes `I`
    /// to `R`.
    pub primary_key: bool,
    /// Driver-reported binary flag. `Some(false)` demotes `B` to `X`
    /// (the driver says this "blob" actually holds text); `None` leaves
    /// `B` untouched.
    pub binary: Option<bool>,
    /// The connection reports native datetime support; promotes `D` to `T`.
    pub datetime_native: bool,
}

/// Looks up a native type name in the shared forward table. Returns `None`
/// on a miss; callers then apply the configured fallback.
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn lookup(native: &str) -> Option<MetaType> {
    let native = native.to_ascii_uppercase();
    let meta = match native.as_str() {
        "VARCHAR" | "VARCHAR2" | "CHAR" | "C" | "STRING" | "NCHAR" | "NVARCHAR" | "VARYING"
        | "BPCHAR" | "CHARACTER" | "INTERVAL" | "MACADDR" | "VAR_STRING" | "UNIQUEIDENTIFIER" => {
            MetaType::C
        }

        "LONGCHAR" | "TEXT" | "NTEXT" | "M" | "X" | "CLOB" | "NCLOB" | "LVARCHAR" => MetaType::X,

        "BLOB" | "IMAGE" | "BINARY" | "VARBINARY" | "LONGBINARY" | "B" => MetaType::B,

        "YEAR" | "DATE" | "D" => MetaType::D,

        "SMALLDATETIME" | "TIME" | "TIMESTAMP" | "DATETIME" | "DATETIME2" | "TIMESTAMPTZ"
        | "T" | "TIMESTAMP WITHOUT TIME ZONE" => MetaType::T,

        "BOOL" | "BOOLEAN" | "BIT" | "L" => MetaType::L,

        "COUNTER" | "R" | "SERIAL" | "INT IDENTITY" => MetaType::R,

        "INT" | "INT2" | "INT4" | "INT8" | "INTEGER" | "INTEGER UNSIGNED" | "SHORT"
        | "TINYINT" | "SMALLINT" | "I" => MetaType::I,

        "LONG" | "BIGINT" | "DECIMAL" | "DEC" | "REAL" | "DOUBLE" | "DOUBLE PRECISION"
        | "SMALLFLOAT" | "FLOAT" | "NUMBER" | "NUM" | "NUMERIC" | "MONEY" => MetaType::N,

        // Informix SQL* spellings reported by its metadata calls.
        "SQLINT" | "SQLSERIAL" | "SQLSMINT" => MetaType::I,
        "SQLSMFLOAT" | "SQLFLOAT" | "SQLMONEY" | "SQLDECIMAL" | "SQLINTERVAL" => MetaType::N,
        "SQLDATE" => MetaType::D,
        "SQLVCHAR" | "SQLCHAR" | "SQLNCHAR" | "SQLNVCHAR" => MetaType::C,
        "SQLDTIME" => MetaType::T,
        "SQLBYTES" => MetaType::B,
        "SQLTEXT" | "SQLLVARCHAR" => MetaType::X,
        "SQLINT8" | "SQLSERIAL8" => MetaType::I8,
        "SQLBOOL" => MetaType::L,

        _ => return None,
    };
    Some(meta)
}

/// Resolves a native type name to a portable metatype, applying the
/// post-lookup refinements that raw names alone cannot express.
///
/// `max_length` is the live column length when known (drivers report `-1`
/// or omit it when unknown; pass `None` then).
#[must_use]
pub fn resolve(
    native: &str,
    max_length: Option<i64>,
    hints: &ColumnHints,
    config: &Config,
) -> MetaType {
    let mapped = lookup(native).unwrap_or_else(|| {
        tracing::debug!(native, fallback = %config.fallback_metatype, "native type not mapped");
        config.fallback_metatype
    });

    match mapped {
        MetaType::C => {
            // Oversized char columns behave like text fields.
            let threshold = i64::from(config.blob_threshold());
            if max_length.is_some_and(|len| len > threshold) {
                MetaType::X
            } else {
                MetaType::C
            }
        }
        MetaType::I => {
            if hints.primary_key {
                MetaType::R
            } else {
                MetaType::I
            }
        }
        MetaType::B => match hints.binary {
            Some(false) => MetaType::X,
            _ => MetaType::B,
        },
        MetaType::D => {
            if hints.datetime_native {
                MetaType::T
            } else {
                MetaType::D
            }
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> Config {
        Config::default()
    }

    #[test]
    fn plain_lookups() {
        assert_eq!(lookup("varchar"), Some(MetaType::C));
        assert_eq!(lookup("CLOB"), Some(MetaType::X));
        assert_eq!(lookup("IMAGE"), Some(MetaType::B));
        assert_eq!(lookup("YEAR"), Some(MetaType::D));
        assert_eq!(lookup("TIMESTAMPTZ"), Some(MetaType::T));
        assert_eq!(lookup("BIT"), Some(MetaType::L));
        assert_eq!(lookup("INT IDENTITY"), Some(MetaType::R));
        assert_eq!(lookup("SQLSERIAL8"), Some(MetaType::I8));
        assert_eq!(lookup("no-such-type"), None);
    }

    #[test]
    fn bigint_is_numeric_not_integer() {
        // Wider than a 32-bit machine word, so it rides the numeric code.
        assert_eq!(lookup("BIGINT"), Some(MetaType::N));
    }

    #[test]
    fn long_char_promotes_to_text() {
        let hints = ColumnHints::default();
        assert_eq!(resolve("VARCHAR", Some(80), &hints, &cfg()), MetaType::C);
        assert_eq!(resolve("VARCHAR", Some(101), &hints, &cfg()), MetaType::X);

        // Unset threshold falls back to 250.
        let unset = Config {
            blob_size: None,
            ..Config::default()
        };
        assert_eq!(resolve("VARCHAR", Some(200), &hints, &unset), MetaType::C);
        assert_eq!(resolve("VARCHAR", Some(251), &hints, &unset), MetaType::X);
    }

    #[test]
    fn unknown_length_never_promotes() {
        let hints = ColumnHints::default();
        assert_eq!(resolve("VARCHAR", None, &hints, &cfg()), MetaType::C);
    }

    #[test]
    fn primary_key_integer_promotes_to_counter() {
        let hints = ColumnHints {
            primary_key: true,
            ..ColumnHints::default()
        };
        assert_eq!(resolve("INTEGER", None, &hints, &cfg()), MetaType::R);
        assert_eq!(
            resolve("INTEGER", None, &ColumnHints::default(), &cfg()),
            MetaType::I
        );
    }

    #[test]
    fn binary_hint_demotes_blob() {
        let text_blob = ColumnHints {
            binary: Some(false),
            ..ColumnHints::default()
        };
        assert_eq!(resolve("BLOB", None, &text_blob, &cfg()), MetaType::X);
        let true_blob = ColumnHints {
            binary: Some(true),
            ..ColumnHints::default()
        };
        assert_eq!(resolve("BLOB", None, &true_blob, &cfg()), MetaType::B);
        assert_eq!(
            resolve("BLOB", None, &ColumnHints::default(), &cfg()),
            MetaType::B
        );
    }

    #[test]
    fn datetime_capable_connection_promotes_date() {
        let hints = ColumnHints {
            datetime_native: true,
            ..ColumnHints::default()
        };
        assert_eq!(resolve("DATE", None, &hints, &cfg()), MetaType::T);
    }

    #[test]
    fn miss_falls_back_to_configured_default() {
        let hints = ColumnHints::default();
        assert_eq!(resolve("GEOMETRY", None, &hints, &cfg()), MetaType::N);

        let cfg = Config {
            fallback_metatype: MetaType::C,
            ..Config::default()
        };
        // The fallback metatype goes through refinement like a table hit.
        assert_eq!(resolve("GEOMETRY", Some(500), &hints, &cfg), MetaType::X);
    }

    #[test]
    fn code_round_trip() {
        for meta in [
            MetaType::C,
            MetaType::C2,
            MetaType::X,
            MetaType::X2,
            MetaType::XL,
            MetaType::B,
            MetaType::D,
            MetaType::T,
            MetaType::TS,
            MetaType::L,
            MetaType::I,
            MetaType::I1,
            MetaType::I2,
            MetaType::I4,
            MetaType::I8,
            MetaType::N,
            MetaType::F,
            MetaType::R,
        ] {
            assert_eq!(MetaType::from_code(meta.code()), Some(meta));
        }
    }
}
