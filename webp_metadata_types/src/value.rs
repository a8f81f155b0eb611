//! Values stored under a tag in a [`crate::Directory`].

/// A fraction, as stored by Exif's `RATIONAL` and `SRATIONAL` types.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub struct Rational {
    pub numerator: i64,
    pub denominator: i64,
}

impl Rational {
    pub const fn new(numerator: i64, denominator: i64) -> Self {
        Self {
            numerator,
            denominator,
        }
    }
}

impl core::fmt::Display for Rational {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

/// A typed value attached to a tag.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub enum TagValue {
    Int(i64),
    Ints(Vec<i64>),
    Bool(bool),
    Str(String),
    Bytes(Vec<u8>),
    Rational(Rational),
    Rationals(Vec<Rational>),

    /// Ordered `(key, value)` pairs, like the flattened properties of an XMP
    /// packet.
    Pairs(Vec<(String, String)>),
}

impl TagValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b.as_slice()),
            _ => None,
        }
    }
}

impl core::fmt::Display for TagValue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        /// Writes each item, separated by `sep`.
        fn list<T: core::fmt::Display>(
            f: &mut core::fmt::Formatter<'_>,
            items: &[T],
            sep: &str,
        ) -> core::fmt::Result {
            for (i, item) in items.iter().enumerate() {
                if i != 0 {
                    f.write_str(sep)?;
                }
                write!(f, "{item}")?;
            }
            Ok(())
        }

        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::Ints(ints) => list(f, ints, " "),
            Self::Bool(b) => f.write_str(if *b { "true" } else { "false" }),
            Self::Str(s) => f.write_str(s),
            Self::Bytes(b) => write!(f, "[{} bytes]", b.len()),
            Self::Rational(r) => write!(f, "{r}"),
            Self::Rationals(rs) => list(f, rs, " "),
            Self::Pairs(pairs) => {
                for (i, (key, value)) in pairs.iter().enumerate() {
                    if i != 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}={value}")?;
                }
                Ok(())
            }
        }
    }
}
