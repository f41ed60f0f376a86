use bytes::Bytes;
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Cache key type
pub type KeyType = String;

/// Value stored under a key.
///
/// Commands coerce between the two forms on demand: `append`/`prepend`
/// work on the textual form, `incr`/`decr` on the numeric one. Coercion
/// never fails, unparseable text becomes `NaN`.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Text(Bytes),
    Number(f64),
}

impl Value {
    /// Textual form of the value
    pub fn to_text(&self) -> Bytes {
        match self {
            Value::Text(text) => text.clone(),
            Value::Number(number) => Bytes::from(format_number(*number)),
        }
    }

    /// Numeric form of the value
    pub fn to_number(&self) -> f64 {
        match self {
            Value::Text(text) => parse_number(text),
            Value::Number(number) => *number,
        }
    }

    /// Byte length of the textual form
    pub fn len(&self) -> usize {
        match self {
            Value::Text(text) => text.len(),
            Value::Number(number) => format_number(*number).len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn format_number(number: f64) -> String {
    if number.is_nan() {
        return String::from("NaN");
    }
    if number.is_infinite() {
        return if number > 0.0 {
            String::from("Infinity")
        } else {
            String::from("-Infinity")
        };
    }
    if number == 0.0 {
        // -0 prints as 0
        return String::from("0");
    }
    let magnitude = number.abs();
    if !(1e-6..1e21).contains(&magnitude) {
        // exponent form with an explicit sign, 1e+21 and 1.5e-7
        let formatted = format!("{:e}", number);
        return match formatted.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{}e+{}", mantissa, exponent)
            }
            _ => formatted,
        };
    }
    number.to_string()
}

fn parse_number(text: &[u8]) -> f64 {
    let Ok(text) = std::str::from_utf8(text) else {
        return f64::NAN;
    };
    let text = text.trim();
    if text.is_empty() {
        return 0.0;
    }
    match text {
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        _ => {
            // f64::from_str also knows "inf" and "nan", which are not numbers here
            if text
                .bytes()
                .any(|b| b.is_ascii_alphabetic() && b != b'e' && b != b'E')
            {
                return f64::NAN;
            }
            text.parse::<f64>().unwrap_or(f64::NAN)
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(text) => f.write_str(&String::from_utf8_lossy(text)),
            Value::Number(number) => f.write_str(&format_number(*number)),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(Bytes::copy_from_slice(value.as_bytes()))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(Bytes::from(value))
    }
}

impl From<Bytes> for Value {
    fn from(value: Bytes) -> Self {
        Value::Text(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Number(value as f64)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(value as f64)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Number(value as f64)
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::Number(value as f64)
    }
}

/// Version stamp attached to every stored entry.
///
/// Tokens are opaque: the only supported comparison is equality. They
/// travel as text (`Display`/`FromStr`) so callers can hand a token back
/// exactly as they received it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CasToken(u64);

impl CasToken {
    pub(crate) fn new(id: u64) -> CasToken {
        CasToken(id)
    }
}

impl fmt::Display for CasToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CasToken {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>().map(CasToken)
    }
}

/// Value and meta data stored in cache
#[derive(Clone, Debug, PartialEq)]
pub struct Entry {
    pub(crate) value: Value,
    /// absolute expiry in unix milliseconds, 0 means never
    pub(crate) expires_at: u64,
    pub(crate) cas: CasToken,
}

impl Entry {
    pub fn new(value: Value, expires_at: u64, cas: CasToken) -> Entry {
        Entry {
            value,
            expires_at,
            cas,
        }
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn expires_at(&self) -> u64 {
        self.expires_at
    }

    pub fn cas(&self) -> CasToken {
        self.cas
    }

    pub fn never_expires(&self) -> bool {
        self.expires_at == 0
    }
}

/// Result of `gets`: the value together with its current token
#[derive(Clone, Debug, PartialEq)]
pub struct CasValue {
    pub cas: CasToken,
    pub value: Value,
}

/// Result of set operation on cache
/// cas indicates version stored in cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetStatus {
    pub cas: CasToken,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeltaResult {
    pub cas: CasToken,
    pub value: f64,
}
