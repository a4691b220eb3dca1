#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    Serial,
    BigSerial,
    Integer,
    BigInt,
    Text,
    VarChar(usize),
    Boolean,
    Timestamp,
    Date,
    Decimal { precision: u8, scale: u8 },
    /// Closed set of string values. Native `ENUM` on MySQL, plain text on SQLite.
    Enum(Vec<String>),
}

impl FieldType {
    pub fn enumeration<I, S>(variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldType::Enum(variants.into_iter().map(Into::into).collect())
    }

    pub fn is_serial(&self) -> bool {
        matches!(self, FieldType::Serial | FieldType::BigSerial)
    }
}
