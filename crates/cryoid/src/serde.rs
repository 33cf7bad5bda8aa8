use ::serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::SnowflakeId;

impl Serialize for SnowflakeId {
    /// Serializes the identifier as its decimal string.
    ///
    /// The string form is the transport-safe representation: consumers
    /// without a wide-enough native integer type can still round-trip the
    /// value exactly.
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_decimal())
    }
}

impl<'de> Deserialize<'de> for SnowflakeId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct DecimalVisitor;

        impl serde::de::Visitor<'_> for DecimalVisitor {
            type Value = SnowflakeId;

            fn expecting(&self, formatter: &mut core::fmt::Formatter) -> core::fmt::Result {
                formatter.write_str("a decimal identifier string")
            }

            #[inline]
            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                SnowflakeId::from_decimal(v).map_err(serde::de::Error::custom)
            }

            #[inline]
            fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(SnowflakeId::from_u64(v))
            }
        }

        deserializer.deserialize_str(DecimalVisitor)
    }
}
