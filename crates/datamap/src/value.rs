//! Values a data map can hold.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single data map value.
///
/// `String` is special: getters for every other type will try to parse it
/// using the canonical encoding for that type. The remaining variants are
/// "native" values and only match a getter of exactly their own type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataValue {
    String(String),
    Int(i32),
    Long(i64),
    Float(#[serde(with = "float_repr::single")] f32),
    Double(#[serde(with = "float_repr::double")] f64),
    Bool(bool),
    Char(char),
    Uuid(Uuid),
    /// Loosely-typed value carried over from an untyped source (e.g. JSON).
    Object(serde_json::Value),
}

/// Runtime type tag of a [`DataValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataValueKind {
    String,
    Int,
    Long,
    Float,
    Double,
    Bool,
    Char,
    Uuid,
    Object,
}

impl DataValueKind {
    pub fn name(self) -> &'static str {
        match self {
            DataValueKind::String => "string",
            DataValueKind::Int => "int",
            DataValueKind::Long => "long",
            DataValueKind::Float => "float",
            DataValueKind::Double => "double",
            DataValueKind::Bool => "bool",
            DataValueKind::Char => "char",
            DataValueKind::Uuid => "uuid",
            DataValueKind::Object => "object",
        }
    }
}

impl core::fmt::Display for DataValueKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

impl DataValue {
    pub fn kind(&self) -> DataValueKind {
        match self {
            DataValue::String(_) => DataValueKind::String,
            DataValue::Int(_) => DataValueKind::Int,
            DataValue::Long(_) => DataValueKind::Long,
            DataValue::Float(_) => DataValueKind::Float,
            DataValue::Double(_) => DataValueKind::Double,
            DataValue::Bool(_) => DataValueKind::Bool,
            DataValue::Char(_) => DataValueKind::Char,
            DataValue::Uuid(_) => DataValueKind::Uuid,
            DataValue::Object(_) => DataValueKind::Object,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            DataValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_string(&self) -> bool {
        matches!(self, DataValue::String(_))
    }

    /// Map a loosely-typed JSON value onto the closest variant.
    ///
    /// Integral numbers become `Long`, other numbers `Double`; arrays, objects
    /// and `null` are kept as opaque `Object` values.
    pub fn from_json(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::String(s) => DataValue::String(s),
            Value::Bool(b) => DataValue::Bool(b),
            Value::Number(n) => match (n.as_i64(), n.as_f64()) {
                (Some(i), _) => DataValue::Long(i),
                (None, Some(f)) => DataValue::Double(f),
                (None, None) => DataValue::Object(Value::Number(n)),
            },
            other => DataValue::Object(other),
        }
    }
}

/// Float serde: finite values stay JSON numbers, NaN and the infinities are
/// written as their canonical text since JSON has no number for them.
mod float_repr {
    macro_rules! float_repr {
        ($module:ident, $t:ty) => {
            pub(super) mod $module {
                use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Error};

                use crate::canonical::Coercible;

                #[derive(Deserialize)]
                #[serde(untagged)]
                enum Repr {
                    Number($t),
                    Text(String),
                }

                pub fn serialize<S: Serializer>(value: &$t, serializer: S) -> Result<S::Ok, S::Error> {
                    if value.is_finite() {
                        value.serialize(serializer)
                    } else {
                        serializer.serialize_str(&value.to_canonical())
                    }
                }

                pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<$t, D::Error> {
                    match Repr::deserialize(deserializer)? {
                        Repr::Number(value) => Ok(value),
                        Repr::Text(text) => <$t>::parse_canonical(&text).ok_or_else(|| {
                            D::Error::custom(format_args!("invalid {} `{text}`", <$t>::KIND))
                        }),
                    }
                }
            }
        };
    }

    float_repr!(single, f32);
    float_repr!(double, f64);
}

macro_rules! impl_from_native {
    ($t:ty, $variant:ident) => {
        impl From<$t> for DataValue {
            fn from(value: $t) -> Self {
                DataValue::$variant(value)
            }
        }
    };
}

impl_from_native!(String, String);
impl_from_native!(i32, Int);
impl_from_native!(i64, Long);
impl_from_native!(f32, Float);
impl_from_native!(f64, Double);
impl_from_native!(bool, Bool);
impl_from_native!(char, Char);
impl_from_native!(Uuid, Uuid);

impl From<&str> for DataValue {
    fn from(value: &str) -> Self {
        DataValue::String(value.to_string())
    }
}

impl From<&String> for DataValue {
    fn from(value: &String) -> Self {
        DataValue::String(value.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_native_picks_matching_variant() {
        assert_eq!(DataValue::from(7), DataValue::Int(7));
        assert_eq!(DataValue::from(7_i64), DataValue::Long(7));
        assert_eq!(DataValue::from(1.5_f32), DataValue::Float(1.5));
        assert_eq!(DataValue::from(1.5), DataValue::Double(1.5));
        assert_eq!(DataValue::from('x'), DataValue::Char('x'));
        assert_eq!(DataValue::from("x"), DataValue::String("x".to_string()));
        assert_eq!(DataValue::from(Uuid::nil()).kind(), DataValueKind::Uuid);
    }

    #[test]
    fn json_values_map_to_closest_variant() {
        assert_eq!(DataValue::from_json(json!("a")), DataValue::String("a".into()));
        assert_eq!(DataValue::from_json(json!(true)), DataValue::Bool(true));
        assert_eq!(DataValue::from_json(json!(42)), DataValue::Long(42));
        assert_eq!(DataValue::from_json(json!(2.5)), DataValue::Double(2.5));
        assert_eq!(DataValue::from_json(json!(u64::MAX)), DataValue::Double(u64::MAX as f64));
        assert_eq!(DataValue::from_json(json!([1, 2])), DataValue::Object(json!([1, 2])));
        assert_eq!(DataValue::from_json(json!(null)), DataValue::Object(json!(null)));
    }

    #[test]
    fn serde_keeps_runtime_type() {
        let values = vec![
            DataValue::String("5".into()),
            DataValue::Int(5),
            DataValue::Long(5),
            DataValue::Float(5.0),
            DataValue::Double(5.0),
            DataValue::Char('5'),
        ];
        let json = serde_json::to_string(&values).unwrap();
        let back: Vec<DataValue> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, values);
        let kinds: Vec<_> = back.iter().map(DataValue::kind).collect();
        assert_eq!(
            kinds,
            vec![
                DataValueKind::String,
                DataValueKind::Int,
                DataValueKind::Long,
                DataValueKind::Float,
                DataValueKind::Double,
                DataValueKind::Char,
            ]
        );
    }

    #[test]
    fn non_finite_floats_survive_serde() {
        let values = vec![
            DataValue::Double(f64::INFINITY),
            DataValue::Double(f64::NEG_INFINITY),
            DataValue::Float(f32::INFINITY),
        ];
        let json = serde_json::to_value(&values).unwrap();
        assert_eq!(
            json,
            json!([{"double": "Infinity"}, {"double": "-Infinity"}, {"float": "Infinity"}])
        );
        let back: Vec<DataValue> = serde_json::from_value(json).unwrap();
        assert_eq!(back, values);

        let nan = serde_json::to_value(DataValue::Float(f32::NAN)).unwrap();
        assert_eq!(nan, json!({"float": "NaN"}));
        let back: DataValue = serde_json::from_value(nan).unwrap();
        assert!(matches!(back, DataValue::Float(f) if f.is_nan()));

        assert_eq!(serde_json::to_value(DataValue::Double(2.5)).unwrap(), json!({"double": 2.5}));
        assert!(serde_json::from_value::<DataValue>(json!({"double": "lots"})).is_err());
        assert!(serde_json::from_value::<DataValue>(json!({"double": null})).is_err());
    }
}
