//! Serde adapter for `f64` fields that may hold infinity or NaN
//!
//! JSON numbers cannot express non-finite values, so these are written as the
//! strings `"inf"`, `"-inf"` and `"NaN"`. Finite values stay plain numbers.
//! Use with `#[serde(with = "crate::serde_float")]`.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Repr {
    Number(f64),
    Text(String),
}

pub fn serialize<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if value.is_finite() {
        value.serialize(serializer)
    } else if value.is_nan() {
        serializer.serialize_str("NaN")
    } else if value.is_sign_positive() {
        serializer.serialize_str("inf")
    } else {
        serializer.serialize_str("-inf")
    }
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match Repr::deserialize(deserializer)? {
        Repr::Number(value) => Ok(value),
        Repr::Text(text) => match text.as_str() {
            "inf" => Ok(f64::INFINITY),
            "-inf" => Ok(f64::NEG_INFINITY),
            "NaN" => Ok(f64::NAN),
            other => Err(de::Error::custom(format!(
                "expected a number, \"inf\", \"-inf\" or \"NaN\", got {other:?}"
            ))),
        },
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize)]
    struct Sample {
        #[serde(with = "super")]
        value: f64,
    }

    fn roundtrip(value: f64) -> f64 {
        let json = serde_json::to_string(&Sample { value }).unwrap();
        serde_json::from_str::<Sample>(&json).unwrap().value
    }

    #[test]
    fn test_finite_values_stay_numbers() {
        assert_eq!(serde_json::to_string(&Sample { value: 2.5 }).unwrap(), r#"{"value":2.5}"#);
        assert_eq!(roundtrip(2.5), 2.5);
        assert_eq!(roundtrip(0.0), 0.0);
    }

    #[test]
    fn test_non_finite_values_roundtrip() {
        assert_eq!(
            serde_json::to_string(&Sample { value: f64::INFINITY }).unwrap(),
            r#"{"value":"inf"}"#
        );
        assert_eq!(roundtrip(f64::INFINITY), f64::INFINITY);
        assert_eq!(roundtrip(f64::NEG_INFINITY), f64::NEG_INFINITY);
        assert!(roundtrip(f64::NAN).is_nan());
    }

    #[test]
    fn test_integer_json_is_accepted() {
        let sample: Sample = serde_json::from_str(r#"{"value":3}"#).unwrap();
        assert_eq!(sample.value, 3.0);
    }

    #[test]
    fn test_unknown_text_is_rejected() {
        assert!(serde_json::from_str::<Sample>(r#"{"value":"lots"}"#).is_err());
    }
}
