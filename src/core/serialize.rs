use serde::ser::SerializeStruct as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{BoundedValue, MinMax};

/// Serialized as `{"value": ..., "minimum": ..., "maximum": ...}`,
/// so that the bounds survive a round trip.
impl<T> Serialize for BoundedValue<T, MinMax<T>>
where
    T: Serialize,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("BoundedValue", 3)?;
        state.serialize_field("value", self.get())?;
        state.serialize_field("minimum", &self.policy().minimum())?;
        state.serialize_field("maximum", &self.policy().maximum())?;
        state.end()
    }
}

// missing bounds deserialize as `None`
#[derive(Deserialize)]
#[serde(untagged)]
enum Repr<T> {
    Bounded {
        value: T,
        minimum: Option<T>,
        maximum: Option<T>,
    },
    Bare(T),
}

/// Accepts the serialized form or a bare value.
/// A bare value has no bounds. Either way the value is clamped again.
///
/// ```
/// # use bounded::BoundedValue;
/// let x: BoundedValue<i32> =
///     serde_json::from_str(r#"{"value": 12, "maximum": 10}"#).unwrap();
/// assert!(x.is_equal_as_bounded(&BoundedValue::at_most(10, 10)));
///
/// let y: BoundedValue<i32> = serde_json::from_str("12").unwrap();
/// assert!(y.is_unbounded());
/// ```
impl<'de, T> Deserialize<'de> for BoundedValue<T, MinMax<T>>
where
    T: Deserialize<'de> + PartialOrd + Clone,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Repr::deserialize(deserializer)? {
            Repr::Bounded {
                value,
                minimum,
                maximum,
            } => BoundedValue::new(value, minimum, maximum),
            Repr::Bare(value) => BoundedValue::unbounded(value),
        })
    }
}

#[cfg(test)]
speculate::speculate! {
    describe "serde support" {
        it "writes the bounds" {
            let bounded = BoundedValue::at_least(3, 1);
            assert_eq!(
                serde_json::to_value(&bounded).unwrap(),
                serde_json::json!({"value": 3, "minimum": 1, "maximum": null}));
        }

        it "restores the bounds" {
            let bounded = BoundedValue::between(2.5, -1.0, 4.0);
            let json = serde_json::to_string(&bounded).unwrap();
            let restored: BoundedValue<f64> = serde_json::from_str(&json).unwrap();
            assert!(restored.is_equal_as_bounded(&bounded));
        }

        it "rejects malformed state" {
            assert!(serde_json::from_str::<BoundedValue<i32>>(r#"{"value": "x"}"#).is_err());
            assert!(serde_json::from_str::<BoundedValue<i32>>("true").is_err());
        }
    }
}
