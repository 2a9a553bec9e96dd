extern crate approx;
extern crate bounded;
extern crate proptest;
extern crate serde_json;

use approx::assert_abs_diff_eq;
use bounded::BoundedValue;
use proptest::option;
use proptest::prelude::*;
use std::fmt::{Debug, Display};

fn expected_clamp<T: PartialOrd + Clone>(value: &T, minimum: Option<&T>, maximum: Option<&T>) -> T {
    match (minimum, maximum) {
        (Some(minimum), _) if value <= minimum => minimum.clone(),
        (_, Some(maximum)) if value >= maximum => maximum.clone(),
        _ => value.clone(),
    }
}

fn ordered<T: PartialOrd>(minimum: &Option<T>, maximum: &Option<T>) -> bool {
    match (minimum, maximum) {
        (Some(minimum), Some(maximum)) => minimum <= maximum,
        _ => true,
    }
}

fn check_clamp<T>(value: T, minimum: Option<T>, maximum: Option<T>) -> Result<(), TestCaseError>
where
    T: PartialOrd + Clone + Debug,
{
    let expected = expected_clamp(&value, minimum.as_ref(), maximum.as_ref());
    let mut bounded = BoundedValue::new(value, minimum, maximum);
    prop_assert!(*bounded == expected, "{:?} != {:?}", bounded.get(), expected);
    bounded.clamp();
    prop_assert!(*bounded == expected, "clamp is not idempotent");
    Ok(())
}

fn check_boundedness<T: PartialOrd + Clone>(bounded: &BoundedValue<T>) -> Result<(), TestCaseError> {
    prop_assert_ne!(bounded.is_bounded(), bounded.is_unbounded());
    prop_assert_ne!(bounded.is_bounded_from_above(), bounded.is_unbounded_from_above());
    prop_assert_ne!(bounded.is_bounded_from_below(), bounded.is_unbounded_from_below());
    prop_assert_eq!(
        bounded.is_bounded(),
        bounded.is_bounded_from_above() || bounded.is_bounded_from_below()
    );
    Ok(())
}

fn check_self_equality<T>(bounded: &BoundedValue<T>) -> Result<(), TestCaseError>
where
    T: PartialOrd + Clone,
{
    prop_assert!(*bounded == *bounded.get());
    prop_assert!(bounded.is_equal_as_bounded(&bounded.clamped()));
    prop_assert!(bounded.clamped().is_equal_as_bounded(bounded));
    Ok(())
}

fn check_representation<T>(bounded: &BoundedValue<T>) -> Result<(), TestCaseError>
where
    T: PartialOrd + Clone + Display,
{
    let repr = format!("{:?}", bounded);
    prop_assert!(repr.contains("BoundedValue"), "{}", repr);
    prop_assert!(repr.contains(&bounded.to_string()), "{}", repr);
    if let Some(minimum) = bounded.minimum() {
        prop_assert!(repr.contains(&minimum.to_string()), "{}", repr);
    }
    if let Some(maximum) = bounded.maximum() {
        prop_assert!(repr.contains(&maximum.to_string()), "{}", repr);
    }
    Ok(())
}

fn check_width(bounded: &BoundedValue<i64>) -> Result<(), TestCaseError> {
    let expected = match (bounded.minimum(), bounded.maximum()) {
        (Some(&minimum), Some(&maximum)) if minimum <= maximum => {
            Some((i128::from(maximum) - i128::from(minimum)) as u64)
        }
        _ => None,
    };
    prop_assert_eq!(bounded.width(), expected);
    Ok(())
}

fn real() -> impl Strategy<Value = f64> {
    -1e9f64..1e9
}

proptest! {
    #[test]
    fn integers_are_clamped(
        value in any::<i64>(),
        minimum in option::of(any::<i64>()),
        maximum in option::of(any::<i64>())
    ) {
        prop_assume!(ordered(&minimum, &maximum));
        check_clamp(value, minimum, maximum)?;
    }

    #[test]
    fn reals_are_clamped(
        value in real(),
        minimum in option::of(real()),
        maximum in option::of(real())
    ) {
        prop_assume!(ordered(&minimum, &maximum));
        check_clamp(value, minimum, maximum)?;
    }

    #[test]
    fn chars_are_clamped(
        value in any::<char>(),
        minimum in option::of(any::<char>()),
        maximum in option::of(any::<char>())
    ) {
        prop_assume!(ordered(&minimum, &maximum));
        check_clamp(value, minimum, maximum)?;
    }

    #[test]
    fn boundedness_is_consistent(
        value in any::<i32>(),
        minimum in option::of(any::<i32>()),
        maximum in option::of(any::<i32>())
    ) {
        check_boundedness(&BoundedValue::new(value, minimum, maximum))?;
    }

    #[test]
    fn width_is_consistent(
        value in any::<i64>(),
        minimum in option::of(any::<i64>()),
        maximum in option::of(any::<i64>()),
        letter in any::<char>()
    ) {
        check_width(&BoundedValue::new(value, minimum, maximum))?;

        let text = BoundedValue::new(letter, Some('a'), Some('z'));
        prop_assert_eq!(text.width(), None);
    }

    #[test]
    fn reals_have_a_width(minimum in real(), maximum in real()) {
        prop_assume!(minimum <= maximum);
        let bounded = BoundedValue::between(minimum, minimum, maximum);
        assert_abs_diff_eq!(bounded.width().unwrap(), maximum - minimum);
    }

    #[test]
    fn values_equal_themselves(
        value in any::<char>(),
        minimum in option::of(any::<char>()),
        maximum in option::of(any::<char>())
    ) {
        check_self_equality(&BoundedValue::new(value, minimum, maximum))?;
    }

    #[test]
    fn representation_is_complete(
        value in real(),
        minimum in option::of(real()),
        maximum in option::of(real()),
        text in "[a-z]{0,8}"
    ) {
        check_representation(&BoundedValue::new(value, minimum, maximum))?;
        check_representation(&BoundedValue::at_least(text, "m".to_owned()))?;
    }

    #[test]
    fn serialization_keeps_bounds(
        value in any::<i32>(),
        minimum in option::of(any::<i32>()),
        maximum in option::of(any::<i32>())
    ) {
        let bounded = BoundedValue::new(value, minimum, maximum);
        let json = serde_json::to_string(&bounded).unwrap();
        let restored: BoundedValue<i32> = serde_json::from_str(&json).unwrap();
        prop_assert!(restored.is_equal_as_bounded(&bounded), "{}", json);
    }
}

#[derive(Debug, Clone)]
enum Action {
    SetMinimum(i32),
    SetMaximum(i32),
    ClampAt(i32),
    Add(i32),
}

fn action() -> impl Strategy<Value = Action> {
    let small = -1000i32..1000;
    prop_oneof![
        small.clone().prop_map(Action::SetMinimum),
        small.clone().prop_map(Action::SetMaximum),
        small.clone().prop_map(Action::ClampAt),
        small.prop_map(Action::Add),
    ]
}

proptest! {
    #[test]
    fn random_mutations_stay_clamped(
        value in -1000i32..1000,
        minimum in option::of(-1000i32..1000),
        maximum in option::of(-1000i32..1000),
        actions in proptest::collection::vec(action(), 0..20)
    ) {
        let mut bounded = BoundedValue::new(value, minimum, maximum);
        for action in actions {
            match action {
                Action::SetMinimum(x) => bounded.set_minimum(x),
                Action::SetMaximum(x) => bounded.set_maximum(x),
                Action::ClampAt(x) => bounded.clamp_at(x),
                Action::Add(x) => bounded += x,
            }

            if let Some(&maximum) = bounded.maximum() {
                prop_assert!(*bounded <= maximum);
            }
            if let Some(&minimum) = bounded.minimum() {
                // the maximum wins over an inverted minimum
                if bounded.maximum().map_or(true, |&maximum| minimum <= maximum) {
                    prop_assert!(minimum <= *bounded);
                }
            }
            check_self_equality(&bounded)?;
            check_representation(&bounded)?;
        }
    }
}

#[test]
fn scenario_in_bounds() {
    let bounded = BoundedValue::new(5i32, Some(0), Some(10));
    assert_eq!(*bounded, 5);
    assert!(bounded.is_bounded());
    assert_eq!(bounded.width(), Some(10u32));
}

#[test]
fn scenario_clamped_at_construction() {
    assert_eq!(*BoundedValue::new(-3, Some(0), Some(10)), 0);
}

#[test]
fn scenario_clamped_after_add() {
    let mut bounded = BoundedValue::new(5, Some(0), Some(10));
    bounded += 20;
    assert_eq!(*bounded, 10);
}

#[test]
fn scenario_unbounded() {
    let bounded = BoundedValue::unbounded(5i32);
    assert!(bounded.is_unbounded());
    assert_eq!(bounded.width(), None);
}

#[test]
fn signed_width_at_the_extremes() {
    assert_eq!(BoundedValue::between(0i8, -100, 100).width(), Some(200u8));
    assert_eq!(BoundedValue::between(0i64, i64::min_value(), 0).width(), Some(1u64 << 63));
    assert_eq!(
        BoundedValue::between(0i64, i64::min_value(), i64::max_value()).width(),
        Some(u64::max_value())
    );
}

#[test]
fn scenario_minimum_raised() {
    let mut bounded = BoundedValue::new(5, Some(0), Some(10));
    bounded.set_minimum(8);
    assert_eq!(*bounded, 8);
}

#[test]
fn inverted_bounds_pin_to_maximum() {
    for &value in &[-5, 3, 7, 20] {
        assert_eq!(*BoundedValue::new(value, Some(8), Some(2)), 2);
    }
}

#[test]
fn every_assignment_operator_clamps() {
    let mut x = BoundedValue::between(6u32, 2, 40);
    x *= 10;
    assert_eq!(*x, 40);
    x /= 100;
    assert_eq!(*x, 2);
    x %= 2;
    assert_eq!(*x, 2);
    x ^= 0b101;
    assert_eq!(*x, 7);
    x &= 0b1;
    assert_eq!(*x, 2);
    x >>= 1;
    assert_eq!(*x, 2);
}

#[test]
fn nan_is_clamped_into_range() {
    let bounded = BoundedValue::between(std::f64::NAN, -1.0, 1.0);
    assert_abs_diff_eq!(*bounded, -1.0);
}
