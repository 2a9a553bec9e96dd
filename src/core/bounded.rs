use std::fmt::{self, Debug, Display};
use std::hash::{Hash, Hasher};

use crate::{ClampPolicy, Custom, CustomWith, InPlace, InPlaceOp, MinMax, OperatorError, Width};

/// A value that is kept within bounds, e.g. a parameter that can be tuned.
///
/// Reads pass through to the wrapped value via `Deref`,
/// comparisons and hashing only look at the wrapped value.
/// Every mutation goes through the clamp policy `P` afterwards.
///
/// With the default [`MinMax`] policy the value has optional inclusive bounds:
///
/// ```
/// # use bounded::BoundedValue;
/// let mut level = BoundedValue::between(5, 0, 10);
/// level += 20;
/// assert_eq!(level, 10);
/// level.set_minimum(12);
/// assert_eq!(*level, 10);  // the maximum is applied last
/// ```
///
/// The compound assignment operators (`+=`, `<<=`, ...) use the wrapped type's
/// own operator, including its overflow behaviour:
/// an integer overflow panics in debug builds and wraps around in release builds
/// before the value is clamped.
/// Use [`apply`](#method.apply) for checked integer arithmetic that reports overflow instead.
#[derive(Clone)]
pub struct BoundedValue<T, P = MinMax<T>> {
    value: T,
    policy: P,
}

impl<T, P> BoundedValue<T, P> {
    /// Get the current value.
    pub fn get(&self) -> &T {
        &self.value
    }

    /// Unwrap the current value.
    pub fn into_inner(self) -> T {
        self.value
    }

    /// The active clamp policy.
    pub fn policy(&self) -> &P {
        &self.policy
    }
}

impl<T, P> BoundedValue<T, P>
where
    P: ClampPolicy<T>,
{
    /// Wrap a value under an arbitrary policy. The value is clamped immediately.
    pub fn with_policy(value: T, policy: P) -> Self {
        let mut bounded = BoundedValue { value, policy };
        bounded.clamp();
        bounded
    }

    /// Re-apply the policy. Idempotent once the value is in bounds.
    pub fn clamp(&mut self) {
        self.policy.clamp(&mut self.value);
    }

    /// Replace the value, then clamp it.
    pub fn clamp_at(&mut self, value: T) {
        self.value = value;
        self.clamp();
    }

    /// A clamped copy. `self` is left as it is.
    pub fn clamped(&self) -> Self
    where
        T: Clone,
        P: Clone,
    {
        let mut copy = self.clone();
        copy.clamp();
        copy
    }

    /// Change the policy, e.g. the arguments of a clamp function, then clamp.
    ///
    /// ```
    /// # use bounded::{BoundedValue, MinMax};
    /// let mut x = BoundedValue::with_policy(7, MinMax::new(None, Some(10)));
    /// x.reconfigure(|policy| *policy = MinMax::new(None, Some(5)));
    /// assert_eq!(x, 5);
    /// ```
    pub fn reconfigure<R>(&mut self, change: impl FnOnce(&mut P) -> R) -> R {
        let result = change(&mut self.policy);
        self.clamp();
        result
    }

    /// Mutate the value in-place, then clamp it.
    ///
    /// All compound assignment operators are implemented through this.
    pub fn update<R>(&mut self, mutate: impl FnOnce(&mut T) -> R) -> R {
        let result = mutate(&mut self.value);
        self.clamp();
        result
    }

    /// Mutate the value in-place, then clamp it unless the mutation failed.
    pub fn try_update<E>(&mut self, mutate: impl FnOnce(&mut T) -> Result<(), E>) -> Result<(), E> {
        mutate(&mut self.value)?;
        self.clamp();
        Ok(())
    }

    /// Apply an operator selected at runtime, then clamp.
    ///
    /// ```
    /// # use bounded::{BoundedValue, InPlaceOp};
    /// let mut x = BoundedValue::at_most(3, 100);
    /// x.apply("**=".parse().unwrap(), 5).unwrap();
    /// assert_eq!(x, 100);
    /// assert!(x.apply(InPlaceOp::Div, 0).is_err());
    /// ```
    pub fn apply(&mut self, op: InPlaceOp, rhs: T) -> Result<(), OperatorError>
    where
        T: InPlace,
    {
        self.try_update(|value| value.apply_in_place(op, rhs))
    }

    /// Raise the value to a power, then clamp.
    pub fn pow_assign<E>(&mut self, exponent: E)
    where
        T: num_traits::Pow<E, Output = T> + Clone,
    {
        self.update(|value| *value = value.clone().pow(exponent));
    }
}

impl<T, F> BoundedValue<T, Custom<F>>
where
    F: FnMut(&mut T),
{
    /// Wrap a value under a custom clamp function.
    ///
    /// Such values have no minimum or maximum:
    /// the function alone decides what is in bounds.
    ///
    /// ```
    /// # use bounded::BoundedValue;
    /// let mut even = BoundedValue::with_clamp_function(7, |x: &mut i32| *x -= *x % 2);
    /// assert_eq!(even, 6);
    /// even += 3;
    /// assert_eq!(even, 8);
    /// ```
    ///
    /// The bounds are not available on such a value:
    ///
    /// ```compile_fail
    /// # use bounded::BoundedValue;
    /// let even = BoundedValue::with_clamp_function(7, |x: &mut i32| *x -= *x % 2);
    /// even.minimum();
    /// ```
    ///
    /// ```compile_fail
    /// # use bounded::BoundedValue;
    /// let even = BoundedValue::with_clamp_function(7, |x: &mut i32| *x -= *x % 2);
    /// even.is_bounded();
    /// ```
    pub fn with_clamp_function(value: T, clamp_function: F) -> Self {
        BoundedValue::with_policy(value, Custom(clamp_function))
    }
}

impl<T, F, A> BoundedValue<T, CustomWith<F, A>>
where
    F: FnMut(&mut T, &A),
{
    /// Wrap a value under a custom clamp function that takes arguments.
    ///
    /// ```
    /// # use bounded::BoundedValue;
    /// let snap = |x: &mut i32, step: &i32| *x -= x.rem_euclid(*step);
    /// let mut x = BoundedValue::with_clamp_arguments(17, 5, snap);
    /// assert_eq!(x, 15);
    /// x.clamp_with_arguments(4);
    /// assert_eq!(x, 12);
    /// ```
    pub fn with_clamp_arguments(value: T, arguments: A, clamp_function: F) -> Self {
        BoundedValue::with_policy(value, CustomWith::new(clamp_function, arguments))
    }

    /// The arguments of the clamp function.
    pub fn arguments(&self) -> &A {
        self.policy.arguments()
    }

    /// Replace the arguments of the clamp function, then clamp.
    pub fn clamp_with_arguments(&mut self, arguments: A) {
        self.reconfigure(|policy| policy.set_arguments(arguments));
    }
}

impl<T> BoundedValue<T>
where
    T: PartialOrd + Clone,
{
    /// Create a new value with optional bounds (inclusive).
    /// Out-of-bounds values are clamped.
    pub fn new(value: T, minimum: Option<T>, maximum: Option<T>) -> Self {
        BoundedValue::with_policy(value, MinMax::new(minimum, maximum))
    }

    pub fn unbounded(value: T) -> Self {
        BoundedValue::new(value, None, None)
    }

    pub fn at_least(value: T, minimum: T) -> Self {
        BoundedValue::new(value, Some(minimum), None)
    }

    pub fn at_most(value: T, maximum: T) -> Self {
        BoundedValue::new(value, None, Some(maximum))
    }

    pub fn between(value: T, minimum: T, maximum: T) -> Self {
        BoundedValue::new(value, Some(minimum), Some(maximum))
    }

    /// Create a new value with bounds (inclusive),
    /// failing instead of clamping if the value is out of bounds.
    pub fn checked(
        value: T,
        minimum: Option<T>,
        maximum: Option<T>,
    ) -> Result<Self, BoundsError<T>> {
        if in_bounds(&value, minimum.as_ref(), maximum.as_ref()) {
            Ok(BoundedValue {
                value,
                policy: MinMax::new(minimum, maximum),
            })
        } else {
            Err(BoundsError {
                value,
                minimum,
                maximum,
            })
        }
    }

    /// Set a new value, failing instead of clamping if it is out of bounds.
    pub fn set_checked(&mut self, value: T) -> Result<(), BoundsError<T>> {
        if in_bounds(&value, self.minimum(), self.maximum()) {
            self.value = value;
            Ok(())
        } else {
            Err(BoundsError {
                value,
                minimum: self.minimum().cloned(),
                maximum: self.maximum().cloned(),
            })
        }
    }

    /// Get the lower bound.
    pub fn minimum(&self) -> Option<&T> {
        self.policy.minimum()
    }

    /// Get the upper bound.
    pub fn maximum(&self) -> Option<&T> {
        self.policy.maximum()
    }

    /// Set the lower bound and clamp at it.
    pub fn set_minimum(&mut self, minimum: T) {
        self.clamp_with(Some(minimum), None);
    }

    /// Set the upper bound and clamp at it.
    pub fn set_maximum(&mut self, maximum: T) {
        self.clamp_with(None, Some(maximum));
    }

    /// Remove the lower bound. The value stays where it is.
    pub fn clear_minimum(&mut self) -> Option<T> {
        self.policy.take_minimum()
    }

    /// Remove the upper bound. The value stays where it is.
    pub fn clear_maximum(&mut self) -> Option<T> {
        self.policy.take_maximum()
    }

    /// Replace any provided bounds, then clamp.
    pub fn clamp_with(&mut self, minimum: Option<T>, maximum: Option<T>) {
        self.policy.clamp_with(&mut self.value, minimum, maximum);
    }

    pub fn is_unbounded(&self) -> bool {
        self.minimum().is_none() && self.maximum().is_none()
    }

    pub fn is_bounded(&self) -> bool {
        !self.is_unbounded()
    }

    pub fn is_bounded_from_above(&self) -> bool {
        self.maximum().is_some()
    }

    pub fn is_unbounded_from_above(&self) -> bool {
        !self.is_bounded_from_above()
    }

    pub fn is_bounded_from_below(&self) -> bool {
        self.minimum().is_some()
    }

    pub fn is_unbounded_from_below(&self) -> bool {
        !self.is_bounded_from_below()
    }

    /// The distance between the bounds.
    /// `None` unless bounded on both sides and the bounds can be subtracted.
    pub fn width(&self) -> Option<<T as Width>::Output>
    where
        T: Width,
    {
        match (self.minimum(), self.maximum()) {
            (Some(minimum), Some(maximum)) => T::width(minimum, maximum),
            _ => None,
        }
    }

    /// Check that the values are equal and bounded equally.
    ///
    /// Only other bounded values can be compared this way:
    ///
    /// ```compile_fail
    /// # use bounded::BoundedValue;
    /// let a = BoundedValue::between(5, 0, 10);
    /// a.is_equal_as_bounded(&5);
    /// ```
    pub fn is_equal_as_bounded(&self, other: &Self) -> bool {
        self.value == other.value
            && self.minimum() == other.minimum()
            && self.maximum() == other.maximum()
    }

    /// Split into the value and the bounds.
    pub fn into_parts(self) -> (T, Option<T>, Option<T>) {
        let (minimum, maximum) = self.policy.into_bounds();
        (self.value, minimum, maximum)
    }
}

fn in_bounds<T: PartialOrd>(value: &T, minimum: Option<&T>, maximum: Option<&T>) -> bool {
    minimum.map_or(true, |minimum| minimum <= value)
        && maximum.map_or(true, |maximum| value <= maximum)
}

impl<T> From<T> for BoundedValue<T>
where
    T: PartialOrd + Clone,
{
    fn from(value: T) -> Self {
        BoundedValue::unbounded(value)
    }
}

impl<T, P> std::ops::Deref for BoundedValue<T, P> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

impl<T, P> AsRef<T> for BoundedValue<T, P> {
    fn as_ref(&self) -> &T {
        &self.value
    }
}

impl<T, P> PartialEq<T> for BoundedValue<T, P>
where
    T: PartialEq,
{
    fn eq(&self, other: &T) -> bool {
        self.value == *other
    }
}

impl<T, P, Q> PartialEq<BoundedValue<T, Q>> for BoundedValue<T, P>
where
    T: PartialEq,
{
    fn eq(&self, other: &BoundedValue<T, Q>) -> bool {
        self.value == other.value
    }
}

impl<T, P> Eq for BoundedValue<T, P> where T: Eq {}

impl<T, P> PartialOrd<T> for BoundedValue<T, P>
where
    T: PartialOrd,
{
    fn partial_cmp(&self, other: &T) -> Option<std::cmp::Ordering> {
        self.value.partial_cmp(other)
    }
}

impl<T, P, Q> PartialOrd<BoundedValue<T, Q>> for BoundedValue<T, P>
where
    T: PartialOrd,
{
    fn partial_cmp(&self, other: &BoundedValue<T, Q>) -> Option<std::cmp::Ordering> {
        self.value.partial_cmp(&other.value)
    }
}

impl<T, P> Hash for BoundedValue<T, P>
where
    T: Hash,
{
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

forward_assign_ops!(
    AddAssign::add_assign,
    SubAssign::sub_assign,
    MulAssign::mul_assign,
    DivAssign::div_assign,
    RemAssign::rem_assign,
    ShlAssign::shl_assign,
    ShrAssign::shr_assign,
    BitAndAssign::bitand_assign,
    BitXorAssign::bitxor_assign,
    BitOrAssign::bitor_assign,
);

struct FlatOption<'a, T>(Option<&'a T>);

impl<'a, T> Display for FlatOption<'a, T>
where
    T: Display,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.0 {
            Some(x) => Display::fmt(x, f),
            None => f.write_str("None"),
        }
    }
}

impl<T, P> Display for BoundedValue<T, P>
where
    T: Display,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        Display::fmt(&self.value, f)
    }
}

/// Format a BoundedValue for debugging.
///
/// ```
/// # use bounded::BoundedValue;
/// assert_eq!(
///     format!("{:?}", BoundedValue::at_least(1.5, 0.0)),
///     "BoundedValue(1.5 in 0 ..= None)",
/// );
/// ```
impl<T> Debug for BoundedValue<T>
where
    T: Display,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "BoundedValue({} in {} ..= {})",
            self.value,
            FlatOption(self.policy.minimum()),
            FlatOption(self.policy.maximum()),
        )
    }
}

impl<T, F> Debug for BoundedValue<T, Custom<F>>
where
    T: Display,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "BoundedValue({} with custom clamp)", self.value)
    }
}

impl<T, F, A> Debug for BoundedValue<T, CustomWith<F, A>>
where
    T: Display,
    A: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "BoundedValue({} with custom clamp {:?})",
            self.value,
            self.policy.arguments()
        )
    }
}

/// A value that was rejected because it is out of bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundsError<T> {
    pub value: T,
    pub minimum: Option<T>,
    pub maximum: Option<T>,
}

impl<T> Display for BoundsError<T>
where
    T: Display,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "value {} is out of bounds {} ..= {}",
            self.value,
            FlatOption(self.minimum.as_ref()),
            FlatOption(self.maximum.as_ref()),
        )
    }
}

impl<T> failure::Fail for BoundsError<T> where T: Debug + Display + Send + Sync + 'static {}

#[cfg(test)]
speculate::speculate! {
    describe "struct BoundedValue" {
        it "keeps values inside the bounds" {
            let bounded = BoundedValue::new(5i32, Some(0), Some(10));
            assert_eq!(*bounded.get(), 5);
            assert!(bounded.is_bounded());
            assert_eq!(bounded.width(), Some(10u32));

            let wide = BoundedValue::between(0i8, -100, 100);
            assert_eq!(wide.width(), Some(200u8));
        }

        it "clamps at construction" {
            assert_eq!(BoundedValue::new(-3, Some(0), Some(10)).into_inner(), 0);
            assert_eq!(BoundedValue::at_most(12, 10).into_inner(), 10);
        }

        it "clamps after compound assignment" {
            let mut bounded = BoundedValue::new(5, Some(0), Some(10));
            bounded += 20;
            assert_eq!(*bounded, 10);
            bounded -= 30;
            assert_eq!(*bounded, 0);
            bounded |= 0b111;
            assert_eq!(*bounded, 7);
            bounded <<= 1;
            assert_eq!(*bounded, 10);
        }

        it "reports no width when unbounded" {
            let bounded = BoundedValue::unbounded(5i32);
            assert!(bounded.is_unbounded());
            assert_eq!(bounded.width(), None);
        }

        it "reports no width when bounded on one side" {
            assert_eq!(BoundedValue::at_least(5i32, 0).width(), None);
        }

        it "re-clamps when a bound is set" {
            let mut bounded = BoundedValue::new(5, Some(0), Some(10));
            bounded.set_minimum(8);
            assert_eq!(*bounded, 8);
            bounded.set_maximum(9);
            assert_eq!(bounded.maximum(), Some(&9));
            assert_eq!(*bounded, 8);
        }

        it "keeps the value when a bound is cleared" {
            let mut bounded = BoundedValue::new(5, Some(0), Some(10));
            assert_eq!(bounded.clear_maximum(), Some(10));
            assert!(bounded.is_bounded_from_below());
            assert!(bounded.is_unbounded_from_above());
            bounded += 100;
            assert_eq!(*bounded, 105);
        }

        it "lets the maximum win if the bounds are inverted" {
            let mut bounded = BoundedValue::new(5, Some(0), Some(10));
            bounded.set_minimum(20);
            assert_eq!(*bounded, 10);
        }

        it "applies operators by symbol" {
            let mut bounded = BoundedValue::new(5i64, Some(0), Some(50));
            bounded.apply(InPlaceOp::Pow, 2).unwrap();
            assert_eq!(*bounded, 25);
            bounded.apply(InPlaceOp::FloorDiv, -2).unwrap();
            assert_eq!(*bounded, 0);
        }

        it "reports overflow through apply instead of wrapping" {
            let mut bounded = BoundedValue::between(5u32, 0, 10);
            assert_eq!(
                bounded.apply(InPlaceOp::Sub, 20),
                Err(OperatorError::Overflow { op: InPlaceOp::Sub }));
            assert_eq!(*bounded, 5);
        }

        it "does not clamp after a failed operator" {
            let calls = std::cell::Cell::new(0);
            let mut bounded =
                BoundedValue::with_clamp_function(5u8, |_: &mut u8| calls.set(calls.get() + 1));
            assert_eq!(
                bounded.apply(InPlaceOp::Rem, 0),
                Err(OperatorError::DivisionByZero { op: InPlaceOp::Rem }));
            assert_eq!(*bounded, 5);
            assert_eq!(calls.get(), 1);
        }

        it "raises to a power" {
            let mut bounded = BoundedValue::between(3.0f64, 0.0, 20.0);
            bounded.pow_assign(2.0);
            assert_eq!(*bounded, 9.0);
            bounded.pow_assign(2i32);
            assert_eq!(*bounded, 20.0);
        }

        it "returns a clamped copy" {
            let bounded = BoundedValue::between('m', 'a', 'k');
            let copy = bounded.clamped();
            assert!(copy.is_equal_as_bounded(&bounded));
            assert_eq!(copy, 'k');
        }

        it "compares as bounded" {
            let a = BoundedValue::between(5, 0, 10);
            assert!(a.is_equal_as_bounded(&BoundedValue::between(5, 0, 10)));
            assert!(!a.is_equal_as_bounded(&BoundedValue::between(5, 0, 11)));
            assert!(a == BoundedValue::between(5, 0, 11));
            assert!(a < 6);
        }

        it "rejects out of bounds values when checked" {
            assert_eq!(
                BoundedValue::checked(11, Some(0), Some(10)).unwrap_err(),
                BoundsError { value: 11, minimum: Some(0), maximum: Some(10) });

            let mut bounded = BoundedValue::checked(3, None, Some(10)).unwrap();
            assert!(bounded.set_checked(12).is_err());
            bounded.set_checked(-12).unwrap();
            assert_eq!(*bounded, -12);
        }

        it "names the bounds in the error" {
            let err = BoundedValue::checked(11, None, Some(10)).unwrap_err();
            assert_eq!(err.to_string(), "value 11 is out of bounds None ..= 10");
        }

        it "describes itself" {
            let bounded = BoundedValue::new(String::from("abc"), Some("b".into()), None);
            assert_eq!(bounded.to_string(), "b");
            assert_eq!(format!("{:?}", bounded), "BoundedValue(b in b ..= None)");

            let custom = BoundedValue::with_clamp_function(1, |_: &mut i32| {});
            assert_eq!(format!("{:?}", custom), "BoundedValue(1 with custom clamp)");
        }
    }

    describe "BoundedValue with custom clamp function" {
        it "clamps after every mutation" {
            let mut calls = 0;
            {
                let mut bounded = BoundedValue::with_clamp_function(10, |x: &mut i32| {
                    calls += 1;
                    *x = (*x).abs();
                });
                bounded -= 25;
                assert_eq!(*bounded, 15);
                bounded.clamp_at(-4);
                assert_eq!(*bounded, 4);
            }
            assert_eq!(calls, 3);
        }
    }

    describe "BoundedValue with clamp arguments" {
        it "re-clamps when the arguments change" {
            let mut bounded = BoundedValue::with_clamp_arguments(
                37u32,
                (10u32, 30u32),
                |x: &mut u32, &(step, limit): &(u32, u32)| *x = (*x - *x % step).min(limit),
            );
            assert_eq!(*bounded, 30);
            bounded.clamp_with_arguments((4, 100));
            assert_eq!(*bounded, 28);
            assert_eq!(bounded.arguments(), &(4, 100));
            bounded += 15;
            assert_eq!(*bounded, 40);
            assert_eq!(format!("{:?}", bounded), "BoundedValue(40 with custom clamp (4, 100))");
        }

        it "re-clamps when the policy is reconfigured" {
            let mut bounded = BoundedValue::between(8, 0, 10);
            let old = bounded.reconfigure(|policy| std::mem::replace(policy, MinMax::new(Some(9), None)));
            assert_eq!(old, MinMax::new(Some(0), Some(10)));
            assert_eq!(*bounded, 9);
            assert!(bounded.is_unbounded_from_above());
        }
    }
}
