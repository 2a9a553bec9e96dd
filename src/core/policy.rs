use crate::util::{clip_in_place, Clip};

/// Strategy that forces a value back into its permitted range.
pub trait ClampPolicy<T> {
    /// Clamp the value in-place.
    fn clamp(&mut self, value: &mut T);
}

/// The default policy: optional inclusive bounds on either side.
///
/// The minimum is applied before the maximum.
/// No ordering between the bounds is enforced,
/// so if `minimum > maximum` every value ends up at the maximum.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MinMax<T> {
    minimum: Option<T>,
    maximum: Option<T>,
}

impl<T> MinMax<T> {
    /// Create a policy with the given bounds. `None` means unbounded on that side.
    pub fn new(minimum: Option<T>, maximum: Option<T>) -> Self {
        MinMax { minimum, maximum }
    }

    /// The lower bound (inclusive).
    pub fn minimum(&self) -> Option<&T> {
        self.minimum.as_ref()
    }

    /// The upper bound (inclusive).
    pub fn maximum(&self) -> Option<&T> {
        self.maximum.as_ref()
    }

    pub(crate) fn take_minimum(&mut self) -> Option<T> {
        self.minimum.take()
    }

    pub(crate) fn take_maximum(&mut self) -> Option<T> {
        self.maximum.take()
    }

    pub(crate) fn into_bounds(self) -> (Option<T>, Option<T>) {
        (self.minimum, self.maximum)
    }
}

impl<T> MinMax<T>
where
    T: PartialOrd + Clone,
{
    /// Store any provided bounds, then clamp the value.
    /// Absent arguments leave the stored bound as it is.
    pub fn clamp_with(&mut self, value: &mut T, minimum: Option<T>, maximum: Option<T>) {
        if minimum.is_some() {
            log::debug!("updating minimum");
            self.minimum = minimum;
        }
        if maximum.is_some() {
            log::debug!("updating maximum");
            self.maximum = maximum;
        }

        match clip_in_place(value, self.minimum.as_ref(), self.maximum.as_ref()) {
            Clip::Unchanged => {}
            Clip::Minimum => log::trace!("value clamped to minimum"),
            Clip::Maximum => log::trace!("value clamped to maximum"),
        }
    }
}

impl<T> Default for MinMax<T> {
    fn default() -> Self {
        MinMax::new(None, None)
    }
}

impl<T> ClampPolicy<T> for MinMax<T>
where
    T: PartialOrd + Clone,
{
    fn clamp(&mut self, value: &mut T) {
        self.clamp_with(value, None, None);
    }
}

/// A user-supplied clamp function that takes over the whole policy.
#[derive(Clone, Copy)]
pub struct Custom<F>(pub F);

impl<T, F> ClampPolicy<T> for Custom<F>
where
    F: FnMut(&mut T),
{
    fn clamp(&mut self, value: &mut T) {
        let Custom(f) = self;
        f(value);
    }
}

impl<F> std::fmt::Debug for Custom<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str("Custom(..)")
    }
}

/// A user-supplied clamp function that also receives arguments,
/// e.g. a step size or a modulus.
///
/// The arguments are kept with the policy and passed to every clamp.
#[derive(Clone, Copy)]
pub struct CustomWith<F, A> {
    function: F,
    arguments: A,
}

impl<F, A> CustomWith<F, A> {
    pub fn new(function: F, arguments: A) -> Self {
        CustomWith {
            function,
            arguments,
        }
    }

    /// The arguments passed to the clamp function.
    pub fn arguments(&self) -> &A {
        &self.arguments
    }

    /// Replace the arguments. Takes effect with the next clamp.
    pub fn set_arguments(&mut self, arguments: A) {
        log::debug!("updating clamp arguments");
        self.arguments = arguments;
    }
}

impl<T, F, A> ClampPolicy<T> for CustomWith<F, A>
where
    F: FnMut(&mut T, &A),
{
    fn clamp(&mut self, value: &mut T) {
        (self.function)(value, &self.arguments);
    }
}

impl<F, A> std::fmt::Debug for CustomWith<F, A>
where
    A: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("CustomWith")
            .field("arguments", &self.arguments)
            .finish()
    }
}

#[cfg(test)]
speculate::speculate! {
    describe "struct MinMax" {
        it "is unbounded by default" {
            let policy = MinMax::<i32>::default();
            assert_eq!((policy.minimum(), policy.maximum()), (None, None));
        }

        it "stores only provided bounds" {
            let mut policy = MinMax::new(Some(0), Some(10));
            let mut x = 5;
            policy.clamp_with(&mut x, None, Some(3));
            assert_eq!(policy, MinMax::new(Some(0), Some(3)));
            assert_eq!(x, 3);
        }

        it "can introduce a bound that was absent" {
            let mut policy = MinMax::new(None, None);
            let mut x = 5;
            policy.clamp_with(&mut x, Some(7), None);
            assert_eq!(policy.minimum(), Some(&7));
            assert_eq!(x, 7);
        }
    }

    describe "struct Custom" {
        it "calls the function on the value" {
            let mut policy = Custom(|x: &mut i32| *x = (*x).rem_euclid(7));
            let mut x = 23;
            policy.clamp(&mut x);
            assert_eq!(x, 2);
        }
    }

    describe "struct CustomWith" {
        it "passes the current arguments to the function" {
            let mut policy = CustomWith::new(|x: &mut i32, modulus: &i32| *x = x.rem_euclid(*modulus), 7);
            let mut x = 23;
            policy.clamp(&mut x);
            assert_eq!(x, 2);

            policy.set_arguments(2);
            assert_eq!(*policy.arguments(), 2);
            policy.clamp(&mut x);
            assert_eq!(x, 0);
        }
    }
}
