/// The distance between two bounds.
///
/// Types that are ordered but cannot be subtracted return `None`.
/// Integer widths are unsigned, so inverted integer bounds have no width.
pub trait Width {
    type Output;

    fn width(minimum: &Self, maximum: &Self) -> Option<Self::Output>;
}

macro_rules! impl_width_for_unsigned {
    ($($t:ty),*) => {
        $(
            impl Width for $t {
                type Output = $t;

                fn width(minimum: &Self, maximum: &Self) -> Option<Self::Output> {
                    maximum.checked_sub(*minimum)
                }
            }
        )*
    };
}

impl_width_for_unsigned!(u8, u16, u32, u64, u128, usize);

// The span of ordered signed bounds always fits the unsigned type of the same size.
macro_rules! impl_width_for_signed {
    ($($t:ty => $u:ty),*) => {
        $(
            impl Width for $t {
                type Output = $u;

                fn width(minimum: &Self, maximum: &Self) -> Option<Self::Output> {
                    if minimum <= maximum {
                        Some(maximum.wrapping_sub(*minimum) as $u)
                    } else {
                        None
                    }
                }
            }
        )*
    };
}

impl_width_for_signed!(i8 => u8, i16 => u16, i32 => u32, i64 => u64, i128 => u128, isize => usize);

macro_rules! impl_width_for_float {
    ($($t:ty),*) => {
        $(
            impl Width for $t {
                type Output = $t;

                fn width(minimum: &Self, maximum: &Self) -> Option<Self::Output> {
                    Some(maximum - minimum)
                }
            }
        )*
    };
}

impl_width_for_float!(f32, f64);

macro_rules! impl_width_not_subtractable {
    ($($t:ty),*) => {
        $(
            impl Width for $t {
                type Output = $t;

                fn width(_minimum: &Self, _maximum: &Self) -> Option<Self::Output> {
                    None
                }
            }
        )*
    };
}

impl_width_not_subtractable!(bool, char, String);

#[cfg(test)]
speculate::speculate! {
    describe "trait Width" {
        it "subtracts numbers" {
            assert_eq!(Width::width(&-3i32, &7), Some(10));
            assert_eq!(Width::width(&0.5f64, &2.0), Some(1.5));
        }

        it "covers the whole range of signed types" {
            assert_eq!(Width::width(&-100i8, &100), Some(200u8));
            assert_eq!(Width::width(&i8::min_value(), &i8::max_value()), Some(u8::max_value()));
            assert_eq!(Width::width(&i64::min_value(), &0), Some(1u64 << 63));
            assert_eq!(Width::width(&i64::min_value(), &i64::max_value()), Some(u64::max_value()));
        }

        it "has no width for inverted integer bounds" {
            assert_eq!(Width::width(&5u8, &2), None);
            assert_eq!(Width::width(&5i8, &-2), None);
        }

        it "has no width for text" {
            assert_eq!(Width::width(&'a', &'z'), None);
            assert_eq!(Width::width(&String::from("a"), &String::from("b")), None);
        }
    }
}
