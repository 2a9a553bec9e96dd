use std::convert::TryFrom as _;

/// An in-place operator, identified by its symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InPlaceOp {
    Add,
    Sub,
    Mul,
    MatMul,
    Div,
    FloorDiv,
    Rem,
    Pow,
    Shl,
    Shr,
    BitAnd,
    BitXor,
    BitOr,
}

impl InPlaceOp {
    pub const ALL: [InPlaceOp; 13] = [
        InPlaceOp::Add,
        InPlaceOp::Sub,
        InPlaceOp::Mul,
        InPlaceOp::MatMul,
        InPlaceOp::Div,
        InPlaceOp::FloorDiv,
        InPlaceOp::Rem,
        InPlaceOp::Pow,
        InPlaceOp::Shl,
        InPlaceOp::Shr,
        InPlaceOp::BitAnd,
        InPlaceOp::BitXor,
        InPlaceOp::BitOr,
    ];

    /// The operator symbol, e.g. `+=`.
    pub fn symbol(self) -> &'static str {
        match self {
            InPlaceOp::Add => "+=",
            InPlaceOp::Sub => "-=",
            InPlaceOp::Mul => "*=",
            InPlaceOp::MatMul => "@=",
            InPlaceOp::Div => "/=",
            InPlaceOp::FloorDiv => "//=",
            InPlaceOp::Rem => "%=",
            InPlaceOp::Pow => "**=",
            InPlaceOp::Shl => "<<=",
            InPlaceOp::Shr => ">>=",
            InPlaceOp::BitAnd => "&=",
            InPlaceOp::BitXor => "^=",
            InPlaceOp::BitOr => "|=",
        }
    }

    /// Split a leading operator symbol from the rest of the input.
    ///
    /// ```
    /// # use bounded::InPlaceOp;
    /// assert_eq!(InPlaceOp::split_prefix("**=2"), Some((InPlaceOp::Pow, "2")));
    /// assert_eq!(InPlaceOp::split_prefix("*= 2"), Some((InPlaceOp::Mul, " 2")));
    /// assert_eq!(InPlaceOp::split_prefix("2"), None);
    /// ```
    pub fn split_prefix(input: &str) -> Option<(InPlaceOp, &str)> {
        InPlaceOp::ALL
            .iter()
            .filter(|op| input.starts_with(op.symbol()))
            .max_by_key(|op| op.symbol().len())
            .map(|&op| (op, &input[op.symbol().len()..]))
    }
}

impl std::fmt::Display for InPlaceOp {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

impl std::str::FromStr for InPlaceOp {
    type Err = failure::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match InPlaceOp::split_prefix(s) {
            Some((op, "")) => Ok(op),
            _ => bail!(
                "expected an in-place operator like += or **=, but got: {:?}",
                s
            ),
        }
    }
}

/// Why an in-place operator could not be applied.
#[derive(Debug, Fail, Clone, PartialEq, Eq)]
pub enum OperatorError {
    #[fail(display = "unsupported operand type for {}: {}", op, type_name)]
    Unsupported {
        op: InPlaceOp,
        type_name: &'static str,
    },

    #[fail(display = "division by zero in {}", op)]
    DivisionByZero { op: InPlaceOp },

    #[fail(display = "overflow in {}", op)]
    Overflow { op: InPlaceOp },

    #[fail(display = "negative operand for {}", op)]
    NegativeOperand { op: InPlaceOp },
}

/// Types whose in-place operators can be selected at runtime by symbol.
///
/// Operators the type has no meaning for report [`OperatorError::Unsupported`].
/// On error, the value must be left unchanged.
///
/// For numbers, `//=` rounds towards negative infinity and `%=` takes the sign
/// of the divisor, so that `a == (a // b) * b + a % b`.
/// Integer `/=` truncates like Rust's `/`.
pub trait InPlace: Sized {
    fn apply_in_place(&mut self, op: InPlaceOp, rhs: Self) -> Result<(), OperatorError>;
}

fn unsupported<T>(op: InPlaceOp) -> OperatorError {
    OperatorError::Unsupported {
        op,
        type_name: std::any::type_name::<T>(),
    }
}

macro_rules! impl_in_place_for_int {
    ($($t:ty),*) => {
        $(
            impl InPlace for $t {
                fn apply_in_place(&mut self, op: InPlaceOp, rhs: Self) -> Result<(), OperatorError> {
                    let lhs = *self;
                    let overflow = || OperatorError::Overflow { op };

                    let small_operand = || match u32::try_from(rhs) {
                        Ok(rhs) => Ok(rhs),
                        Err(_) if rhs < <$t as num_traits::Zero>::zero() => {
                            Err(OperatorError::NegativeOperand { op })
                        }
                        Err(_) => Err(overflow()),
                    };

                    *self = match op {
                        InPlaceOp::Add => lhs.checked_add(rhs).ok_or_else(overflow)?,
                        InPlaceOp::Sub => lhs.checked_sub(rhs).ok_or_else(overflow)?,
                        InPlaceOp::Mul => lhs.checked_mul(rhs).ok_or_else(overflow)?,
                        InPlaceOp::Div => checked_division(op, lhs, rhs, <$t>::checked_div)?,
                        InPlaceOp::FloorDiv => checked_division(op, lhs, rhs, floor_div::<$t>)?,
                        InPlaceOp::Rem => checked_division(op, lhs, rhs, floor_rem::<$t>)?,
                        InPlaceOp::Pow => lhs.checked_pow(small_operand()?).ok_or_else(overflow)?,
                        InPlaceOp::Shl => {
                            // bits shifted out of the value are an overflow
                            let shift = small_operand()?;
                            lhs.checked_shl(shift)
                                .filter(|&shifted| shifted >> shift == lhs)
                                .ok_or_else(overflow)?
                        }
                        InPlaceOp::Shr => lhs.checked_shr(small_operand()?).ok_or_else(overflow)?,
                        InPlaceOp::BitAnd => lhs & rhs,
                        InPlaceOp::BitXor => lhs ^ rhs,
                        InPlaceOp::BitOr => lhs | rhs,
                        InPlaceOp::MatMul => return Err(unsupported::<$t>(op)),
                    };
                    Ok(())
                }
            }
        )*
    };
}

fn checked_division<T>(
    op: InPlaceOp,
    lhs: T,
    rhs: T,
    div: fn(T, T) -> Option<T>,
) -> Result<T, OperatorError>
where
    T: num_traits::PrimInt,
{
    if rhs.is_zero() {
        return Err(OperatorError::DivisionByZero { op });
    }
    div(lhs, rhs).ok_or(OperatorError::Overflow { op })
}

/// Division rounding towards negative infinity.
fn floor_div<T>(lhs: T, rhs: T) -> Option<T>
where
    T: num_traits::PrimInt,
{
    let quotient = lhs.checked_div(&rhs)?;
    let remainder = lhs % rhs;
    let zero = T::zero();
    if remainder != zero && ((remainder < zero) != (rhs < zero)) {
        quotient.checked_sub(&T::one())
    } else {
        Some(quotient)
    }
}

/// Remainder with the sign of the divisor, matching [`floor_div`].
fn floor_rem<T>(lhs: T, rhs: T) -> Option<T>
where
    T: num_traits::PrimInt + num_traits::CheckedRem,
{
    let remainder = lhs.checked_rem(&rhs)?;
    let zero = T::zero();
    if remainder != zero && ((remainder < zero) != (rhs < zero)) {
        Some(remainder + rhs)
    } else {
        Some(remainder)
    }
}

impl_in_place_for_int!(i8, i16, i32, i64, i128, isize);
impl_in_place_for_int!(u8, u16, u32, u64, u128, usize);

macro_rules! impl_in_place_for_float {
    ($($t:ty),*) => {
        $(
            impl InPlace for $t {
                fn apply_in_place(&mut self, op: InPlaceOp, rhs: Self) -> Result<(), OperatorError> {
                    match op {
                        InPlaceOp::Add => *self += rhs,
                        InPlaceOp::Sub => *self -= rhs,
                        InPlaceOp::Mul => *self *= rhs,
                        InPlaceOp::Div => *self /= rhs,
                        InPlaceOp::FloorDiv => *self = (*self / rhs).floor(),
                        InPlaceOp::Rem => {
                            let remainder = *self % rhs;
                            *self = if remainder != 0.0 && ((remainder < 0.0) != (rhs < 0.0)) {
                                remainder + rhs
                            } else {
                                remainder
                            };
                        }
                        InPlaceOp::Pow => *self = self.powf(rhs),
                        InPlaceOp::MatMul
                        | InPlaceOp::Shl
                        | InPlaceOp::Shr
                        | InPlaceOp::BitAnd
                        | InPlaceOp::BitXor
                        | InPlaceOp::BitOr => return Err(unsupported::<$t>(op)),
                    }
                    Ok(())
                }
            }
        )*
    };
}

impl_in_place_for_float!(f32, f64);

impl InPlace for bool {
    fn apply_in_place(&mut self, op: InPlaceOp, rhs: Self) -> Result<(), OperatorError> {
        match op {
            InPlaceOp::BitAnd => *self &= rhs,
            InPlaceOp::BitXor => *self ^= rhs,
            InPlaceOp::BitOr => *self |= rhs,
            _ => return Err(unsupported::<bool>(op)),
        }
        Ok(())
    }
}

impl InPlace for char {
    fn apply_in_place(&mut self, op: InPlaceOp, _rhs: Self) -> Result<(), OperatorError> {
        Err(unsupported::<char>(op))
    }
}

impl InPlace for String {
    fn apply_in_place(&mut self, op: InPlaceOp, rhs: Self) -> Result<(), OperatorError> {
        match op {
            InPlaceOp::Add => self.push_str(&rhs),
            _ => return Err(unsupported::<String>(op)),
        }
        Ok(())
    }
}

#[cfg(test)]
speculate::speculate! {
    describe "enum InPlaceOp" {
        it "parses every symbol it displays" {
            for &op in InPlaceOp::ALL.iter() {
                assert_eq!(op.to_string().parse::<InPlaceOp>().unwrap(), op);
            }
        }

        it "rejects trailing input" {
            assert!("+=1".parse::<InPlaceOp>().is_err());
            assert!("add".parse::<InPlaceOp>().is_err());
        }

        it "prefers the longest symbol" {
            assert_eq!(InPlaceOp::split_prefix("//=3"), Some((InPlaceOp::FloorDiv, "3")));
            assert_eq!(InPlaceOp::split_prefix("/=3"), Some((InPlaceOp::Div, "3")));
        }
    }

    describe "impl InPlace for integers" {
        it "applies arithmetic" {
            let mut x = 7i32;
            x.apply_in_place(InPlaceOp::Mul, 3).unwrap();
            x.apply_in_place(InPlaceOp::Sub, 1).unwrap();
            x.apply_in_place(InPlaceOp::Pow, 2).unwrap();
            assert_eq!(x, 400);
        }

        it "floors and truncates division as asked" {
            let mut floored = -7i64;
            floored.apply_in_place(InPlaceOp::FloorDiv, 2).unwrap();
            assert_eq!(floored, -4);

            let mut truncated = -7i64;
            truncated.apply_in_place(InPlaceOp::Div, 2).unwrap();
            assert_eq!(truncated, -3);

            let mut unsigned = 7u8;
            unsigned.apply_in_place(InPlaceOp::FloorDiv, 2).unwrap();
            assert_eq!(unsigned, 3);
        }

        it "keeps floor division and remainder consistent" {
            for &(a, b) in &[(-7i32, 2), (7, -2), (-7, -2), (7, 2), (6, -3)] {
                let mut quotient = a;
                quotient.apply_in_place(InPlaceOp::FloorDiv, b).unwrap();
                let mut remainder = a;
                remainder.apply_in_place(InPlaceOp::Rem, b).unwrap();
                assert_eq!(quotient * b + remainder, a, "{} and {}", a, b);
            }

            let mut x = -7i32;
            x.apply_in_place(InPlaceOp::Rem, 2).unwrap();
            assert_eq!(x, 1);
        }

        it "reports bits shifted out as overflow" {
            let mut x = 3i32;
            assert_eq!(
                x.apply_in_place(InPlaceOp::Shl, 31),
                Err(OperatorError::Overflow { op: InPlaceOp::Shl }));
            assert_eq!(x, 3);

            let mut y = 1i64;
            assert_eq!(
                y.apply_in_place(InPlaceOp::Shl, 63),
                Err(OperatorError::Overflow { op: InPlaceOp::Shl }));

            let mut z = 0b1000_0001u8;
            assert!(z.apply_in_place(InPlaceOp::Shl, 1).is_err());

            let mut fits = -1i32;
            fits.apply_in_place(InPlaceOp::Shl, 31).unwrap();
            assert_eq!(fits, i32::min_value());

            let mut shifted = 1i32;
            shifted.apply_in_place(InPlaceOp::Shl, 30).unwrap();
            assert_eq!(shifted, 1 << 30);
        }

        it "reports errors without touching the value" {
            let mut x = 5i32;
            assert_eq!(
                x.apply_in_place(InPlaceOp::Div, 0),
                Err(OperatorError::DivisionByZero { op: InPlaceOp::Div }));
            assert_eq!(
                x.apply_in_place(InPlaceOp::Shl, -1),
                Err(OperatorError::NegativeOperand { op: InPlaceOp::Shl }));
            assert_eq!(
                x.apply_in_place(InPlaceOp::Mul, i32::max_value()),
                Err(OperatorError::Overflow { op: InPlaceOp::Mul }));
            assert_eq!(
                x.apply_in_place(InPlaceOp::MatMul, 1),
                Err(OperatorError::Unsupported { op: InPlaceOp::MatMul, type_name: "i32" }));
            assert_eq!(x, 5);
        }

        it "applies bit operators" {
            let mut x = 0b1100u16;
            x.apply_in_place(InPlaceOp::BitXor, 0b1010).unwrap();
            x.apply_in_place(InPlaceOp::Shl, 2).unwrap();
            assert_eq!(x, 0b11000);
        }
    }

    describe "impl InPlace for other types" {
        it "uses IEEE semantics for floats" {
            let mut x = 1.0f64;
            x.apply_in_place(InPlaceOp::Div, 0.0).unwrap();
            assert!(x.is_infinite());

            let mut y = -7.5f64;
            y.apply_in_place(InPlaceOp::FloorDiv, 2.0).unwrap();
            assert_eq!(y, -4.0);

            let mut z = -7.5f64;
            z.apply_in_place(InPlaceOp::Rem, 2.0).unwrap();
            assert_eq!(z, 0.5);
        }

        it "rejects bit operators for floats" {
            let mut x = 1.0f32;
            assert!(x.apply_in_place(InPlaceOp::BitOr, 1.0).is_err());
        }

        it "appends strings" {
            let mut s = String::from("ab");
            s.apply_in_place(InPlaceOp::Add, "cd".into()).unwrap();
            assert_eq!(s, "abcd");
            assert!(s.apply_in_place(InPlaceOp::Sub, "cd".into()).is_err());
        }

        it "supports only logic operators for bools" {
            let mut b = true;
            b.apply_in_place(InPlaceOp::BitXor, true).unwrap();
            assert_eq!(b, false);
            assert!(b.apply_in_place(InPlaceOp::Add, true).is_err());
        }
    }
}
