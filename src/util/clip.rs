/// Which bound, if any, replaced the value during a clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clip {
    Unchanged,
    Minimum,
    Maximum,
}

/// Clip a value in-place into the range given by the optional bounds.
///
/// The minimum is applied first, then the maximum,
/// so the maximum wins if the bounds are inverted.
/// A value is only kept if it compares strictly inside a bound,
/// so incomparable values (NaN) are replaced by the bound.
pub fn clip_in_place<T>(value: &mut T, min: Option<&T>, max: Option<&T>) -> Clip
where
    T: PartialOrd + Clone,
{
    let mut clip = Clip::Unchanged;

    if let Some(min) = min {
        if !(*value > *min) && *value != *min {
            *value = min.clone();
            clip = Clip::Minimum;
        }
    }

    if let Some(max) = max {
        if !(*value < *max) && *value != *max {
            *value = max.clone();
            clip = Clip::Maximum;
        }
    }

    clip
}

#[cfg(test)]
speculate::speculate! {
    describe "fn clip_in_place()" {
        it "keeps values inside the bounds" {
            let mut x = 3;
            assert_eq!(clip_in_place(&mut x, Some(&0), Some(&10)), Clip::Unchanged);
            assert_eq!(x, 3);
        }

        it "keeps values equal to a bound" {
            let mut x = 10;
            assert_eq!(clip_in_place(&mut x, Some(&0), Some(&10)), Clip::Unchanged);
            assert_eq!(x, 10);
        }

        it "substitutes the violated bound" {
            let mut x = -4;
            assert_eq!(clip_in_place(&mut x, Some(&0), Some(&10)), Clip::Minimum);
            assert_eq!(x, 0);

            let mut x = 14;
            assert_eq!(clip_in_place(&mut x, Some(&0), None), Clip::Unchanged);
            assert_eq!(clip_in_place(&mut x, None, Some(&10)), Clip::Maximum);
            assert_eq!(x, 10);
        }

        it "lets the maximum win for inverted bounds" {
            let mut x = 5;
            assert_eq!(clip_in_place(&mut x, Some(&8), Some(&2)), Clip::Maximum);
            assert_eq!(x, 2);
        }

        it "replaces NaN by the first bound" {
            let mut x = std::f64::NAN;
            assert_eq!(clip_in_place(&mut x, Some(&-1.0), Some(&1.0)), Clip::Minimum);
            assert_eq!(x, -1.0);

            let mut x = std::f64::NAN;
            assert_eq!(clip_in_place(&mut x, None, Some(&1.0)), Clip::Maximum);
            assert_eq!(x, 1.0);
        }
    }
}
