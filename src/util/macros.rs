/// Implement std compound assignment operators for `BoundedValue`
/// by forwarding them to the wrapped value and clamping afterwards.
macro_rules! forward_assign_ops {
    ($($op:ident :: $method:ident),* $(,)*) => {
        $(
            impl<T, P, Rhs> std::ops::$op<Rhs> for crate::BoundedValue<T, P>
            where
                T: std::ops::$op<Rhs>,
                P: crate::ClampPolicy<T>,
            {
                fn $method(&mut self, rhs: Rhs) {
                    self.update(|value| std::ops::$op::$method(value, rhs));
                }
            }
        )*
    };
}
