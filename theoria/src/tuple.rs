//! Fixed-arity product types used to carry generated values through theories.
//!
//! Each tuple is an immutable, ordered, heterogeneous record. `extend` appends a
//! value derived from the existing slots, producing the next arity; this is how
//! a precursor is paired with its mapped value.

use std::fmt;

/// Two generated values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tuple2<A, B>(pub A, pub B);

/// Three generated values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tuple3<A, B, C>(pub A, pub B, pub C);

/// Four generated values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tuple4<A, B, C, D>(pub A, pub B, pub C, pub D);

/// Five values; only produced as the precursor form of four-slot theories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tuple5<A, B, C, D, E>(pub A, pub B, pub C, pub D, pub E);

macro_rules! impl_tuple {
    ($name:ident; $($ty:ident => $out:ident => $f:ident => $idx:tt),+) => {
        impl<$($ty),+> $name<$($ty),+> {
            /// Build a tuple from its slots
            pub fn new($($f: $ty),+) -> Self {
                $name($($f),+)
            }

            /// Transform every slot independently
            pub fn map<$($out),+>(&self, $($f: impl FnOnce(&$ty) -> $out),+) -> $name<$($out),+> {
                $name($($f(&self.$idx)),+)
            }

            /// Unwrap into a native Rust tuple
            pub fn into_inner(self) -> ($($ty),+) {
                ($(self.$idx),+)
            }
        }

        impl<$($ty),+> From<($($ty),+)> for $name<$($ty),+> {
            fn from(value: ($($ty),+)) -> Self {
                $name($(value.$idx),+)
            }
        }

        impl<$($ty: fmt::Display),+> fmt::Display for $name<$($ty),+> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let parts = [$(self.$idx.to_string()),+];
                write!(f, "{{{}}}", parts.join(", "))
            }
        }
    };
}

impl_tuple!(Tuple2; A => X1 => a => 0, B => X2 => b => 1);
impl_tuple!(Tuple3; A => X1 => a => 0, B => X2 => b => 1, C => X3 => c => 2);
impl_tuple!(Tuple4; A => X1 => a => 0, B => X2 => b => 1, C => X3 => c => 2, D => X4 => d => 3);
impl_tuple!(
    Tuple5;
    A => X1 => a => 0,
    B => X2 => b => 1,
    C => X3 => c => 2,
    D => X4 => d => 3,
    E => X5 => e => 4
);

impl<A, B> Tuple2<A, B> {
    /// Append a value computed from both slots
    pub fn extend<T>(self, f: impl FnOnce(&A, &B) -> T) -> Tuple3<A, B, T> {
        let t = f(&self.0, &self.1);
        Tuple3(self.0, self.1, t)
    }
}

impl<A, B, C> Tuple3<A, B, C> {
    pub fn extend<T>(self, f: impl FnOnce(&A, &B, &C) -> T) -> Tuple4<A, B, C, T> {
        let t = f(&self.0, &self.1, &self.2);
        Tuple4(self.0, self.1, self.2, t)
    }
}

impl<A, B, C, D> Tuple4<A, B, C, D> {
    pub fn extend<T>(self, f: impl FnOnce(&A, &B, &C, &D) -> T) -> Tuple5<A, B, C, D, T> {
        let t = f(&self.0, &self.1, &self.2, &self.3);
        Tuple5(self.0, self.1, self.2, self.3, t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extend_appends_derived_value() {
        let pair = Tuple2(3, 4);
        let triple = pair.extend(|a, b| a * b);
        assert_eq!(triple, Tuple3(3, 4, 12));

        let quad = triple.extend(|a, b, c| format!("{}{}{}", a, b, c));
        assert_eq!(quad, Tuple4(3, 4, 12, "3412".to_string()));

        let five = quad.extend(|_, _, _, s| s.len());
        assert_eq!(five.4, 4);
    }

    #[test]
    fn test_map_and_display() {
        let tuple = Tuple3(1, "two", 3.5);
        let described = tuple.map(|a| a.to_string(), |b| b.to_uppercase(), |c| format!("{:.1}", c));
        assert_eq!(described.to_string(), "{1, TWO, 3.5}");
    }

    #[test]
    fn test_conversions() {
        let tuple: Tuple4<u8, bool, char, i64> = (1, true, 'x', -9).into();
        assert_eq!(tuple.into_inner(), (1, true, 'x', -9));
        assert_eq!(Tuple2::new(1, 2), Tuple2(1, 2));
    }
}
