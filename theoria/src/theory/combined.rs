//! Sources over tuples, assembled from one Source per slot, and the precursor
//! forms that extend their draws with a derived value.

use std::rc::Rc;

use rand::RngCore;

use crate::shrink::{Padded, ShrinkContext, Shrinks, Zip2, Zip3, Zip4};
use crate::source::Source;
use crate::tuple::{Tuple2, Tuple3, Tuple4, Tuple5};

macro_rules! combined_source {
    ($(#[$meta:meta])* $name:ident => $tuple:ident, $zip:ident; $($ty:ident . $slot:ident . $idx:tt),+) => {
        $(#[$meta])*
        pub struct $name<$($ty),+> {
            $($slot: Rc<dyn Source<$ty>>),+
        }

        impl<$($ty),+> $name<$($ty),+> {
            pub fn new($($slot: Rc<dyn Source<$ty>>),+) -> Self {
                Self { $($slot),+ }
            }
        }

        impl<$($ty),+> Clone for $name<$($ty),+> {
            fn clone(&self) -> Self {
                Self { $($slot: Rc::clone(&self.$slot)),+ }
            }
        }

        impl<$($ty: Clone + 'static),+> Source<$tuple<$($ty),+>> for $name<$($ty),+> {
            /// Slots are drawn in order from the same rng and size hint
            fn generate(&self, rng: &mut dyn RngCore, size: usize) -> $tuple<$($ty),+> {
                $tuple($(self.$slot.generate(rng, size)),+)
            }

            fn shrink<'a>(
                &'a self,
                value: &$tuple<$($ty),+>,
                context: &ShrinkContext,
            ) -> Shrinks<'a, $tuple<$($ty),+>> {
                Box::new($zip::new($(
                    Padded::new(self.$slot.shrink(&value.$idx, context), value.$idx.clone())
                ),+))
            }

            fn describe(&self, value: &$tuple<$($ty),+>) -> String {
                $tuple($(self.$slot.describe(&value.$idx)),+).to_string()
            }
        }
    };
}

combined_source!(
    /// Pairs drawn from two Sources
    Combined2 => Tuple2, Zip2; A.a.0, B.b.1
);
combined_source!(
    /// Triples drawn from three Sources
    Combined3 => Tuple3, Zip3; A.a.0, B.b.1, C.c.2
);
combined_source!(
    /// Quadruples drawn from four Sources
    Combined4 => Tuple4, Zip4; A.a.0, B.b.1, C.c.2, D.d.3
);

/// A single Source whose draws are extended with a derived value
///
/// The mapping only runs when [`extend`](Self::extend) is called, so the
/// runner can convert a precursor after its assumption accepted it.
pub struct Precursor1<A, T> {
    source: Rc<dyn Source<A>>,
    mapping: Rc<dyn Fn(&A) -> T>,
    describe_mapped: Rc<dyn Fn(&T) -> String>,
}

impl<A: Clone + 'static, T: 'static> Precursor1<A, T> {
    pub fn new(
        source: Rc<dyn Source<A>>,
        mapping: Rc<dyn Fn(&A) -> T>,
        describe_mapped: Rc<dyn Fn(&T) -> String>,
    ) -> Self {
        Self {
            source,
            mapping,
            describe_mapped,
        }
    }

    /// The Source precursors are drawn and shrunk from
    pub fn source(&self) -> &dyn Source<A> {
        &*self.source
    }

    pub fn extend(&self, precursor: &A) -> Tuple2<A, T> {
        Tuple2(precursor.clone(), (self.mapping)(precursor))
    }

    pub fn describe(&self, value: &Tuple2<A, T>) -> String {
        Tuple2(self.source.describe(&value.0), (self.describe_mapped)(&value.1)).to_string()
    }
}

macro_rules! precursor_source {
    (
        $(#[$meta:meta])* $name:ident => $combined:ident, $tuple:ident -> $extended:ident;
        $($ty:ident . $slot:ident . $idx:tt),+; $last:tt
    ) => {
        $(#[$meta])*
        pub struct $name<$($ty),+, T> {
            slots: $combined<$($ty),+>,
            mapping: Rc<dyn Fn($(&$ty),+) -> T>,
            describe_mapped: Rc<dyn Fn(&T) -> String>,
        }

        impl<$($ty: Clone + 'static),+, T: 'static> $name<$($ty),+, T> {
            pub fn new(
                slots: $combined<$($ty),+>,
                mapping: Rc<dyn Fn($(&$ty),+) -> T>,
                describe_mapped: Rc<dyn Fn(&T) -> String>,
            ) -> Self {
                Self {
                    slots,
                    mapping,
                    describe_mapped,
                }
            }

            /// The lockstep Source precursors are drawn and shrunk from
            pub fn source(&self) -> &dyn Source<$tuple<$($ty),+>> {
                &self.slots
            }

            /// Append the mapped value to a precursor
            pub fn extend(&self, precursor: &$tuple<$($ty),+>) -> $extended<$($ty),+, T> {
                precursor.clone().extend(&*self.mapping)
            }

            pub fn describe(&self, value: &$extended<$($ty),+, T>) -> String {
                $extended(
                    $(self.slots.$slot.describe(&value.$idx)),+,
                    (self.describe_mapped)(&value.$last),
                )
                .to_string()
            }
        }
    };
}

precursor_source!(
    /// Pairs extended with a derived third value
    Precursor2 => Combined2, Tuple2 -> Tuple3; A.a.0, B.b.1; 2
);
precursor_source!(
    /// Triples extended with a derived fourth value
    Precursor3 => Combined3, Tuple3 -> Tuple4; A.a.0, B.b.1, C.c.2; 3
);
precursor_source!(
    /// Quadruples extended with a derived fifth value
    Precursor4 => Combined4, Tuple4 -> Tuple5; A.a.0, B.b.1, C.c.2, D.d.3; 4
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::Prng;
    use crate::sources::{booleans, integers};

    fn triple() -> Combined3<i32, i32, bool> {
        Combined3::new(integers(0, 100).shared(), integers(-50, 50).shared(), booleans().shared())
    }

    #[test]
    fn test_combined_draw_is_slot_order() {
        let first = integers(0, 100);
        let second = integers(-50, 50);
        let third = booleans();

        for seed in 0..20 {
            let combined = triple().generate(&mut Prng::seeded(seed), 5);

            let mut rng = Prng::seeded(seed);
            let expected = Tuple3(
                first.generate(&mut rng, 5),
                second.generate(&mut rng, 5),
                third.generate(&mut rng, 5),
            );
            assert_eq!(combined, expected);
        }
    }

    #[test]
    fn test_combined_shrink_is_lockstep() {
        let shrinks: Vec<_> = triple()
            .shrink(&Tuple3(3, 1, true), &ShrinkContext::default())
            .collect();

        assert_eq!(
            shrinks,
            vec![Tuple3(0, 0, false), Tuple3(1, 1, true), Tuple3(2, 1, true)]
        );
    }

    #[test]
    fn test_combined_describe() {
        assert_eq!(triple().describe(&Tuple3(4, -2, false)), "{4, -2, false}");
    }

    #[test]
    fn test_precursor_extends_shrink_candidates() {
        let precursor = Precursor2::new(
            Combined2::new(integers(0, 100).shared(), integers(0, 100).shared()),
            Rc::new(|a: &i32, b: &i32| a + b),
            Rc::new(|sum: &i32| format!("sum={}", sum)),
        );

        let drawn = precursor.extend(&precursor.source().generate(&mut Prng::seeded(3), 1));
        assert_eq!(drawn.2, drawn.0 + drawn.1);

        let shrinks: Vec<_> = precursor
            .source()
            .shrink(&Tuple2(2, 5), &ShrinkContext::default())
            .map(|candidate| precursor.extend(&candidate))
            .collect();
        assert_eq!(shrinks.len(), 5);
        assert!(shrinks.iter().all(|t| t.2 == t.0 + t.1));
        assert_eq!(shrinks[0], Tuple3(0, 0, 0));
        assert_eq!(shrinks[4], Tuple3(2, 4, 6));

        assert_eq!(precursor.describe(&Tuple3(2, 5, 7)), "{2, 5, sum=7}");
    }

    #[test]
    fn test_mapping_runs_only_when_extending() {
        let calls = Rc::new(std::cell::Cell::new(0));
        let counter = calls.clone();
        let precursor = Precursor1::new(
            integers(0u8, 10).shared(),
            Rc::new(move |n: &u8| {
                counter.set(counter.get() + 1);
                n.to_string()
            }),
            Rc::new(|s: &String| format!("{:?}", s)),
        );

        let shrinks: Vec<u8> = precursor.source().shrink(&2, &ShrinkContext::default()).collect();
        assert_eq!(shrinks, vec![0, 1]);
        assert_eq!(calls.get(), 0);

        assert_eq!(precursor.extend(&2), Tuple2(2, "2".to_string()));
        assert_eq!(calls.get(), 1);
        assert_eq!(precursor.describe(&Tuple2(2, "2".to_string())), "{2, \"2\"}");
    }
}
