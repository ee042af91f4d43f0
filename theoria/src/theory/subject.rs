//! Theories over values derived from the drawn slots.

use std::fmt::Debug;
use std::rc::Rc;

use super::combined::{Precursor1, Precursor2, Precursor3, Precursor4};
use crate::error::TheoryResult;
use crate::runner::TheoryRunner;
use crate::source::Source;
use crate::strategy::Strategy;
use crate::tuple::{Tuple2, Tuple3, Tuple4, Tuple5};

/// Runs a mapped theory without exposing the precursor type
trait Precursors<T> {
    fn run(
        &self,
        strategy: Strategy,
        assumption: &dyn Fn(&T) -> bool,
        property: &dyn Fn(&T) -> bool,
    ) -> TheoryResult;
}

struct MappedPrecursors<P, T> {
    source: Rc<dyn Source<P>>,
    assumption: Rc<dyn Fn(&P) -> bool>,
    mapping: Rc<dyn Fn(&P) -> T>,
}

impl<P, T> Precursors<T> for MappedPrecursors<P, T>
where
    P: Clone + 'static,
    T: Debug + 'static,
{
    fn run(
        &self,
        strategy: Strategy,
        assumption: &dyn Fn(&T) -> bool,
        property: &dyn Fn(&T) -> bool,
    ) -> TheoryResult {
        let describe = |value: &T| format!("{:?}", value);

        TheoryRunner::new(strategy, &*self.source, &*self.assumption, &*self.mapping, &describe)
            .assuming_value(assumption)
            .check(property)
    }
}

/// A theory about a value computed from each draw
///
/// The drawn slots stay hidden: shrinking operates on them and the mapped
/// value is recomputed for every candidate the drawn-slot assumption accepts.
/// A panicking mapping falsifies the theory. Values are described with `Debug`.
pub struct Subject<T> {
    strategy: Strategy,
    precursors: Rc<dyn Precursors<T>>,
    assumption: Rc<dyn Fn(&T) -> bool>,
}

impl<T: Debug + 'static> Subject<T> {
    pub(crate) fn new<P: Clone + 'static>(
        strategy: Strategy,
        source: Rc<dyn Source<P>>,
        assumption: Rc<dyn Fn(&P) -> bool>,
        mapping: Rc<dyn Fn(&P) -> T>,
    ) -> Self {
        Self {
            strategy,
            precursors: Rc::new(MappedPrecursors {
                source,
                assumption,
                mapping,
            }),
            assumption: Rc::new(|_: &T| true),
        }
    }

    /// Additionally require `assumption` of the mapped value
    pub fn assuming<F>(self, assumption: F) -> Self
    where
        F: Fn(&T) -> bool + 'static,
    {
        let previous = self.assumption;
        Self {
            strategy: self.strategy,
            precursors: self.precursors,
            assumption: Rc::new(move |value: &T| previous(value) && assumption(value)),
        }
    }

    pub fn check<F>(self, property: F) -> TheoryResult
    where
        F: Fn(&T) -> bool,
    {
        self.precursors.run(self.strategy, &*self.assumption, &property)
    }

    pub fn check_assert<F>(self, consumer: F) -> TheoryResult
    where
        F: Fn(&T),
    {
        self.check(move |value| {
            consumer(value);
            true
        })
    }
}

macro_rules! precursor_subject {
    (
        $(#[$meta:meta])* $name:ident => $precursor:ident, $tuple:ident, $pre:ty;
        $($ty:ident . $slot:ident . $idx:tt),+
    ) => {
        $(#[$meta])*
        pub struct $name<$($ty),+> {
            strategy: Strategy,
            precursor: $precursor<$($ty),+>,
            precursor_assumption: Rc<dyn Fn(&$pre) -> bool>,
            assumption: Rc<dyn Fn($(&$ty),+) -> bool>,
        }

        impl<$($ty: Clone + 'static),+> $name<$($ty),+> {
            pub(crate) fn new(
                strategy: Strategy,
                precursor: $precursor<$($ty),+>,
                precursor_assumption: Rc<dyn Fn(&$pre) -> bool>,
            ) -> Self {
                Self {
                    strategy,
                    precursor,
                    precursor_assumption,
                    assumption: Rc::new(|$(_: &$ty),+| true),
                }
            }

            /// Only consider values accepted by both the current assumption
            /// and `assumption`
            pub fn assuming<F>(self, assumption: F) -> Self
            where
                F: Fn($(&$ty),+) -> bool + 'static,
            {
                let previous = self.assumption;
                Self {
                    strategy: self.strategy,
                    precursor: self.precursor,
                    precursor_assumption: self.precursor_assumption,
                    assumption: Rc::new(move |$($slot: &$ty),+| {
                        previous($($slot),+) && assumption($($slot),+)
                    }),
                }
            }

            /// Search for values falsifying `property`
            pub fn check<F>(self, property: F) -> TheoryResult
            where
                F: Fn($(&$ty),+) -> bool,
            {
                let Self {
                    strategy,
                    precursor,
                    precursor_assumption,
                    assumption,
                } = self;
                let to_value = |values: &$pre| precursor.extend(values);
                let describe = |values: &$tuple<$($ty),+>| precursor.describe(values);
                let value_assumption = |values: &$tuple<$($ty),+>| assumption($(&values.$idx),+);
                let property = |values: &$tuple<$($ty),+>| property($(&values.$idx),+);

                TheoryRunner::new(
                    strategy,
                    precursor.source(),
                    &*precursor_assumption,
                    &to_value,
                    &describe,
                )
                .assuming_value(&value_assumption)
                .check(&property)
            }

            /// Like [`check`](Self::check) for a consumer that asserts instead
            /// of returning a verdict; a panic falsifies the theory
            pub fn check_assert<F>(self, consumer: F) -> TheoryResult
            where
                F: Fn($(&$ty),+),
            {
                self.check(move |$($slot: &$ty),+| {
                    consumer($($slot),+);
                    true
                })
            }
        }
    };
}

precursor_subject!(
    /// A drawn value alongside the value derived from it
    PrecursorSubject1 => Precursor1, Tuple2, A; A.a.0, T.mapped.1
);
precursor_subject!(
    /// Two drawn values alongside the value derived from them
    PrecursorSubject2 => Precursor2, Tuple3, Tuple2<A, B>; A.a.0, B.b.1, T.mapped.2
);
precursor_subject!(
    /// Three drawn values alongside the value derived from them
    PrecursorSubject3 => Precursor3, Tuple4, Tuple3<A, B, C>; A.a.0, B.b.1, C.c.2, T.mapped.3
);
precursor_subject!(
    /// Four drawn values alongside the value derived from them
    PrecursorSubject4 => Precursor4, Tuple5, Tuple4<A, B, C, D>;
    A.a.0, B.b.1, C.c.2, D.d.3, T.mapped.4
);
