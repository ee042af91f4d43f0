//! Builders over one to four Sources.

use std::fmt::Debug;
use std::rc::Rc;

use super::combined::{
    Combined2, Combined3, Combined4, Precursor1, Precursor2, Precursor3, Precursor4,
};
use super::subject::{
    PrecursorSubject1, PrecursorSubject2, PrecursorSubject3, PrecursorSubject4, Subject,
};
use crate::error::TheoryResult;
use crate::runner::check_direct;
use crate::source::Source;
use crate::strategy::Strategy;
use crate::tuple::{Tuple2, Tuple3, Tuple4};

/// A theory over values drawn from a single Source
pub struct TheoryBuilder1<A> {
    strategy: Strategy,
    source: Rc<dyn Source<A>>,
    assumption: Rc<dyn Fn(&A) -> bool>,
}

impl<A: Clone + 'static> TheoryBuilder1<A> {
    pub(crate) fn new(strategy: Strategy, source: Rc<dyn Source<A>>) -> Self {
        Self {
            strategy,
            source,
            assumption: Rc::new(|_: &A| true),
        }
    }

    /// Only consider values accepted by both the current assumption and
    /// `assumption`
    pub fn assuming<F>(self, assumption: F) -> Self
    where
        F: Fn(&A) -> bool + 'static,
    {
        let previous = self.assumption;
        Self {
            strategy: self.strategy,
            source: self.source,
            assumption: Rc::new(move |a: &A| previous(a) && assumption(a)),
        }
    }

    /// State the theory about a value derived from each draw. Shrinking still
    /// happens on the drawn value.
    pub fn map<T, F>(self, mapping: F) -> Subject<T>
    where
        T: Debug + 'static,
        F: Fn(&A) -> T + 'static,
    {
        Subject::new(self.strategy, self.source, self.assumption, Rc::new(mapping))
    }

    /// Keep the drawn value next to the derived one. The mapping runs for every
    /// draw and shrink candidate the assumption accepts; a panicking mapping
    /// falsifies the theory.
    pub fn map_with_precursor<T, F>(self, mapping: F) -> PrecursorSubject1<A, T>
    where
        T: Clone + Debug + 'static,
        F: Fn(&A) -> T + 'static,
    {
        self.map_with_precursor_described(mapping, |mapped: &T| format!("{:?}", mapped))
    }

    pub fn map_with_precursor_described<T, F, Desc>(
        self,
        mapping: F,
        describe: Desc,
    ) -> PrecursorSubject1<A, T>
    where
        T: Clone + 'static,
        F: Fn(&A) -> T + 'static,
        Desc: Fn(&T) -> String + 'static,
    {
        PrecursorSubject1::new(
            self.strategy,
            Precursor1::new(self.source, Rc::new(mapping), Rc::new(describe)),
            self.assumption,
        )
    }

    /// Search for a value falsifying `property`
    pub fn check<F>(self, property: F) -> TheoryResult
    where
        F: Fn(&A) -> bool,
    {
        check_direct(self.strategy, &*self.source, &*self.assumption, &property)
    }

    /// Like [`check`](Self::check) for a consumer that asserts instead of
    /// returning a verdict; a panic falsifies the theory
    pub fn check_assert<F>(self, consumer: F) -> TheoryResult
    where
        F: Fn(&A),
    {
        self.check(move |a| {
            consumer(a);
            true
        })
    }
}

macro_rules! theory_builder {
    (
        $(#[$meta:meta])* $name:ident => $combined:ident, $tuple:ident;
        $precursor:ident => $subject:ident;
        $($ty:ident . $slot:ident . $idx:tt),+
    ) => {
        $(#[$meta])*
        pub struct $name<$($ty),+> {
            strategy: Strategy,
            source: $combined<$($ty),+>,
            assumption: Rc<dyn Fn($(&$ty),+) -> bool>,
        }

        impl<$($ty: Clone + 'static),+> $name<$($ty),+> {
            pub(crate) fn new(strategy: Strategy, source: $combined<$($ty),+>) -> Self {
                Self {
                    strategy,
                    source,
                    assumption: Rc::new(|$(_: &$ty),+| true),
                }
            }

            /// State the theory about a value derived from each draw.
            /// Shrinking still happens on the drawn slots.
            pub fn map<T, F>(self, mapping: F) -> Subject<T>
            where
                T: Debug + 'static,
                F: Fn($(&$ty),+) -> T + 'static,
            {
                let previous = self.assumption;
                let source: Rc<dyn Source<$tuple<$($ty),+>>> = Rc::new(self.source);
                let assumption: Rc<dyn Fn(&$tuple<$($ty),+>) -> bool> =
                    Rc::new(move |values: &$tuple<$($ty),+>| previous($(&values.$idx),+));
                let mapping: Rc<dyn Fn(&$tuple<$($ty),+>) -> T> =
                    Rc::new(move |values: &$tuple<$($ty),+>| mapping($(&values.$idx),+));
                Subject::new(self.strategy, source, assumption, mapping)
            }

            /// Keep the drawn slots next to the derived value. The mapping runs
            /// for every draw and shrink candidate the assumption accepts; a
            /// panicking mapping falsifies the theory.
            pub fn map_with_precursor<T, F>(self, mapping: F) -> $subject<$($ty),+, T>
            where
                T: Clone + Debug + 'static,
                F: Fn($(&$ty),+) -> T + 'static,
            {
                self.map_with_precursor_described(mapping, |mapped: &T| format!("{:?}", mapped))
            }

            pub fn map_with_precursor_described<T, F, Desc>(
                self,
                mapping: F,
                describe: Desc,
            ) -> $subject<$($ty),+, T>
            where
                T: Clone + 'static,
                F: Fn($(&$ty),+) -> T + 'static,
                Desc: Fn(&T) -> String + 'static,
            {
                let previous = self.assumption;
                let assumption: Rc<dyn Fn(&$tuple<$($ty),+>) -> bool> =
                    Rc::new(move |values: &$tuple<$($ty),+>| previous($(&values.$idx),+));
                $subject::new(
                    self.strategy,
                    $precursor::new(self.source, Rc::new(mapping), Rc::new(describe)),
                    assumption,
                )
            }
        }

        theory_operations!($name => $tuple; $($ty . $slot . $idx),+);
    };
}

theory_builder!(
    /// A theory over pairs drawn from two Sources
    TheoryBuilder2 => Combined2, Tuple2;
    Precursor2 => PrecursorSubject2;
    A.a.0, B.b.1
);
theory_builder!(
    /// A theory over triples drawn from three Sources
    TheoryBuilder3 => Combined3, Tuple3;
    Precursor3 => PrecursorSubject3;
    A.a.0, B.b.1, C.c.2
);
theory_builder!(
    /// A theory over quadruples drawn from four Sources
    TheoryBuilder4 => Combined4, Tuple4;
    Precursor4 => PrecursorSubject4;
    A.a.0, B.b.1, C.c.2, D.d.3
);
