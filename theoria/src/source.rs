//! The Source capability: generation, shrinking and description for one type.

use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

use rand::RngCore;

use crate::shrink::{ShrinkContext, Shrinks};

/// Attempts a filtered Source makes before giving up on a draw
pub const FILTER_ATTEMPTS: usize = 1000;

/// Generation, shrinking and description of values of type `T`
///
/// Sources are immutable. `generate` must be a pure function of the rng state
/// and the size hint. `shrink` must return a finite stream whose candidates are
/// no larger than `value` under the Source's own ordering; a Source that breaks
/// this makes the runner loop until its shrink budget runs out.
pub trait Source<T> {
    /// Draw a value
    fn generate(&self, rng: &mut dyn RngCore, size: usize) -> T;

    /// Lazily propose simpler values than `value`
    fn shrink<'a>(&'a self, value: &T, context: &ShrinkContext) -> Shrinks<'a, T>;

    /// Describe a value for reporting
    fn describe(&self, value: &T) -> String;

    /// Convert generated values to another type. `from` maps a converted value
    /// back so shrinking keeps operating on the original representation.
    fn map<U, F, G>(self, to: F, from: G) -> Mapped<Self, T, F, G>
    where
        Self: Sized,
        F: Fn(T) -> U,
        G: Fn(&U) -> T,
    {
        Mapped {
            source: self,
            to,
            from,
            _phantom: PhantomData,
        }
    }

    /// Only produce values accepted by `predicate`
    fn filter<P>(self, predicate: P) -> Filtered<Self, P>
    where
        Self: Sized,
        P: Fn(&T) -> bool,
    {
        Filtered {
            source: self,
            predicate,
        }
    }

    /// Override how values are described
    fn described_as<D>(self, describe: D) -> DescribedAs<Self, D>
    where
        Self: Sized,
        D: Fn(&T) -> String,
    {
        DescribedAs {
            source: self,
            describe,
        }
    }

    /// Replace the shrinker
    fn with_shrinker<K>(self, shrinker: K) -> WithShrinker<Self, K>
    where
        Self: Sized,
        K: Fn(&T, &ShrinkContext) -> Shrinks<'static, T>,
    {
        WithShrinker {
            source: self,
            shrinker,
        }
    }

    /// Type-erase into an owned Source
    fn boxed(self) -> Box<dyn Source<T>>
    where
        Self: Sized + 'static,
    {
        Box::new(self)
    }

    /// Type-erase into a shareable Source
    fn shared(self) -> Rc<dyn Source<T>>
    where
        Self: Sized + 'static,
    {
        Rc::new(self)
    }
}

impl<T, S: Source<T> + ?Sized> Source<T> for Rc<S> {
    fn generate(&self, rng: &mut dyn RngCore, size: usize) -> T {
        (**self).generate(rng, size)
    }

    fn shrink<'a>(&'a self, value: &T, context: &ShrinkContext) -> Shrinks<'a, T> {
        (**self).shrink(value, context)
    }

    fn describe(&self, value: &T) -> String {
        (**self).describe(value)
    }
}

impl<T, S: Source<T> + ?Sized> Source<T> for Box<S> {
    fn generate(&self, rng: &mut dyn RngCore, size: usize) -> T {
        (**self).generate(rng, size)
    }

    fn shrink<'a>(&'a self, value: &T, context: &ShrinkContext) -> Shrinks<'a, T> {
        (**self).shrink(value, context)
    }

    fn describe(&self, value: &T) -> String {
        (**self).describe(value)
    }
}

/// Build a Source from a generator closure. Values do not shrink and are
/// described with `Debug`.
pub fn from_fn<T, F>(generator: F) -> FromFn<F>
where
    F: Fn(&mut dyn RngCore, usize) -> T,
{
    FromFn { generator }
}

/// Source backed by a generator closure
pub struct FromFn<F> {
    generator: F,
}

impl<T, F> Source<T> for FromFn<F>
where
    T: fmt::Debug + 'static,
    F: Fn(&mut dyn RngCore, usize) -> T,
{
    fn generate(&self, rng: &mut dyn RngCore, size: usize) -> T {
        (self.generator)(rng, size)
    }

    fn shrink<'a>(&'a self, _value: &T, _context: &ShrinkContext) -> Shrinks<'a, T> {
        Box::new(std::iter::empty())
    }

    fn describe(&self, value: &T) -> String {
        format!("{:?}", value)
    }
}

/// A Source converted to another type, see [`Source::map`]
pub struct Mapped<S, T, F, G> {
    source: S,
    to: F,
    from: G,
    _phantom: PhantomData<fn() -> T>,
}

impl<S, T, U, F, G> Source<U> for Mapped<S, T, F, G>
where
    S: Source<T>,
    F: Fn(T) -> U,
    G: Fn(&U) -> T,
{
    fn generate(&self, rng: &mut dyn RngCore, size: usize) -> U {
        (self.to)(self.source.generate(rng, size))
    }

    fn shrink<'a>(&'a self, value: &U, context: &ShrinkContext) -> Shrinks<'a, U> {
        let original = (self.from)(value);
        Box::new(
            self.source
                .shrink(&original, context)
                .map(move |candidate| (self.to)(candidate)),
        )
    }

    fn describe(&self, value: &U) -> String {
        self.source.describe(&(self.from)(value))
    }
}

/// A Source restricted by a predicate, see [`Source::filter`]
pub struct Filtered<S, P> {
    source: S,
    predicate: P,
}

impl<S, T, P> Source<T> for Filtered<S, P>
where
    T: 'static,
    S: Source<T>,
    P: Fn(&T) -> bool,
{
    fn generate(&self, rng: &mut dyn RngCore, size: usize) -> T {
        for _ in 0..FILTER_ATTEMPTS {
            let value = self.source.generate(rng, size);
            if (self.predicate)(&value) {
                return value;
            }
        }
        panic!(
            "Filtered source failed to generate a valid value after {} attempts",
            FILTER_ATTEMPTS
        );
    }

    fn shrink<'a>(&'a self, value: &T, context: &ShrinkContext) -> Shrinks<'a, T> {
        Box::new(
            self.source
                .shrink(value, context)
                .filter(move |candidate| (self.predicate)(candidate)),
        )
    }

    fn describe(&self, value: &T) -> String {
        self.source.describe(value)
    }
}

/// A Source with an overridden description, see [`Source::described_as`]
pub struct DescribedAs<S, D> {
    source: S,
    describe: D,
}

impl<S, T, D> Source<T> for DescribedAs<S, D>
where
    S: Source<T>,
    D: Fn(&T) -> String,
{
    fn generate(&self, rng: &mut dyn RngCore, size: usize) -> T {
        self.source.generate(rng, size)
    }

    fn shrink<'a>(&'a self, value: &T, context: &ShrinkContext) -> Shrinks<'a, T> {
        self.source.shrink(value, context)
    }

    fn describe(&self, value: &T) -> String {
        (self.describe)(value)
    }
}

/// A Source with a replaced shrinker, see [`Source::with_shrinker`]
pub struct WithShrinker<S, K> {
    source: S,
    shrinker: K,
}

impl<S, T, K> Source<T> for WithShrinker<S, K>
where
    S: Source<T>,
    K: Fn(&T, &ShrinkContext) -> Shrinks<'static, T>,
{
    fn generate(&self, rng: &mut dyn RngCore, size: usize) -> T {
        self.source.generate(rng, size)
    }

    fn shrink<'a>(&'a self, value: &T, context: &ShrinkContext) -> Shrinks<'a, T> {
        (self.shrinker)(value, context)
    }

    fn describe(&self, value: &T) -> String {
        self.source.describe(value)
    }
}
