//! Reference Sources for primitive values and vectors.

use std::fmt::Debug;
use std::marker::PhantomData;

use num_traits::{FromPrimitive, PrimInt, ToPrimitive};
use rand::distributions::uniform::SampleUniform;
use rand::{Rng, RngCore};

use crate::shrink::{ShrinkContext, Shrinks};
use crate::source::Source;

/// Distances up to this size are shrunk one value at a time
pub const LINEAR_SHRINK_SPAN: i128 = 128;

/// Integers in an inclusive range
#[derive(Debug, Clone)]
pub struct IntSource<T> {
    min: T,
    max: T,
}

/// Integers between `min` and `max` inclusive.
///
/// Values shrink toward the in-range value closest to zero. Up to
/// [`LINEAR_SHRINK_SPAN`] away from it every intermediate value is proposed in
/// order starting at the target; farther away a doubling ladder from the target
/// is followed by halving steps back toward the value. Both shapes put the same
/// candidate values at the same stream positions regardless of where a slot
/// started, which is what lets lockstep tuple shrinking make progress.
pub fn integers<T>(min: T, max: T) -> IntSource<T>
where
    T: PrimInt + SampleUniform,
{
    assert!(min <= max, "integers() requires min <= max");
    IntSource { min, max }
}

impl<T> IntSource<T>
where
    T: PrimInt + ToPrimitive,
{
    /// The value shrinking moves toward
    pub fn target(&self) -> T {
        if self.min > T::zero() {
            self.min
        } else if self.max < T::zero() {
            self.max
        } else {
            T::zero()
        }
    }
}

impl<T> Source<T> for IntSource<T>
where
    T: PrimInt + ToPrimitive + FromPrimitive + SampleUniform + Debug + 'static,
{
    fn generate(&self, rng: &mut dyn RngCore, _size: usize) -> T {
        rng.gen_range(self.min..=self.max)
    }

    fn shrink<'a>(&'a self, value: &T, _context: &ShrinkContext) -> Shrinks<'a, T> {
        let (Some(target), Some(current)) = (self.target().to_i128(), value.to_i128()) else {
            return Box::new(std::iter::empty());
        };
        Box::new(shrink_towards(target, current).filter_map(T::from_i128))
    }

    fn describe(&self, value: &T) -> String {
        format!("{:?}", value)
    }
}

fn shrink_towards(target: i128, current: i128) -> Box<dyn Iterator<Item = i128>> {
    if current == target {
        return Box::new(std::iter::empty());
    }
    let sign = if current > target { 1 } else { -1 };
    let distance = (current - target).abs();

    if distance <= LINEAR_SHRINK_SPAN {
        return Box::new((0..distance).map(move |step| target + sign * step));
    }

    let ladder_steps = (0..127u32).take_while(move |j| (1i128 << j) < distance);
    let ladder_top = ladder_steps.clone().last().map(|j| target + sign * (1i128 << j));
    let ladder = std::iter::once(target).chain(ladder_steps.map(move |j| target + sign * (1i128 << j)));

    let bits = 128 - distance.leading_zeros();
    let halving = (0..bits.saturating_sub(1))
        .rev()
        .map(move |k| current - sign * (1i128 << k))
        .filter(move |candidate| Some(*candidate) != ladder_top);

    Box::new(ladder.chain(halving))
}

/// Booleans; `true` shrinks to `false`
#[derive(Debug, Clone, Copy)]
pub struct BoolSource;

pub fn booleans() -> BoolSource {
    BoolSource
}

impl Source<bool> for BoolSource {
    fn generate(&self, rng: &mut dyn RngCore, _size: usize) -> bool {
        rng.r#gen()
    }

    fn shrink<'a>(&'a self, value: &bool, _context: &ShrinkContext) -> Shrinks<'a, bool> {
        if *value {
            Box::new(std::iter::once(false))
        } else {
            Box::new(std::iter::empty())
        }
    }

    fn describe(&self, value: &bool) -> String {
        value.to_string()
    }
}

/// Always the same value
#[derive(Debug, Clone)]
pub struct Constant<T> {
    value: T,
}

pub fn constant<T: Clone + Debug>(value: T) -> Constant<T> {
    Constant { value }
}

impl<T: Clone + Debug> Source<T> for Constant<T> {
    fn generate(&self, _rng: &mut dyn RngCore, _size: usize) -> T {
        self.value.clone()
    }

    fn shrink<'a>(&'a self, _value: &T, _context: &ShrinkContext) -> Shrinks<'a, T> {
        Box::new(std::iter::empty())
    }

    fn describe(&self, value: &T) -> String {
        format!("{:?}", value)
    }
}

/// One of a fixed list of values; shrinks toward the front of the list
#[derive(Debug, Clone)]
pub struct OneOf<T> {
    values: Vec<T>,
}

pub fn one_of<T: Clone + PartialEq + Debug>(values: Vec<T>) -> OneOf<T> {
    assert!(!values.is_empty(), "one_of() requires at least one value");
    OneOf { values }
}

impl<T: Clone + PartialEq + Debug> Source<T> for OneOf<T> {
    fn generate(&self, rng: &mut dyn RngCore, _size: usize) -> T {
        let index = rng.gen_range(0..self.values.len());
        self.values[index].clone()
    }

    fn shrink<'a>(&'a self, value: &T, _context: &ShrinkContext) -> Shrinks<'a, T> {
        let position = self
            .values
            .iter()
            .position(|candidate| candidate == value)
            .unwrap_or(0);
        Box::new(self.values[..position].iter().cloned())
    }

    fn describe(&self, value: &T) -> String {
        format!("{:?}", value)
    }
}

/// Vectors of values drawn from an element Source
pub struct VecSource<S, T> {
    element: S,
    min_length: usize,
    max_length: usize,
    _phantom: PhantomData<fn() -> T>,
}

/// Vectors with a length in `min_length..=max_length`. The size hint caps how
/// far above `min_length` a drawn length may go.
pub fn vecs<S, T>(element: S, min_length: usize, max_length: usize) -> VecSource<S, T>
where
    S: Source<T>,
{
    assert!(min_length <= max_length, "vecs() requires min_length <= max_length");
    VecSource {
        element,
        min_length,
        max_length,
        _phantom: PhantomData,
    }
}

impl<S, T> Source<Vec<T>> for VecSource<S, T>
where
    S: Source<T>,
    T: Clone + 'static,
{
    fn generate(&self, rng: &mut dyn RngCore, size: usize) -> Vec<T> {
        let max_length = self.max_length.min(self.min_length.saturating_add(size));
        let length = rng.gen_range(self.min_length..=max_length);
        (0..length).map(|_| self.element.generate(rng, size)).collect()
    }

    fn shrink<'a>(&'a self, value: &Vec<T>, context: &ShrinkContext) -> Shrinks<'a, Vec<T>> {
        let value = value.clone();
        let min_length = self.min_length;
        let context = *context;

        let truncations = (min_length..value.len()).map({
            let value = value.clone();
            move |length| value[..length].to_vec()
        });

        // dropping the last element is already a truncation
        let length = value.len();
        let removals = (0..length.saturating_sub(1))
            .filter(move |_| length > min_length)
            .map({
                let value = value.clone();
                move |index| {
                    let mut shorter = value.clone();
                    shorter.remove(index);
                    shorter
                }
            });

        let element_shrinks = (0..value.len()).flat_map(move |index| {
            let value = value.clone();
            self.element
                .shrink(&value[index], &context)
                .map(move |smaller| {
                    let mut replaced = value.clone();
                    replaced[index] = smaller;
                    replaced
                })
        });

        Box::new(truncations.chain(removals).chain(element_shrinks))
    }

    fn describe(&self, value: &Vec<T>) -> String {
        let parts: Vec<String> = value.iter().map(|item| self.element.describe(item)).collect();
        format!("[{}]", parts.join(", "))
    }
}
