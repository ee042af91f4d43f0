//! Shrink streams and the lockstep zip used to shrink tuples.
//!
//! A tuple is shrunk by asking every slot's Source for its own shrink stream and
//! walking those streams in lockstep: the i-th candidate takes the i-th element
//! of every stream. Streams are equalised first. A slot whose stream runs out
//! keeps replaying its unshrunk value until the longest stream is exhausted, so
//! one pass yields exactly `max(len_1, ..., len_n)` candidates and never drops a
//! slot's contribution.

use crate::tuple::{Tuple2, Tuple3, Tuple4};

/// A lazy, finite sequence of shrink candidates
pub type Shrinks<'a, T> = Box<dyn Iterator<Item = T> + 'a>;

/// Information handed to a Source while it shrinks a value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShrinkContext {
    remaining_cycles: usize,
    examples_tried: usize,
}

impl ShrinkContext {
    pub fn new(remaining_cycles: usize, examples_tried: usize) -> Self {
        Self {
            remaining_cycles,
            examples_tried,
        }
    }

    /// Shrink candidates the runner is still willing to evaluate
    pub fn remaining_cycles(&self) -> usize {
        self.remaining_cycles
    }

    /// Examples sampled before the falsification was found
    pub fn examples_tried(&self) -> usize {
        self.examples_tried
    }
}

impl Default for ShrinkContext {
    fn default() -> Self {
        Self::new(usize::MAX, 0)
    }
}

/// One slot's shrink stream, padded with the slot's original value once the
/// underlying stream is exhausted
pub struct Padded<'a, T> {
    stream: Shrinks<'a, T>,
    original: T,
    exhausted: bool,
}

impl<'a, T: Clone> Padded<'a, T> {
    pub fn new(stream: Shrinks<'a, T>, original: T) -> Self {
        Self {
            stream,
            original,
            exhausted: false,
        }
    }

    /// Next shrink candidate, or the original value after exhaustion.
    /// The underlying stream is never polled again once it returned `None`.
    pub fn pull(&mut self) -> T {
        if !self.exhausted {
            match self.stream.next() {
                Some(candidate) => return candidate,
                None => self.exhausted = true,
            }
        }
        self.original.clone()
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }
}

macro_rules! lockstep_zip {
    ($(#[$meta:meta])* $name:ident => $tuple:ident; $($ty:ident . $slot:ident),+) => {
        $(#[$meta])*
        pub struct $name<'a, $($ty),+> {
            $($slot: Padded<'a, $ty>),+
        }

        impl<'a, $($ty: Clone),+> $name<'a, $($ty),+> {
            pub fn new($($slot: Padded<'a, $ty>),+) -> Self {
                Self { $($slot),+ }
            }
        }

        impl<'a, $($ty: Clone),+> Iterator for $name<'a, $($ty),+> {
            type Item = $tuple<$($ty),+>;

            fn next(&mut self) -> Option<Self::Item> {
                let candidate = $tuple($(self.$slot.pull()),+);
                if true $(&& self.$slot.is_exhausted())+ {
                    return None;
                }
                Some(candidate)
            }
        }

        impl<'a, $($ty: Clone),+> std::iter::FusedIterator for $name<'a, $($ty),+> {}
    };
}

lockstep_zip!(
    /// Lockstep zip over two padded shrink streams
    Zip2 => Tuple2; A.a, B.b
);
lockstep_zip!(
    /// Lockstep zip over three padded shrink streams
    Zip3 => Tuple3; A.a, B.b, C.c
);
lockstep_zip!(
    /// Lockstep zip over four padded shrink streams
    Zip4 => Tuple4; A.a, B.b, C.c, D.d
);

#[cfg(test)]
mod tests {
    use super::*;

    fn stream<T: 'static>(items: Vec<T>) -> Shrinks<'static, T> {
        Box::new(items.into_iter())
    }

    #[test]
    fn test_padded_replays_original_after_exhaustion() {
        let mut padded = Padded::new(stream(vec![1, 2]), 9);
        assert_eq!(padded.pull(), 1);
        assert_eq!(padded.pull(), 2);
        assert!(!padded.is_exhausted());
        assert_eq!(padded.pull(), 9);
        assert!(padded.is_exhausted());
        assert_eq!(padded.pull(), 9);
    }

    #[test]
    fn test_zip_length_is_longest_stream() {
        let zipped: Vec<_> = Zip3::new(
            Padded::new(stream(vec![1, 2]), 10),
            Padded::new(stream(vec![5, 6, 7, 8]), 20),
            Padded::new(stream(Vec::<i32>::new()), 30),
        )
        .collect();

        assert_eq!(
            zipped,
            vec![
                Tuple3(1, 5, 30),
                Tuple3(2, 6, 30),
                Tuple3(10, 7, 30),
                Tuple3(10, 8, 30),
            ]
        );
    }

    #[test]
    fn test_zip_of_empty_streams_is_empty() {
        let mut zipped = Zip2::new(
            Padded::new(stream(Vec::<u8>::new()), 1),
            Padded::new(stream(Vec::<char>::new()), 'x'),
        );
        assert_eq!(zipped.next(), None);
        assert_eq!(zipped.next(), None);
    }

    #[test]
    fn test_zip_replays_original_for_every_short_slot() {
        for (la, lb, lc, ld) in [(0, 1, 2, 3), (3, 0, 0, 1), (2, 2, 2, 2), (5, 1, 4, 0)] {
            let zipped: Vec<_> = Zip4::new(
                Padded::new(stream((0..la).collect()), 100),
                Padded::new(stream((0..lb).collect()), 200),
                Padded::new(stream((0..lc).collect()), 300),
                Padded::new(stream((0..ld).collect()), 400),
            )
            .collect();

            let longest = la.max(lb).max(lc).max(ld);
            assert_eq!(zipped.len(), longest as usize);
            for (i, Tuple4(a, b, c, d)) in zipped.into_iter().enumerate() {
                let i = i as i32;
                assert_eq!(a, if i < la { i } else { 100 });
                assert_eq!(b, if i < lb { i } else { 200 });
                assert_eq!(c, if i < lc { i } else { 300 });
                assert_eq!(d, if i < ld { i } else { 400 });
            }
        }
    }

    #[test]
    fn test_zip_is_lazy() {
        use std::cell::Cell;
        use std::rc::Rc;

        let pulled = Rc::new(Cell::new(0));
        let counter = Rc::clone(&pulled);
        let counting: Shrinks<'static, i32> = Box::new((0..1000).inspect(move |_| {
            counter.set(counter.get() + 1);
        }));

        let mut zipped = Zip2::new(Padded::new(counting, -1), Padded::new(stream(vec![1]), 0));
        let first_two: Vec<_> = zipped.by_ref().take(2).collect();
        assert_eq!(first_two, vec![Tuple2(0, 1), Tuple2(1, 0)]);
        assert_eq!(pulled.get(), 2);
    }

    #[test]
    fn test_shrink_context_accessors() {
        let context = ShrinkContext::new(40, 7);
        assert_eq!(context.remaining_cycles(), 40);
        assert_eq!(context.examples_tried(), 7);
        assert_eq!(ShrinkContext::default().remaining_cycles(), usize::MAX);
    }
}
