//! Shrinking behaviour across combined Sources

use std::rc::Rc;

use theoria::shrink::{Padded, Zip3};
use theoria::sources::{integers, vecs};
use theoria::theory::Combined3;
use theoria::{RecordingReporter, ShrinkContext, Source, Strategy, Theories, Tuple3, Tuple4};

fn theories(reporter: &Rc<RecordingReporter>) -> Theories {
    Theories::new(Strategy::new(2, 1000, 10000, reporter.clone()))
}

#[test]
fn test_zipped_stream_is_as_long_as_the_longest_slot() {
    let streams = |a: Vec<i32>, b: Vec<i32>, c: Vec<i32>| {
        Zip3::new(
            Padded::new(Box::new(a.into_iter()), 100),
            Padded::new(Box::new(b.into_iter()), 200),
            Padded::new(Box::new(c.into_iter()), 300),
        )
    };

    let zipped: Vec<_> = streams(vec![1], vec![2, 3, 4], vec![5, 6]).collect();
    assert_eq!(
        zipped,
        vec![Tuple3(1, 2, 5), Tuple3(100, 3, 6), Tuple3(100, 4, 300)]
    );

    assert_eq!(streams(vec![], vec![], vec![]).count(), 0);
    assert_eq!(streams(vec![1, 2, 3, 4, 5], vec![], vec![1]).count(), 5);
}

#[test]
fn test_combined_source_pads_exhausted_slots() {
    let source = Combined3::new(
        integers(0i32, 100).shared(),
        integers(0i32, 100).shared(),
        integers(0i32, 100).shared(),
    );

    let candidates: Vec<_> = source
        .shrink(&Tuple3(1, 4, 2), &ShrinkContext::default())
        .collect();

    assert_eq!(
        candidates,
        vec![Tuple3(0, 0, 0), Tuple3(1, 1, 1), Tuple3(1, 2, 2), Tuple3(1, 3, 2)]
    );
}

#[test]
fn test_threshold_converges_to_boundary() {
    for seed in [2, 3, 17, 99, 1234] {
        let reporter = Rc::new(RecordingReporter::new());
        let error = theories(&reporter)
            .with_fixed_seed(seed)
            .for_all3(integers(0i32, 100), integers(0i32, 100), integers(0i32, 100))
            .check(|a, b, c| !(*a > 50 && *b > 50 && *c > 50))
            .unwrap_err();

        assert!(error.is_falsified());
        assert_eq!(reporter.call_count(), 1);
        assert_eq!(reporter.smallest::<Tuple3<i32, i32, i32>>(), Some(Tuple3(51, 51, 51)));

        let path = reporter.shrink_path::<Tuple3<i32, i32, i32>>();
        assert!(path.iter().all(|t| t.0 > 50 && t.1 > 50 && t.2 > 50));
        assert_eq!(path.last(), Some(&Tuple3(51, 51, 51)));
    }
}

#[test]
fn test_shrink_path_keeps_precursor_consistent() {
    let reporter = Rc::new(RecordingReporter::new());
    theories(&reporter)
        .for_all3(integers(0i64, 1000), integers(0i64, 1000), integers(0i64, 1000))
        .map_with_precursor(|a, b, c| a * b + c)
        .check(|_, _, _, value| *value < 250_000)
        .unwrap_err();

    let path = reporter.shrink_path::<Tuple4<i64, i64, i64, i64>>();
    assert!(!path.is_empty());
    for step in &path {
        assert_eq!(step.3, step.0 * step.1 + step.2);
        assert!(step.3 >= 250_000);
    }
}

#[test]
fn test_vectors_shrink_inside_tuples() {
    let reporter = Rc::new(RecordingReporter::new());
    theories(&reporter)
        .for_all2(vecs(integers(0u8, 50), 0, 10), integers(0u8, 10))
        .check(|items, limit| items.iter().all(|item| item <= limit))
        .unwrap_err();

    let call = reporter.last().expect("theory should be falsified");
    let smallest = call
        .smallest
        .downcast_ref::<theoria::Tuple2<Vec<u8>, u8>>()
        .expect("smallest is the drawn pair");
    assert_eq!(smallest.0.len(), 1);
    assert_eq!(smallest.0[0], smallest.1 + 1);
    assert_eq!(
        call.smallest.description(),
        format!("{{[{}], {}}}", smallest.0[0], smallest.1)
    );
}

#[test]
fn test_shrink_budget_limits_accepted_steps() {
    let reporter = Rc::new(RecordingReporter::new());
    let error = theories(&reporter)
        .with_shrink_cycles(1)
        .for_all(integers(0u64, 1_000_000))
        .check(|n| *n < 10)
        .unwrap_err();

    assert!(error.is_falsified());
    assert!(reporter.last().is_some_and(|call| call.shrink_steps() <= 1));
}

#[test]
fn test_same_seed_reports_same_path() {
    let run = || {
        let reporter = Rc::new(RecordingReporter::new());
        theories(&reporter)
            .with_fixed_seed(4242)
            .for_all3(integers(0i32, 10_000), integers(-500i32, 500), integers(0i32, 10_000))
            .assuming(|a, _, _| a % 2 == 0)
            .check(|a, b, c| a + b.abs() + c < 9000)
            .unwrap_err();
        reporter.shrink_path::<Tuple3<i32, i32, i32>>()
    };

    let first = run();
    assert!(!first.is_empty());
    assert_eq!(first, run());
}
