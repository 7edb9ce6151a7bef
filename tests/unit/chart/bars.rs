use super::*;

fn bar(t: i64, close: f64) -> Bar {
    Bar::new(t, close, close + 1.0, close - 1.0, close, 1.0)
}

#[test]
fn overlapping_chunks_are_deduplicated_and_sorted() {
    let chunks = vec![
        BarChunk::from(vec![bar(30, 3.0), bar(10, 1.0), bar(20, 2.0)]),
        BarChunk::from(vec![bar(20, 22.0), bar(40, 4.0)]),
    ];
    let out = flatten_bars(&chunks, 0, 100);
    let ts: Vec<i64> = out.iter().map(|b| b.timestamp_ms).collect();
    assert_eq!(ts, vec![10, 20, 30, 40]);
    assert_eq!(out[1].close, 22.0);
}

#[test]
fn duplicate_within_one_chunk_keeps_the_later_bar() {
    let chunks = vec![BarChunk::from(vec![bar(5, 1.0), bar(5, 9.0)])];
    let out = flatten_bars(&chunks, 0, 10);
    assert_eq!(out, vec![bar(5, 9.0)]);
}

#[test]
fn window_bounds_are_inclusive() {
    let chunks = vec![BarChunk::from(vec![
        bar(-1, 1.0),
        bar(0, 1.0),
        bar(10, 1.0),
        bar(11, 1.0),
    ])];
    let ts: Vec<i64> = flatten_bars(&chunks, 0, 10)
        .iter()
        .map(|b| b.timestamp_ms)
        .collect();
    assert_eq!(ts, vec![0, 10]);
}

#[test]
fn non_finite_bars_are_dropped_without_shadowing_valid_ones() {
    let mut broken = bar(5, 1.0);
    broken.low = f64::NEG_INFINITY;
    let chunks = vec![
        BarChunk::from(vec![bar(5, 2.0)]),
        BarChunk::from(vec![broken]),
    ];
    assert_eq!(flatten_bars(&chunks, 0, 10), vec![bar(5, 2.0)]);
}

#[test]
fn empty_input_yields_nothing() {
    assert!(flatten_bars(&[], 0, 10).is_empty());
    assert!(flatten_bars(&[BarChunk::default()], 0, 10).is_empty());
}
