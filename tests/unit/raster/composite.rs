use super::*;

#[test]
fn transparent_source_leaves_destination_untouched() {
    for dst in [[0, 0, 0, 0], [10, 20, 30, 40], [255, 1, 2, 255]] {
        assert_eq!(source_over(dst, [200, 100, 50, 0]), dst);
    }
}

#[test]
fn opaque_source_replaces_destination() {
    assert_eq!(
        source_over([10, 20, 30, 255], [200, 100, 50, 255]),
        [200, 100, 50, 255]
    );
}

#[test]
fn half_alpha_over_opaque_blends_channels() {
    let out = source_over([0, 0, 0, 255], [255, 255, 255, 128]);
    // aS = 128/255, outA = 1, outC = 255 * aS
    assert_eq!(out, [128, 128, 128, 255]);
}

#[test]
fn source_over_transparent_destination_keeps_source_color() {
    let out = source_over([0, 0, 0, 0], [90, 120, 150, 100]);
    assert_eq!(out, [90, 120, 150, 100]);
}

#[test]
fn in_place_skips_zero_alpha_and_checks_lengths() {
    let mut dst = vec![1, 2, 3, 4, 5, 6, 7, 8];
    let layer = vec![255, 255, 255, 0, 255, 0, 0, 255];
    source_over_in_place(&mut dst, &layer).unwrap();
    assert_eq!(dst, vec![1, 2, 3, 4, 255, 0, 0, 255]);

    assert!(source_over_in_place(&mut dst, &[0, 0, 0]).is_err());
}

#[test]
fn premul_over_transparent_dst_copies_src() {
    let mut dst = vec![0, 0, 0, 0];
    premul_over_in_place(&mut dst, &[50, 60, 70, 128]).unwrap();
    assert_eq!(dst, vec![50, 60, 70, 128]);
}

#[test]
fn unpremultiply_restores_straight_color() {
    let mut px = vec![64, 32, 0, 128, 9, 9, 9, 0, 10, 20, 30, 255];
    unpremultiply_in_place(&mut px);
    assert_eq!(&px[0..4], &[128, 64, 0, 128]);
    assert_eq!(&px[4..8], &[0, 0, 0, 0]);
    assert_eq!(&px[8..12], &[10, 20, 30, 255]);
}

#[test]
fn alpha_sum_adds_alpha_bytes_only() {
    assert_eq!(alpha_sum(&[255, 255, 255, 0, 1, 1, 1, 0]), 0);
    assert_eq!(alpha_sum(&[0, 0, 0, 3, 0, 0, 0, 250]), 253);
}
