use super::*;

fn plot() -> Rect {
    Rect::new(70.0, 60.0, 1160.0, 580.0)
}

#[test]
fn price_domain_pads_six_percent() {
    let bars = [
        Bar::new(0, 1.0, 2.0, 0.0, 1.0, 0.0),
        Bar::new(1, 1.0, 1.5, 0.5, 1.0, 0.0),
    ];
    let d = PriceDomain::from_bars(&bars).unwrap();
    assert!((d.lo - -0.12).abs() < 1e-12);
    assert!((d.hi - 2.12).abs() < 1e-12);
}

#[test]
fn collapsed_price_range_uses_relative_pad() {
    let bars = [Bar::new(0, 100.0, 100.0, 100.0, 100.0, 0.0)];
    let d = PriceDomain::from_bars(&bars).unwrap();
    assert!((d.hi - 100.2).abs() < 1e-9);
    assert!((d.lo - 99.8).abs() < 1e-9);

    let zero = [Bar::new(0, 0.0, 0.0, 0.0, 0.0, 0.0)];
    let d = PriceDomain::from_bars(&zero).unwrap();
    assert_eq!(d.hi, 1e-6);
    assert_eq!(d.lo, -1e-6);
    assert!(PriceDomain::from_bars(&[]).is_none());
}

#[test]
fn time_span_has_a_one_ms_floor() {
    let d = TimeDomain { t0: 5, t1: 5 };
    assert_eq!(d.span_ms(), 1.0);
    let d = TimeDomain { t0: 0, t1: 3_600_000 };
    assert_eq!(d.span_ms(), 3_600_000.0);
}

#[test]
fn corners_map_to_plot_edges() {
    let s = ChartScale::new(
        plot(),
        PriceDomain { lo: 10.0, hi: 20.0 },
        TimeDomain {
            t0: 1_700_000_000_000,
            t1: 1_700_000_360_000,
        },
    );
    let top_left = s.point(1_700_000_000_000.0, 20.0);
    let bottom_right = s.point(1_700_000_360_000.0, 10.0);
    assert!((top_left.x - 70.0).abs() < 1e-9 && (top_left.y - 60.0).abs() < 1e-9);
    assert!((bottom_right.x - 1160.0).abs() < 1e-9 && (bottom_right.y - 580.0).abs() < 1e-9);
    assert!((s.y(15.0) - 320.0).abs() < 1e-9);
    assert!((s.x(1_700_000_180_000.0) - 615.0).abs() < 1e-9);
}

#[test]
fn non_finite_inputs_stay_non_finite() {
    let s = ChartScale::new(
        plot(),
        PriceDomain { lo: 0.0, hi: 1.0 },
        TimeDomain { t0: 0, t1: 10 },
    );
    assert!(!s.x(f64::NAN).is_finite());
    assert!(!s.y(f64::INFINITY).is_finite());
}
