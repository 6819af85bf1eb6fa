//! Property tests for the layout engines

use chart_geometry::*;
use proptest::prelude::*;
use std::time::Duration;

fn pie_slices(values: &[f64]) -> Vec<PieSlice> {
    values
        .iter()
        .map(|&v| PieSlice::new("slice", v, Color::GRAY))
        .collect()
}

fn labels(centers: &[(f64, usize)]) -> Vec<LegendLabel> {
    centers
        .iter()
        .enumerate()
        .map(|(i, &(x, len))| {
            let mut label = LegendLabel::new("x".repeat(len));
            label.bounds = Rect::new(x + i as f64 * 30.0, 0.0, 30.0, 20.0);
            label
        })
        .collect()
}

fn line(values: &[f64]) -> LineSeries {
    values.iter().fold(LineSeries::new("series", Color::BLACK), |s, &v| {
        s.with_point(LinePoint::new("p", v))
    })
}

proptest! {
    #[test]
    fn prop_pie_slices_cover_full_circle(values in prop::collection::vec(0.01f64..1000.0, 1..20)) {
        let mut slices = pie_slices(&values);
        let total: f64 = values.iter().sum();
        layout_pie(&mut slices, total).unwrap();

        prop_assert_eq!(slices[0].start_angle, 0);
        prop_assert_eq!(slices.last().unwrap().end_angle, 360);
        for pair in slices.windows(2) {
            prop_assert_eq!(pair[0].end_angle, pair[1].start_angle);
            prop_assert!(pair[0].sweep() >= 0);
        }
    }

    #[test]
    fn prop_pie_reveal_scales_sweep(values in prop::collection::vec(0.01f64..100.0, 1..10), f in 0.0f64..=1.0) {
        let mut slices = pie_slices(&values);
        let total: f64 = values.iter().sum();
        layout_pie(&mut slices, total).unwrap();

        for slice in &slices {
            for clockwise in [true, false] {
                let (start, sweep) = reveal_angles(slice, f, clockwise);
                prop_assert!((sweep - slice.sweep() as f64 * f).abs() < 1e-9);
                prop_assert!((0.0..=360.0).contains(&start));
            }
        }
    }

    #[test]
    fn prop_fixed_bars_fill_available_space(count in 1usize..30, width in 1.0f64..40.0, available in 100.0f64..2000.0) {
        let config = BarConfig {
            fixed_bar_width: true,
            bar_width: width,
            ..Default::default()
        };
        let dims = calculate_bar_dimensions(&config, count, available);

        prop_assert_eq!(dims.bar_size, width);
        prop_assert!((dims.stride() * count as f64 - available).abs() < 1e-6);
    }

    #[test]
    fn prop_scrolling_bars_extend_content(count in 1usize..30, visible in 1usize..10, available in 100.0f64..2000.0) {
        let config = BarConfig {
            fixed_bar_width: true,
            bar_width: 8.0,
            scroll_enabled: true,
            visible_bars: visible,
            ..Default::default()
        };
        let dims = calculate_bar_dimensions(&config, count, available);
        let shown = count.min(visible) as f64;

        prop_assert!((dims.stride() * shown - available).abs() < 1e-6);
        prop_assert!((dims.content_size - dims.stride() * count as f64).abs() < 1e-6);
    }

    #[test]
    fn prop_legend_layout_is_idempotent_and_disjoint(
        entries in prop::collection::vec((0.0f64..40.0, 1usize..12), 1..15),
    ) {
        let mut legend = labels(&entries);
        let measurer = EstimatedTextMeasurer::new(10.0);
        let end = 30.0 * entries.len() as f64 + 40.0;

        layout_legend(&mut legend, 0.0, end, &measurer, 4.0);
        let first = legend.clone();
        layout_legend(&mut legend, 0.0, end, &measurer, 4.0);
        prop_assert_eq!(&first, &legend);

        let shown: Vec<&LegendLabel> = legend.iter().filter(|l| l.show_label).collect();
        prop_assert!(!shown.is_empty());
        for pair in shown.windows(2) {
            prop_assert!(pair[1].label_x >= pair[0].text_bounds.right() - 1e-9);
        }
    }

    #[test]
    fn prop_line_points_stay_inside_graph(
        values in prop::collection::vec(-500.0f64..500.0, 1..25),
        height in 50.0f64..800.0,
    ) {
        let mut series = vec![line(&values)];
        let scale = layout_series(&mut series, 300.0, height, Rect::default(), &LineConfig::default()).unwrap();

        prop_assert_eq!(scale.min_value, 0.0);
        prop_assert_eq!(scale.has_negative_values, values.iter().any(|&v| v < 0.0));
        for point in &series[0].points {
            prop_assert!(point.coordinates.y >= -1e-6);
            prop_assert!(point.coordinates.y <= height + 1e-6);
            prop_assert!(point.coordinates.x <= 300.0 + 1e-6);
        }
        if scale.has_negative_values {
            let lowest = values.iter().cloned().fold(f64::INFINITY, f64::min);
            prop_assert!((scale.y_for(lowest) - height).abs() < 1e-6);
        }
    }

    #[test]
    fn prop_cubic_path_ends_on_points(values in prop::collection::vec(0.0f64..100.0, 2..20), smoothness in 0.0f64..=1.0) {
        let points: Vec<Point> = values
            .iter()
            .enumerate()
            .map(|(i, &v)| Point::new(i as f64 * 10.0, v))
            .collect();
        let path = cubic_path(&points, points.len() as f64 * 10.0, smoothness);

        prop_assert_eq!(path.start, points[0]);
        prop_assert_eq!(path.end(), *points.last().unwrap());
        prop_assert_eq!(path.segments.len(), points.len() - 1);
    }

    #[test]
    fn prop_reveal_is_monotonic(mut times in prop::collection::vec(0u64..3000, 1..30)) {
        times.sort_unstable();
        let mut animation = RevealAnimation::new(Duration::from_millis(2000), Easing::AccelerateDecelerate);
        let token = animation.start(Duration::ZERO);

        let mut last = 0.0;
        for t in times {
            if let Some(frame) = animation.step(token, Duration::from_millis(t)) {
                prop_assert!(frame.value >= last);
                prop_assert!((0.0..=1.0).contains(&frame.value));
                last = frame.value;
            }
        }
        let end = animation.step(token, Duration::from_millis(5000));
        if let Some(frame) = end {
            prop_assert_eq!(frame.value, 1.0);
        } else {
            prop_assert_eq!(last, 1.0);
        }
    }

    #[test]
    fn prop_viewport_stays_inside_content(
        content_w in 1.0f64..3000.0,
        view_w in 1.0f64..1000.0,
        deltas in prop::collection::vec(-2000.0f64..2000.0, 1..20),
    ) {
        let mut viewport = ScrollViewport::new(Size::new(content_w, 100.0), Size::new(view_w, 100.0));
        for dx in deltas {
            viewport.scroll_by(dx, 0.0);
            let view = viewport.viewport();
            prop_assert!(view.x >= 0.0);
            prop_assert!(view.x <= (content_w - view_w).max(0.0) + 1e-9);
        }
    }
}
