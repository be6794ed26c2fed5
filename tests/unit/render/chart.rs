use super::*;

fn small() -> ChartSettings {
    ChartSettings {
        width: 64,
        height: 48,
        margin_px: 4.0,
        y_range: Some((-1.0, 1.0)),
        ..ChartSettings::default()
    }
}

fn flat(y: f64) -> Vec<Sample> {
    (0..=10).map(|i| Sample::new(i as f64 / 10.0, y)).collect()
}

#[test]
fn pixel_mapping_puts_the_data_box_inside_the_margins() {
    let bounds = ChartBounds {
        x0: 0.0,
        x1: 1.0,
        y0: -1.0,
        y1: 1.0,
    };
    let t = bounds.to_pixels(&small());
    let bl = t * Point::new(0.0, -1.0);
    let tr = t * Point::new(1.0, 1.0);
    assert!((bl.x - 4.0).abs() < 1e-12 && (bl.y - 44.0).abs() < 1e-12);
    assert!((tr.x - 60.0).abs() < 1e-12 && (tr.y - 4.0).abs() < 1e-12);
}

#[test]
fn bounds_pad_data_and_honour_fixed_ranges() {
    let curves = vec![Curve::new(
        vec![Sample::new(0.0, 0.0), Sample::new(2.0, 10.0)],
        CURVE_COLORS[0],
    )];
    let b = ChartBounds::from_curves(&curves, None).unwrap();
    assert_eq!((b.x0, b.x1), (0.0, 2.0));
    assert!((b.y0 + 0.5).abs() < 1e-12 && (b.y1 - 10.5).abs() < 1e-12);

    let b = ChartBounds::from_curves(&curves, Some((-3.0, 3.0))).unwrap();
    assert_eq!((b.y0, b.y1), (-3.0, 3.0));

    let same_x = vec![Curve::new(
        vec![Sample::new(1.0, 0.0), Sample::new(1.0, 1.0)],
        CURVE_COLORS[0],
    )];
    assert!(ChartBounds::from_curves(&same_x, None).is_err());
}

#[test]
fn non_finite_samples_break_the_polyline() {
    let samples = vec![
        Sample::new(0.0, 0.0),
        Sample::new(1.0, 1.0),
        Sample::new(2.0, f64::NAN),
        Sample::new(3.0, 1.0),
        Sample::new(4.0, 0.0),
    ];
    let path = curve_path(&samples, Affine::IDENTITY);
    let moves = path
        .elements()
        .iter()
        .filter(|el| matches!(el, kurbo::PathEl::MoveTo(_)))
        .count();
    assert_eq!(moves, 2);
}

#[test]
fn renders_background_and_curve() {
    let frame = render_chart(&[Curve::new(flat(0.5), CURVE_COLORS[0])], &small()).unwrap();
    assert_eq!((frame.width, frame.height), (64, 48));
    assert_eq!(frame.data.len(), 64 * 48 * 4);
    assert_eq!(frame.pixel(0, 0), Some([18, 20, 28, 255]));
    assert_eq!(frame.pixel(64, 0), None);

    // y = 0.5 maps to row 14; a 2px stroke covers rows 13 and 14.
    let px = frame.pixel(32, 13).unwrap();
    assert!(px[0] > 150 && px[0] > px[1] && px[0] > px[2], "{px:?}");
    assert_eq!(px[3], 255);
}

#[test]
fn invalid_inputs_are_rejected() {
    assert!(render_chart(&[], &small()).is_err());
    assert!(
        render_chart(
            &[Curve::new(vec![Sample::new(0.0, 0.0)], CURVE_COLORS[0])],
            &small()
        )
        .is_err()
    );

    let zero = ChartSettings {
        width: 0,
        ..small()
    };
    assert!(render_chart(&[Curve::new(flat(0.0), CURVE_COLORS[0])], &zero).is_err());

    let huge = ChartSettings {
        width: 70_000,
        ..small()
    };
    assert!(huge.validate().is_err());

    let bad_range = ChartSettings {
        y_range: Some((1.0, 1.0)),
        ..small()
    };
    assert!(bad_range.validate().is_err());

    let fat_margin = ChartSettings {
        margin_px: 30.0,
        ..small()
    };
    assert!(fat_margin.validate().is_err());
}

#[test]
fn png_round_trip_keeps_dimensions() {
    let frame = render_chart(&[Curve::new(flat(-0.25), CURVE_COLORS[1])], &small()).unwrap();
    let path = std::path::PathBuf::from("target")
        .join("chart_unit")
        .join("flat.png");
    let _ = std::fs::remove_file(&path);
    write_png(&frame, &path).unwrap();

    let img = image::open(&path).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (64, 48));
    assert_eq!(img.get_pixel(0, 0).0, [18, 20, 28, 255]);
}

#[test]
fn unwritable_output_dir_is_an_io_error() {
    let dir = std::path::PathBuf::from("target").join("chart_unit");
    std::fs::create_dir_all(&dir).unwrap();
    let blocker = dir.join("not_a_dir");
    std::fs::write(&blocker, b"x").unwrap();

    let frame = render_chart(&[Curve::new(flat(0.0), CURVE_COLORS[0])], &small()).unwrap();
    let err = write_png(&frame, &blocker.join("out.png")).unwrap_err();
    assert!(matches!(err, FourierError::Other(_)), "{err:?}");
    assert!(err.to_string().contains("create output dir"));
}
