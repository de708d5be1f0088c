use spatio_grid::compute::geometry::{contains, within_window};
use spatio_grid::{JoinConfig, LocalEngine, SequentialEngine, codec, spatial_join};
use spatio_grid_types::{JoinMatch, Point, PointRecord, Rectangle, RectangleRecord, SpatialWindow};
use std::io::Cursor;

fn scatter(i: u64, salt: u64, span: u64) -> i64 {
    (i.wrapping_mul(2_654_435_761).wrapping_add(salt * 40_503) % span) as i64
}

fn sample_points(count: u64, span: u64) -> Vec<PointRecord> {
    (0..count)
        .map(|i| PointRecord::new(i, Point::new(scatter(i, 1, span), scatter(i, 2, span))))
        .collect()
}

fn sample_rectangles(count: u64, span: u64) -> Vec<RectangleRecord> {
    (0..count)
        .map(|i| {
            let rect = Rectangle::new(
                scatter(i, 3, span) - 20,
                scatter(i, 4, span) - 20,
                scatter(i, 5, 60),
                scatter(i, 6, 45),
            );
            RectangleRecord::new(i, rect)
        })
        .collect()
}

fn brute_force(
    points: &[PointRecord],
    rects: &[RectangleRecord],
    window: &SpatialWindow,
) -> Vec<JoinMatch> {
    let mut matches: Vec<JoinMatch> = rects
        .iter()
        .flat_map(|rect| {
            points
                .iter()
                .filter(|p| within_window(window, p.point) && contains(&rect.rect, p.point))
                .map(|p| JoinMatch::new(*rect, *p))
        })
        .collect();
    matches.sort();
    matches
}

#[test]
fn test_point_inside_rectangle() {
    let points = PointRecord::enumerate([Point::new(5, 5)]);
    let rects = RectangleRecord::enumerate([Rectangle::new(0, 0, 10, 10)]);
    let config = JoinConfig::default().with_window(SpatialWindow::new(0, 0, 20, 20));

    let output = spatial_join(&SequentialEngine, &points, &rects, &config).unwrap();
    assert_eq!(output.results, vec![JoinMatch::new(rects[0], points[0])]);
}

#[test]
fn test_boundary_point_is_excluded() {
    let points = PointRecord::enumerate([Point::new(0, 0), Point::new(10, 5), Point::new(5, 10)]);
    let rects = RectangleRecord::enumerate([Rectangle::new(0, 0, 10, 10)]);
    let config = JoinConfig::default().with_window(SpatialWindow::new(0, 0, 20, 20));

    let output = spatial_join(&SequentialEngine, &points, &rects, &config).unwrap();
    assert!(output.results.is_empty());
}

#[test]
fn test_empty_points() {
    let rects = RectangleRecord::enumerate([Rectangle::new(0, 0, 10, 10)]);
    let engine = LocalEngine::new(Some(2)).unwrap();
    let output = spatial_join(&engine, &[], &rects, &JoinConfig::default()).unwrap();
    assert!(output.results.is_empty());
}

#[test]
fn test_default_window_excludes_origin_row() {
    let points = PointRecord::enumerate([Point::new(5, 0), Point::new(5, 5)]);
    let rects = RectangleRecord::enumerate([Rectangle::new(-10, -10, 30, 30)]);

    let output = spatial_join(&SequentialEngine, &points, &rects, &JoinConfig::default()).unwrap();
    let matched: Vec<Point> = output.results.iter().map(|m| m.point.point).collect();
    assert_eq!(matched, vec![Point::new(5, 5)]);
}

#[test]
fn test_large_rectangle_spanning_many_cells() {
    let points = PointRecord::enumerate([Point::new(13, 17), Point::new(480, 95), Point::new(501, 20)]);
    let rects = RectangleRecord::enumerate([Rectangle::new(3, 3, 497, 97)]);

    let output = spatial_join(&SequentialEngine, &points, &rects, &JoinConfig::default()).unwrap();
    assert_eq!(output.results.len(), 2);
    assert!(output.stats.max_group_size >= 2);
}

#[test]
fn test_matches_brute_force() {
    let points = sample_points(4_000, 1_000);
    let rects = sample_rectangles(800, 1_000);
    let engine = LocalEngine::new(Some(4)).unwrap();

    for (window, cell_size) in [
        (SpatialWindow::default(), 10),
        (SpatialWindow::new(0, 0, 500, 500), 10),
        (SpatialWindow::new(100, 250, 900, 600), 7),
        (SpatialWindow::new(-50, -50, 2_000, 2_000), 64),
    ] {
        let config = JoinConfig::default()
            .with_window(window)
            .with_cell_size(cell_size);
        let expected = brute_force(&points, &rects, &window);
        let actual = spatial_join(&engine, &points, &rects, &config)
            .unwrap()
            .into_sorted();
        assert_eq!(actual, expected, "window {window}, cell size {cell_size}");
    }
}

#[test]
fn test_parallel_matches_sequential() {
    let points = sample_points(3_000, 800);
    let rects = sample_rectangles(500, 800);
    let config = JoinConfig::default();

    let sequential = spatial_join(&SequentialEngine, &points, &rects, &config).unwrap();
    let engine = LocalEngine::new(Some(8)).unwrap();
    let parallel = spatial_join(&engine, &points, &rects, &config).unwrap();

    assert_eq!(parallel.stats, sequential.stats);
    assert_eq!(parallel.into_sorted(), sequential.into_sorted());
}

#[test]
fn test_text_pipeline() {
    let points = codec::read_points(Cursor::new("5,5\n0,0\n7,2\n")).unwrap();
    let rects = codec::read_rectangles(Cursor::new("0,0,10,10\n1,1,3,8\n")).unwrap();
    let config = JoinConfig::default().with_window(SpatialWindow::new(0, 0, 20, 20));

    let matches = spatial_join(&SequentialEngine, &points, &rects, &config)
        .unwrap()
        .into_sorted();
    let mut out = Vec::new();
    codec::write_join_matches(&mut out, &matches).unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "(0,0,10,10),(5,5)\n(0,0,10,10),(7,2)\n(1,1,3,8),(7,2)\n"
    );
}

#[test]
fn test_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("points.txt");
    std::fs::write(&path, "5,5\n\n-3,12\n").unwrap();

    let file = std::io::BufReader::new(std::fs::File::open(&path).unwrap());
    let points = codec::read_points(file).unwrap();
    assert_eq!(
        points,
        vec![
            PointRecord::new(0, Point::new(5, 5)),
            PointRecord::new(2, Point::new(-3, 12)),
        ]
    );
}

#[test]
fn test_unbounded_window_with_extreme_coordinates() {
    let window = SpatialWindow::new(i64::MIN, i64::MIN, i64::MAX, i64::MAX);
    let points = PointRecord::enumerate([
        Point::new(i64::MIN + 1, i64::MIN + 1),
        Point::new(i64::MAX - 1, 0),
        Point::new(5, 5),
    ]);
    let rects = RectangleRecord::enumerate([
        Rectangle::new(i64::MIN, i64::MIN, 30, 30),
        Rectangle::new(i64::MAX - 20, -5, 20, 10),
        Rectangle::new(0, 0, 10, 10),
    ]);
    let config = JoinConfig::default().with_window(window);

    let expected = brute_force(&points, &rects, &window);
    assert_eq!(expected.len(), 3);
    let actual = spatial_join(&SequentialEngine, &points, &rects, &config)
        .unwrap()
        .into_sorted();
    assert_eq!(actual, expected);
}

#[test]
fn test_huge_rectangle_is_bounded_by_window() {
    let points = PointRecord::enumerate([Point::new(5, 5), Point::new(15, 12)]);
    let rects = RectangleRecord::enumerate([Rectangle::new(0, 0, 20_000, 20_000)]);
    let config = JoinConfig::default().with_window(SpatialWindow::new(0, 0, 20, 20));

    let output = spatial_join(&SequentialEngine, &points, &rects, &config).unwrap();
    assert_eq!(output.results.len(), 2);
    assert_eq!(output.stats.emissions, 2 + 9);
}
