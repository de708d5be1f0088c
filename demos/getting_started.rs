use spatio_grid::compute::OutlierPartitioner;
use spatio_grid::{
    JoinConfig, LocalEngine, OutlierConfig, Point, PointRecord, Rectangle, RectangleRecord,
    SpatialWindow, codec, detect_outliers, spatial_join,
};
use spatio_grid_types::KeyedEmission;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (set RUST_LOG=debug to see detailed logs)
    env_logger::init();

    println!("=== spatio-grid - Getting Started ===\n");

    let engine = LocalEngine::new(None)?;
    println!("Started a local engine with {} workers\n", engine.workers());

    // === OUTLIER DETECTION ===
    println!("1. Radius Outliers");
    println!("------------------");

    let points = PointRecord::enumerate([
        Point::new(5, 5),
        Point::new(5, 6),
        Point::new(98, 40),
        Point::new(101, 41),
        Point::new(50, 50),
    ]);
    let config = OutlierConfig::new(4.0, 1);

    // Points near a chunk edge are replicated into the neighboring chunk
    let partitioner = OutlierPartitioner::new(&config);
    let mut emissions: Vec<KeyedEmission<PointRecord>> = Vec::new();
    partitioner.partition(&points[2], &mut emissions);
    println!("   {} is emitted to {} chunks", points[2].point, emissions.len());

    let run = detect_outliers(&engine, &points, &config)?;
    println!(
        "   {} outliers with r = {}, k = {}:",
        run.results.len(),
        config.radius,
        config.k
    );
    for outlier in run.into_sorted() {
        println!("     - {}", codec::format_point(&outlier.point));
    }
    println!();

    // === SPATIAL JOIN ===
    println!("2. Point-in-Rectangle Join");
    println!("--------------------------");

    let rects = RectangleRecord::enumerate([
        Rectangle::new(0, 0, 10, 10),
        Rectangle::new(90, 30, 20, 20),
    ]);
    let config = JoinConfig::default().with_window(SpatialWindow::new(0, 0, 200, 200));

    let run = spatial_join(&engine, &points, &rects, &config)?;
    println!("   {} matches inside window {}:", run.results.len(), config.window);
    for m in run.into_sorted() {
        println!("     - {}", codec::format_join_match(&m));
    }
    println!();

    Ok(())
}
