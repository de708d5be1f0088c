//! Grid geometry: which cells a record's footprint overlaps, and the point tests
//! the evaluators and the window filter are built on.
//!
//! Everything here is a pure function of its arguments. Cell enumeration
//! returns each cell at most once, in column-major order (x outer, y inner).

use smallvec::SmallVec;
use spatio_grid_types::cell::floor_to;
use spatio_grid_types::{GridCell, GridDomain, Point, Rectangle, SpatialWindow};

/// Cells overlapped by one record. Most footprints touch at most four.
pub type CellList = SmallVec<[GridCell; 4]>;

/// Cells of side `size` intersecting the bounding box of the circle of
/// `radius` around `center`, clipped to `domain`.
///
/// The bounding box `[x - r, x + r] x [y - r, y + r]` is closed, so a circle
/// whose box ends exactly on a cell edge still reaches that cell.
///
/// # Examples
///
/// ```
/// use spatio_grid::compute::geometry::cells_overlapping_circle;
/// use spatio_grid_types::{GridCell, GridDomain, Point};
///
/// let cells = cells_overlapping_circle(100, Point::new(98, 50), 2.0, &GridDomain::default());
/// assert_eq!(cells.as_slice(), &[GridCell::new(0, 0, 100), GridCell::new(100, 0, 100)]);
/// ```
pub fn cells_overlapping_circle(
    size: i64,
    center: Point,
    radius: f64,
    domain: &GridDomain,
) -> CellList {
    debug_assert!(size > 0, "cell size must be positive");
    if domain.max_coordinate <= 0 {
        return CellList::new();
    }

    // Float to integer casts saturate at the i64 bounds.
    let low_x = (center.x as f64 - radius).floor() as i64;
    let high_x = (center.x as f64 + radius).floor() as i64;
    let low_y = (center.y as f64 - radius).floor() as i64;
    let high_y = (center.y as f64 + radius).floor() as i64;

    let domain_last = domain.max_coordinate - 1;
    cell_block(
        size,
        (low_x.max(0), high_x.min(domain_last)),
        (low_y.max(0), high_y.min(domain_last)),
    )
}

/// Cells of side `size` intersecting the extent `[x, x + width) x [y, y + height)`
/// and holding at least one coordinate of `window`.
///
/// Only points inside the window are ever partitioned, so cells past the
/// window's edges cannot produce a match. A rectangle without area overlaps
/// no cell.
///
/// # Examples
///
/// ```
/// use spatio_grid::compute::geometry::cells_overlapping_rectangle;
/// use spatio_grid_types::{Rectangle, SpatialWindow};
///
/// let window = SpatialWindow::new(0, 0, 20, 20);
/// let cells = cells_overlapping_rectangle(10, &Rectangle::new(0, 0, 20_000, 20_000), &window);
/// assert_eq!(cells.len(), 9);
/// ```
pub fn cells_overlapping_rectangle(
    size: i64,
    rect: &Rectangle,
    window: &SpatialWindow,
) -> CellList {
    debug_assert!(size > 0, "cell size must be positive");
    if rect.is_empty() {
        return CellList::new();
    }

    cell_block(
        size,
        (rect.x.max(window.x1), (rect.max_x() - 1).min(window.x2)),
        (rect.y.max(window.y1), (rect.max_y() - 1).min(window.y2)),
    )
}

/// Every cell holding a coordinate of the closed ranges `xs` and `ys`.
fn cell_block(size: i64, xs: (i64, i64), ys: (i64, i64)) -> CellList {
    let mut cells = CellList::new();
    let columns = cell_corners(size, xs.0, xs.1);
    let rows = cell_corners(size, ys.0, ys.1);
    for x in columns {
        for y in rows.clone() {
            cells.push(GridCell::new(x, y, size));
        }
    }
    cells
}

/// Corners of the cells covering `[low, high]` along one axis.
///
/// Stepping stops at the end of the range or of the i64 range, whichever
/// comes first. Each step is re-aligned so a corner saturated at `i64::MIN`
/// is followed by the first aligned corner.
fn cell_corners(size: i64, low: i64, high: i64) -> impl Iterator<Item = i64> + Clone {
    let last = floor_to(high, size);
    let first = (low <= high).then(|| floor_to(low, size));
    std::iter::successors(first, move |&corner| {
        corner
            .checked_add(size)
            .map(|next| floor_to(next, size))
            .filter(|&next| next <= last)
    })
}

/// The unique cell of side `size` containing `point`.
pub fn home_cell(size: i64, point: Point) -> GridCell {
    GridCell::containing(size, point)
}

/// Whether `cell` is the home cell of `point`.
pub fn is_home_cell(cell: &GridCell, point: Point) -> bool {
    home_cell(cell.size, point) == *cell
}

/// Strict containment: the point lies in the rectangle's interior.
///
/// A point on any edge is not contained.
pub fn contains(rect: &Rectangle, point: Point) -> bool {
    point.x > rect.x && point.x < rect.max_x() && point.y > rect.y && point.y < rect.max_y()
}

/// Inclusive window test for a point.
pub fn within_window(window: &SpatialWindow, point: Point) -> bool {
    point.x >= window.x1 && point.x <= window.x2 && point.y >= window.y1 && point.y <= window.y2
}

/// Inclusive overlap test between a rectangle's closed extent and the window.
pub fn rectangle_intersects_window(window: &SpatialWindow, rect: &Rectangle) -> bool {
    !(rect.max_x() < window.x1
        || rect.x > window.x2
        || rect.max_y() < window.y1
        || rect.y > window.y2)
}

/// Whether `a` and `b` are at most `radius` apart.
pub fn within_radius(a: Point, b: Point, radius: f64) -> bool {
    a.distance(&b) <= radius
}
