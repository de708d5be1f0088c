//! Comma-separated text encoding of records and results.
//!
//! | Record | Encoding |
//! |---|---|
//! | point | `x,y` |
//! | rectangle | `x,y,height,width` (height before width) |
//! | outlier | `x,y` |
//! | join match | `(rx,ry,rh,rw),(px,py)` |
//!
//! Readers assign each record its 0-based line number as [`RecordId`] and skip
//! blank lines. The first malformed line fails the whole read: silently
//! dropping records would make the results incomplete.

use crate::error::{GridError, RecordError, Result};
use spatio_grid_types::{
    Dataset, JoinMatch, Point, PointRecord, RecordId, Rectangle, RectangleRecord,
};
use std::io::{BufRead, Write};

const POINT_FIELDS: [&str; 2] = ["x", "y"];
const RECTANGLE_FIELDS: [&str; 4] = ["x", "y", "height", "width"];

fn parse_fields<const N: usize>(
    line: &str,
    names: [&'static str; N],
) -> std::result::Result<[i64; N], RecordError> {
    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() != N {
        return Err(RecordError::FieldCount {
            expected: N,
            found: fields.len(),
        });
    }

    let mut values = [0i64; N];
    for ((value, field), name) in values.iter_mut().zip(&fields).zip(names) {
        let field = field.trim();
        *value = field.parse().map_err(|_| RecordError::InvalidNumber {
            field: name,
            value: field.to_string(),
        })?;
    }
    Ok(values)
}

/// Decode a point from `x,y`.
///
/// # Examples
///
/// ```
/// use spatio_grid::codec::parse_point;
/// use spatio_grid_types::Point;
///
/// assert_eq!(parse_point("16,402").unwrap(), Point::new(16, 402));
/// assert!(parse_point("16").is_err());
/// ```
pub fn parse_point(line: &str) -> std::result::Result<Point, RecordError> {
    let [x, y] = parse_fields(line, POINT_FIELDS)?;
    Ok(Point::new(x, y))
}

/// Decode a rectangle from `x,y,height,width`.
pub fn parse_rectangle(line: &str) -> std::result::Result<Rectangle, RecordError> {
    let [x, y, height, width] = parse_fields(line, RECTANGLE_FIELDS)?;
    if height < 0 {
        return Err(RecordError::NegativeExtent {
            field: "height",
            value: height,
        });
    }
    if width < 0 {
        return Err(RecordError::NegativeExtent {
            field: "width",
            value: width,
        });
    }
    Ok(Rectangle::new(x, y, width, height))
}

fn read_records<R, T, F>(reader: R, dataset: Dataset, parse: F) -> Result<Vec<(RecordId, T)>>
where
    R: BufRead,
    F: Fn(&str) -> std::result::Result<T, RecordError>,
{
    let mut records = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record = parse(&line).map_err(|source| GridError::MalformedRecord {
            dataset,
            line: index + 1,
            source,
        })?;
        records.push((index as RecordId, record));
    }
    log::debug!("read {} {} records", records.len(), dataset);
    Ok(records)
}

/// Read one point per line.
pub fn read_points<R: BufRead>(reader: R) -> Result<Vec<PointRecord>> {
    Ok(read_records(reader, Dataset::Points, parse_point)?
        .into_iter()
        .map(|(id, point)| PointRecord::new(id, point))
        .collect())
}

/// Read one rectangle per line.
pub fn read_rectangles<R: BufRead>(reader: R) -> Result<Vec<RectangleRecord>> {
    Ok(read_records(reader, Dataset::Rectangles, parse_rectangle)?
        .into_iter()
        .map(|(id, rect)| RectangleRecord::new(id, rect))
        .collect())
}

/// Encode a point as `x,y`.
pub fn format_point(point: &Point) -> String {
    format!("{},{}", point.x, point.y)
}

/// Encode a join match as `(rx,ry,rh,rw),(px,py)`.
///
/// ```
/// use spatio_grid::codec::format_join_match;
/// use spatio_grid_types::{JoinMatch, Point, PointRecord, Rectangle, RectangleRecord};
///
/// let m = JoinMatch::new(
///     RectangleRecord::new(0, Rectangle::new(0, 0, 20, 10)),
///     PointRecord::new(0, Point::new(5, 5)),
/// );
/// assert_eq!(format_join_match(&m), "(0,0,10,20),(5,5)");
/// ```
pub fn format_join_match(m: &JoinMatch) -> String {
    let rect = &m.rect.rect;
    format!(
        "({},{},{},{}),({},{})",
        rect.x, rect.y, rect.height, rect.width, m.point.point.x, m.point.point.y
    )
}

/// Write one outlier per line.
pub fn write_outliers<W: Write>(mut writer: W, outliers: &[PointRecord]) -> Result<()> {
    for record in outliers {
        writeln!(writer, "{}", format_point(&record.point))?;
    }
    writer.flush()?;
    Ok(())
}

/// Write one join match per line.
pub fn write_join_matches<W: Write>(mut writer: W, matches: &[JoinMatch]) -> Result<()> {
    for m in matches {
        writeln!(writer, "{}", format_join_match(m))?;
    }
    writer.flush()?;
    Ok(())
}
