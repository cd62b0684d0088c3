use proj4rs::transform::transform;

use crate::definition::SrsDefinition;
use crate::error::ProjectionError;
use crate::tree::Coordinate;

/// Transform a single longitude/latitude position (degrees) between two
/// systems.
///
/// Non-finite values and latitudes outside [-90, 90] are rejected up front;
/// longitudes are not wrapped.
pub fn transform_point(
    from: &SrsDefinition,
    to: &SrsDefinition,
    c: Coordinate,
) -> Result<Coordinate, ProjectionError> {
    let out_of_domain = |reason: String| ProjectionError::OutOfDomain {
        x: c.x,
        y: c.y,
        reason,
    };
    if !c.x.is_finite() || !c.y.is_finite() {
        return Err(out_of_domain("non-finite coordinate".to_string()));
    }
    if !(-90.0..=90.0).contains(&c.y) {
        return Err(out_of_domain("latitude outside [-90, 90]".to_string()));
    }

    // proj4rs works in radians for geographic systems.
    let mut point = (c.x.to_radians(), c.y.to_radians(), 0.0);
    transform(from.proj(), to.proj(), &mut point).map_err(|e| out_of_domain(e.to_string()))?;
    Ok(Coordinate::new(point.0.to_degrees(), point.1.to_degrees()))
}
