//! Various unsorted geometrical and logical operators.

pub use self::center::center;
pub use self::interval::Interval;
pub use self::least_squares::{levenberg_marquardt2, FitResult};
pub use self::point_in_poly2d::{point_in_poly2d, point_segment_distance2d};
pub use self::segments_intersection::{polyline_self_intersects2d, segments_intersect2d};
pub use self::vertex_pair::VertexPair;

mod center;
pub mod hashmap;
mod interval;
mod least_squares;
mod point_in_poly2d;
mod segments_intersection;
mod vertex_pair;
