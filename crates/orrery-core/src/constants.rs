/// Exponent of the distance compression curve (scene units = d^0.4)
pub const DISTANCE_EXPONENT: f64 = 0.4;

/// Exponent of the ring/glow radius curve
pub const RADIUS_EXPONENT: f64 = 0.6;

/// Divisor applied after the ring/glow radius curve
pub const RADIUS_DIVISOR: f64 = 1000.0;

/// Divisor applied to sqrt(radius) for sphere meshes
pub const MESH_RADIUS_DIVISOR: f64 = 500.0;

/// Smallest ring/glow radius handed out for degenerate inputs
pub const MIN_NORMALIZED_RADIUS: f64 = 0.01;

/// Ring inner edge, in multiples of the planet's normalized radius
pub const RING_INNER_FACTOR: f64 = 1.2;

/// Ring outer edge, in multiples of the planet's normalized radius
pub const RING_OUTER_FACTOR: f64 = 2.5;

/// Hours in a simulated day
pub const HOURS_PER_DAY: f64 = 24.0;

/// Maximum depth of the orbit tree (star -> planet -> moon)
pub const MAX_ORBIT_DEPTH: usize = 2;
