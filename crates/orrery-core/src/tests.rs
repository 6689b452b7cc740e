use crate::catalog::*;
use crate::error::CatalogError;
use crate::scale::*;

fn small_system() -> Vec<CelestialBody> {
    vec![
        CelestialBody::new("Sun", BodyKind::Star, 696340.0).with_day_length(609.12),
        CelestialBody::new("Earth", BodyKind::Planet, 6371.0)
            .orbiting("Sun", 149.6, 365.26)
            .with_day_length(23.93),
        CelestialBody::new("Moon", BodyKind::Moon, 1737.4).orbiting("Earth", 0.384, 27.32),
    ]
}

#[test]
fn test_builtin_catalog_loads() {
    let catalog = Catalog::builtin().unwrap();

    assert_eq!(catalog.star().name, "Sun");
    assert!(catalog.len() >= 10);
    assert_eq!(catalog.depth_of("Sun"), Some(0));
    assert_eq!(catalog.depth_of("Earth"), Some(1));
    assert_eq!(catalog.depth_of("Moon"), Some(2));
    assert_eq!(catalog.get("Venus").unwrap().day_length, -5832.5);
}

#[test]
fn test_builtin_ring_is_not_traversable() {
    let catalog = Catalog::builtin().unwrap();

    assert!(!catalog.is_traversable("Saturn Rings"));
    assert!(catalog.is_traversable("Saturn"));
    assert!(catalog.is_traversable("Sun"));
    assert!(!catalog.is_traversable("Phobos"), "flagged non-traversable in data");
    assert!(!catalog.is_traversable("Vulcan"));
}

#[test]
fn test_original_field_aliases() {
    // Key names used by the original dataset
    let json = r#"[
        { "name": "Sun", "type": "star", "radius": 696340, "distance": 0, "period": 0, "daylength": 609.12, "tilt": 7.25 },
        { "name": "Earth", "type": "planet", "radius": 6371, "distance": 149.6, "period": 365.26,
          "daylength": 23.93, "tilt": 23.44, "orbits": "Sun", "offset": 90, "name_cn": "地球" }
    ]"#;
    let catalog = Catalog::from_json_str(json).unwrap();
    let earth = catalog.get("Earth").unwrap();

    assert_eq!(earth.kind, BodyKind::Planet);
    assert_eq!(earth.axial_tilt, 23.44);
    assert_eq!(earth.phase_offset, 90.0);
    assert_eq!(earth.label(), "地球");
    assert!(earth.traversable);
    assert_eq!(catalog.star().revolution_period(), None);
}

#[test]
fn test_missing_star_is_fatal() {
    let bodies = small_system().into_iter().skip(1).collect();
    assert!(matches!(Catalog::new(bodies), Err(CatalogError::MissingStar)));
}

#[test]
fn test_second_star_rejected() {
    let mut bodies = small_system();
    bodies.push(CelestialBody::new("Nemesis", BodyKind::Star, 1000.0));
    assert!(matches!(Catalog::new(bodies), Err(CatalogError::MultipleStars(..))));
}

#[test]
fn test_duplicate_name_rejected() {
    let mut bodies = small_system();
    bodies.push(CelestialBody::new("Earth", BodyKind::Planet, 1.0).orbiting("Sun", 1.0, 1.0));
    assert!(matches!(Catalog::new(bodies), Err(CatalogError::DuplicateName(n)) if n == "Earth"));
}

#[test]
fn test_orbit_cycle_rejected() {
    let bodies = vec![
        CelestialBody::new("Sun", BodyKind::Star, 1.0),
        CelestialBody::new("A", BodyKind::Planet, 1.0).orbiting("B", 1.0, 1.0),
        CelestialBody::new("B", BodyKind::Moon, 1.0).orbiting("A", 1.0, 1.0),
    ];
    assert!(matches!(Catalog::new(bodies), Err(CatalogError::Cycle(_))));
}

#[test]
fn test_depth_beyond_moons_rejected() {
    let mut bodies = small_system();
    bodies.push(CelestialBody::new("Moonmoon", BodyKind::Moon, 1.0).orbiting("Moon", 0.01, 1.0));
    assert!(matches!(Catalog::new(bodies), Err(CatalogError::TooDeep(n)) if n == "Moonmoon"));
}

#[test]
fn test_unknown_parent_is_not_a_load_error() {
    let mut bodies = small_system();
    bodies.push(CelestialBody::new("Charon", BodyKind::Moon, 606.0).orbiting("Pluto", 0.0196, 6.387));

    let catalog = Catalog::new(bodies).unwrap();
    let charon = catalog.get("Charon").unwrap();
    assert!(catalog.parent_of(charon).is_none());
    assert_eq!(catalog.depth_of("Charon"), Some(1));
}

#[test]
fn test_non_finite_field_rejected() {
    let mut bodies = small_system();
    bodies[1].axial_tilt = f64::NAN;
    assert!(matches!(
        Catalog::new(bodies),
        Err(CatalogError::InvalidField { field: "axialTilt", .. })
    ));
}

#[test]
fn test_children_in_catalog_order() {
    let catalog = Catalog::builtin().unwrap();
    let names: Vec<_> = catalog.children_of("Jupiter").map(|b| b.name.as_str()).collect();
    assert_eq!(names, ["Io", "Europa", "Ganymede", "Callisto"]);
}

#[test]
fn test_json_roundtrip_keeps_catalog() {
    let catalog = Catalog::builtin().unwrap();
    let json = catalog.to_json_pretty().unwrap();
    let back = Catalog::from_json_str(&json).unwrap();
    assert_eq!(catalog.bodies(), back.bodies());
}

#[test]
fn test_scale_curves() {
    assert_eq!(normalized_distance(0.0), 0.0);
    assert_eq!(normalized_distance(-5.0), 0.0);
    assert!((normalized_distance(32.0) - 4.0).abs() < 1e-12); // 32^0.4 = 4
    assert!((visual_radius(250_000.0) - 1.0).abs() < 1e-12);
    assert_eq!(normalized_radius(0.0), 0.01);

    let (inner, outer) = ring_extents(58232.0);
    assert!(inner < outer);
    assert!((outer / inner - 2.5 / 1.2).abs() < 1e-12);
}

#[test]
fn test_scale_curves_preserve_order() {
    let distances = [0.01, 0.384, 57.9, 149.6, 778.5, 4495.1];
    for pair in distances.windows(2) {
        assert!(normalized_distance(pair[0]) < normalized_distance(pair[1]));
        assert!(visual_radius(pair[0]) < visual_radius(pair[1]));
        assert!(normalized_radius(pair[0]) < normalized_radius(pair[1]));
    }
}
