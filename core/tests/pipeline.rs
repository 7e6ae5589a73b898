//! Outline → triangulation pipeline tests.
//!
//! Checks the properties downstream simulation relies on: symmetric closed
//! outlines, area-bounded triangles and boundaries that survive refinement.

use rand::SeedableRng;
use rand_pcg::Pcg64;
use tailor_core::glam::DVec3;
use tailor_core::prelude::*;

/// Every input boundary edge must be covered, end to end, by output
/// boundary edges lying on it.
fn assert_boundary_preserved(input: &[DVec3], edges: &[[usize; 2]], mesh: &TriangleMesh) {
    let boundary = mesh.boundary_edges();
    for &[a, b] in edges {
        let (p, q) = (input[a], input[b]);
        let segment = q - p;
        let length = segment.length();
        let covered: f64 = boundary
            .iter()
            .map(|&[u, v]| (mesh.vertices[u], mesh.vertices[v]))
            .filter(|&(u, v)| on_segment(p, segment, u) && on_segment(p, segment, v))
            .map(|(u, v)| u.distance(v))
            .sum();
        assert!(
            (covered - length).abs() < 1e-6,
            "edge {}-{} covered {} of {}",
            a,
            b,
            covered,
            length
        );
    }
}

fn on_segment(start: DVec3, segment: DVec3, point: DVec3) -> bool {
    let rel = point - start;
    let t = rel.dot(segment) / segment.length_squared();
    let distance = (rel - segment * t).length();
    distance < 1e-7 && (-1e-9..=1.0 + 1e-9).contains(&t)
}

fn assert_single_loop(outline: &Outline) {
    let n = outline.len();
    let mut visited = vec![0u32; n];
    let edges = outline.edges();
    assert_eq!(edges.len(), n);
    let mut current = 0;
    for _ in 0..n {
        visited[current] += 1;
        let next = edges.iter().find(|e| e[0] == current).unwrap()[1];
        current = next;
    }
    assert_eq!(current, 0, "loop does not return to the start");
    assert!(visited.iter().all(|&count| count == 1));
}

// =============================================================================
// Default garments
// =============================================================================

#[test]
fn test_reference_shirt_end_to_end() {
    let spec = ShirtSpec {
        bottom_width: 0.65,
        neck_width: 0.32,
        neck_depth: 0.08,
        shoulder_width: 0.62,
        shoulder: ShoulderPlacement::Height(0.95),
        sleeve_width_start: 0.28,
        sleeve_width_end: 0.18,
        sleeve_length: 0.76,
        sleeve_angle: -3.0,
        scale: 0.635,
    };
    let outline = build_shirt_outline(&spec).unwrap();
    assert_eq!(outline.len(), 13);
    assert_single_loop(&outline);

    let armpit = outline.keypoint("armpit_right").unwrap();
    let expected = 0.95 - (0.28_f64.powi(2) - ((0.65_f64 - 0.62).abs() / 2.0).powi(2)).sqrt();
    assert!((armpit.y / spec.scale + 0.5 - expected).abs() < 1e-9);

    let density = 1000.0;
    let mesh = triangulate(outline.vertices(), &outline.edges(), density).unwrap();
    assert!(mesh.max_triangle_area() <= 1.0 / density + 1e-9);
    assert!((mesh.area() - outline.signed_area().abs()).abs() < 1e-6);
    assert_boundary_preserved(outline.vertices(), &outline.edges(), &mesh);
}

#[test]
fn test_every_garment_triangulates() {
    for kind in GarmentKind::ALL {
        let outline = GarmentSpec::default_for(kind).build_outline().unwrap();
        assert_single_loop(&outline);
        let mesh = triangulate(outline.vertices(), &outline.edges(), 300.0).unwrap();
        assert!(mesh.num_faces() > 0, "{} produced no triangles", kind);
        assert!(mesh.max_triangle_area() <= 1.0 / 300.0 + 1e-9);
        assert_boundary_preserved(outline.vertices(), &outline.edges(), &mesh);
    }
}

// =============================================================================
// Sampled garments
// =============================================================================

#[test]
fn test_sampled_garments_meet_area_bound() {
    let density = 100.0;
    for kind in GarmentKind::ALL {
        let mut rng = Pcg64::seed_from_u64(2024);
        for i in 0..300 {
            let spec = GarmentSpec::sample(kind, &mut rng);
            let outline = spec
                .build_outline()
                .unwrap_or_else(|e| panic!("{} #{} did not build: {}", kind, i, e));
            assert_single_loop(&outline);
            assert!(outline.is_simple(), "{} #{} crosses itself: {:?}", kind, i, spec);

            let mesh = triangulate(outline.vertices(), &outline.edges(), density)
                .unwrap_or_else(|e| panic!("{} #{} did not triangulate: {} ({:?})", kind, i, e, spec));
            assert!(mesh.max_triangle_area() <= (1.0 / density) * (1.0 + 1e-9));
            assert!((mesh.area() - outline.signed_area().abs()).abs() < 1e-6);
            assert_boundary_preserved(outline.vertices(), &outline.edges(), &mesh);
        }
    }
}

#[test]
fn test_sampled_garments_area_only() {
    let options = TriangulationOptions {
        minimum_triangle_density: 100.0,
        minimum_angle_degrees: None,
        max_steiner_points: None,
    };
    for kind in GarmentKind::ALL {
        let mut rng = Pcg64::seed_from_u64(99);
        for _ in 0..100 {
            let outline = GarmentSpec::sample(kind, &mut rng).build_outline().unwrap();
            let mesh = triangulate_with(outline.vertices(), &outline.edges(), &options).unwrap();
            assert!(mesh.max_triangle_area() <= 0.01 * (1.0 + 1e-9));
            assert_boundary_preserved(outline.vertices(), &outline.edges(), &mesh);
        }
    }
}

// =============================================================================
// Keypoints and host triples
// =============================================================================

#[test]
fn test_mirrored_keypoints_are_symmetric() {
    let outline = build_shirt_outline(&ShirtSpec::default()).unwrap();
    let pairs = [
        ("bottom_right", "bottom_left"),
        ("armpit_right", "armpit_left"),
        ("sleeve_bottom_right", "sleeve_bottom_left"),
        ("sleeve_top_right", "sleeve_top_left"),
        ("shoulder_right", "shoulder_left"),
        ("neck_right", "neck_left"),
    ];
    for (right, left) in pairs {
        let r = outline.keypoint(right).unwrap();
        let l = outline.keypoint(left).unwrap();
        assert!((r.x + l.x).abs() < 1e-12 && (r.y - l.y).abs() < 1e-12);
    }
}

#[test]
fn test_polygon_mesh_triple_for_host() {
    let outline = build_pants_outline(&PantsSpec::default()).unwrap();
    let triple = outline.to_polygon_mesh();
    assert_eq!(triple.vertices.len(), 7);
    assert_eq!(triple.faces, vec![(0..7).collect::<Vec<_>>()]);

    let mesh = triangulate(&triple.vertices, &triple.edges, 100.0).unwrap();
    let host = mesh.to_polygon_mesh();
    assert!(host.edges.is_empty());
    assert!(host.faces.iter().all(|f| f.len() == 3));
}
