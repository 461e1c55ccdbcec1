use ndreco_algorithms::{ClusterConfig, SimpleClustering};
use ndreco_core::{Hit, Point3};

fn hit(id: i64, x: f32, y: f32, z: f32) -> Hit {
    Hit::new(id, Point3::new(x, y, z), 1.0, 0)
}

fn ids(clusters: &[ndreco_core::Cluster]) -> Vec<Vec<i64>> {
    clusters
        .iter()
        .map(|c| c.hits.iter().map(|h| h.id).collect())
        .collect()
}

/// A dense blob plus a chain plus isolated hits, fixed layout.
fn sample_event() -> Vec<Hit> {
    let mut hits = Vec::new();
    // Blob around the origin, spacing 0.2
    for i in 0..5 {
        for j in 0..4 {
            hits.push(hit(
                (i * 4 + j) as i64,
                0.2 * i as f32,
                0.1 * j as f32,
                0.2 * j as f32,
            ));
        }
    }
    // A chain along z, consecutive spacing 0.4 (under the 0.5 window)
    for k in 0..6 {
        hits.push(hit(100 + k as i64, 30.0, 0.0, 0.4 * k as f32));
    }
    // Two isolated hits
    hits.push(hit(200, -50.0, 0.0, 0.0));
    hits.push(hit(201, 50.0, 12.0, -7.0));
    hits
}

#[test]
fn test_blob_chain_and_singletons() {
    let clusters = SimpleClustering::default().cluster(&sample_event());
    let mut sizes: Vec<usize> = clusters.iter().map(ndreco_core::Cluster::len).collect();
    sizes.sort_unstable();
    assert_eq!(sizes, vec![1, 1, 6, 20]);
}

#[test]
fn test_coverage_and_disjointness() {
    let hits = sample_event();
    let clusters = SimpleClustering::default().cluster(&hits);

    let mut seen: Vec<i64> = clusters
        .iter()
        .flat_map(|c| c.hits.iter().map(|h| h.id))
        .collect();
    seen.sort_unstable();

    let mut expected: Vec<i64> = hits.iter().map(|h| h.id).collect();
    expected.sort_unstable();

    // Every hit appears in exactly one cluster.
    assert_eq!(seen, expected);
}

#[test]
fn test_transitive_chain_is_one_cluster() {
    // Endpoints are 2.0 apart, far beyond the window, but every
    // consecutive pair is connected.
    let hits: Vec<Hit> = (0..6).map(|k| hit(k, 0.0, 0.0, 0.4 * k as f32)).collect();
    let clusters = SimpleClustering::default().cluster(&hits);
    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0].len(), 6);
}

#[test]
fn test_unchained_far_pair_stays_separate() {
    let hits = vec![hit(0, 0.0, 0.0, 0.0), hit(1, 0.0, 0.0, 2.0)];
    let clusters = SimpleClustering::default().cluster(&hits);
    assert_eq!(clusters.len(), 2);
}

#[test]
fn test_deterministic_output() {
    let hits = sample_event();
    let engine = SimpleClustering::default();
    let first = engine.cluster(&hits);
    let second = engine.cluster(&hits);
    // Same membership, same cluster order, same in-cluster hit order.
    assert_eq!(ids(&first), ids(&second));
}

#[test]
fn test_determinism_with_coincident_positions() {
    // Hits at identical positions are ordered by id.
    let hits = vec![
        hit(3, 1.0, 1.0, 1.0),
        hit(1, 1.0, 1.0, 1.0),
        hit(2, 1.0, 1.0, 1.0),
    ];
    let clusters = SimpleClustering::default().cluster(&hits);
    assert_eq!(clusters.len(), 1);
    assert_eq!(ids(&clusters), vec![vec![1, 2, 3]]);
}

#[test]
fn test_window_override() {
    let hits = vec![hit(0, 0.0, 0.0, 0.0), hit(1, 0.0, 0.0, 0.9)];
    let clusters = SimpleClustering::new(ClusterConfig::with_window(1.0)).cluster(&hits);
    assert_eq!(clusters.len(), 1);
}

#[test]
fn test_cross_projection_neighbours() {
    // Hits identical in the (x, z) projection but far apart in y must
    // not be merged: the 2D index only pre-filters, the 3D distance
    // decides.
    let hits = vec![hit(0, 0.0, 0.0, 0.0), hit(1, 0.0, 25.0, 0.0)];
    let clusters = SimpleClustering::default().cluster(&hits);
    assert_eq!(clusters.len(), 2);
}
