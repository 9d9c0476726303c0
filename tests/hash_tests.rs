use convmat::{Matrix, matrix};

#[test]
fn equal_matrices_hash_identically() {
    let a = matrix![[0.5, 1.0], [2.0, 3.25]];
    let b = matrix![[0.5, 1.0], [2.0, 3.25]];
    assert_eq!(a.hash(), b.hash());
    assert_eq!(a.hash().len(), 64); // hex-rendered 256-bit digest
}

#[test]
fn a_single_cell_change_changes_the_hash() {
    let a = matrix![[0.5, 1.0], [2.0, 3.25]];
    let mut b = a.clone();
    b.set(2, 1, 2.0000001).unwrap();
    assert_ne!(a.hash(), b.hash());
}

#[test]
fn hash_conv_geometry_matches_conv() {
    let mut m = Matrix::zeros(5, 4);
    m.fill_random(0.0, 1.0);
    let h = m.hash_conv(3, 3).unwrap();
    assert_eq!(h.rows(), 5 - 3 + 1);
    assert_eq!(h.cols(), 4 - 3 + 1);
}

#[test]
fn equal_windows_produce_equal_tokens() {
    // constant content: every window digests to the same token
    let mut m = Matrix::zeros(4, 4);
    m.fill_ones();
    let h = m.hash_conv(3, 3).unwrap();
    let first = h.get(1, 1).unwrap().to_owned();
    for i in 1..=h.rows() {
        for j in 1..=h.cols() {
            assert_eq!(h.get(i, j).unwrap(), first);
        }
    }
}

#[test]
fn hash_cloud_of_an_undersized_matrix_is_empty() {
    let m = matrix![[1.0, 2.0], [3.0, 4.0]];
    assert!(m.hash_cloud(3, 3).is_empty());
    assert!(m.hash_cloud_default().is_empty());
    assert!(Matrix::zeros(0, 0).hash_cloud(3, 3).is_empty());
}

#[test]
fn hash_cloud_records_first_seen_depths() {
    // 5x5 constant input, 3x3 window:
    //   depth 1: 3x3 token matrix, one distinct token
    //   depth 2: 1x1 token matrix, one distinct token
    let mut m = Matrix::zeros(5, 5);
    m.fill_ones();
    let cloud = m.hash_cloud(3, 3);
    assert_eq!(cloud.len(), 2);
    let mut depths: Vec<usize> = cloud.values().copied().collect();
    depths.sort_unstable();
    assert_eq!(depths, vec![1, 2]);

    // the depth-1 token is the digest of the constant 3x3 window
    let window = m.copy_region(1, 1, 3, 3).unwrap();
    assert_eq!(cloud.get(&window.hash()), Some(&1));
}

#[test]
fn hash_cloud_stops_once_a_dimension_drops_below_the_window() {
    // 4x7 with a 3x3 window: depth 1 gives 2x5, which is too short to go on
    let mut m = Matrix::zeros(4, 7);
    m.fill_random(0.0, 1.0);
    let cloud = m.hash_cloud(3, 3);
    assert!(!cloud.is_empty());
    assert!(cloud.values().all(|&d| d == 1));
}

#[test]
fn zero_sized_window_yields_an_empty_cloud() {
    let m = matrix![[1.0, 2.0], [3.0, 4.0]];
    assert!(m.hash_cloud(0, 3).is_empty());
    assert!(m.hash_cloud(3, 0).is_empty());
}

#[test]
fn token_matrices_can_be_hash_convolved_again() {
    let mut m = Matrix::zeros(5, 5);
    m.fill_random(0.0, 1.0);
    let h1 = m.hash_conv(3, 3).unwrap();
    let h2 = h1.hash_conv(3, 3).unwrap();
    assert_eq!(h2.rows(), 1);
    assert_eq!(h2.cols(), 1);
    assert!(h1.hash_conv(4, 1).is_err());
}
