//! Triplet assembly with duplicates against a dense reference, and CG on
//! randomly assembled SPD systems.

use approx::assert_relative_eq;
use math_heat_solvers::{CgConfig, CsrMatrix, SparseMatrix, TripletMatrix, cg, vecops};
use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_vector(rng: &mut StdRng, n: usize) -> Array1<f64> {
    Array1::from_iter((0..n).map(|_| rng.random_range(-1.0..1.0)))
}

#[test]
fn test_duplicates_match_dense_reference() {
    let mut rng = StdRng::seed_from_u64(42);
    let n = 12;

    for _ in 0..10 {
        let mut triplets = TripletMatrix::new(n);
        let mut dense = Array2::<f64>::zeros((n, n));

        // Few distinct coordinates, many entries: duplicates are guaranteed
        for _ in 0..80 {
            let row = rng.random_range(0..n);
            let col = rng.random_range(0..4);
            let value: f64 = rng.random_range(-2.0..2.0);
            triplets.add_entry(row, col, value).unwrap();
            dense[[row, col]] += value;
        }

        let csr = triplets.into_csr();
        assert_eq!(csr.row_ptrs.len(), n + 1);
        assert_eq!(csr.row_ptrs[n], csr.nnz());
        assert!(csr.row_ptrs.windows(2).all(|w| w[0] <= w[1]));
        for i in 0..n {
            let cols: Vec<usize> = csr.row_entries(i).map(|(c, _)| c).collect();
            let mut unique = cols.clone();
            unique.dedup();
            assert_eq!(cols, unique, "row {i} has repeated columns");
        }

        let x = random_vector(&mut rng, n);
        let y = csr.matvec(&x).unwrap();
        let y_ref = dense.dot(&x);
        for i in 0..n {
            assert_relative_eq!(y[i], y_ref[i], epsilon = 1e-12);
        }
    }
}

#[test]
fn test_state_machine_matches_direct_compression() {
    let mut rng = StdRng::seed_from_u64(3);
    let n = 8;
    let mut staged = SparseMatrix::new(n);
    let mut direct = Vec::new();

    for _ in 0..30 {
        let (row, col) = (rng.random_range(0..n), rng.random_range(0..n));
        let value: f64 = rng.random_range(-1.0..1.0);
        staged.add_entry(row, col, value).unwrap();
        direct.push((row, col, value));
    }
    staged.compress();

    let reference = CsrMatrix::from_triplets(n, n, direct).unwrap();
    assert_eq!(staged.as_csr().unwrap(), &reference);
}

#[test]
fn test_cg_random_spd_system() {
    // A = B^T B + n I is SPD for any B
    let mut rng = StdRng::seed_from_u64(11);
    let n = 20;
    let b_mat = Array2::from_shape_fn((n, n), |_| rng.random_range(-1.0_f64..1.0));
    let dense = b_mat.t().dot(&b_mat) + Array2::<f64>::eye(n) * n as f64;
    let a = CsrMatrix::from_dense(&dense, 0.0);

    let expected = random_vector(&mut rng, n);
    let rhs = a.matvec(&expected).unwrap();
    let mut x = Array1::zeros(n);
    let config = CgConfig {
        max_iterations: Some(100),
        tolerance: 1e-12,
        ..CgConfig::default()
    };

    let solution = cg(&a, &rhs, &mut x, &config, None).unwrap();

    assert!(solution.outcome.is_converged());
    let err = vecops::subtract(&x, &expected).unwrap();
    assert!(vecops::norm2(&err) < 1e-8 * vecops::norm2(&expected));
}
