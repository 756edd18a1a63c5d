mod common;

use std::fs::File;
use std::io::BufWriter;
use std::sync::Arc;

use common::*;
use dynopt_landscape::{
    PeakField, RotationPeak, SeedProvider, SeedTable, SeedTableSpec, Variant, pair_permutation,
    rotation_matrix,
};
use ndarray::{Array1, Array2, s};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[test]
fn test_rotation_matrix_is_orthogonal() {
    let mut rng = StdRng::seed_from_u64(9);
    for dim in 1..=15 {
        for _ in 0..5 {
            let theta = rng.random_range(-std::f64::consts::PI..std::f64::consts::PI);
            let pairs = pair_permutation(dim, &mut rng);
            let m = rotation_matrix(dim, theta, &pairs);
            let product = m.dot(&m.t());
            let eye = Array2::<f64>::eye(dim);
            for (a, b) in product.iter().zip(eye.iter()) {
                assert!((a - b).abs() < 1e-12, "dim {} theta {}", dim, theta);
            }
        }
    }
}

#[test]
fn test_rotation_preserves_pairwise_distances() {
    let table = SeedTable::standard();
    let positions = table.positions.slice(s![..8, ..7]).to_owned();
    let mut field =
        PeakField::new(positions.clone(), Array1::from_elem(8, 50.0), Array1::from_elem(8, 5.0), 0.7).unwrap();
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..10 {
        field.rotate(&mut rng);
    }
    assert_ne!(field.positions(), &positions);
    for i in 0..8 {
        for j in (i + 1)..8 {
            let before = distance(&positions, i, j);
            let after = distance(field.positions(), i, j);
            assert!((before - after).abs() < 1e-9, "peaks {} and {}", i, j);
        }
    }
}

fn expected_dims(start: usize, steps: usize) -> Vec<usize> {
    let (mut d, mut step) = (start as isize, 1isize);
    (0..steps)
        .map(|_| {
            if d + step > 15 || d + step < 5 {
                step = -step;
            }
            d += step;
            d as usize
        })
        .collect()
}

#[test]
fn test_dimension_oscillates_between_five_and_fifteen() {
    init_logging();
    let cfg = small_config(Variant::DimensionVariable, 10, 1).build();
    let mut bench = RotationPeak::new(cfg, standard_seeds()).unwrap();
    let mut x = origin(10);
    let mut dims = Vec::new();
    for _ in 0..40 {
        let (_, y) = bench.evaluate(x).unwrap();
        assert_eq!(y.len(), bench.dim());
        assert_eq!(bench.field().unwrap().positions().ncols(), y.len());
        dims.push(y.len());
        x = y;
    }
    assert_eq!(dims, expected_dims(10, 40));
    assert_eq!(&dims[..6], &[11, 12, 13, 14, 15, 14]);
    assert_eq!(*dims.iter().max().unwrap(), 15);
    assert_eq!(*dims.iter().min().unwrap(), 5);
}

#[test]
fn test_query_is_reshaped_after_dimension_change() {
    init_logging();
    let cfg = small_config(Variant::DimensionVariable, 10, 2).build();
    let mut bench = RotationPeak::new(cfg, standard_seeds()).unwrap();
    let x = Array1::linspace(-1.0, 1.0, 10);
    let (_, same) = bench.evaluate(x.clone()).unwrap();
    assert_eq!(same, x);

    let (_, grown) = bench.evaluate(x.clone()).unwrap();
    assert_eq!(grown.len(), 11);
    assert_eq!(grown.slice(s![..10]), x);
    assert!((-5.0..5.0).contains(&grown[10]));

    // a stale point is rejected once the landscape has grown
    assert!(bench.evaluate(x).is_err());
    assert_eq!(bench.fes(), 2);
}

#[test]
fn test_growth_then_shrink_restores_dimension() {
    init_logging();
    let cfg = small_config(Variant::DimensionVariable, 14, 1).build();
    let mut bench = RotationPeak::new(cfg, standard_seeds()).unwrap();
    let (_, x) = bench.evaluate(origin(14)).unwrap();
    assert_eq!(x.len(), 15);
    let (_, x) = bench.evaluate(x).unwrap();
    assert_eq!(x.len(), 14);
    assert_eq!(bench.dim(), 14);
    assert_eq!(bench.state().unwrap().dim_step(), -1);
}

#[test]
fn test_seed_table_from_file_matches_in_memory() {
    init_logging();
    let table = SeedTable::generate(&SeedTableSpec { num_peaks: 6, dim: 17, num_phases: 6, ..Default::default() }, 77)
        .unwrap();
    let file = tempfile::NamedTempFile::new().unwrap();
    table.to_writer(BufWriter::new(File::create(file.path()).unwrap())).unwrap();
    let loaded = SeedTable::from_reader(File::open(file.path()).unwrap()).unwrap();
    assert_eq!(loaded, table);

    let run = |seeds: Arc<dyn SeedProvider>| {
        let cfg = small_config(Variant::NoisyRecurrent, 5, 3).num_peaks(6).build();
        let mut bench = RotationPeak::new(cfg, seeds).unwrap();
        (0..30).map(|_| bench.evaluate(origin(5)).unwrap().0).collect::<Vec<_>>()
    };
    let in_memory: Arc<dyn SeedProvider> = Arc::new(table);
    let from_file: Arc<dyn SeedProvider> = Arc::new(loaded);
    assert_eq!(run(in_memory), run(from_file));
}
