use dynopt_dynamics::{Bounds, ChangeContext, DynamicKind};
use ndarray::Array1;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn trajectory(kind: DynamicKind, start: f64, steps: usize, seed: u64) -> Vec<f64> {
    let bounds = Bounds::new(10.0, 100.0).unwrap();
    let phases = [0.25];
    let dynamic = kind.build();
    let mut rng = StdRng::seed_from_u64(seed);
    let mut u = Array1::from(vec![start]);
    let mut out = Vec::with_capacity(steps);
    for t in 1..=steps {
        let ctx = ChangeContext::new(bounds, 5.0, t, &phases);
        dynamic.apply(u.view_mut(), &ctx, &mut rng).unwrap();
        out.push(u[0]);
    }
    out
}

#[test]
fn test_recurrent_trajectory_does_not_depend_on_start() {
    let a = trajectory(DynamicKind::Recurrent, 10.0, 30, 1);
    let b = trajectory(DynamicKind::Recurrent, 90.0, 30, 2);
    assert_eq!(a, b);
    for t in 0..18 {
        assert!((a[t] - a[t + 12]).abs() < 1e-9);
    }
}

#[test]
fn test_path_dependent_trajectories_depend_on_start() {
    for kind in [DynamicKind::Small, DynamicKind::Large, DynamicKind::Chaotic] {
        let a = trajectory(kind, 20.0, 3, 5);
        let b = trajectory(kind, 70.0, 3, 5);
        assert_ne!(a, b, "{} should carry its starting point", kind);
    }
}

#[test]
fn test_same_seed_reproduces_stochastic_trajectories() {
    for kind in DynamicKind::ALL {
        let a = trajectory(kind, 42.0, 25, 99);
        let b = trajectory(kind, 42.0, 25, 99);
        assert_eq!(a, b, "{} is not reproducible", kind);
    }
}

#[test]
fn test_noisy_recurrent_stays_near_its_period() {
    let clean = trajectory(DynamicKind::Recurrent, 50.0, 24, 0);
    let noisy = trajectory(DynamicKind::NoisyRecurrent, 50.0, 24, 0);
    for (c, n) in clean.iter().zip(noisy.iter()) {
        // 0.8 std jitter, 6 sigma is generous
        assert!((c - n).abs() < 4.8, "clean {} noisy {}", c, n);
    }
}
