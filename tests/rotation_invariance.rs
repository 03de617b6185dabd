//! Rigid rotation of samples and evaluation points leaves the density unchanged.

use approx::assert_relative_eq;
use spherical_kde::prelude::*;

fn clustered_samples() -> SampleSet {
    SphereSampler::von_mises_fisher(40.0, -60.0, 12.0, SeedConfig::from_seed(314))
        .unwrap()
        .sample_set(400)
        .unwrap()
}

fn rotations() -> Vec<SphereRotation> {
    vec![
        SphereRotation::from_axis_angle(Vector3::new(0.0, 0.0, 1.0), 1.3).unwrap(),
        SphereRotation::from_axis_angle(Vector3::new(1.0, -2.0, 0.5), 2.7).unwrap(),
        SphereRotation::between(&Vector3::new(0.0, 0.0, 1.0), &Vector3::new(0.0, 0.0, -1.0))
            .unwrap(),
    ]
}

#[test]
fn test_density_invariant_under_rotation() {
    let samples = clustered_samples();
    let kde = SphericalKde::new(
        KdeConfig::new()
            .with_bandwidth(BandwidthMode::Fixed(0.3))
            .with_grid_size(12)
            .with_full_sphere(true),
    )
    .unwrap();
    let field = kde.estimate_density(&samples).unwrap();

    for rotation in rotations() {
        let rotated = rotation.rotate_sample_set(&samples).unwrap();

        for i in 0..field.grid().size() {
            for j in 0..field.grid().size() {
                let y = field.grid().cell_vector(i, j).unwrap();
                let expected = field.value(i, j).unwrap();
                let actual = kde
                    .density_at_vector(&rotated, &rotation.rotate_vector(&y), field.bandwidth())
                    .unwrap()
                    .value()
                    .unwrap();
                assert_relative_eq!(actual, expected, max_relative = 1e-9, epsilon = 1e-300);
            }
        }
    }
}

#[test]
fn test_rule_of_thumb_bandwidth_invariant_under_rotation() {
    let samples = clustered_samples();
    let kde = SphericalKde::new(KdeConfig::new().with_bandwidth(BandwidthMode::RuleOfThumb))
        .unwrap();
    let reference = kde.select_bandwidth(&samples).unwrap();

    for rotation in rotations() {
        let rotated = rotation.rotate_sample_set(&samples).unwrap();
        let selection = kde.select_bandwidth(&rotated).unwrap();
        assert_relative_eq!(selection.bandwidth, reference.bandwidth, max_relative = 1e-9);
    }
}

#[test]
fn test_vmf_fit_recovers_concentration() {
    for (kappa, seed) in [(5.0, 1_u64), (20.0, 2), (50.0, 3)] {
        let samples = SphereSampler::von_mises_fisher(-30.0, 120.0, kappa, SeedConfig::from_seed(seed))
            .unwrap()
            .sample_set(20_000)
            .unwrap();
        let fitted = VonMisesFisher::fit(&samples).unwrap();

        assert_relative_eq!(fitted.kappa(), kappa, max_relative = 0.05);
        let (lat, lon) = fitted.mean_direction().unwrap().to_public();
        assert!((lat + 30.0).abs() < 1.0, "latitude {lat}");
        assert!((lon - 120.0).abs() < 1.0, "longitude {lon}");
    }
}
