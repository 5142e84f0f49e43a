//! Random placement of scattered shapes

use std::f32::consts::PI;

use rand::Rng;

use crate::gfx::scene::Transform;

/// Edge length of the cube shapes are scattered in, centered on the origin
const SPREAD: f32 = 20.0;

/// Moves each axis to `(u - 0.5) * 20`, i.e. into `[-10, 10)`
pub fn randomize_position<R: Rng + ?Sized>(transform: &mut Transform, rng: &mut R) {
    transform.position.x = (rng.random::<f32>() - 0.5) * SPREAD;
    transform.position.y = (rng.random::<f32>() - 0.5) * SPREAD;
    transform.position.z = (rng.random::<f32>() - 0.5) * SPREAD;
}

/// Tilts about X and Y into `[-π/2, π/2)`; Z is left alone
pub fn randomize_rotation<R: Rng + ?Sized>(transform: &mut Transform, rng: &mut R) {
    transform.rotation.x = (rng.random::<f32>() - 0.5) * PI;
    transform.rotation.y = (rng.random::<f32>() - 0.5) * PI;
}

/// Uniform scale from a single draw in `[0, 1)`
pub fn randomize_scale<R: Rng + ?Sized>(transform: &mut Transform, rng: &mut R) {
    let scale = rng.random::<f32>();
    transform.scale.x = scale;
    transform.scale.y = scale;
    transform.scale.z = scale;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_ranges() {
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..500 {
            let mut transform = Transform::default();
            transform.rotation.z = 0.25;
            randomize_position(&mut transform, &mut rng);
            randomize_rotation(&mut transform, &mut rng);
            randomize_scale(&mut transform, &mut rng);

            for axis in 0..3 {
                assert!((-10.0..10.0).contains(&transform.position[axis]));
            }
            assert!((-FRAC_PI_2..FRAC_PI_2).contains(&transform.rotation.x));
            assert!((-FRAC_PI_2..FRAC_PI_2).contains(&transform.rotation.y));
            assert_eq!(transform.rotation.z, 0.25);

            assert!((0.0..1.0).contains(&transform.scale.x));
            assert_eq!(transform.scale.x, transform.scale.y);
            assert_eq!(transform.scale.y, transform.scale.z);
        }
    }

    #[test]
    fn test_seeded_rng_is_deterministic() {
        let mut a = Transform::default();
        let mut b = Transform::default();
        randomize_position(&mut a, &mut StdRng::seed_from_u64(42));
        randomize_position(&mut b, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }
}
