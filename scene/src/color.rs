use rand::Rng;

/// Linear RGB color carried alongside each actor for whatever draws the scene.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Uniformly random color with every channel in `[0, 1)`.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::new(rng.r#gen(), rng.r#gen(), rng.r#gen())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn random_channels_stay_in_unit_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..64 {
            let c = Rgb::random(&mut rng);
            for ch in [c.r, c.g, c.b] {
                assert!((0.0..1.0).contains(&ch));
            }
        }
    }
}
