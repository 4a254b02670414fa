/// Ground elevation under a point of the XZ plane
pub trait Terrain {
    fn height_at(&self, x: f32, z: f32) -> f32;
}

impl<F: Fn(f32, f32) -> f32> Terrain for F {
    fn height_at(&self, x: f32, z: f32) -> f32 {
        self(x, z)
    }
}

/// Level ground at a fixed height
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Flat(pub f32);

impl Terrain for Flat {
    fn height_at(&self, _: f32, _: f32) -> f32 {
        self.0
    }
}

/// Gentle sinusoidal hills
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Hills {
    pub amplitude: f32,
    pub wavelength: f32,
}

impl Terrain for Hills {
    fn height_at(&self, x: f32, z: f32) -> f32 {
        let k = std::f32::consts::TAU / self.wavelength;
        self.amplitude * (k * x).sin() * (k * z).cos()
    }
}

#[test]
fn test_closures_are_terrain() {
    let ramp = |x: f32, _: f32| x * 0.5;
    assert_eq!(ramp.height_at(4., 100.), 2.);
    assert_eq!(Flat(3.).height_at(-1., 1.), 3.);
}

#[test]
fn test_hills_bounded() {
    let hills = Hills { amplitude: 2., wavelength: 10. };
    for i in 0..100 {
        let h = hills.height_at(i as f32 * 0.37, i as f32 * -1.3);
        assert!(h.abs() <= 2. + 1e-5);
    }
}
