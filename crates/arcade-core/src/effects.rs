/// Monotonic shader clock, advanced by a fixed step per animation frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameClock {
    time: f32,
    step: f32,
}

impl FrameClock {
    pub fn new(step: f32) -> Self {
        Self { time: 0.0, step }
    }

    /// Advance one frame and return the new time.
    pub fn advance(&mut self) -> f32 {
        self.time += self.step;
        self.time
    }

    pub fn time(&self) -> f32 {
        self.time
    }
}

/// Drawing-buffer dimensions of the overlay canvas, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    /// Size matching a CSS viewport (`innerWidth` × `innerHeight`). Never below 1×1.
    pub fn from_viewport(width: f64, height: f64) -> Self {
        let px = |v: f64| {
            if v.is_finite() {
                v.round().clamp(1.0, u32::MAX as f64) as u32
            } else {
                1
            }
        };
        Self {
            width: px(width),
            height: px(height),
        }
    }

    pub fn differs_from(&self, width: u32, height: u32) -> bool {
        self.width != width || self.height != height
    }

    /// `u_resolution` uniform value.
    pub fn resolution(&self) -> [f32; 2] {
        [self.width as f32, self.height as f32]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_is_monotonic() {
        let mut clock = FrameClock::new(0.016);
        let mut last = clock.time();
        for _ in 0..1000 {
            let t = clock.advance();
            assert!(t > last);
            last = t;
        }
        assert!((clock.time() - 16.0).abs() < 0.01);
    }

    #[test]
    fn surface_tracks_viewport() {
        let before = SurfaceSize::from_viewport(1280.0, 720.0);
        assert_eq!(before, SurfaceSize { width: 1280, height: 720 });

        let after = SurfaceSize::from_viewport(800.4, 600.6);
        assert_eq!(after, SurfaceSize { width: 800, height: 601 });
        assert!(before.differs_from(after.width, after.height));
        assert!(!after.differs_from(800, 601));
        assert_eq!(after.resolution(), [800.0, 601.0]);
    }

    #[test]
    fn surface_never_collapses() {
        assert_eq!(
            SurfaceSize::from_viewport(0.0, f64::NAN),
            SurfaceSize { width: 1, height: 1 }
        );
        assert_eq!(
            SurfaceSize::from_viewport(-50.0, 10.0),
            SurfaceSize { width: 1, height: 10 }
        );
    }
}
