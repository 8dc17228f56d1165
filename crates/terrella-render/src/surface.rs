//! Cross-platform surface handling that normalizes platform-specific
//! behavior: Wayland zero-size windows, macOS Retina scaling, and Windows
//! DPI changes.

/// Minimum surface dimension (prevents zero-size panics).
pub const MIN_SURFACE_DIMENSION: u32 = 1;

/// Physical pixel dimensions of a surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhysicalSize {
    /// Width in physical pixels.
    pub width: u32,
    /// Height in physical pixels.
    pub height: u32,
}

/// Event produced when the surface dimensions or scale factor change.
#[derive(Clone, Copy, Debug)]
pub struct SurfaceResizeEvent {
    /// New physical pixel dimensions.
    pub physical: PhysicalSize,
    /// Current scale factor.
    pub scale_factor: f64,
}

/// Normalizes surface dimensions across platforms. Always reports physical
/// pixel dimensions for GPU surface configuration; zero-size surfaces are
/// clamped to 1×1 to prevent panics.
pub struct SurfaceWrapper {
    physical_width: u32,
    physical_height: u32,
    scale_factor: f64,
}

impl SurfaceWrapper {
    /// Creates a wrapper from initial physical dimensions and scale factor.
    pub fn new(physical_width: u32, physical_height: u32, scale_factor: f64) -> Self {
        Self {
            physical_width: physical_width.max(MIN_SURFACE_DIMENSION),
            physical_height: physical_height.max(MIN_SURFACE_DIMENSION),
            scale_factor,
        }
    }

    /// Handle a window resize event. Returns a resize event if the surface
    /// dimensions actually changed.
    pub fn handle_resize(
        &mut self,
        physical_width: u32,
        physical_height: u32,
    ) -> Option<SurfaceResizeEvent> {
        let width = physical_width.max(MIN_SURFACE_DIMENSION);
        let height = physical_height.max(MIN_SURFACE_DIMENSION);

        if width == self.physical_width && height == self.physical_height {
            return None;
        }

        self.physical_width = width;
        self.physical_height = height;

        Some(SurfaceResizeEvent {
            physical: PhysicalSize { width, height },
            scale_factor: self.scale_factor,
        })
    }

    /// Handle a scale factor change. Returns a resize event because the
    /// physical dimensions change even if the logical size stays the same.
    pub fn handle_scale_factor_changed(
        &mut self,
        new_scale_factor: f64,
        new_physical_width: u32,
        new_physical_height: u32,
    ) -> Option<SurfaceResizeEvent> {
        self.scale_factor = new_scale_factor;
        self.handle_resize(new_physical_width, new_physical_height)
    }

    /// Current physical pixel dimensions for surface configuration.
    pub fn physical_size(&self) -> PhysicalSize {
        PhysicalSize {
            width: self.physical_width,
            height: self.physical_height,
        }
    }

    /// Current scale factor.
    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }
}

impl Default for SurfaceWrapper {
    fn default() -> Self {
        Self::new(1, 1, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_size_clamped_to_one() {
        let wrapper = SurfaceWrapper::new(0, 0, 1.0);
        let size = wrapper.physical_size();
        assert_eq!(size.width, 1);
        assert_eq!(size.height, 1);
    }

    #[test]
    fn test_resize_to_zero_clamped() {
        let mut wrapper = SurfaceWrapper::new(800, 600, 1.0);
        let event = wrapper.handle_resize(0, 0).expect("dimensions changed");
        assert_eq!(event.physical.width, 1);
        assert_eq!(event.physical.height, 1);
    }

    #[test]
    fn test_same_size_resize_is_noop() {
        let mut wrapper = SurfaceWrapper::new(800, 600, 1.0);
        assert!(wrapper.handle_resize(800, 600).is_none());
    }

    #[test]
    fn test_scale_factor_change_reports_resize() {
        let mut wrapper = SurfaceWrapper::new(800, 600, 1.0);
        let event = wrapper
            .handle_scale_factor_changed(2.0, 1600, 1200)
            .expect("physical size changed");
        assert_eq!(event.physical.width, 1600);
        assert!((event.scale_factor - 2.0).abs() < f64::EPSILON);
    }
}
