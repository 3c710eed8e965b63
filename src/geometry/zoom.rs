//! Zoom target for the highlighted thumbnail
//!
//! The selected thumbnail is enlarged around its own center. The factor
//! starts at the configured maximum and is lowered in steps until the
//! result fits inside the monitor's work area minus padding and does not
//! exceed the real window size (scale 1.0). The result is then pushed back
//! inside the work area, left/top edges taking precedence.

use super::{GeometrySnapshot, Rect};

/// Step by which the zoom factor is lowered until the thumbnail fits
const FACTOR_STEP: f64 = 0.1;

/// Tolerance for comparing accumulated float steps against limits
const EPSILON: f64 = 1e-9;

/// Parameters of the zoom computation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomParams {
    /// Maximum factor applied to the thumbnail
    pub factor: f64,
    /// Distance kept from the work area edges
    pub padding: f64,
}

impl Default for ZoomParams {
    fn default() -> Self {
        Self {
            factor: 1.5,
            padding: 30.0,
        }
    }
}

/// Compute the rectangle the host should zoom a highlighted thumbnail to
///
/// Never shrinks the thumbnail; a factor of 1.0 leaves it where it is.
pub fn zoom_target(
    snapshot: &GeometrySnapshot,
    work_area: Option<Rect>,
    params: &ZoomParams,
) -> Rect {
    let limits = work_area.map(|area| area.inset(params.padding));
    let fits = |factor: f64| {
        let within_limits = limits.map_or(true, |limits| {
            snapshot.width * factor <= limits.width + EPSILON
                && snapshot.height * factor <= limits.height + EPSILON
        });
        within_limits && snapshot.scale * factor <= 1.0 + EPSILON
    };

    let mut factor = params.factor.max(1.0);
    while factor > 1.0 && !fits(factor) {
        factor = (factor - FACTOR_STEP).max(1.0);
    }

    let width = snapshot.width * factor;
    let height = snapshot.height * factor;
    let mut x = snapshot.x - (width - snapshot.width) / 2.0;
    let mut y = snapshot.y - (height - snapshot.height) / 2.0;

    if let Some(limits) = limits {
        if x + width > limits.right() {
            x = limits.right() - width;
        }
        if x < limits.left() {
            x = limits.left();
        }
        if y + height > limits.bottom() {
            y = limits.bottom() - height;
        }
        if y < limits.top() {
            y = limits.top();
        }
    }

    Rect::new(x, y, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::LiveGeometry;

    fn snapshot(rect: Rect, scale: f64) -> GeometrySnapshot {
        GeometrySnapshot::capture(&LiveGeometry::new(rect, scale))
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn small_thumbnail_grows_by_full_factor_around_center() {
        let snap = snapshot(Rect::new(500.0, 400.0, 200.0, 100.0), 0.25);
        let area = Rect::new(0.0, 0.0, 1920.0, 1080.0);
        let target = zoom_target(&snap, Some(area), &ZoomParams::default());
        assert!(approx(target.width, 300.0));
        assert!(approx(target.height, 150.0));
        assert!(approx(target.center().x, 600.0));
        assert!(approx(target.center().y, 450.0));
    }

    #[test]
    fn factor_is_capped_at_real_window_size() {
        let snap = snapshot(Rect::new(500.0, 400.0, 200.0, 100.0), 0.8);
        let target = zoom_target(&snap, None, &ZoomParams::default());
        // 0.8 * 1.2 stays below 1.0, 0.8 * 1.3 would not
        assert!(approx(target.width, 240.0));
    }

    #[test]
    fn factor_shrinks_to_fit_work_area() {
        let snap = snapshot(Rect::new(100.0, 100.0, 800.0, 400.0), 0.3);
        let area = Rect::new(0.0, 0.0, 1060.0, 1080.0);
        // usable width is 1000, so 800 * 1.2 = 960 fits and 800 * 1.3 does not
        let target = zoom_target(&snap, Some(area), &ZoomParams::default());
        assert!(approx(target.width, 960.0));
    }

    #[test]
    fn zoomed_rect_is_pushed_inside_padding() {
        let snap = snapshot(Rect::new(0.0, 0.0, 100.0, 100.0), 0.2);
        let area = Rect::new(0.0, 0.0, 1920.0, 1080.0);
        let target = zoom_target(&snap, Some(area), &ZoomParams::default());
        assert!(approx(target.x, 30.0));
        assert!(approx(target.y, 30.0));

        let snap = snapshot(Rect::new(1850.0, 1000.0, 70.0, 80.0), 0.2);
        let target = zoom_target(&snap, Some(area), &ZoomParams::default());
        assert!(approx(target.right(), 1890.0));
        assert!(approx(target.bottom(), 1050.0));
    }

    #[test]
    fn oversized_thumbnail_is_left_untouched_in_size() {
        let snap = snapshot(Rect::new(0.0, 0.0, 3000.0, 2000.0), 0.5);
        let area = Rect::new(0.0, 0.0, 1920.0, 1080.0);
        let target = zoom_target(&snap, Some(area), &ZoomParams::default());
        assert!(approx(target.width, 3000.0));
        assert!(approx(target.height, 2000.0));
    }
}
