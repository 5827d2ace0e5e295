//! Edge-triggered visibility detection for the trailing "loading more" row.
//!
//! Rows are the unit throughout: the viewport is a window of list rows and
//! the marker occupies `height` rows starting at `top`.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub offset: usize,
    pub height: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker {
    pub top: usize,
    pub height: usize,
}

/// Fraction of `marker` inside `viewport`, in `[0, 1]`.
pub fn visible_fraction(viewport: Viewport, marker: Marker) -> f64 {
    if marker.height == 0 {
        return 0.0;
    }
    let start = viewport.offset.max(marker.top);
    let end = (viewport.offset + viewport.height).min(marker.top + marker.height);
    end.saturating_sub(start) as f64 / marker.height as f64
}

#[derive(Debug)]
pub struct Sentinel {
    threshold: f64,
    intersecting: bool,
    placed_at: Option<usize>,
}

impl Sentinel {
    /// `threshold` is clamped to `(0, 1]`.
    pub fn new(threshold: f64) -> Self {
        let threshold = if threshold.is_nan() || threshold <= 0.0 {
            f64::EPSILON
        } else {
            threshold.min(1.0)
        };
        Self {
            threshold,
            intersecting: false,
            placed_at: None,
        }
    }

    pub fn is_intersecting(&self) -> bool {
        self.intersecting
    }

    /// Forget the previous observation, as if the marker were unmounted.
    pub fn reset(&mut self) {
        self.intersecting = false;
        self.placed_at = None;
    }

    /// Re-evaluate visibility. Returns `true` once per entry into view. A
    /// marker placed at a new row counts as a new entry.
    pub fn observe(&mut self, viewport: Viewport, marker: Option<Marker>) -> bool {
        let Some(marker) = marker else {
            self.reset();
            return false;
        };

        let visible = visible_fraction(viewport, marker) >= self.threshold;
        let moved = self.placed_at != Some(marker.top);
        let entered = visible && (!self.intersecting || moved);

        self.placed_at = Some(marker.top);
        self.intersecting = visible;
        entered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(offset: usize, height: usize) -> Viewport {
        Viewport { offset, height }
    }

    fn marker(top: usize) -> Option<Marker> {
        Some(Marker { top, height: 1 })
    }

    #[test]
    fn fraction_handles_partial_overlap() {
        let m = Marker { top: 9, height: 2 };
        assert_eq!(visible_fraction(view(0, 10), m), 0.5);
        assert_eq!(visible_fraction(view(0, 11), m), 1.0);
        assert_eq!(visible_fraction(view(0, 9), m), 0.0);
        assert_eq!(visible_fraction(view(12, 5), m), 0.0);
    }

    #[test]
    fn fires_once_per_entry() {
        let mut s = Sentinel::new(1.0);
        assert!(!s.observe(view(0, 10), marker(20)));
        assert!(s.observe(view(11, 10), marker(20)));
        assert!(s.is_intersecting());
        // Still visible, same placement: no second signal.
        assert!(!s.observe(view(12, 10), marker(20)));
        // Leaves, then comes back.
        assert!(!s.observe(view(0, 10), marker(20)));
        assert!(!s.is_intersecting());
        assert!(s.observe(view(15, 10), marker(20)));
    }

    #[test]
    fn threshold_requires_full_visibility() {
        let mut s = Sentinel::new(1.0);
        let tall = Some(Marker { top: 9, height: 2 });
        assert!(!s.observe(view(0, 10), tall));
        assert!(s.observe(view(0, 11), tall));

        let mut half = Sentinel::new(0.5);
        assert!(half.observe(view(0, 10), tall));
    }

    #[test]
    fn absent_marker_never_fires() {
        let mut s = Sentinel::new(1.0);
        assert!(!s.observe(view(0, 100), None));
        assert!(!s.is_intersecting());
        assert!(s.observe(view(0, 10), marker(3)));
        assert!(!s.observe(view(0, 10), None));
        assert!(!s.is_intersecting());
    }

    #[test]
    fn replaced_marker_counts_as_new_entry() {
        let mut s = Sentinel::new(1.0);
        assert!(s.observe(view(0, 50), marker(20)));
        assert!(s.observe(view(0, 50), marker(40)));
        assert!(!s.observe(view(0, 50), marker(40)));
    }

    #[test]
    fn threshold_is_clamped() {
        let mut s = Sentinel::new(0.0);
        let m = Some(Marker { top: 9, height: 4 });
        assert!(s.observe(view(0, 10), m));

        let mut s = Sentinel::new(7.0);
        assert!(s.observe(view(0, 10), marker(9)));
    }
}
