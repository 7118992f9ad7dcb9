//! Chart instance lifecycle.
//!
//! The mood chart is the one external resource that needs explicit
//! lifecycle discipline: the rendering surface holds on to per-instance
//! resources, so a new chart may only be created after the previous
//! instance is destroyed. [`ChartAdapter`] owns that contract; the surface
//! behind it is a trait so tests can observe the create/destroy ordering.

use tracing::debug;

use crate::core::mood::PlotPoint;

pub const SERIES_LABEL: &str = "Sentiment Confidence";

/// Fixed y-axis domain; partial sentiment swings stay comparable across
/// sessions regardless of the data range.
pub const Y_BOUNDS: [f64; 2] = [-1.0, 1.0];

/// Everything a surface needs to draw one chart instance.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub series_label: &'static str,
    pub labels: Vec<String>,
    pub data: Vec<(f64, f64)>,
    pub y_bounds: [f64; 2],
}

impl ChartSpec {
    /// Build the line-chart spec from derived plot points. X coordinates are
    /// the point indices; the date labels ride along for the axis.
    pub fn from_points(points: &[PlotPoint]) -> Self {
        Self {
            series_label: SERIES_LABEL,
            labels: points.iter().map(|p| p.label.clone()).collect(),
            data: points
                .iter()
                .enumerate()
                .map(|(i, p)| (i as f64, p.value))
                .collect(),
            y_bounds: Y_BOUNDS,
        }
    }
}

/// A drawing surface that hands out chart instances.
pub trait ChartSurface {
    /// Whether the surface can currently host a chart.
    fn is_mounted(&self) -> bool;

    /// Create a chart instance and return its handle.
    fn create(&mut self, spec: ChartSpec) -> u64;

    /// Release the instance's resources.
    fn destroy(&mut self, instance: u64);
}

/// Owns the single live chart instance and enforces destroy-before-create.
pub struct ChartAdapter<S> {
    surface: S,
    active: Option<u64>,
}

impl<S: ChartSurface> ChartAdapter<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            active: None,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn has_instance(&self) -> bool {
        self.active.is_some()
    }

    /// (Re)create the chart from the given points. No-op when the series is
    /// empty or the surface is not mounted. Any prior instance is destroyed
    /// before the replacement is created.
    pub fn render(&mut self, points: &[PlotPoint]) -> bool {
        if points.is_empty() || !self.surface.is_mounted() {
            return false;
        }
        if let Some(previous) = self.active.take() {
            self.surface.destroy(previous);
        }
        let instance = self.surface.create(ChartSpec::from_points(points));
        debug!(instance, points = points.len(), "chart instance created");
        self.active = Some(instance);
        true
    }

    /// Destroy the live instance, if any (logout or shutdown).
    pub fn teardown(&mut self) {
        if let Some(instance) = self.active.take() {
            self.surface.destroy(instance);
        }
    }
}

/// Production surface: keeps the current [`ChartSpec`] for the terminal
/// renderer to draw each frame. "Mounted" tracks whether the chat screen
/// (and with it the chart pane) is showing.
#[derive(Debug, Default)]
pub struct TuiChartSurface {
    mounted: bool,
    next_instance: u64,
    current: Option<(u64, ChartSpec)>,
}

impl TuiChartSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mount(&mut self) {
        self.mounted = true;
    }

    pub fn unmount(&mut self) {
        self.mounted = false;
    }

    /// The spec of the live instance, if one exists.
    pub fn spec(&self) -> Option<&ChartSpec> {
        self.current.as_ref().map(|(_, spec)| spec)
    }
}

impl ChartSurface for TuiChartSurface {
    fn is_mounted(&self) -> bool {
        self.mounted
    }

    fn create(&mut self, spec: ChartSpec) -> u64 {
        self.next_instance += 1;
        self.current = Some((self.next_instance, spec));
        self.next_instance
    }

    fn destroy(&mut self, instance: u64) {
        if self
            .current
            .as_ref()
            .is_some_and(|(live, _)| *live == instance)
        {
            self.current = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum LifecycleEvent {
        Created(u64),
        Destroyed(u64),
    }

    struct RecordingSurface {
        mounted: bool,
        next_instance: u64,
        events: Vec<LifecycleEvent>,
    }

    impl RecordingSurface {
        fn new(mounted: bool) -> Self {
            Self {
                mounted,
                next_instance: 0,
                events: Vec::new(),
            }
        }
    }

    impl ChartSurface for RecordingSurface {
        fn is_mounted(&self) -> bool {
            self.mounted
        }

        fn create(&mut self, _spec: ChartSpec) -> u64 {
            self.next_instance += 1;
            self.events.push(LifecycleEvent::Created(self.next_instance));
            self.next_instance
        }

        fn destroy(&mut self, instance: u64) {
            self.events.push(LifecycleEvent::Destroyed(instance));
        }
    }

    fn points(n: usize) -> Vec<PlotPoint> {
        (0..n)
            .map(|i| PlotPoint {
                label: format!("2024-01-{:02}", i + 1),
                value: if i % 2 == 0 { 0.5 } else { -0.5 },
            })
            .collect()
    }

    #[test]
    fn empty_series_and_unmounted_surface_are_no_ops() {
        let mut adapter = ChartAdapter::new(RecordingSurface::new(true));
        assert!(!adapter.render(&[]));
        assert!(adapter.surface().events.is_empty());

        let mut unmounted = ChartAdapter::new(RecordingSurface::new(false));
        assert!(!unmounted.render(&points(3)));
        assert!(unmounted.surface().events.is_empty());
    }

    #[test]
    fn n_renders_create_n_and_destroy_n_minus_one() {
        let mut adapter = ChartAdapter::new(RecordingSurface::new(true));
        for _ in 0..4 {
            assert!(adapter.render(&points(2)));
        }

        let events = &adapter.surface().events;
        let creations = events
            .iter()
            .filter(|e| matches!(e, LifecycleEvent::Created(_)))
            .count();
        let destructions = events
            .iter()
            .filter(|e| matches!(e, LifecycleEvent::Destroyed(_)))
            .count();
        assert_eq!(creations, 4);
        assert_eq!(destructions, 3);

        // Every destroy releases the instance created immediately before it.
        assert_eq!(
            events.as_slice(),
            &[
                LifecycleEvent::Created(1),
                LifecycleEvent::Destroyed(1),
                LifecycleEvent::Created(2),
                LifecycleEvent::Destroyed(2),
                LifecycleEvent::Created(3),
                LifecycleEvent::Destroyed(3),
                LifecycleEvent::Created(4),
            ]
        );
    }

    #[test]
    fn teardown_destroys_the_final_instance() {
        let mut adapter = ChartAdapter::new(RecordingSurface::new(true));
        for _ in 0..3 {
            adapter.render(&points(2));
        }
        adapter.teardown();
        assert!(!adapter.has_instance());

        let destructions = adapter
            .surface()
            .events
            .iter()
            .filter(|e| matches!(e, LifecycleEvent::Destroyed(_)))
            .count();
        assert_eq!(destructions, 3);

        // Tearing down twice must not double-free.
        adapter.teardown();
        let after = adapter
            .surface()
            .events
            .iter()
            .filter(|e| matches!(e, LifecycleEvent::Destroyed(_)))
            .count();
        assert_eq!(after, 3);
    }

    #[test]
    fn spec_maps_points_to_indexed_data_with_fixed_bounds() {
        let spec = ChartSpec::from_points(&[
            PlotPoint {
                label: "2024-03-01".into(),
                value: -0.6,
            },
            PlotPoint {
                label: "2024-03-02".into(),
                value: 0.9,
            },
        ]);
        assert_eq!(spec.series_label, "Sentiment Confidence");
        assert_eq!(spec.y_bounds, [-1.0, 1.0]);
        assert_eq!(spec.data, vec![(0.0, -0.6), (1.0, 0.9)]);
        assert_eq!(spec.labels, vec!["2024-03-01", "2024-03-02"]);
    }

    #[test]
    fn tui_surface_keeps_only_the_live_spec() {
        let mut surface = TuiChartSurface::new();
        surface.mount();
        assert!(surface.is_mounted());

        let first = surface.create(ChartSpec::from_points(&points(2)));
        let second = surface.create(ChartSpec::from_points(&points(3)));
        assert!(surface.spec().is_some());

        // Destroying a stale handle leaves the live instance alone.
        surface.destroy(first);
        assert!(surface.spec().is_some());

        surface.destroy(second);
        assert!(surface.spec().is_none());
    }
}
