//! Interactive navigation over a packed repository tree.
//!
//! [`NavigationController`] is a small state machine with three modes:
//!
//! - [`Mode::Idle`]: nothing is hovered and no playback runs,
//! - [`Mode::Hovering`]: a node is under the pointer,
//! - [`Mode::Playing`]: a [`RepeatingTask`] walks the leaves, selecting one
//!   per tick.
//!
//! Selecting a node zooms onto it; direct pan/zoom writes the same transform,
//! so whichever happened last wins. Time is supplied by the host through
//! [`NavigationController::advance`], which fires due playback ticks and
//! moves the zoom animation forward.
//!
//! [`RepoView`] bundles a packed tree with its controller so both are always
//! replaced together.

mod repo_view;

use std::time::Duration;

use log::{debug, info, trace};

use sextant_core::{geometry::Point, scene::ViewTransform};

use crate::{config::NavigationConfig, layout::PackedTree, scheduler::RepeatingTask};

pub use repo_view::RepoView;

/// Most playback ticks replayed by one [`NavigationController::advance`]
pub const MAX_REPLAYED_TICKS: usize = 64;

/// Interaction mode of a [`NavigationController`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Idle,
    Hovering,
    Playing,
}

/// What the pointer is over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoverInfo {
    name: String,
    path: String,
    kind: &'static str,
    size: u64,
}

impl HoverInfo {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full path, or the name for nodes without one
    pub fn path(&self) -> &str {
        &self.path
    }

    /// `"folder"` or `"file"`
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// Packed value of the node
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Tooltip line, e.g. `file • 12 units`
    pub fn tooltip(&self) -> String {
        format!("{} • {} units", self.kind, self.size.max(1))
    }
}

/// A running zoom animation between two transforms.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ZoomTransition {
    from: ViewTransform,
    to: ViewTransform,
    elapsed: Duration,
    duration: Duration,
}

impl ZoomTransition {
    fn progress(&self) -> f32 {
        (self.elapsed.as_secs_f32() / self.duration.as_secs_f32()).clamp(0.0, 1.0)
    }

    fn current(&self) -> ViewTransform {
        self.from.interpolate(self.to, ease_cubic_in_out(self.progress()))
    }

    fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}

fn ease_cubic_in_out(t: f32) -> f32 {
    let t = t * 2.0;
    if t <= 1.0 {
        t * t * t / 2.0
    } else {
        let t = t - 2.0;
        (t * t * t + 2.0) / 2.0
    }
}

/// The autoplay cursor over a fixed list of leaves.
#[derive(Debug, Clone, PartialEq)]
struct Playback {
    task: RepeatingTask,
    leaves: Vec<String>,
    index: usize,
}

/// Observable navigation state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NavigationState {
    active_path: Option<String>,
    hover: Option<HoverInfo>,
    playing: bool,
    transform: ViewTransform,
}

impl NavigationState {
    pub fn active_path(&self) -> Option<&str> {
        self.active_path.as_deref()
    }

    pub fn hover_info(&self) -> Option<&HoverInfo> {
        self.hover.as_ref()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// The settled zoom transform, ignoring any running animation
    pub fn transform(&self) -> ViewTransform {
        self.transform
    }

    pub fn mode(&self) -> Mode {
        if self.playing {
            Mode::Playing
        } else if self.hover.is_some() {
            Mode::Hovering
        } else {
            Mode::Idle
        }
    }
}

/// Drives [`NavigationState`] from pointer events, playback and time.
///
/// Every operation that needs geometry borrows the [`PackedTree`] it acts on;
/// the controller itself only stores paths.
///
/// # Examples
///
/// ```
/// # use std::time::Duration;
/// # use sextant::config::{NavigationConfig, PackConfig};
/// # use sextant::layout::{build_hierarchy, pack};
/// # use sextant::model::repo::FileEntry;
/// # use sextant::navigation::{Mode, NavigationController};
/// let tree = pack(
///     &build_hierarchy(&[FileEntry::file("a.rs", 1), FileEntry::file("b.rs", 1)]),
///     PackConfig::default().viewport(),
///     &PackConfig::default(),
/// );
/// let mut controller = NavigationController::new(NavigationConfig::default());
/// controller.play(&tree);
/// assert_eq!(controller.state().mode(), Mode::Playing);
///
/// let visited = controller.advance(&tree, Duration::from_millis(440));
/// assert_eq!(visited, ["a.rs", "b.rs"]);
/// ```
#[derive(Debug, Clone)]
pub struct NavigationController {
    config: NavigationConfig,
    state: NavigationState,
    playback: Option<Playback>,
    transition: Option<ZoomTransition>,
}

impl NavigationController {
    pub fn new(config: NavigationConfig) -> Self {
        Self {
            config,
            state: NavigationState::default(),
            playback: None,
            transition: None,
        }
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    /// Marks `path` active and zooms onto it.
    ///
    /// Unknown paths are ignored. Playback, if any, keeps running.
    pub fn select(&mut self, tree: &PackedTree, path: &str) {
        let Some(id) = tree.find(path) else {
            debug!(path; "Ignoring selection of unknown path");
            return;
        };
        let node = tree.node(id);
        let viewport = tree.viewport();

        let (min, max) = self.config.focus_scale_extent();
        let fit = viewport.width() / (node.radius() * self.config.focus_fit());
        let scale = if fit.is_finite() { fit.max(min).min(max) } else { max };
        let translate = viewport.center().sub_point(node.center().scale(scale));
        let target = ViewTransform::new(translate, scale);
        trace!(path, scale; "Zooming onto node");

        let duration = self.config.transition();
        self.transition = (!duration.is_zero()).then(|| ZoomTransition {
            from: self.displayed_transform(),
            to: target,
            elapsed: Duration::ZERO,
            duration,
        });
        self.state.transform = target;
        self.state.active_path = Some(path.to_string());
    }

    /// Updates the hover target; `None` means the pointer left every node.
    ///
    /// Hovering a node while playing stops playback. Unknown paths are
    /// treated like `None`.
    pub fn hover(&mut self, tree: &PackedTree, path: Option<&str>) {
        let Some(node) = path.and_then(|path| tree.find(path)).map(|id| tree.node(id)) else {
            self.state.hover = None;
            return;
        };

        self.state.hover = Some(HoverInfo {
            name: node.name().to_string(),
            path: if node.path().is_empty() {
                node.name().to_string()
            } else {
                node.path().to_string()
            },
            kind: node.kind_label(),
            size: node.value(),
        });
        if self.state.playing {
            debug!(path = node.path(); "Hover interrupts playback");
            self.cancel_playback();
        }
    }

    /// Hit-tests a surface point against the displayed transform and hovers
    /// whatever is under it.
    pub fn hover_at(&mut self, tree: &PackedTree, surface_point: Point) {
        let point = self.displayed_transform().invert(surface_point);
        let path = tree.node_at(point).map(|id| tree.node(id).path().to_string());
        self.hover(tree, path.as_deref());
    }

    /// Starts (or restarts) the leaf traversal from the first leaf.
    ///
    /// Does nothing when the tree has no leaves.
    pub fn play(&mut self, tree: &PackedTree) {
        let leaves = tree.leaves();
        if leaves.is_empty() {
            debug!("Nothing to play");
            return;
        }
        self.cancel_playback();

        info!(leaves = leaves.len(); "Playback started");
        self.playback = Some(Playback {
            task: RepeatingTask::new(self.config.play_interval()),
            leaves,
            index: 0,
        });
        self.state.playing = true;
    }

    /// Stops playback. Calling it again is harmless.
    pub fn stop(&mut self) {
        self.cancel_playback();
    }

    /// Direct manipulation of the view; the scale is clamped and any running
    /// zoom animation is dropped.
    pub fn pan_zoom(&mut self, transform: ViewTransform) {
        let (min, max) = self.config.scale_extent();
        self.transition = None;
        self.state.transform = transform.with_scale_clamped(min, max);
    }

    /// Moves time forward, returning the paths selected by playback ticks
    /// that became due, in order.
    pub fn advance(&mut self, tree: &PackedTree, elapsed: Duration) -> Vec<String> {
        if let Some(transition) = &mut self.transition {
            transition.elapsed += elapsed;
            if transition.is_finished() {
                self.transition = None;
            }
        }

        let Some(playback) = &mut self.playback else {
            return Vec::new();
        };
        let due = playback.task.advance(elapsed) as usize;
        let replayed = due.min(MAX_REPLAYED_TICKS);
        let len = playback.leaves.len();
        if due > replayed {
            // Ticks older than the replay window only move the cursor
            playback.index = (playback.index + (due - replayed) % len) % len;
            debug!(due, replayed; "Playback skipped stale ticks");
        }
        let mut visited = Vec::with_capacity(replayed);
        for _ in 0..replayed {
            visited.push(playback.leaves[playback.index].clone());
            playback.index = (playback.index + 1) % playback.leaves.len();
        }

        for path in &visited {
            self.select(tree, path);
        }
        visited
    }

    /// The transform to draw with right now, mid-animation if one runs
    pub fn displayed_transform(&self) -> ViewTransform {
        self.transition
            .as_ref()
            .map_or(self.state.transform, ZoomTransition::current)
    }

    pub fn is_animating(&self) -> bool {
        self.transition.is_some()
    }

    /// Cancels playback and any zoom animation ahead of a state replacement
    pub fn shutdown(&mut self) {
        self.cancel_playback();
        self.transition = None;
    }

    fn cancel_playback(&mut self) {
        if let Some(mut playback) = self.playback.take() {
            playback.task.cancel();
            info!(fired = playback.task.fired(); "Playback stopped");
        }
        self.state.playing = false;
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;
    use crate::{
        config::PackConfig,
        layout::{build_hierarchy, pack},
        model::repo::FileEntry,
    };

    const TICK: Duration = Duration::from_millis(220);

    fn tree(entries: &[FileEntry]) -> PackedTree {
        let config = PackConfig::default();
        pack(&build_hierarchy(entries), config.viewport(), &config)
    }

    fn abc() -> PackedTree {
        tree(&[
            FileEntry::file("a", 1),
            FileEntry::file("b", 1),
            FileEntry::file("c", 1),
        ])
    }

    fn controller() -> NavigationController {
        NavigationController::new(NavigationConfig::default())
    }

    #[test]
    fn test_playback_cycles_through_leaves() {
        let tree = abc();
        let mut nav = controller();
        nav.play(&tree);

        let mut visited = Vec::new();
        for _ in 0..4 {
            visited.extend(nav.advance(&tree, TICK));
        }
        assert_eq!(visited, ["a", "b", "c", "a"]);
        assert_eq!(nav.state().active_path(), Some("a"));
    }

    #[test]
    fn test_no_selection_after_stop() {
        let tree = abc();
        let mut nav = controller();
        nav.play(&tree);
        nav.advance(&tree, TICK);
        nav.stop();
        nav.stop();

        assert!(nav.advance(&tree, TICK * 5).is_empty());
        assert_eq!(nav.state().active_path(), Some("a"));
        assert_eq!(nav.state().mode(), Mode::Idle);
    }

    #[test]
    fn test_play_without_leaves_is_noop() {
        let tree = tree(&[]);
        let mut nav = controller();
        nav.play(&tree);
        assert_eq!(nav.state().mode(), Mode::Idle);
        assert!(!nav.state().is_playing());
    }

    #[test]
    fn test_hover_interrupts_playback() {
        let tree = abc();
        let mut nav = controller();
        nav.play(&tree);
        nav.hover(&tree, Some("b"));

        assert_eq!(nav.state().mode(), Mode::Hovering);
        assert!(nav.advance(&tree, TICK * 3).is_empty());

        let info = nav.state().hover_info().unwrap();
        assert_eq!(info.name(), "b");
        assert_eq!(info.kind(), "file");
        assert_eq!(info.tooltip(), "file • 1 units");

        nav.hover(&tree, None);
        assert_eq!(nav.state().mode(), Mode::Idle);
    }

    #[test]
    fn test_hover_folder_reports_value() {
        let tree = tree(&[FileEntry::file("src/a.js", 10), FileEntry::file("src/b.js", 5)]);
        let mut nav = controller();
        nav.hover(&tree, Some("src"));

        let info = nav.state().hover_info().unwrap();
        assert_eq!(info.kind(), "folder");
        assert_eq!(info.size(), 15);
        assert_eq!(info.tooltip(), "folder • 15 units");
    }

    #[test]
    fn test_select_zooms_onto_node() {
        let tree = tree(&[FileEntry::file("src/a.js", 10), FileEntry::file("src/b.js", 5)]);
        let mut nav = controller();
        nav.select(&tree, "src/b.js");

        let node = tree.node(tree.find("src/b.js").unwrap());
        let target = nav.state().transform();
        let expected = (720.0 / (node.radius() * 2.2)).clamp(0.9, 2.2);
        assert_approx_eq!(f32, target.scale(), expected);

        // The node centre lands on the viewport centre
        let on_screen = target.apply(node.center());
        assert_approx_eq!(f32, on_screen.x(), 360.0, epsilon = 0.01);
        assert_approx_eq!(f32, on_screen.y(), 210.0, epsilon = 0.01);
        assert_eq!(nav.state().active_path(), Some("src/b.js"));
    }

    #[test]
    fn test_select_unknown_path_is_ignored() {
        let tree = abc();
        let mut nav = controller();
        nav.select(&tree, "a");
        let before = nav.state().clone();
        nav.select(&tree, "does/not/exist");
        assert_eq!(nav.state(), &before);
    }

    #[test]
    fn test_select_while_playing_keeps_playing() {
        let tree = abc();
        let mut nav = controller();
        nav.play(&tree);
        nav.select(&tree, "c");
        assert_eq!(nav.state().mode(), Mode::Playing);
    }

    #[test]
    fn test_zoom_transition_eases_to_target() {
        let tree = abc();
        let mut nav = controller();
        nav.select(&tree, "b");
        assert!(nav.is_animating());
        assert_eq!(nav.displayed_transform(), ViewTransform::identity());

        nav.advance(&tree, Duration::from_millis(325));
        let halfway = nav.displayed_transform();
        let target = nav.state().transform();
        assert_approx_eq!(f32, halfway.scale(), (1.0 + target.scale()) / 2.0, epsilon = 0.001);

        nav.advance(&tree, Duration::from_millis(325));
        assert!(!nav.is_animating());
        assert_eq!(nav.displayed_transform(), target);
    }

    #[test]
    fn test_pan_zoom_clamps_and_wins() {
        let tree = abc();
        let mut nav = controller();
        nav.select(&tree, "a");
        nav.pan_zoom(ViewTransform::new(Point::new(3.0, 4.0), 10.0));

        assert!(!nav.is_animating());
        let transform = nav.displayed_transform();
        assert_approx_eq!(f32, transform.scale(), 2.5);
        assert_eq!(transform.translate(), Point::new(3.0, 4.0));

        nav.pan_zoom(ViewTransform::new(Point::default(), 0.1));
        assert_approx_eq!(f32, nav.state().transform().scale(), 0.7);
    }

    #[test]
    fn test_hover_at_uses_displayed_transform() {
        let tree = tree(&[FileEntry::file("only.rs", 1)]);
        let mut nav = controller();
        let leaf = tree.node(tree.find("only.rs").unwrap());

        nav.pan_zoom(ViewTransform::new(Point::new(10.0, 20.0), 2.0));
        let surface = nav.displayed_transform().apply(leaf.center());
        nav.hover_at(&tree, surface);
        assert_eq!(nav.state().hover_info().map(HoverInfo::path), Some("only.rs"));

        nav.hover_at(&tree, Point::new(-500.0, -500.0));
        assert_eq!(nav.state().hover_info(), None);
    }

    #[test]
    fn test_easing_endpoints() {
        assert_approx_eq!(f32, ease_cubic_in_out(0.0), 0.0);
        assert_approx_eq!(f32, ease_cubic_in_out(0.5), 0.5);
        assert_approx_eq!(f32, ease_cubic_in_out(1.0), 1.0);
        assert!(ease_cubic_in_out(0.25) < 0.25);
    }

    #[test]
    fn test_long_pause_replays_bounded_ticks() {
        let tree = abc();
        let mut nav = controller();
        nav.play(&tree);

        let visited = nav.advance(&tree, TICK * (MAX_REPLAYED_TICKS as u32 * 3 + 1));
        assert_eq!(visited.len(), MAX_REPLAYED_TICKS);
        assert_eq!(visited.first().map(String::as_str), Some("a"));
        assert_eq!(visited.last().map(String::as_str), Some("a"));
        assert_eq!(nav.advance(&tree, TICK), ["b"]);

        assert_eq!(nav.advance(&tree, Duration::MAX).len(), MAX_REPLAYED_TICKS);
        assert_eq!(nav.state().mode(), Mode::Playing);
    }

    #[test]
    fn test_reversed_scale_ranges_do_not_panic() {
        let config: NavigationConfig = serde_json::from_str(
            r#"{"min_scale": 3.0, "max_scale": 1.0, "focus_min_scale": 4.0, "focus_max_scale": 2.0}"#,
        )
        .unwrap();
        let tree = abc();
        let mut nav = NavigationController::new(config);

        nav.pan_zoom(ViewTransform::new(Point::default(), 2.0));
        assert_approx_eq!(f32, nav.state().transform().scale(), 1.0);

        nav.select(&tree, "a");
        assert_approx_eq!(f32, nav.state().transform().scale(), 2.0);
    }
}
