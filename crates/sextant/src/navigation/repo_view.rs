use std::time::Duration;

use log::info;

use sextant_core::{color::Theme, geometry::Point, scene::Scene, scene::ViewTransform};

use crate::{
    config::{NavigationConfig, PackConfig},
    layout::{PackedTree, build_hierarchy, pack},
    model::repo::{Commit, FileEntry, RepositorySnapshot},
    navigation::{NavigationController, NavigationState},
};

/// A packed repository tree together with the navigation state over it.
///
/// The tree and the controller are only ever replaced as a pair: loading new
/// entries cancels playback and animations first, then swaps both.
#[derive(Debug, Clone)]
pub struct RepoView {
    pack_config: PackConfig,
    navigation_config: NavigationConfig,
    theme: Theme,
    tree: PackedTree,
    controller: NavigationController,
    commits: Vec<Commit>,
}

impl RepoView {
    pub fn new(pack_config: PackConfig, navigation_config: NavigationConfig, theme: Theme) -> Self {
        let tree = pack(&build_hierarchy(&[]), pack_config.viewport(), &pack_config);
        Self {
            pack_config,
            navigation_config,
            theme,
            tree,
            controller: NavigationController::new(navigation_config),
            commits: Vec::new(),
        }
    }

    /// Replaces the listing, resetting every bit of navigation state.
    pub fn set_entries(&mut self, entries: &[FileEntry]) {
        self.controller.shutdown();

        let hierarchy = build_hierarchy(entries);
        self.tree = pack(&hierarchy, self.pack_config.viewport(), &self.pack_config);
        self.controller = NavigationController::new(self.navigation_config);
        info!(entries = entries.len(), leaves = self.tree.leaves().len(); "Repository view loaded");
    }

    /// Loads entries and commits from a backend snapshot
    pub fn set_snapshot(&mut self, snapshot: &RepositorySnapshot) {
        self.set_entries(snapshot.entries());
        self.commits = snapshot.commits().to_vec();
    }

    pub fn tree(&self) -> &PackedTree {
        &self.tree
    }

    pub fn state(&self) -> &NavigationState {
        self.controller.state()
    }

    pub fn commits(&self) -> &[Commit] {
        &self.commits
    }

    pub fn select(&mut self, path: &str) {
        self.controller.select(&self.tree, path);
    }

    pub fn hover(&mut self, path: Option<&str>) {
        self.controller.hover(&self.tree, path);
    }

    pub fn hover_at(&mut self, surface_point: Point) {
        self.controller.hover_at(&self.tree, surface_point);
    }

    pub fn play(&mut self) {
        self.controller.play(&self.tree);
    }

    pub fn stop(&mut self) {
        self.controller.stop();
    }

    pub fn pan_zoom(&mut self, transform: ViewTransform) {
        self.controller.pan_zoom(transform);
    }

    pub fn advance(&mut self, elapsed: Duration) -> Vec<String> {
        self.controller.advance(&self.tree, elapsed)
    }

    /// Tooltip for the hovered node, if any
    pub fn tooltip(&self) -> Option<String> {
        self.state().hover_info().map(|info| info.tooltip())
    }

    /// The tree drawn with the current highlight and displayed transform
    pub fn scene(&self) -> Scene {
        self.tree.to_scene(
            self.state().active_path(),
            self.controller.displayed_transform(),
            &self.pack_config,
            &self.theme,
        )
    }
}

#[cfg(test)]
mod tests {
    use sextant_core::draw::RenderLayer;

    use super::*;
    use crate::navigation::Mode;

    fn view() -> RepoView {
        RepoView::new(PackConfig::default(), NavigationConfig::default(), Theme::default())
    }

    #[test]
    fn test_set_entries_cancels_playback_before_replacing() {
        let mut view = view();
        view.set_entries(&[FileEntry::file("a.rs", 1), FileEntry::file("b.rs", 1)]);
        view.play();
        view.advance(Duration::from_millis(220));
        assert_eq!(view.state().mode(), Mode::Playing);

        view.set_entries(&[FileEntry::file("c.rs", 1)]);
        assert_eq!(view.state().mode(), Mode::Idle);
        assert_eq!(view.state().active_path(), None);
        assert!(view.advance(Duration::from_secs(2)).is_empty());
        assert_eq!(view.tree().leaves(), ["c.rs"]);
    }

    #[test]
    fn test_scene_follows_selection() {
        let mut view = view();
        view.set_entries(&[FileEntry::file("lib/x.ts", 3), FileEntry::file("y.md", 2)]);
        assert_eq!(view.scene().layer(RenderLayer::Highlight).count(), 0);

        view.select("y.md");
        let scene = view.scene();
        assert_eq!(scene.layer(RenderLayer::Highlight).count(), 1);
        // Non-root nodes: lib, lib/x.ts, y.md
        assert_eq!(scene.layer(RenderLayer::Content).count(), 3);
    }

    #[test]
    fn test_tooltip() {
        let mut view = view();
        view.set_entries(&[FileEntry::file("pkg/a.json", 0)]);
        assert_eq!(view.tooltip(), None);

        view.hover(Some("pkg/a.json"));
        assert_eq!(view.tooltip().as_deref(), Some("file • 1 units"));
    }

    #[test]
    fn test_empty_view() {
        let mut view = view();
        view.play();
        assert_eq!(view.state().mode(), Mode::Idle);
        assert!(view.scene().is_empty());
    }
}
