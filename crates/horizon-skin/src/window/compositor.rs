//! Invalidation, compositing and presentation.
//!
//! Painting happens in two passes over every dirty rectangle:
//!
//! 1. The background and each visible drawable widget are composited, back
//!    to front, into the window's off-screen image. Every widget is clipped
//!    to its parent's absolute rectangle.
//! 2. A copy of the dirty part is handed to a [`DrawContext`] for post-draw
//!    (text, focus frame) and presented. Both steps are clipped to the
//!    dirty rectangle minus the exclusion region covered by native
//!    children.

use horizon_skin_core::logging::{span_names, targets};
use horizon_skin_core::{Point, Rect, Region};
use horizon_skin_render::{BlendMode, DrawContext, ImageBuffer};

use super::Window;
use crate::platform::Platform;
use crate::widget::WidgetId;

impl Window {
    /// Mark part of a widget dirty. `rect` is widget-local; `None` is the
    /// whole widget.
    ///
    /// Invalidating a widget that is not effectively visible does nothing
    /// unless `force` is set, which visibility changes use to repaint the
    /// area a widget used to cover. Returns `true` if damage was recorded.
    pub fn invalidate(&mut self, id: WidgetId, rect: Option<Rect>, force: bool) -> bool {
        let Some(node) = self.tree.get(id) else {
            return false;
        };
        if !force && !self.tree.is_effectively_visible(id) {
            tracing::trace!(target: targets::COMPOSITOR, ?id, "skip invalidate of hidden widget");
            return false;
        }
        let abs = node.abs_rect();
        let dirty = match rect {
            Some(local) => match local.offset(abs.left(), abs.top()).intersect(&abs) {
                Some(dirty) => dirty,
                None => return false,
            },
            None => abs,
        };
        if dirty.is_empty() {
            return false;
        }
        self.damage.add_damage(dirty);
        true
    }

    /// Mark the whole client area dirty.
    pub fn invalidate_all(&mut self) {
        self.damage.invalidate_all();
    }

    /// The pending dirty region.
    pub fn dirty_region(&self) -> &Region {
        self.damage.damage_region()
    }

    /// The area covered by visible native children.
    pub fn exclusion(&self) -> &Region {
        &self.exclusion
    }

    /// The off-screen composite image.
    pub fn composite(&self) -> &ImageBuffer {
        &self.composite
    }

    /// Repaint the pending dirty region right away.
    pub fn update(&mut self, platform: &mut dyn Platform) {
        if !self.damage.has_damage() {
            return;
        }
        let dirty = self.damage.take();
        if self.surface.is_none() {
            tracing::trace!(target: targets::COMPOSITOR, window = %self.name, "no surface, dropping damage");
            return;
        }
        self.redraw(platform, Some(&dirty));
    }

    /// Composite and present `region`, or the whole client area.
    pub(crate) fn redraw(&mut self, platform: &mut dyn Platform, region: Option<&Region>) {
        let Some(surface) = self.surface else {
            return;
        };
        if self.painting {
            tracing::warn!(target: targets::COMPOSITOR, window = %self.name, "reentrant redraw refused");
            return;
        }
        self.painting = true;
        let _span = tracing::trace_span!(target: targets::COMPOSITOR, span_names::REDRAW, window = %self.name).entered();

        let client = self.client_rect();
        let rects: Vec<Rect> = match region {
            Some(region) => region.intersect_rect(&client).rects().to_vec(),
            None => vec![client],
        };
        // A paint request covers everything still pending inside it.
        for rect in &rects {
            self.damage_subtract(rect);
        }
        for rect in rects {
            self.composite_rect(&rect);
            self.present_rect(platform, surface, &rect);
        }
        self.painting = false;
    }

    fn damage_subtract(&mut self, rect: &Rect) {
        if !self.damage.has_damage() {
            return;
        }
        let mut remaining = self.damage.take();
        remaining.subtract_rect(rect);
        self.damage.add_region(&remaining);
    }

    /// Pass one: rebuild the composite image inside `rect`.
    fn composite_rect(&mut self, rect: &Rect) {
        let client = self.client_rect();
        self.composite
            .fill_rect(rect, self.background.color, rect, BlendMode::Opaque);
        if let Some(image) = &self.background.image {
            if self.background.tile {
                self.composite.tile(image, &client, rect, BlendMode::Alpha);
            } else {
                self.composite.draw_image(image, Point::ZERO, rect, BlendMode::Alpha);
            }
        }
        let root = self.tree.root();
        self.composite_subtree(root, *rect);
    }

    fn composite_subtree(&mut self, id: WidgetId, clip: Rect) {
        let Some(node) = self.tree.get(id) else {
            return;
        };
        if !node.is_visible() {
            return;
        }
        let Some(clip) = clip.intersect(&node.abs_rect()) else {
            return;
        };
        if let Some(drawable) = self.tree.behavior(id).and_then(|b| b.as_drawable()) {
            drawable.draw(node, &mut self.composite, &clip);
        }
        for child in node.children().to_vec() {
            self.composite_subtree(child, clip);
        }
    }

    /// Pass two: post-draw over a copy of `rect` and present it.
    fn present_rect(&mut self, platform: &mut dyn Platform, surface: crate::platform::SurfaceHandle, rect: &Rect) {
        let mut visible = Region::from(*rect);
        visible.subtract(&self.exclusion);
        if visible.is_empty() {
            return;
        }
        let Some(mut bitmap) = self.composite.sub_image(rect) else {
            return;
        };
        {
            let mut cx = DrawContext::new(&mut bitmap, rect.origin, visible.clone());
            for id in self.tree.preorder(self.tree.root()) {
                if !self.tree.is_effectively_visible(id) {
                    continue;
                }
                let (Some(node), Some(behavior)) = (self.tree.get(id), self.tree.behavior(id)) else {
                    continue;
                };
                if !cx.is_visible(&node.abs_rect()) {
                    continue;
                }
                if let Some(drawable) = behavior.as_drawable() {
                    drawable.post_draw(node, &mut cx);
                }
                if self.skin_config.show_focus_frame
                    && node.is_focused()
                    && behavior.as_focusable().is_some_and(|f| f.shows_focus_frame())
                {
                    cx.stroke_rect(node.abs_rect(), self.skin_config.focus_color);
                }
            }
        }
        for area in visible.iter() {
            platform.present(surface, &bitmap, rect.origin, area);
        }
    }

    /// Recompute the area covered by visible native children.
    pub(crate) fn regenerate_exclusion(&mut self) {
        let client = self.client_rect();
        let mut exclusion = Region::new();
        for id in self.tree.preorder(self.tree.root()) {
            let is_native = self.tree.behavior(id).is_some_and(|b| b.as_native().is_some());
            if !is_native || !self.tree.is_effectively_visible(id) {
                continue;
            }
            if let Some(rect) = self.tree.get(id).and_then(|n| n.abs_rect().intersect(&client)) {
                exclusion.union_rect(&rect);
            }
        }
        if !exclusion.covers_same(&self.exclusion) {
            tracing::trace!(target: targets::COMPOSITOR, window = %self.name, rects = exclusion.len(), "exclusion changed");
        }
        self.exclusion = exclusion;
    }

    /// Rebuild the composite image for the current size and repaint all.
    pub(crate) fn reset_background(&mut self) {
        let size = self.tree.get(self.tree.root()).map_or(self.size(), |n| n.size());
        self.composite = ImageBuffer::new(size);
        self.damage.set_viewport(Rect::from_size(size));
        self.exclusion.clear();
        self.regenerate_exclusion();
        self.damage.invalidate_all();
        tracing::debug!(target: targets::COMPOSITOR, window = %self.name, ?size, "background reset");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use horizon_skin_core::Size;
    use horizon_skin_render::Color;

    use super::*;
    use crate::platform::{HeadlessPlatform, NativeKind};
    use crate::skin::SkinConfig;
    use crate::widget::widgets::{NativeControl, Panel};
    use crate::widget::WidgetNode;
    use crate::window::{Background, WindowConfig, WindowId};

    fn window() -> Window {
        Window::new(
            WindowId::default(),
            "main",
            WindowConfig::new("Main").with_size(100, 60),
            SkinConfig::default(),
        )
    }

    #[test]
    fn test_invalidate_translates_to_window_coordinates() {
        let mut w = window();
        let root = w.tree.root();
        let panel = w
            .tree
            .insert(root, WidgetNode::new(Rect::new(20, 10, 30, 30)), Box::new(Panel::new()))
            .unwrap();
        w.damage.clear();

        assert!(w.invalidate(panel, Some(Rect::new(5, 5, 10, 10)), false));
        assert_eq!(w.dirty_region().bounds(), Some(Rect::new(25, 15, 10, 10)));
    }

    #[test]
    fn test_hidden_widget_is_not_invalidated_unless_forced() {
        let mut w = window();
        let root = w.tree.root();
        let panel = w
            .tree
            .insert(
                root,
                WidgetNode::new(Rect::new(0, 0, 10, 10)).with_visible(false),
                Box::new(Panel::new()),
            )
            .unwrap();
        w.damage.clear();

        assert!(!w.invalidate(panel, None, false));
        assert!(w.dirty_region().is_empty());
        assert!(w.invalidate(panel, None, true));
        assert!(!w.dirty_region().is_empty());
    }

    #[test]
    fn test_children_are_clipped_to_their_parent() {
        let mut platform = HeadlessPlatform::new();
        let mut w = window();
        let root = w.tree.root();
        let outer = w
            .tree
            .insert(root, WidgetNode::new(Rect::new(10, 10, 20, 20)), Box::new(Panel::new().with_color(Color::BLUE)))
            .unwrap();
        w.tree
            .insert(outer, WidgetNode::new(Rect::new(10, 10, 40, 40)), Box::new(Panel::new().with_color(Color::RED)))
            .unwrap();
        w.show(&mut platform).unwrap();
        w.update(&mut platform);

        assert_eq!(w.composite().pixel(Point::new(25, 25)), Some(Color::RED));
        assert_eq!(w.composite().pixel(Point::new(35, 35)), Some(Color::BLACK));
        assert_eq!(w.composite().pixel(Point::new(12, 12)), Some(Color::BLUE));
    }

    #[test]
    fn test_tiled_background() {
        let mut platform = HeadlessPlatform::new();
        let mut w = window();
        w.set_background(Background {
            color: Color::BLACK,
            image: Some(Arc::new(ImageBuffer::filled(Size::new(7, 7), Color::GREEN))),
            tile: true,
        });
        w.show(&mut platform).unwrap();
        w.update(&mut platform);
        assert_eq!(w.composite().pixel(Point::new(99, 59)), Some(Color::GREEN));
    }

    #[test]
    fn test_presentation_skips_native_children() {
        let mut platform = HeadlessPlatform::new();
        let mut w = window();
        let root = w.tree.root();
        w.tree
            .insert(root, WidgetNode::new(Rect::new(0, 0, 100, 60)), Box::new(Panel::new().with_color(Color::WHITE)))
            .unwrap();
        w.tree
            .insert(root, WidgetNode::new(Rect::new(10, 10, 20, 20)), Box::new(NativeControl::new(NativeKind::Edit)))
            .unwrap();
        w.regenerate_exclusion();
        w.show(&mut platform).unwrap();
        w.update(&mut platform);

        assert_eq!(w.exclusion().area(), 400);
        let surface = w.surface().unwrap();
        let frame = platform.framebuffer(surface).unwrap();
        assert_eq!(frame.pixel(Point::new(50, 50)), Some(Color::WHITE));
        assert_ne!(frame.pixel(Point::new(15, 15)), Some(Color::WHITE));
    }

    #[test]
    fn test_redraw_without_surface_is_a_noop() {
        let mut platform = HeadlessPlatform::new();
        let mut w = window();
        w.invalidate_all();
        w.update(&mut platform);
        assert!(platform.calls().is_empty());
        assert!(!w.damage.has_damage());
    }
}
