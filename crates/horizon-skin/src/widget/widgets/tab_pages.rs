//! Tab page container.

use horizon_skin_core::Rect;
use horizon_skin_render::{BlendMode, Color, ImageBuffer};

use crate::skin::{AttributeSet, ParseContext};
use crate::widget::{Composite, Drawable, Widget, WidgetCx, WidgetId, WidgetNode};

/// A container whose children are pages, exactly one of them visible.
///
/// The widget only records the selection; the window applies it (page
/// visibility, focus, native children, exclusion region). A control bound
/// to a command selects the page given by the reflected value.
#[derive(Debug, Clone, Default)]
pub struct TabPages {
    selected: usize,
    color: Option<Color>,
}

impl TabPages {
    /// Create a container with the first page selected.
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a page initially.
    pub fn with_selected(mut self, index: usize) -> Self {
        self.selected = index;
        self
    }
}

impl Widget for TabPages {
    fn kind(&self) -> &'static str {
        "TabPages"
    }

    fn parse_attributes(&mut self, _node: &mut WidgetNode, attrs: &AttributeSet, cx: &mut ParseContext<'_>) {
        let selected = cx.int(attrs, "Selected", 0);
        self.selected = usize::try_from(selected).unwrap_or_else(|_| {
            cx.warn(format!("negative page index {selected}, selecting the first page"));
            0
        });
        self.color = cx.color(attrs, "Color");
    }

    fn reflect_value(&mut self, cx: &mut WidgetCx<'_>, value: f32, _param: &str) {
        cx.set_value_silently(value);
        let index = value.round().max(0.0) as usize;
        cx.select_page(index);
    }

    fn as_drawable(&self) -> Option<&dyn Drawable> {
        self.color.map(|_| self as &dyn Drawable)
    }

    fn as_composite(&self) -> Option<&dyn Composite> {
        Some(self)
    }

    fn as_composite_mut(&mut self) -> Option<&mut dyn Composite> {
        Some(self)
    }
}

impl Drawable for TabPages {
    fn draw(&self, node: &WidgetNode, target: &mut ImageBuffer, clip: &Rect) {
        if let Some(color) = self.color {
            target.fill_rect(&node.abs_rect(), color, clip, BlendMode::Alpha);
        }
    }
}

impl Composite for TabPages {
    fn focus_scope(&self, children: &[WidgetId]) -> Vec<WidgetId> {
        children.get(self.selected).copied().into_iter().collect()
    }

    fn selected(&self) -> usize {
        self.selected
    }

    fn set_selected(&mut self, index: usize) {
        self.selected = index;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    #[test]
    fn test_focus_scope_is_the_selected_page() {
        let mut keys: SlotMap<WidgetId, ()> = SlotMap::with_key();
        let pages: Vec<WidgetId> = (0..3).map(|_| keys.insert(())).collect();

        let mut tabs = TabPages::new().with_selected(1);
        assert_eq!(tabs.focus_scope(&pages), vec![pages[1]]);
        tabs.set_selected(7);
        assert!(tabs.focus_scope(&pages).is_empty());
    }
}
