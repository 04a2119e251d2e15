//! Native-backed controls.

use crate::platform::{NativeHandle, NativeKind};
use crate::skin::{AttributeSet, ParseContext};
use crate::widget::{NativeBacked, Widget, WidgetCx, WidgetNode};

/// An edit box, list box or tree view realized as a native child control.
///
/// The window creates the native child when its surface is created and
/// destroys it with the surface; in between it keeps the child's rectangle,
/// visibility and enabled state in sync with the node. The area the child
/// covers is excluded from the post-draw pass and presentation.
///
/// A reflected command parameter replaces the shown text.
#[derive(Debug, Clone)]
pub struct NativeControl {
    kind: NativeKind,
    handle: Option<NativeHandle>,
    text: String,
}

impl NativeControl {
    /// Create a control of the given kind.
    pub fn new(kind: NativeKind) -> Self {
        Self {
            kind,
            handle: None,
            text: String::new(),
        }
    }

    /// Set the initial text.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Replace the text. The window pushes it to the native child on the
    /// next sync.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }
}

impl Widget for NativeControl {
    fn kind(&self) -> &'static str {
        match self.kind {
            NativeKind::Edit => "Edit",
            NativeKind::List => "List",
            NativeKind::Tree => "Tree",
        }
    }

    fn parse_attributes(&mut self, _node: &mut WidgetNode, attrs: &AttributeSet, cx: &mut ParseContext<'_>) {
        if let Some(raw) = attrs.get("Native") {
            match NativeKind::parse(raw) {
                Some(kind) => self.kind = kind,
                None => cx.warn(format!("unknown native kind '{raw}'")),
            }
        }
        if let Some(text) = cx.string(attrs, "Text") {
            self.text = text;
        }
    }

    fn reflect_value(&mut self, cx: &mut WidgetCx<'_>, value: f32, param: &str) {
        cx.set_value_silently(value);
        if !param.is_empty() && param != self.text {
            self.text = param.to_string();
            cx.sync_native();
        }
    }

    fn as_native(&self) -> Option<&dyn NativeBacked> {
        Some(self)
    }

    fn as_native_mut(&mut self) -> Option<&mut dyn NativeBacked> {
        Some(self)
    }
}

impl NativeBacked for NativeControl {
    fn native_kind(&self) -> NativeKind {
        self.kind
    }

    fn handle(&self) -> Option<NativeHandle> {
        self.handle
    }

    fn set_handle(&mut self, handle: Option<NativeHandle>) {
        self.handle = handle;
    }

    fn text(&self) -> &str {
        &self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skin::SkinConfig;
    use crate::widget::{ControlState, Effects, WidgetId};
    use horizon_skin_core::Rect;

    #[test]
    fn test_reflected_param_becomes_text() {
        let mut control = NativeControl::new(NativeKind::Edit).with_text("old");
        let mut node = WidgetNode::new(Rect::new(0, 0, 40, 12)).with_control(ControlState::new("Preset"));
        let config = SkinConfig::default();

        let mut effects = Effects::default();
        control.reflect_value(
            &mut WidgetCx::new(WidgetId::default(), &mut node, &mut effects, &config),
            0.0,
            "Warm pad",
        );
        assert_eq!(control.text(), "Warm pad");
        assert!(effects.sync_native);
        assert!(effects.commands.is_empty());

        let mut effects = Effects::default();
        control.reflect_value(
            &mut WidgetCx::new(WidgetId::default(), &mut node, &mut effects, &config),
            0.0,
            "",
        );
        assert_eq!(control.text(), "Warm pad");
        assert!(!effects.sync_native);
    }
}
