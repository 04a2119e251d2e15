//! Keyboard focus and key routing.

use horizon_skin_core::logging::targets;
use horizon_skin_core::{Key, Modifiers};

use super::{Window, WindowOutput};
use crate::platform::Platform;
use crate::widget::{Direction, FocusChange, FocusManager, WidgetId};

impl Window {
    /// Offer a key to the focused control, then use it for navigation.
    ///
    /// Returns `true` if the key was consumed.
    pub fn key_down(&mut self, platform: &mut dyn Platform, key: Key, modifiers: Modifiers) -> bool {
        if let Some(focused) = self.focus.focused()
            && self.tree.is_effectively_enabled(focused)
        {
            let handled = self
                .with_behavior(platform, focused, |b, cx| b.key_down(cx, key, modifiers))
                .unwrap_or(false);
            // Nudges go through the update throttle like any other change.
            if handled {
                return true;
            }
        }

        match key {
            Key::Tab if modifiers.shift => self.focus_prev(platform),
            Key::Tab => self.focus_next(platform),
            Key::ArrowUp => self.focus_direction(platform, Direction::Up),
            Key::ArrowDown => self.focus_direction(platform, Direction::Down),
            Key::ArrowLeft => self.focus_direction(platform, Direction::Left),
            Key::ArrowRight => self.focus_direction(platform, Direction::Right),
            Key::Space | Key::Enter => {
                let Some(focused) = self.focus.focused() else {
                    return false;
                };
                if !self.tree.is_effectively_enabled(focused) {
                    return false;
                }
                self.with_behavior(platform, focused, |b, cx| b.on_click(cx));
                self.outputs.push(WindowOutput::SessionEnded);
                true
            }
            _ => false,
        }
    }

    /// Give keyboard focus to a widget. Returns `true` if focus moved.
    pub fn set_focus(&mut self, platform: &mut dyn Platform, id: WidgetId) -> bool {
        let change = self.focus.set_focus(&mut self.tree, id);
        self.apply_focus_change(platform, change)
    }

    /// Remove keyboard focus. Returns the widget that lost it.
    pub fn kill_focus(&mut self, platform: &mut dyn Platform) -> Option<WidgetId> {
        let lost = self.focus.clear_focus(&mut self.tree)?;
        self.apply_focus_change(
            platform,
            Some(FocusChange {
                lost: Some(lost),
                gained: None,
            }),
        );
        Some(lost)
    }

    /// Move focus along the chain.
    pub fn focus_next(&mut self, platform: &mut dyn Platform) -> bool {
        let change = self.focus.focus_next(&mut self.tree);
        self.apply_focus_change(platform, change)
    }

    /// Move focus backwards along the chain.
    pub fn focus_prev(&mut self, platform: &mut dyn Platform) -> bool {
        let change = self.focus.focus_previous(&mut self.tree);
        self.apply_focus_change(platform, change)
    }

    /// Move focus spatially.
    pub fn focus_direction(&mut self, platform: &mut dyn Platform, direction: Direction) -> bool {
        let change = self.focus.focus_direction(&mut self.tree, direction);
        self.apply_focus_change(platform, change)
    }

    /// The focus chain of the window.
    pub fn focus_chain(&self) -> Vec<WidgetId> {
        FocusManager::focus_chain(&self.tree)
    }

    fn apply_focus_change(&mut self, platform: &mut dyn Platform, change: Option<FocusChange>) -> bool {
        let Some(change) = change else {
            return false;
        };
        tracing::debug!(target: targets::FOCUS, window = %self.name, lost = ?change.lost, gained = ?change.gained, "focus");
        if let Some(lost) = change.lost {
            self.with_behavior(platform, lost, |b, cx| b.on_focus(cx, false));
            self.invalidate(lost, None, false);
        }
        if let Some(gained) = change.gained {
            self.with_behavior(platform, gained, |b, cx| b.on_focus(cx, true));
            self.invalidate(gained, None, false);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use horizon_skin_core::{Rect, SkinEvent};

    use super::*;
    use crate::platform::HeadlessPlatform;
    use crate::skin::SkinConfig;
    use crate::widget::widgets::{Button, Knob};
    use crate::widget::{ControlState, WidgetNode};
    use crate::window::{WindowConfig, WindowId};

    fn window_with(rects: &[Rect]) -> (HeadlessPlatform, Window, Vec<WidgetId>) {
        let platform = HeadlessPlatform::new();
        let mut w = Window::new(WindowId::default(), "main", WindowConfig::new("t"), SkinConfig::default());
        let root = w.tree.root();
        let ids = rects
            .iter()
            .enumerate()
            .map(|(i, rect)| {
                w.tree
                    .insert(
                        root,
                        WidgetNode::new(*rect).with_control(ControlState::new(format!("B{i}"))),
                        Box::new(Button::new()),
                    )
                    .unwrap()
            })
            .collect();
        (platform, w, ids)
    }

    #[test]
    fn test_tab_walks_the_chain() {
        let (mut platform, mut w, ids) = window_with(&[Rect::new(0, 0, 10, 10), Rect::new(20, 0, 10, 10)]);
        assert!(w.key_down(&mut platform, Key::Tab, Modifiers::NONE));
        assert_eq!(w.focused(), Some(ids[0]));
        w.key_down(&mut platform, Key::Tab, Modifiers::NONE);
        assert_eq!(w.focused(), Some(ids[1]));
        w.key_down(&mut platform, Key::Tab, Modifiers::SHIFT);
        assert_eq!(w.focused(), Some(ids[0]));
    }

    #[test]
    fn test_kill_focus_twice_notifies_once() {
        let (mut platform, mut w, ids) = window_with(&[Rect::new(0, 0, 10, 10)]);
        assert!(w.set_focus(&mut platform, ids[0]));
        assert!(!w.set_focus(&mut platform, ids[0]));
        assert_eq!(w.kill_focus(&mut platform), Some(ids[0]));
        assert_eq!(w.kill_focus(&mut platform), None);
        assert!(!w.tree().get(ids[0]).unwrap().is_focused());
    }

    #[test]
    fn test_space_clicks_the_focused_button() {
        let (mut platform, mut w, ids) = window_with(&[Rect::new(0, 0, 10, 10)]);
        w.set_focus(&mut platform, ids[0]);
        assert!(w.key_down(&mut platform, Key::Space, Modifiers::NONE));
        let outputs = w.take_outputs();
        assert!(outputs
            .iter()
            .any(|o| matches!(o, WindowOutput::Command(cmd) if cmd.name == "B0")));
    }

    #[test]
    fn test_focused_knob_consumes_page_keys() {
        let (mut platform, mut w, ids) = window_with(&[Rect::new(0, 20, 10, 10)]);
        let root = w.tree.root();
        let knob = w
            .tree
            .insert(
                root,
                WidgetNode::new(Rect::new(0, 0, 10, 10)).with_control(ControlState::new("Gain")),
                Box::new(Knob::new()),
            )
            .unwrap();
        w.set_focus(&mut platform, knob);
        w.handle_event(
            &mut platform,
            SkinEvent::KeyDown {
                key: Key::PageUp,
                modifiers: Modifiers::NONE,
            },
        );
        assert_eq!(w.focused(), Some(knob));
        assert!((w.value(knob).unwrap() - 0.05).abs() < 1e-6);
        let outputs = w.take_outputs();
        assert!(outputs.iter().any(|o| matches!(o, WindowOutput::Command(cmd) if cmd.name == "Gain")));
        assert!(!outputs.iter().any(|o| matches!(o, WindowOutput::SessionEnded)));

        w.set_focus(&mut platform, ids[0]);
        w.key_down(&mut platform, Key::ArrowUp, Modifiers::NONE);
        assert_eq!(w.focused(), Some(knob));
    }
}
