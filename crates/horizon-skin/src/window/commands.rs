//! Window-level command handling.
//!
//! A command emitted by a control first meets its window's command table.
//! The fixed entries act on windows; application commands registered as
//! threaded run on the window's background worker. Everything else bubbles
//! on to the skin.
//!
//! Independently of who handles a command, its value is reflected into every
//! other control bound to the same command name.

use horizon_skin_core::logging::targets;
use horizon_skin_core::{SkinEvent, Worker};

use super::Window;
use crate::error::SkinResult;
use crate::platform::Platform;
use crate::skin::Command;
use crate::widget::{Effects, WidgetCx};

/// Close the emitting window.
pub const CMD_CLOSE: &str = "Close";
/// Hide the emitting window, keeping its surface.
pub const CMD_HIDE: &str = "Hide";
/// Minimize the emitting window.
pub const CMD_MINIMIZE: &str = "Minimize";
/// Show the window named by the command target.
pub const CMD_SHOW_WINDOW: &str = "ShowWindow";
/// Toggle the window named by the command target.
pub const CMD_TOGGLE_WINDOW: &str = "ToggleWindow";

/// What the window command table resolved a command to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowAction {
    Close,
    Hide,
    Minimize,
    ShowWindow(String),
    ToggleWindow(String),
    Threaded,
}

impl Window {
    /// Look a command up in the window's command table.
    pub fn command_action(&self, command: &Command) -> Option<WindowAction> {
        let target = || command.target.clone().filter(|t| !t.is_empty());
        let action = match command.name.as_str() {
            CMD_CLOSE => WindowAction::Close,
            CMD_HIDE => WindowAction::Hide,
            CMD_MINIMIZE => WindowAction::Minimize,
            CMD_SHOW_WINDOW => WindowAction::ShowWindow(target()?),
            CMD_TOGGLE_WINDOW => WindowAction::ToggleWindow(target()?),
            name if self.threaded.contains_key(name) => WindowAction::Threaded,
            _ => return None,
        };
        Some(action)
    }

    /// Queue a threaded command on the window's worker, starting the worker
    /// on first use. The result comes back as a `WorkerDone` event in the
    /// window's queue.
    ///
    /// Returns `false` if the command is not threaded in this window.
    pub fn submit_threaded(&mut self, command: &Command) -> SkinResult<bool> {
        let Some(handler) = self.threaded.get(&command.name).cloned() else {
            return Ok(false);
        };
        if self.worker.is_none() {
            self.worker = Some(Worker::spawn(format!("{}-worker", self.name))?);
        }
        let Some(worker) = &self.worker else {
            return Ok(false);
        };
        let sender = self.queue.sender();
        let command = command.clone();
        tracing::debug!(target: targets::COMMAND, window = %self.name, command = %command.name, "threaded command queued");
        worker.submit(move || {
            let result = handler(&command);
            let done = SkinEvent::WorkerDone {
                command: command.name.clone(),
                result,
            };
            if let Err(err) = sender.post(done) {
                tracing::debug!(target: targets::COMMAND, command = %command.name, %err, "window gone, result dropped");
            }
        })?;
        Ok(true)
    }

    /// Adopt a command's value in every control bound to it, except the one
    /// that emitted it. Controls that reflect their parameter only take
    /// commands with the same parameter.
    ///
    /// Reflection never emits commands. Returns the number of controls
    /// updated.
    pub fn reflect(&mut self, platform: &mut dyn Platform, command: &Command) -> usize {
        let mut count = 0;
        for id in self.tree.controls_with_command(&command.name) {
            if command
                .source
                .is_some_and(|s| s.window == self.id && s.widget == id)
            {
                continue;
            }
            let scoped_out = self
                .tree
                .get(id)
                .and_then(|n| n.control())
                .is_some_and(|c| c.reflect_param() && c.param() != command.param);
            if scoped_out {
                continue;
            }
            let mut effects = Effects::default();
            {
                let Some((node, behavior)) = self.tree.node_and_behavior_mut(id) else {
                    continue;
                };
                let mut cx = WidgetCx::new(id, node, &mut effects, &self.skin_config);
                behavior.reflect_value(&mut cx, command.value, &command.param);
            }
            self.apply_effects(platform, id, effects, false);
            count += 1;
        }
        if count > 0 {
            tracing::trace!(target: targets::COMMAND, window = %self.name, command = %command.name, count, "value reflected");
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use horizon_skin_core::Rect;

    use super::*;
    use crate::platform::HeadlessPlatform;
    use crate::skin::SkinConfig;
    use crate::widget::widgets::{Knob, Label};
    use crate::widget::{ControlState, WidgetNode};
    use crate::window::{WindowConfig, WindowId};

    fn window() -> Window {
        Window::new(WindowId::default(), "main", WindowConfig::new("t"), SkinConfig::default())
    }

    #[test]
    fn test_command_table() {
        let mut w = window();
        w.add_threaded_command("Scan", Arc::new(|_: &Command| Ok(String::new())));

        assert_eq!(w.command_action(&Command::new("Close")), Some(WindowAction::Close));
        assert_eq!(
            w.command_action(&Command::new("ShowWindow").with_target("prefs")),
            Some(WindowAction::ShowWindow("prefs".into()))
        );
        assert_eq!(w.command_action(&Command::new("ShowWindow")), None);
        assert_eq!(w.command_action(&Command::new("Scan")), Some(WindowAction::Threaded));
        assert_eq!(w.command_action(&Command::new("Vol")), None);
    }

    #[test]
    fn test_threaded_command_posts_its_result() {
        let mut w = window();
        w.add_threaded_command(
            "Scan",
            Arc::new(|cmd: &Command| Ok(format!("scanned {}", cmd.param))),
        );
        assert!(w.submit_threaded(&Command::new("Scan").with_param("disk")).unwrap());
        assert!(w.worker().unwrap().wait_idle(Duration::from_secs(5)));

        let mut event = None;
        for _ in 0..100 {
            event = w.next_event();
            if event.is_some() {
                break;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        match event {
            Some(SkinEvent::WorkerDone { command, result }) => {
                assert_eq!(command, "Scan");
                assert_eq!(result, Ok("scanned disk".to_string()));
            }
            other => panic!("unexpected event {other:?}"),
        }
        assert!(!w.submit_threaded(&Command::new("Other")).unwrap());
    }

    #[test]
    fn test_reflection_skips_source_and_foreign_params() {
        let mut platform = HeadlessPlatform::new();
        let mut w = window();
        let root = w.tree.root();
        let knob = |param: &str, scoped: bool| {
            WidgetNode::new(Rect::new(0, 0, 10, 10)).with_control(
                ControlState::new("Vol")
                    .with_param(param)
                    .with_reflect_param(scoped),
            )
        };
        let a = w.tree.insert(root, knob("", false), Box::new(Knob::new())).unwrap();
        let b = w.tree.insert(root, knob("", false), Box::new(Knob::new())).unwrap();
        let c = w.tree.insert(root, knob("left", true), Box::new(Knob::new())).unwrap();
        let label = w
            .tree
            .insert(root, knob("", false), Box::new(Label::new()))
            .unwrap();

        let command = Command::new("Vol").with_value(0.7).with_source(w.id(), a);
        assert_eq!(w.reflect(&mut platform, &command), 2);
        assert_eq!(w.value(a), Some(0.0));
        assert_eq!(w.value(b), Some(0.7));
        assert_eq!(w.value(c), Some(0.0));
        assert_eq!(w.value(label), Some(0.7));
        assert!(w.take_outputs().is_empty());
    }
}
