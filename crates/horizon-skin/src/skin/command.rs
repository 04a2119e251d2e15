//! Commands emitted by controls.

use crate::widget::{ControlState, WidgetId};
use crate::window::WindowId;

/// Identity of the control that emitted a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommandSource {
    pub window: WindowId,
    pub widget: WidgetId,
}

/// A command travelling from a control through its window and the skin to
/// the application.
///
/// # Example
///
/// ```
/// use horizon_skin::skin::Command;
///
/// let cmd = Command::new("Vol").with_value(0.7).with_param("left");
/// assert_eq!(cmd.name, "Vol");
/// assert!(cmd.source.is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    /// Command name, shared by every control bound to it.
    pub name: String,
    /// Control value at emission.
    pub value: f32,
    /// Free-form parameter, empty if unset.
    pub param: String,
    /// Target, for commands acting on another window.
    pub target: Option<String>,
    /// Application-defined type tag.
    pub type_tag: Option<String>,
    /// Emitting control. Programmatic commands have none.
    pub source: Option<CommandSource>,
}

impl Command {
    /// A command with value 0 and no parameter.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: 0.0,
            param: String::new(),
            target: None,
            type_tag: None,
            source: None,
        }
    }

    /// Build the command a control emits for its current value.
    pub fn from_control(control: &ControlState) -> Self {
        Self {
            name: control.command().to_string(),
            value: control.value(),
            param: control.param().to_string(),
            target: control.target().map(str::to_string),
            type_tag: control.type_tag().map(str::to_string),
            source: None,
        }
    }

    /// Set the value.
    pub fn with_value(mut self, value: f32) -> Self {
        self.value = value;
        self
    }

    /// Set the parameter.
    pub fn with_param(mut self, param: impl Into<String>) -> Self {
        self.param = param.into();
        self
    }

    /// Set the target.
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Set the type tag.
    pub fn with_type_tag(mut self, type_tag: impl Into<String>) -> Self {
        self.type_tag = Some(type_tag.into());
        self
    }

    /// Set the source.
    pub fn with_source(mut self, window: WindowId, widget: WidgetId) -> Self {
        self.source = Some(CommandSource { window, widget });
        self
    }
}
