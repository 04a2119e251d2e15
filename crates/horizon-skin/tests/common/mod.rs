//! Helpers shared by the integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use horizon_skin::platform::{HeadlessPlatform, PlatformCall, SurfaceHandle};
use horizon_skin::skin::{
    AppContext, AppEvent, Application, Command, PromptResult, Skin, SkinNode, WidgetFactory,
};
use horizon_skin::widget::{Focusable, Widget, WidgetCx};
use horizon_skin::window::{WindowConfig, WindowId};
use horizon_skin::SkinError;
use horizon_skin_core::{MouseButton, Point, SkinEvent};
use parking_lot::Mutex;

/// What the application saw.
#[derive(Debug, Default)]
pub struct Log {
    pub commands: Vec<Command>,
    pub events: Vec<AppEvent>,
    pub errors: Vec<String>,
    pub prompts: usize,
    pub answer: Option<PromptResult>,
}

/// An application recording every callback.
#[derive(Debug, Default, Clone)]
pub struct Recorder {
    pub log: Arc<Mutex<Log>>,
}

impl Recorder {
    pub fn commands_named(&self, name: &str) -> Vec<Command> {
        self.log
            .lock()
            .commands
            .iter()
            .filter(|c| c.name == name)
            .cloned()
            .collect()
    }
}

impl Application for Recorder {
    fn on_command(&mut self, _ctx: &mut AppContext, command: &Command) -> bool {
        self.log.lock().commands.push(command.clone());
        true
    }

    fn on_event(&mut self, _ctx: &mut AppContext, event: &AppEvent) {
        self.log.lock().events.push(event.clone());
    }

    fn display_error(&mut self, _ctx: &mut AppContext, error: &SkinError) {
        self.log.lock().errors.push(error.to_string());
    }

    fn prompt(&mut self, _ctx: &mut AppContext, _message: &str) -> PromptResult {
        let mut log = self.log.lock();
        log.prompts += 1;
        log.answer.unwrap_or(PromptResult::Accepted)
    }
}

/// A focusable control logging its hooks as `"<name> <event>"`.
#[derive(Debug)]
pub struct Tracer {
    log: Arc<Mutex<Vec<String>>>,
}

impl Tracer {
    fn record(&self, cx: &WidgetCx<'_>, what: String) {
        let name = cx.node().name().unwrap_or("?").to_string();
        self.log.lock().push(format!("{name} {what}"));
    }
}

impl Widget for Tracer {
    fn kind(&self) -> &'static str {
        "Tracer"
    }

    fn interactive(&self) -> bool {
        true
    }

    fn track_mouse_down(&mut self, cx: &mut WidgetCx<'_>, pos: Point) {
        self.record(cx, format!("down {},{}", pos.x, pos.y));
    }

    fn track_mouse_move(&mut self, cx: &mut WidgetCx<'_>, pos: Point) {
        self.record(cx, format!("move {},{}", pos.x, pos.y));
    }

    fn on_focus(&mut self, cx: &mut WidgetCx<'_>, gained: bool) {
        self.record(cx, if gained { "focus".into() } else { "blur".into() });
        cx.invalidate();
    }

    fn as_focusable(&self) -> Option<&dyn Focusable> {
        Some(self)
    }
}

impl Focusable for Tracer {}

/// A factory knowing the built-in kinds plus `Tracer`, sharing `log`.
pub fn factory_with_tracer(log: &Arc<Mutex<Vec<String>>>) -> WidgetFactory {
    let mut factory = WidgetFactory::new();
    let log = Arc::clone(log);
    factory.register("Tracer", move || {
        Box::new(Tracer {
            log: Arc::clone(&log),
        })
    });
    factory
}

/// Route `tracing` output to the test harness; `RUST_LOG` selects targets.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A skin on a headless platform with a recording application.
pub fn skin(ctx: AppContext) -> (Skin<HeadlessPlatform>, Recorder) {
    init_tracing();
    let app = Recorder::default();
    (Skin::new(HeadlessPlatform::new(), app.clone(), ctx), app)
}

/// Load and open a window, then pump until idle.
pub fn open(skin: &mut Skin<HeadlessPlatform>, name: &str, config: WindowConfig, def: &SkinNode) -> WindowId {
    let id = skin.load_window(name, config, def).unwrap();
    skin.open_window(id).unwrap();
    skin.pump();
    id
}

pub fn surface(skin: &Skin<HeadlessPlatform>, id: WindowId) -> SurfaceHandle {
    skin.window(id).unwrap().surface().unwrap()
}

pub fn press(skin: &mut Skin<HeadlessPlatform>, id: WindowId, x: i32, y: i32) {
    let pos = Point::new(x, y);
    skin.post(
        id,
        SkinEvent::PointerDown {
            pos,
            screen: pos,
            button: MouseButton::Left,
        },
    )
    .unwrap();
    skin.pump();
}

pub fn release(skin: &mut Skin<HeadlessPlatform>, id: WindowId, x: i32, y: i32) {
    let pos = Point::new(x, y);
    skin.post(
        id,
        SkinEvent::PointerUp {
            pos,
            screen: pos,
            button: MouseButton::Left,
        },
    )
    .unwrap();
    skin.pump();
}

pub fn move_to(skin: &mut Skin<HeadlessPlatform>, id: WindowId, x: i32, y: i32) {
    let pos = Point::new(x, y);
    skin.post(id, SkinEvent::PointerMove { pos, screen: pos }).unwrap();
    skin.pump();
}

pub fn present_count(skin: &Skin<HeadlessPlatform>) -> usize {
    skin.platform()
        .calls()
        .iter()
        .filter(|c| matches!(c, PlatformCall::Present { .. }))
        .count()
}
