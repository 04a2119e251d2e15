//! Application-level flows: windows, commands, workers, preferences and
//! painting through a skin on the headless platform.

mod common;

use std::time::{Duration, Instant};

use common::{move_to, open, present_count, press, release, skin, surface};
use horizon_skin::prelude::*;
use horizon_skin::skin::AppEvent;

#[test]
fn test_native_children_are_excluded_from_presentation() {
    let (mut skin, _) = skin(AppContext::default());
    let def = SkinNode::new("Window")
        .child(SkinNode::new("Edit").rect(10, 10, 40, 20).attr("Text", "hello"));
    let main = open(&mut skin, "main", WindowConfig::new("t").with_size(100, 100), &def);

    assert_eq!(skin.platform().native_children().len(), 1);
    let frame = skin.platform().framebuffer(surface(&skin, main)).unwrap();
    assert_eq!(frame.pixel(Point::new(20, 20)), Some(Color::TRANSPARENT));
    assert_eq!(frame.pixel(Point::new(5, 5)), Some(Color::BLACK));
    assert_eq!(frame.pixel(Point::new(55, 25)), Some(Color::BLACK));
}

#[test]
fn test_removing_a_subtree_releases_what_it_held() {
    let (mut skin, _) = skin(AppContext::default());
    let def = SkinNode::new("Window").child(
        SkinNode::new("Panel")
            .rect(0, 0, 100, 60)
            .attr("Name", "strip")
            .child(SkinNode::new("Edit").rect(10, 10, 40, 20).attr("Text", "hello"))
            .child(
                SkinNode::new("Button")
                    .rect(60, 10, 20, 20)
                    .attr("Name", "go")
                    .attr("Command", "Go"),
            ),
    );
    let main = open(&mut skin, "main", WindowConfig::new("t").with_size(100, 100), &def);
    press(&mut skin, main, 65, 15);
    let window = skin.window(main).unwrap();
    assert_eq!(window.captured(), window.find("go"));
    assert_eq!(window.focused(), window.find("go"));

    let removed = skin
        .with_window(main, |w, platform| {
            let strip = w.find("strip").unwrap();
            let removed = w.remove_widget(platform, strip);
            w.update(platform);
            removed
        })
        .unwrap();
    assert!(removed);

    let window = skin.window(main).unwrap();
    assert_eq!(window.find("go"), None);
    assert_eq!(window.captured(), None);
    assert_eq!(window.focused(), None);
    assert!(window.exclusion().is_empty());
    assert_eq!(skin.platform().captured(), None);
    assert!(skin.platform().native_children().is_empty());
    let frame = skin.platform().framebuffer(surface(&skin, main)).unwrap();
    assert_eq!(frame.pixel(Point::new(20, 20)), Some(Color::BLACK));

    let root = skin.window(main).unwrap().tree().root();
    assert!(!skin.with_window(main, |w, platform| w.remove_widget(platform, root)).unwrap());
}

#[test]
fn test_updates_are_throttled_between_sessions() {
    let config = SkinConfig {
        update_interval_ms: 30,
        ..SkinConfig::default()
    };
    let (mut skin, _) = skin(AppContext::new(config));
    let def = SkinNode::new("Window")
        .child(SkinNode::new("Button").rect(0, 0, 20, 20).attr("Command", "A"))
        .child(SkinNode::new("Button").rect(40, 0, 20, 20).attr("Command", "B"));
    let main = open(&mut skin, "main", WindowConfig::new("t"), &def);
    skin.platform().clear_calls();

    // Well past the flushes done while opening.
    let start = Instant::now() + Duration::from_secs(1);
    let hover = |skin: &mut Skin<HeadlessPlatform>, x: i32, at: Instant| {
        let pos = Point::new(x, 5);
        skin.post(main, SkinEvent::PointerMove { pos, screen: pos }).unwrap();
        skin.pump_at(at);
    };

    hover(&mut skin, 5, start);
    let first = present_count(&skin);
    assert!(first > 0);

    hover(&mut skin, 45, start + Duration::from_millis(5));
    assert_eq!(present_count(&skin), first);
    assert!(skin.window(main).unwrap().has_pending_update());

    skin.pump_at(start + Duration::from_millis(40));
    assert!(present_count(&skin) > first);
    assert!(!skin.window(main).unwrap().has_pending_update());
}

#[test]
fn test_wheel_steps_are_coalesced() {
    let config = SkinConfig {
        update_interval_ms: 30,
        ..SkinConfig::default()
    };
    let (mut skin, app) = skin(AppContext::new(config));
    let def = SkinNode::new("Window").child(
        SkinNode::new("Knob")
            .rect(0, 0, 20, 20)
            .attr("Name", "gain")
            .attr("Command", "Gain"),
    );
    let main = open(&mut skin, "main", WindowConfig::new("t"), &def);
    skin.platform().clear_calls();

    // Well past the flushes done while opening.
    let start = Instant::now() + Duration::from_secs(1);
    let wheel = |skin: &mut Skin<HeadlessPlatform>, ms: u64| {
        let event = SkinEvent::Wheel {
            pos: Point::new(10, 10),
            delta: 1.0,
        };
        skin.post(main, event).unwrap();
        skin.pump_at(start + Duration::from_millis(ms));
    };

    wheel(&mut skin, 0);
    let first = present_count(&skin);
    assert!(first > 0);

    wheel(&mut skin, 5);
    assert_eq!(present_count(&skin), first);
    assert!(skin.window(main).unwrap().has_pending_update());
    assert_eq!(app.commands_named("Gain").len(), 2);

    skin.pump_at(start + Duration::from_millis(40));
    assert!(present_count(&skin) > first);
}

#[test]
fn test_releasing_flushes_windows_that_mirrored_the_drag() {
    let config = SkinConfig {
        update_interval_ms: 30,
        ..SkinConfig::default()
    };
    let (mut skin, _) = skin(AppContext::new(config));
    let one = SkinNode::new("Window").child(
        SkinNode::new("Slider")
            .rect(0, 0, 101, 10)
            .attr("Name", "vol")
            .attr("Command", "Vol"),
    );
    let two = SkinNode::new("Window").child(
        SkinNode::new("Knob")
            .rect(0, 0, 20, 20)
            .attr("Name", "vol")
            .attr("Command", "Vol"),
    );
    let w1 = open(&mut skin, "one", WindowConfig::new("one"), &one);
    let w2 = open(&mut skin, "two", WindowConfig::new("two"), &two);

    // Well past the flushes done while opening.
    let start = Instant::now() + Duration::from_secs(1);
    let send = |skin: &mut Skin<HeadlessPlatform>, event: SkinEvent, ms: u64| {
        skin.post(w1, event).unwrap();
        skin.pump_at(start + Duration::from_millis(ms));
    };
    let at = |x: i32| Point::new(x, 5);

    send(&mut skin, SkinEvent::PointerDown { pos: at(20), screen: at(20), button: MouseButton::Left }, 0);
    send(&mut skin, SkinEvent::PointerMove { pos: at(50), screen: at(50) }, 5);
    assert!(skin.window(w2).unwrap().has_pending_update());

    send(&mut skin, SkinEvent::PointerUp { pos: at(50), screen: at(50), button: MouseButton::Left }, 10);
    let mirror = skin.window(w2).unwrap();
    assert!(!mirror.has_pending_update());
    assert!(mirror.dirty_region().is_empty());
    let value = mirror.value(mirror.find("vol").unwrap()).unwrap();
    assert!((value - 0.5).abs() < 1e-4);
}

#[test]
fn test_threaded_command_round_trip() {
    let mut ctx = AppContext::default();
    ctx.register_threaded("Scan", |cmd: &Command| Ok(format!("scanned {}", cmd.param)));
    let (mut skin, app) = skin(ctx);
    let def = SkinNode::new("Window").child(
        SkinNode::new("Button")
            .rect(0, 0, 20, 20)
            .attr("Command", "Scan")
            .attr("Param", "disk"),
    );
    let main = open(&mut skin, "main", WindowConfig::new("t"), &def);
    assert!(skin.window(main).unwrap().is_threaded("Scan"));

    press(&mut skin, main, 5, 5);
    release(&mut skin, main, 5, 5);

    let finished = |app: &common::Recorder| {
        app.log.lock().events.iter().find_map(|e| match e {
            AppEvent::ThreadedCommandFinished { command, result, .. } => {
                Some((command.clone(), result.clone()))
            }
            _ => None,
        })
    };
    let mut outcome = None;
    for _ in 0..200 {
        skin.pump();
        outcome = finished(&app);
        if outcome.is_some() {
            break;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    assert_eq!(outcome, Some(("Scan".to_string(), Ok("scanned disk".to_string()))));
    assert!(app.commands_named("Scan").is_empty());
}

#[test]
fn test_tab_pages_scope_focus_to_the_selected_page() {
    let (mut skin, _) = skin(AppContext::default());
    let page = |button: &str| {
        SkinNode::new("Panel").rect(0, 0, 100, 100).child(
            SkinNode::new("Button")
                .rect(10, 10, 20, 20)
                .attr("Name", button)
                .attr("Command", button),
        )
    };
    let def = SkinNode::new("Window").child(
        SkinNode::new("TabPages")
            .rect(0, 0, 100, 100)
            .attr("Name", "tabs")
            .attr("Command", "Page")
            .child(page("first"))
            .child(page("second"))
            .child(page("third")),
    );
    let main = open(&mut skin, "main", WindowConfig::new("t"), &def);

    let chain = |skin: &Skin<HeadlessPlatform>| {
        let window = skin.window(main).unwrap();
        window
            .focus_chain()
            .into_iter()
            .filter_map(|id| window.tree().get(id)?.name().map(str::to_string))
            .collect::<Vec<_>>()
    };
    assert_eq!(chain(&skin), vec!["first"]);

    skin.execute(Command::new("Page").with_value(1.0));
    assert_eq!(chain(&skin), vec!["second"]);
    let window = skin.window(main).unwrap();
    assert!(!window.tree().is_effectively_visible(window.find("first").unwrap()));
    assert_eq!(window.value(window.find("tabs").unwrap()), Some(1.0));

    skin.execute(Command::new("Page").with_value(2.0));
    assert_eq!(chain(&skin), vec!["third"]);
    let window = skin.window(main).unwrap();
    assert_eq!(window.value(window.find("tabs").unwrap()), Some(2.0));
}

#[test]
fn test_missing_images_load_as_placeholders() {
    let (mut skin, _) = skin(AppContext::default());
    let def = SkinNode::new("Window")
        .child(SkinNode::new("Image").rect(0, 0, 20, 20).attr("Image", "missing.png"));
    let main = open(&mut skin, "main", WindowConfig::new("t"), &def);

    assert!(skin.context().diagnostics().warnings().count() >= 1);
    let frame = skin.platform().framebuffer(surface(&skin, main)).unwrap();
    assert_eq!(frame.pixel(Point::new(5, 5)), Some(Color::RED));
}

#[test]
fn test_preferences_survive_close_and_open() {
    let (mut skin, _) = skin(AppContext::default());
    let def = SkinNode::new("Window").child(
        SkinNode::new("Knob")
            .rect(0, 0, 20, 20)
            .attr("Name", "gain")
            .attr("Command", "Gain")
            .attr("Persist", "yes"),
    );
    let main = open(&mut skin, "main", WindowConfig::new("t").with_position(40, 30), &def);

    skin.execute(Command::new("Gain").with_value(0.4));
    assert!(skin.close_window(main).unwrap());
    assert!(!skin.window(main).unwrap().is_shown());

    let prefs = skin.context().preferences();
    assert!(prefs.get_float("main/gain").is_some_and(|v| (v - 0.4).abs() < 1e-4));
    assert_eq!(prefs.get_int("main/x"), Some(40));
    assert_eq!(prefs.get_int("main/y"), Some(30));

    skin.execute(Command::new("Gain").with_value(0.9));
    skin.open_window(main).unwrap();
    let window = skin.window(main).unwrap();
    let gain = window.value(window.find("gain").unwrap()).unwrap();
    assert!((gain - 0.4).abs() < 1e-4);
}

#[test]
fn test_drag_anywhere_moves_the_window() {
    let (mut skin, _) = skin(AppContext::default());
    let def = SkinNode::new("Window");
    let config = WindowConfig::new("t").with_position(100, 100).with_drag_anywhere(true);
    let main = open(&mut skin, "main", config, &def);

    press(&mut skin, main, 5, 5);
    assert!(skin.window(main).unwrap().capture_state().is_dragging());
    move_to(&mut skin, main, 25, 15);
    release(&mut skin, main, 25, 15);

    let window = skin.window(main).unwrap();
    assert_eq!(window.position(), Point::new(120, 110));
    assert!(!window.capture_state().is_dragging());
    assert_eq!(skin.platform().captured(), None);
}

#[test]
fn test_close_confirmation_can_be_declined() {
    let (mut skin, app) = skin(AppContext::default());
    let def = SkinNode::new("Window");
    let main = open(&mut skin, "main", WindowConfig::new("t").with_confirm_close(true), &def);

    app.log.lock().answer = Some(PromptResult::Declined);
    skin.post(main, SkinEvent::CloseRequested).unwrap();
    skin.pump();
    assert!(skin.window(main).unwrap().is_shown());
    assert_eq!(app.log.lock().prompts, 1);

    app.log.lock().answer = Some(PromptResult::Accepted);
    assert!(skin.execute(Command::new("CloseWindow").with_target("main")));
    assert!(!skin.window(main).unwrap().is_shown());
    assert!(app.log.lock().events.contains(&AppEvent::WindowClosed(main)));
}

#[test]
fn test_window_commands_and_quit() {
    let (mut skin, app) = skin(AppContext::default());
    let def = SkinNode::new("Window");
    let main = open(&mut skin, "main", WindowConfig::new("main"), &def);
    let prefs = skin.load_window("prefs", WindowConfig::new("prefs"), &def).unwrap();

    assert!(skin.execute(Command::new("OpenWindow").with_target("prefs")));
    assert!(skin.window(prefs).unwrap().is_shown());
    assert!(skin.execute(Command::new("ToggleOpen").with_target("prefs")));
    assert!(!skin.window(prefs).unwrap().is_shown());

    skin.execute(Command::new("OpenWindow").with_target("nowhere"));
    assert_eq!(app.log.lock().errors.len(), 1);
    assert!(skin.context().diagnostics().warnings().any(|d| d.message.contains("nowhere")));

    assert!(skin.is_running());
    skin.execute(Command::new("Quit"));
    assert!(!skin.is_running());
    assert!(app.log.lock().events.contains(&AppEvent::Quit));
    assert!(skin.window(main).unwrap().is_shown());
}

#[test]
fn test_hover_hints_reach_the_application() {
    let (mut skin, app) = skin(AppContext::default());
    let def = SkinNode::new("Window").child(
        SkinNode::new("Button")
            .rect(0, 0, 20, 20)
            .attr("Command", "Play")
            .attr("Hint", "Start playback"),
    );
    let main = open(&mut skin, "main", WindowConfig::new("t"), &def);

    move_to(&mut skin, main, 5, 5);
    move_to(&mut skin, main, 100, 100);

    let hints: Vec<Option<String>> = app
        .log
        .lock()
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::Hint { text, .. } => Some(text.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(hints, vec![Some("Start playback".to_string()), None]);
}
