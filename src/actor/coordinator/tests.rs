use std::time::Duration;

use pretty_assertions::assert_eq;
use test_log::test;

use super::*;
use crate::sys::geometry::Rect;
use crate::sys::sim::SimHost;

const LAPTOP: Rect = Rect::new(0., 0., 1920., 1080.);
const MONITOR: Rect = Rect::new(1920., 0., 2560., 1440.);
const FLOATING: Rect = Rect::new(100., 100., 640., 480.);

fn config(extra: &str) -> Config {
    let default = include_str!("../../../emuwin.default.toml");
    toml::from_str(&format!("{default}\n{extra}")).unwrap()
}

fn window(caption: &str, class: &str, fullscreen: bool) -> WindowInfo {
    WindowInfo {
        caption: caption.into(),
        class: class.into(),
        normal: true,
        frame: FLOATING,
        fullscreen,
        minimized: false,
        keep_above: false,
        keep_below: false,
    }
}

fn ms(millis: u64) -> Duration { Duration::from_millis(millis) }

fn coordinator(displays: &[Rect], config: Config) -> Coordinator<SimHost> {
    let mut host = SimHost::new();
    for &display in displays {
        host.add_display(display, display);
    }
    host.take_notifications();
    let mut coordinator = Coordinator::new(host, config).unwrap();
    coordinator.start();
    coordinator.pump();
    coordinator
}

fn add(coordinator: &mut Coordinator<SimHost>, info: WindowInfo) -> WindowId {
    let id = coordinator.host_mut().add_window(info);
    coordinator.pump();
    id
}

fn remove(coordinator: &mut Coordinator<SimHost>, id: WindowId) {
    coordinator.host_mut().remove_window(id);
    coordinator.pump();
}

fn set_fullscreen(coordinator: &mut Coordinator<SimHost>, id: WindowId, fullscreen: bool) {
    coordinator.host_mut().set_fullscreen(id, fullscreen);
    coordinator.pump();
}

fn info(coordinator: &Coordinator<SimHost>, id: WindowId) -> WindowInfo {
    coordinator.host().window(id).unwrap()
}

fn frame(coordinator: &Coordinator<SimHost>, id: WindowId) -> Rect { info(coordinator, id).frame }

/// A fullscreen Dolphin with `count` GBA windows.
fn dolphin(count: usize) -> (Coordinator<SimHost>, WindowId, Vec<WindowId>) {
    let mut c = coordinator(&[LAPTOP], config(""));
    let primary = add(&mut c, window("Dolphin", "dolphin-emu", true));
    let secondaries = (1..=count)
        .map(|n| add(&mut c, window(&format!("GBA{n}"), "dolphin-emu", false)))
        .collect();
    (c, primary, secondaries)
}

#[test]
fn it_tiles_a_single_screen_column() {
    let mut c = coordinator(&[LAPTOP], config(""));
    let primary = add(&mut c, window("Cemu 2.0 - Zelda", "cemu", true));
    let gamepad = add(&mut c, window("GamePad View", "cemu", false));

    assert_eq!(frame(&c, primary), Rect::new(0., 0., 960., 1080.));
    let gamepad_info = info(&c, gamepad);
    assert_eq!(gamepad_info.frame, Rect::new(960., 0., 960., 540.));
    assert!(gamepad_info.fullscreen);
    assert!(gamepad_info.keep_above);
    assert_eq!(c.host().display_of(gamepad), Some(DisplayId::new(0)));
}

#[test]
fn it_separates_windows_across_two_screens() {
    let mut c = coordinator(&[LAPTOP, MONITOR], config(""));
    let primary = add(&mut c, window("Cemu 2.0 - Zelda", "cemu", true));
    let gamepad = add(&mut c, window("GamePad View", "cemu", false));

    assert_eq!(c.screens().primary.id, DisplayId::new(1));
    assert_eq!(frame(&c, primary), MONITOR);
    assert_eq!(c.host().display_of(primary), Some(DisplayId::new(1)));
    assert_eq!(frame(&c, gamepad), LAPTOP);
    assert_eq!(c.host().display_of(gamepad), Some(DisplayId::new(0)));
    assert!(info(&c, gamepad).fullscreen);
}

#[test]
fn it_picks_up_windows_open_at_startup() {
    let mut host = SimHost::new();
    host.add_display(LAPTOP, LAPTOP);
    let primary = host.add_window(window("Cemu 2.0 - Zelda", "cemu", true));
    let gamepad = host.add_window(window("GamePad View", "cemu", false));
    host.take_notifications();

    let mut c = Coordinator::new(host, config("")).unwrap();
    c.start();
    c.pump();

    assert_eq!(frame(&c, primary), Rect::new(0., 0., 960., 1080.));
    assert_eq!(frame(&c, gamepad), Rect::new(960., 0., 960., 540.));
    assert!(c.original_settings().contains(gamepad));
}

#[test]
fn it_arranges_added_windows_without_superseding_pending_work() {
    let mut c = coordinator(&[LAPTOP], config(""));
    let before = c.generation();
    add(&mut c, window("Cemu 2.0 - Zelda", "cemu", true));
    add(&mut c, window("GamePad View", "cemu", false));
    assert_eq!(c.generation(), before);
    assert_eq!(c.group("Cemu").unwrap().len(), 2);
}

#[test]
fn it_leaves_a_lone_window_alone() {
    let mut c = coordinator(&[LAPTOP, MONITOR], config(""));
    let primary = add(&mut c, window("Cemu 2.0 - Zelda", "cemu", true));

    assert_eq!(frame(&c, primary), FLOATING);
    assert!(!info(&c, primary).keep_above);
    // New primaries are still routed to the primary display.
    assert_eq!(c.host().display_of(primary), Some(DisplayId::new(1)));
}

#[test]
fn it_follows_the_primary_in_and_out_of_fullscreen() {
    let mut c = coordinator(&[LAPTOP], config(""));
    let primary = add(&mut c, window("Cemu 2.0 - Zelda", "cemu", false));
    let gamepad = add(&mut c, window("GamePad View", "cemu", false));

    assert_eq!(frame(&c, primary), FLOATING);
    assert_eq!(frame(&c, gamepad), FLOATING);
    assert!(!info(&c, gamepad).fullscreen);

    set_fullscreen(&mut c, primary, true);
    assert_eq!(frame(&c, primary), Rect::new(0., 0., 960., 1080.));
    assert_eq!(frame(&c, gamepad), Rect::new(960., 0., 960., 540.));
    assert!(info(&c, gamepad).fullscreen);

    set_fullscreen(&mut c, primary, false);
    let gamepad_info = info(&c, gamepad);
    assert_eq!(gamepad_info.frame, FLOATING);
    assert!(!gamepad_info.fullscreen);
    assert!(!gamepad_info.keep_above);
    assert!(!c.group("Cemu").unwrap().primary_fullscreen);
}

#[test]
fn it_restores_fullscreen_dropped_right_after_a_removal() {
    let (mut c, primary, gba) = dolphin(2);

    c.host_mut().remove_window(gba[0]);
    c.host_mut().set_fullscreen(primary, false);
    c.pump();

    assert!(info(&c, primary).fullscreen);
    assert!(c.group("Dolphin").unwrap().primary_fullscreen);
    assert_eq!(frame(&c, gba[1]), Rect::new(960., 0., 960., 640.));
    assert!(info(&c, gba[1]).fullscreen);
}

#[test]
fn it_accepts_fullscreen_changes_outside_the_race_window() {
    let (mut c, primary, gba) = dolphin(2);
    remove(&mut c, gba[0]);

    c.advance(ms(200));
    set_fullscreen(&mut c, primary, false);

    assert!(!info(&c, primary).fullscreen);
    assert_eq!(frame(&c, gba[1]), FLOATING);
    assert!(!info(&c, gba[1]).fullscreen);
}

#[test]
fn it_restores_fullscreen_later_when_the_removal_comes_second() {
    let (mut c, primary, gba) = dolphin(2);

    set_fullscreen(&mut c, primary, false);
    c.advance(ms(50));
    remove(&mut c, gba[0]);
    assert!(!info(&c, primary).fullscreen);

    c.advance(ms(999));
    assert!(!info(&c, primary).fullscreen);

    c.advance(ms(1));
    assert!(info(&c, primary).fullscreen);
    assert_eq!(frame(&c, gba[1]), Rect::new(960., 0., 960., 640.));
    assert_eq!(c.host().pending_timers(), 0);
}

#[test]
fn it_drops_a_fullscreen_restore_superseded_by_another_removal() {
    let (mut c, primary, gba) = dolphin(3);

    set_fullscreen(&mut c, primary, false);
    c.advance(ms(50));
    remove(&mut c, gba[0]);
    c.advance(ms(50));
    remove(&mut c, gba[1]);

    c.run_until_idle();
    assert!(!info(&c, primary).fullscreen);
}

#[test]
fn it_restores_settings_of_removed_windows() {
    let mut c = coordinator(&[LAPTOP], config(""));
    add(&mut c, window("Cemu 2.0 - Zelda", "cemu", true));
    let gamepad = add(&mut c, window("GamePad View", "cemu", false));
    assert_ne!(frame(&c, gamepad), FLOATING);

    remove(&mut c, gamepad);

    let gamepad_info = info(&c, gamepad);
    assert_eq!(gamepad_info.frame, FLOATING);
    assert!(!gamepad_info.fullscreen);
    assert!(!gamepad_info.keep_above);
    assert!(!c.original_settings().contains(gamepad));
    assert_eq!(c.group("Cemu").unwrap().len(), 1);
}

#[test]
fn it_drops_empty_groups() {
    let mut c = coordinator(&[LAPTOP], config(""));
    let primary = add(&mut c, window("Cemu 2.0 - Zelda", "cemu", true));
    remove(&mut c, primary);
    assert!(c.group("Cemu").is_none());
}

#[test]
fn it_leaves_secondaries_past_the_limit_untouched() {
    let (c, _, gba) = dolphin(6);

    assert_eq!(frame(&c, gba[0]), Rect::new(1650., 0., 270., 180.));
    assert_eq!(frame(&c, gba[3]), Rect::new(1650., 540., 270., 180.));
    for &id in &gba[4..] {
        assert_eq!(frame(&c, id), FLOATING);
        assert!(!info(&c, id).fullscreen);
    }
}

#[test]
fn it_rebuilds_after_a_display_is_removed() {
    let mut c = coordinator(&[LAPTOP, MONITOR], config(""));
    let primary = add(&mut c, window("Cemu 2.0 - Zelda", "cemu", true));
    let gamepad = add(&mut c, window("GamePad View", "cemu", false));

    c.host_mut().pop_display();
    c.pump();

    c.advance(ms(1999));
    assert_eq!(frame(&c, gamepad), LAPTOP);
    assert_eq!(c.screens().count, 2);

    c.advance(ms(1));
    assert_eq!(c.screens().count, 1);
    assert_eq!(frame(&c, primary), Rect::new(0., 0., 960., 1080.));
    assert_eq!(frame(&c, gamepad), Rect::new(960., 0., 960., 540.));
    assert_eq!(c.host().display_of(primary), Some(DisplayId::new(0)));

    c.run_until_idle();
    assert_eq!(frame(&c, gamepad), Rect::new(960., 0., 960., 540.));
}

#[test]
fn it_ignores_superseded_rebuilds() {
    let mut c = coordinator(&[LAPTOP, MONITOR], config(""));
    add(&mut c, window("Cemu 2.0 - Zelda", "cemu", true));
    let gamepad = add(&mut c, window("GamePad View", "cemu", false));

    c.host_mut().pop_display();
    c.pump();
    remove(&mut c, gamepad);
    c.run_until_idle();
    assert_eq!(c.screens().count, 1);

    c.host_mut().add_display(MONITOR, MONITOR);
    let stale = Marker::default();
    assert!(stale != c.generation());
    c.handle_event(Event::Deferred(Deferred::Rebuild { marker: stale }));
    assert_eq!(c.screens().count, 1);
}

#[test]
fn it_keeps_windows_off_an_unplugged_display_while_the_rebuild_settles() {
    let mut c = coordinator(&[LAPTOP, MONITOR], config(""));
    let primary = add(&mut c, window("Cemu 2.0 - Zelda", "cemu", true));
    let gamepad = add(&mut c, window("GamePad View", "cemu", false));
    let packs = add(&mut c, window("Graphic packs", "cemu", false));
    assert_eq!(frame(&c, primary), MONITOR);

    c.host_mut().pop_display();
    c.pump();
    c.advance(ms(500));
    remove(&mut c, packs);

    assert_eq!(c.screens().count, 1);
    assert_eq!(frame(&c, primary), Rect::new(0., 0., 960., 1080.));
    assert_eq!(c.host().display_of(primary), Some(DisplayId::new(0)));
    assert_eq!(frame(&c, gamepad), Rect::new(960., 0., 960., 540.));

    c.advance(ms(200));
    set_fullscreen(&mut c, primary, false);
    set_fullscreen(&mut c, primary, true);
    assert_eq!(frame(&c, primary), Rect::new(0., 0., 960., 1080.));
    assert_eq!(c.host().display_of(primary), Some(DisplayId::new(0)));

    c.run_until_idle();
    assert_eq!(c.screens().count, 1);
    assert_eq!(c.host().display_of(primary), Some(DisplayId::new(0)));
    assert_eq!(frame(&c, gamepad), Rect::new(960., 0., 960., 540.));
    assert_eq!(c.host().pending_timers(), 0);
}

#[test]
fn it_waits_before_moving_windows_of_delayed_apps() {
    let mut c = coordinator(&[LAPTOP, MONITOR], config(""));
    let primary = add(&mut c, window("Cemu 1.26", "steam_app_1234", true));
    let gamepad = add(&mut c, window("GamePad View", "steam_app_1234", false));

    assert_eq!(c.host().display_of(primary), Some(DisplayId::new(1)));
    assert_eq!(frame(&c, gamepad), LAPTOP);
    assert_eq!(c.host().display_of(gamepad), None);

    c.advance(ms(99));
    assert_eq!(c.host().display_of(gamepad), None);

    c.advance(ms(1));
    assert_eq!(c.host().display_of(gamepad), Some(DisplayId::new(0)));
}

#[test]
fn it_drops_stale_display_moves() {
    let mut c = coordinator(&[LAPTOP, MONITOR], config(""));
    let primary = add(&mut c, window("Cemu 1.26", "steam_app_1234", true));
    let gamepad = add(&mut c, window("GamePad View", "steam_app_1234", false));

    c.advance(ms(50));
    set_fullscreen(&mut c, primary, false);
    c.run_until_idle();

    assert_eq!(c.host().display_of(gamepad), None);
    assert_eq!(frame(&c, gamepad), FLOATING);
}

#[test]
fn it_reclassifies_windows_whose_caption_changes() {
    let mut c = coordinator(&[LAPTOP], config(""));
    let primary = add(&mut c, window("Citra Nightly 2104 | Pokemon Sun", "citra-qt", true));
    let bottom = add(&mut c, window("Citra Nightly 2104", "citra-qt", false));

    assert_eq!(c.group("Citra").unwrap().others().len(), 1);
    assert!(c.host().is_maximized(bottom));
    assert_eq!(frame(&c, bottom), LAPTOP);
    assert_eq!(frame(&c, primary), LAPTOP);

    let marker = c.generation();
    c.host_mut().set_caption(bottom, "Citra Nightly 2104 | Pokemon Sun | Secondary");
    c.pump();

    assert!(c.generation() != marker);
    assert_eq!(c.group("Citra").unwrap().secondaries().len(), 1);
    assert_eq!(frame(&c, bottom), Rect::new(960., 0., 960., 720.));
    assert!(info(&c, bottom).fullscreen);
    assert_eq!(frame(&c, primary), Rect::new(0., 0., 960., 1080.));
}

#[test]
fn it_ignores_caption_changes_of_unwatched_windows() {
    let mut c = coordinator(&[LAPTOP], config(""));
    add(&mut c, window("Cemu 2.0 - Zelda", "cemu", true));
    let gamepad = add(&mut c, window("GamePad View", "cemu", false));

    let marker = c.generation();
    c.host_mut().set_caption(gamepad, "GamePad View (paused)");
    c.pump();
    assert_eq!(c.generation(), marker);
}

#[test]
fn it_backgrounds_windows_while_a_keyboard_is_open() {
    let extra = r#"
        [[keyboards]]
        primary = "^Keyboard$"
        classes = ["maliit"]
    "#;
    let mut c = coordinator(&[LAPTOP], config(extra));
    let primary = add(&mut c, window("Cemu 2.0 - Zelda", "cemu", true));
    let gamepad = add(&mut c, window("GamePad View", "cemu", false));
    assert!(info(&c, gamepad).keep_above);

    let keyboard = add(&mut c, window("Keyboard", "maliit-keyboard", false));
    for id in [primary, gamepad] {
        let info = info(&c, id);
        assert!(!info.keep_above);
        assert!(info.keep_below);
    }
    assert!(c.group("Cemu").unwrap().len() == 2);

    remove(&mut c, keyboard);
    for id in [primary, gamepad] {
        let info = info(&c, id);
        assert!(info.keep_above);
        assert!(!info.keep_below);
    }
}

const OVERLAY: &str = r#"
    [[secondary_apps]]
    primary = "^Overlay"
    classes = ["overlay"]
    windowing_behavior = "fullscreen"
    screen_preference = "prefer_primary"
"#;

#[test]
fn it_shares_the_primary_display_with_companions() {
    let mut c = coordinator(&[LAPTOP, MONITOR], config(OVERLAY));
    let primary = add(&mut c, window("Cemu 2.0 - Zelda", "cemu", true));
    let gamepad = add(&mut c, window("GamePad View", "cemu", false));
    let overlay = add(&mut c, window("Overlay", "overlay", false));

    assert_eq!(c.secondary_app_windows().len(), 1);
    assert_eq!(frame(&c, primary), Rect::new(1920., 0., 1280., 1440.));
    assert_eq!(frame(&c, overlay), Rect::new(3200., 0., 1280., 720.));
    assert_eq!(c.host().display_of(overlay), Some(DisplayId::new(1)));
    assert_eq!(frame(&c, gamepad), LAPTOP);
    assert_eq!(c.host().display_of(gamepad), Some(DisplayId::new(0)));
}

#[test]
fn it_rebuilds_shortly_after_a_companion_closes() {
    let mut c = coordinator(&[LAPTOP, MONITOR], config(OVERLAY));
    let primary = add(&mut c, window("Cemu 2.0 - Zelda", "cemu", true));
    add(&mut c, window("GamePad View", "cemu", false));
    let overlay = add(&mut c, window("Overlay", "overlay", false));

    remove(&mut c, overlay);
    assert!(c.secondary_app_windows().is_empty());

    c.advance(ms(199));
    assert_eq!(frame(&c, primary), Rect::new(1920., 0., 1280., 1440.));

    c.advance(ms(1));
    assert_eq!(frame(&c, primary), MONITOR);
}

#[test]
fn it_maximizes_maximized_companions_on_the_secondary_display() {
    let extra = r#"
        [[secondary_apps]]
        primary = "^Steam$"
        classes = ["steam"]
        windowing_behavior = "maximized"
    "#;
    let mut c = coordinator(&[LAPTOP, MONITOR], config(extra));
    let steam = add(&mut c, window("Steam", "steam", false));

    assert!(c.host().is_maximized(steam));
    assert!(c.is_unmanaged(steam));
    assert!(c.secondary_app_windows().contains_key(&steam));
    assert_eq!(c.host().display_of(steam), Some(DisplayId::new(0)));
}

#[test]
fn it_minimizes_blacklisted_windows() {
    let mut config = config("");
    config.apps.iter_mut().find(|a| a.name == "Dolphin").unwrap().settings.blacklist =
        vec!["^Memory Card Manager".into()];
    let mut c = coordinator(&[LAPTOP, MONITOR], config);
    let manager = add(&mut c, window("Memory Card Manager", "dolphin-emu", false));

    assert!(info(&c, manager).minimized);
    assert!(c.is_unmanaged(manager));
    assert!(c.group("Dolphin").is_none());
    assert_eq!(c.host().display_of(manager), Some(DisplayId::new(0)));
}

#[test]
fn it_routes_other_windows_to_the_secondary_display() {
    let mut config = config("");
    config.settings.other_keep_above = true;
    let mut c = coordinator(&[LAPTOP, MONITOR], config);
    add(&mut c, window("Cemu 2.0 - Zelda", "cemu", true));
    add(&mut c, window("GamePad View", "cemu", false));
    let packs = add(&mut c, window("Graphic packs", "cemu", true));

    let packs_info = info(&c, packs);
    assert_eq!(c.host().display_of(packs), Some(DisplayId::new(0)));
    assert!(c.host().is_maximized(packs));
    assert_eq!(packs_info.frame, LAPTOP);
    assert!(!packs_info.fullscreen);
    assert!(packs_info.keep_above);
}

#[test]
fn it_leaves_other_windows_below_by_default() {
    let mut c = coordinator(&[LAPTOP, MONITOR], config(""));
    add(&mut c, window("Cemu 2.0 - Zelda", "cemu", true));
    let packs = add(&mut c, window("Graphic packs", "cemu", false));
    assert!(!info(&c, packs).keep_above);
    assert!(c.host().is_maximized(packs));
}

#[test]
fn it_leaves_other_windows_alone_while_the_primary_is_windowed() {
    let mut c = coordinator(&[LAPTOP], config(""));
    add(&mut c, window("Cemu 2.0 - Zelda", "cemu", false));
    let packs = add(&mut c, window("Graphic packs", "cemu", false));

    assert!(!c.host().is_maximized(packs));
    assert_eq!(frame(&c, packs), FLOATING);
    assert_eq!(c.host().display_of(packs), None);
}

#[test]
fn it_promotes_a_demoted_primary_when_the_primary_closes() {
    let mut c = coordinator(&[LAPTOP], config(""));
    let short = add(&mut c, window("Cemu", "cemu", true));
    let long = add(&mut c, window("Cemu 2.0 - Zelda", "cemu", true));

    let group = c.group("Cemu").unwrap();
    assert!(group.is_primary(long));
    assert_eq!(group.others().len(), 1);

    remove(&mut c, long);
    let group = c.group("Cemu").unwrap();
    assert!(group.is_primary(short));
    assert!(!group.primary_fullscreen);
}

#[test]
fn it_ignores_a_late_fullscreen_drop_from_a_closed_primary() {
    let mut c = coordinator(&[LAPTOP], config(""));
    let short = add(&mut c, window("Cemu", "cemu", true));
    let long = add(&mut c, window("Cemu 2.0 - Zelda", "cemu", false));
    let gamepad = add(&mut c, window("GamePad View", "cemu", false));
    assert_eq!(frame(&c, gamepad), FLOATING);

    remove(&mut c, long);
    let group = c.group("Cemu").unwrap();
    assert!(group.is_primary(short));
    assert!(group.primary_fullscreen);
    assert_eq!(frame(&c, short), Rect::new(0., 0., 960., 1080.));
    assert_eq!(frame(&c, gamepad), Rect::new(960., 0., 960., 540.));

    c.advance(ms(50));
    c.handle_event(Event::FullscreenChanged(long));
    c.pump();

    assert!(c.group("Cemu").unwrap().primary_fullscreen);
    assert!(info(&c, short).fullscreen);
    assert!(info(&c, gamepad).fullscreen);
    assert_eq!(frame(&c, gamepad), Rect::new(960., 0., 960., 540.));
    assert_eq!(c.host().pending_timers(), 0);
}

#[test]
fn it_restores_fullscreen_to_the_promoted_primary_after_a_racing_close() {
    let mut c = coordinator(&[LAPTOP], config(""));
    let short = add(&mut c, window("Cemu", "cemu", true));
    let long = add(&mut c, window("Cemu 2.0 - Zelda", "cemu", true));
    let gamepad = add(&mut c, window("GamePad View", "cemu", false));
    assert!(!info(&c, short).fullscreen);

    set_fullscreen(&mut c, long, false);
    c.advance(ms(50));
    remove(&mut c, long);
    assert!(c.group("Cemu").unwrap().is_primary(short));
    assert!(!info(&c, short).fullscreen);
    assert_eq!(frame(&c, gamepad), FLOATING);

    c.advance(ms(1000));
    assert!(info(&c, short).fullscreen);
    assert!(c.group("Cemu").unwrap().primary_fullscreen);
    assert_eq!(frame(&c, short), Rect::new(0., 0., 960., 1080.));
    assert_eq!(frame(&c, gamepad), Rect::new(960., 0., 960., 540.));
}

#[test(tokio::test)]
async fn it_runs_on_a_channel() {
    let (tx, rx) = actor::channel();
    let mut host = SimHost::new();
    host.add_display(LAPTOP, LAPTOP);
    let mut config = config("");
    config.timing.reconfigure_delay = 10;
    let gamepad = host.add_window(window("GamePad View", "steam_app_1234", false));
    host.add_window(window("Cemu 1.26", "steam_app_1234", true));
    host.take_notifications();
    host.connect(&tx);

    let mut c = Coordinator::new(host, config).unwrap();
    c.start();
    assert_eq!(c.host().display_of(gamepad), None);

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        drop(tx);
    });
    let c = c.run(rx).await;

    assert_eq!(c.host().display_of(gamepad), Some(DisplayId::new(0)));
    assert_eq!(frame(&c, gamepad), Rect::new(960., 0., 960., 540.));
}
