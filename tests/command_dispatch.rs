use std::sync::Arc;

use ugaris_demo_mod::config::ModConfig;
use ugaris_demo_mod::host::{Attribute, HostSnapshot, RecordingHost, Tier};
use ugaris_demo_mod::{Outcome, Plugin};

fn sample_state() -> HostSnapshot {
    let mut state = HostSnapshot {
        hp: 87,
        mana: 12,
        gold: 4512,
        experience: 25_300,
        ..HostSnapshot::default()
    };
    state.set_stat(Tier::Modified, Attribute::Hp, 120);
    state.set_stat(Tier::Modified, Attribute::Mana, 40);
    state.set_stat(Tier::Modified, Attribute::Strength, 31);
    state.set_stat(Tier::Modified, Attribute::Agility, 28);
    state.set_stat(Tier::Modified, Attribute::Intelligence, 19);
    state.set_stat(Tier::Modified, Attribute::Wisdom, 22);
    state.set_stat(Tier::Base, Attribute::Strength, 99);
    state
}

fn plugin() -> Plugin<RecordingHost> {
    let host = Arc::new(RecordingHost::with_state(sample_state()));
    Plugin::new(host, &ModConfig::default())
}

#[test]
fn hello_prints_help_block() {
    let p = plugin();
    assert_eq!(p.client_command("#hello"), Outcome::Handled);

    let lines = p.host().lines();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "=== C++ Demo Mod Commands ===");
    assert_eq!(lines[1], "#hello   - Show this help");
    assert_eq!(lines[2], "#stats   - Display current stats");
    assert_eq!(lines[3], "#overlay - Toggle HUD overlay");
}

#[test]
fn stats_prints_live_values() {
    let p = plugin();
    assert_eq!(p.client_command("#stats"), Outcome::Handled);

    let lines = p.host().lines();
    assert_eq!(lines.len(), 4);
    // RecordingHost levels up every 1000 experience
    assert_eq!(lines[0], "Level: 26  Experience: 25300");
    assert!(lines[1].contains("HP:"));
    assert!(lines[1].contains("Mana:"));
    assert_eq!(lines[1], "HP: 87/120  Mana: 12/40");
    assert_eq!(lines[2], "STR: 31  AGI: 28  INT: 19  WIS: 22");
    assert_eq!(lines[3], "Gold: 4512");
}

#[test]
fn stats_reads_fresh_state_each_call() {
    let p = plugin();
    p.client_command("#stats");
    p.host().update(|s| {
        s.hp = 3;
        s.gold = 0;
    });
    p.host().clear();
    p.client_command("#stats");

    let lines = p.host().lines();
    assert_eq!(lines[1], "HP: 3/120  Mana: 12/40");
    assert_eq!(lines[3], "Gold: 0");
}

#[test]
fn stats_does_not_touch_overlay() {
    let p = plugin();
    p.client_command("#stats");
    assert!(!p.is_overlay_visible());
    assert!(p.host().draws().is_empty());
}

#[test]
fn overlay_toggles_once_per_call() {
    let p = plugin();
    let before = p.is_overlay_visible();

    assert_eq!(p.client_command("#overlay"), Outcome::Handled);
    assert_eq!(p.is_overlay_visible(), !before);
    assert_eq!(p.host().take_lines(), vec!["Overlay: ON"]);

    assert_eq!(p.client_command("#overlay"), Outcome::Handled);
    assert_eq!(p.is_overlay_visible(), before);
    assert_eq!(p.host().take_lines(), vec!["Overlay: OFF"]);
}

#[test]
fn overlay_message_matches_start_state() {
    let mut config = ModConfig::default();
    config.overlay.visible_on_start = true;
    let p = Plugin::new(Arc::new(RecordingHost::new()), &config);

    p.client_command("#overlay");
    assert!(!p.is_overlay_visible());
    assert_eq!(p.host().lines(), vec!["Overlay: OFF"]);
}

#[test]
fn unknown_commands_are_passed_back() {
    let p = plugin();
    let inputs = [
        "",
        "hello",
        "#HELLO",
        "#Stats",
        " #overlay",
        "#overlay ",
        "#stats\t",
        "#hel",
        "#hello world",
        "#overlays",
        "/hello",
        "#",
    ];
    for input in inputs {
        assert_eq!(p.client_command(input), Outcome::Unhandled, "{input:?}");
    }
    assert!(p.host().lines().is_empty());
    assert!(p.host().notes().is_empty());
    assert!(!p.is_overlay_visible());
}

#[test]
fn long_username_is_truncated_in_welcome() {
    let p = plugin();
    p.host().update(|s| s.username = "n".repeat(400));
    p.game_start();

    let notes = p.host().notes();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].len(), 255);
    assert!(notes[0].starts_with("C++ Demo Mod: Game started! Welcome, nnn"));
    assert_eq!(
        p.host().lines(),
        vec!["C++ Demo Mod loaded. Type #hello for commands."]
    );
}
