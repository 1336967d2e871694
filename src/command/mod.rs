//! 聊天命令
//!
//! 输入必须与命令字面量完全相同（区分大小写、不去空白、不做前缀匹配），
//! 否则交还宿主处理。

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::debug;

use crate::app::MOD_NAME;
use crate::host::{Attribute, Console, GameState, Tier};
use crate::text;

/// mod 识别的命令
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Hello,
    Stats,
    Overlay,
}

impl Command {
    pub const ALL: [Command; 3] = [Command::Hello, Command::Stats, Command::Overlay];

    pub fn literal(self) -> &'static str {
        match self {
            Command::Hello => "#hello",
            Command::Stats => "#stats",
            Command::Overlay => "#overlay",
        }
    }

    /// 精确匹配，任何其他输入返回 `None`
    pub fn parse(input: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|cmd| cmd.literal() == input)
    }
}

/// 命令是否被 mod 处理
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Handled,
    Unhandled,
}

impl Outcome {
    pub fn is_handled(self) -> bool {
        self == Outcome::Handled
    }

    /// 宿主 ABI 的返回值：1 = 已处理，0 = 未处理
    pub fn as_c_int(self) -> i32 {
        match self {
            Outcome::Handled => 1,
            Outcome::Unhandled => 0,
        }
    }
}

/// 解析并执行一条命令，输出写入宿主聊天区
pub fn dispatch<H>(host: &H, overlay_visible: &AtomicBool, input: &str) -> Outcome
where
    H: Console + GameState + ?Sized,
{
    let Some(command) = Command::parse(input) else {
        return Outcome::Unhandled;
    };
    debug!(command = command.literal(), "client command");

    match command {
        Command::Hello => hello(host),
        Command::Stats => stats(host),
        Command::Overlay => toggle_overlay(host, overlay_visible),
    }
    Outcome::Handled
}

fn hello<H: Console + ?Sized>(host: &H) {
    host.add_line(&text!("=== {} Commands ===", MOD_NAME));
    host.add_line(&text!("#hello   - Show this help"));
    host.add_line(&text!("#stats   - Display current stats"));
    host.add_line(&text!("#overlay - Toggle HUD overlay"));
}

fn stats<H: Console + GameState + ?Sized>(host: &H) {
    let experience = host.experience();
    let level = host.level_for(experience);
    let stat = |attribute| host.stat(Tier::Modified, attribute);

    host.add_line(&text!("Level: {}  Experience: {}", level, experience));
    host.add_line(&text!(
        "HP: {}/{}  Mana: {}/{}",
        host.hp(),
        stat(Attribute::Hp),
        host.mana(),
        stat(Attribute::Mana)
    ));
    host.add_line(&text!(
        "STR: {}  AGI: {}  INT: {}  WIS: {}",
        stat(Attribute::Strength),
        stat(Attribute::Agility),
        stat(Attribute::Intelligence),
        stat(Attribute::Wisdom)
    ));
    host.add_line(&text!("Gold: {}", host.gold()));
}

fn toggle_overlay<H: Console + ?Sized>(host: &H, overlay_visible: &AtomicBool) {
    let visible = !overlay_visible.fetch_xor(true, Ordering::Relaxed);
    host.add_line(&text!("Overlay: {}", if visible { "ON" } else { "OFF" }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::RecordingHost;

    #[test]
    fn parse_exact_literals() {
        assert_eq!(Command::parse("#hello"), Some(Command::Hello));
        assert_eq!(Command::parse("#stats"), Some(Command::Stats));
        assert_eq!(Command::parse("#overlay"), Some(Command::Overlay));
    }

    #[test]
    fn parse_rejects_near_misses() {
        for input in [
            "", "#", "hello", "#Hello", "#HELLO", " #hello", "#hello ", "#hello\n", "#hel",
            "#helloo", "#stats now", "#overlay2", "##overlay",
        ] {
            assert_eq!(Command::parse(input), None, "{input:?}");
        }
    }

    #[test]
    fn outcome_c_values() {
        assert_eq!(Outcome::Handled.as_c_int(), 1);
        assert_eq!(Outcome::Unhandled.as_c_int(), 0);
        assert!(!Outcome::Unhandled.is_handled());
    }

    #[test]
    fn unhandled_has_no_side_effects() {
        let host = RecordingHost::new();
        let flag = AtomicBool::new(false);
        assert_eq!(dispatch(&host, &flag, "#Overlay"), Outcome::Unhandled);
        assert!(host.lines().is_empty());
        assert!(host.notes().is_empty());
        assert!(!flag.load(Ordering::Relaxed));
    }

    #[test]
    fn overlay_toggle_reports_new_state() {
        let host = RecordingHost::new();
        let flag = AtomicBool::new(false);
        dispatch(&host, &flag, "#overlay");
        assert!(flag.load(Ordering::Relaxed));
        dispatch(&host, &flag, "#overlay");
        assert!(!flag.load(Ordering::Relaxed));
        assert_eq!(host.lines(), vec!["Overlay: ON", "Overlay: OFF"]);
    }
}
