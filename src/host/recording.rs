//! 内存中的宿主实现：记录 mod 的全部输出和绘图调用，
//! 游戏状态由调用方通过 [`HostSnapshot`] 设定。

use std::sync::{Mutex, MutexGuard};

use super::{Anchor, Attribute, Canvas, Console, GameState, Point, TextFlags, Tier};
use super::{STAT_SLOTS, STAT_TIERS};
use crate::common::{Color, Palette, TextBuf};

/// 一次绘图调用
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawCall {
    Rect {
        from: Point,
        to: Point,
        color: Color,
    },
    Line {
        from: Point,
        to: Point,
        color: Color,
    },
    Text {
        at: Point,
        color: Color,
        flags: TextFlags,
        text: String,
    },
}

impl DrawCall {
    pub fn is_rect(&self) -> bool {
        matches!(self, DrawCall::Rect { .. })
    }

    pub fn is_line(&self) -> bool {
        matches!(self, DrawCall::Line { .. })
    }

    pub fn is_text(&self) -> bool {
        matches!(self, DrawCall::Text { .. })
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            DrawCall::Text { text, .. } => Some(text.as_str()),
            _ => None,
        }
    }
}

/// 宿主游戏状态的可编辑副本
#[derive(Debug, Clone)]
pub struct HostSnapshot {
    pub hp: i32,
    pub mana: i32,
    pub gold: i32,
    pub experience: i32,
    pub values: Box<[[i32; STAT_SLOTS]; STAT_TIERS]>,
    pub username: String,
    pub palette: Palette,
    pub anchor: Point,
}

impl HostSnapshot {
    pub fn set_stat(&mut self, tier: Tier, attribute: Attribute, value: i32) {
        self.values[tier.index()][attribute.index()] = value;
    }
}

impl Default for HostSnapshot {
    fn default() -> Self {
        Self {
            hp: 0,
            mana: 0,
            gold: 0,
            experience: 0,
            values: Box::new([[0; STAT_SLOTS]; STAT_TIERS]),
            username: String::new(),
            palette: Palette {
                white: Color::irgb(31, 31, 31),
                text: Color::irgb(24, 24, 24),
                health: Color::irgb(31, 8, 8),
                mana: Color::irgb(8, 8, 31),
            },
            anchor: Point::default(),
        }
    }
}

#[derive(Default)]
struct Recorded {
    notes: Vec<String>,
    lines: Vec<String>,
    draws: Vec<DrawCall>,
}

#[derive(Default)]
pub struct RecordingHost {
    state: Mutex<HostSnapshot>,
    recorded: Mutex<Recorded>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: HostSnapshot) -> Self {
        Self {
            state: Mutex::new(state),
            recorded: Mutex::default(),
        }
    }

    /// 修改游戏状态（模拟宿主在两帧之间更新全局变量）
    pub fn update(&self, f: impl FnOnce(&mut HostSnapshot)) {
        f(&mut self.state());
    }

    pub fn notes(&self) -> Vec<String> {
        self.recorded().notes.clone()
    }

    pub fn lines(&self) -> Vec<String> {
        self.recorded().lines.clone()
    }

    pub fn draws(&self) -> Vec<DrawCall> {
        self.recorded().draws.clone()
    }

    /// 取出并清空已记录的聊天行
    pub fn take_lines(&self) -> Vec<String> {
        std::mem::take(&mut self.recorded().lines)
    }

    pub fn clear(&self) {
        *self.recorded() = Recorded::default();
    }

    fn state(&self) -> MutexGuard<'_, HostSnapshot> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn recorded(&self) -> MutexGuard<'_, Recorded> {
        self.recorded.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Console for RecordingHost {
    fn note(&self, text: &TextBuf) {
        self.recorded().notes.push(text.to_string());
    }

    fn add_line(&self, text: &TextBuf) {
        self.recorded().lines.push(text.to_string());
    }
}

impl Canvas for RecordingHost {
    fn render_rect(&self, from: Point, to: Point, color: Color) {
        self.recorded().draws.push(DrawCall::Rect { from, to, color });
    }

    fn render_line(&self, from: Point, to: Point, color: Color) {
        self.recorded().draws.push(DrawCall::Line { from, to, color });
    }

    fn render_text(&self, at: Point, color: Color, flags: TextFlags, text: &TextBuf) {
        self.recorded().draws.push(DrawCall::Text {
            at,
            color,
            flags,
            text: text.to_string(),
        });
    }

    fn anchor(&self, _anchor: Anchor) -> Point {
        self.state().anchor
    }
}

impl GameState for RecordingHost {
    fn hp(&self) -> i32 {
        self.state().hp
    }

    fn mana(&self) -> i32 {
        self.state().mana
    }

    fn gold(&self) -> i32 {
        self.state().gold
    }

    fn experience(&self) -> i32 {
        self.state().experience
    }

    fn stat(&self, tier: Tier, attribute: Attribute) -> i32 {
        self.state().values[tier.index()][attribute.index()]
    }

    fn username(&self) -> TextBuf {
        TextBuf::from(self.state().username.as_str())
    }

    fn palette(&self) -> Palette {
        self.state().palette
    }

    /// 简化的等级公式：每 1000 经验升一级
    fn level_for(&self, experience: i32) -> i32 {
        experience.max(0) / 1000 + 1
    }
}
