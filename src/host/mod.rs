//! Host bridge
//!
//! 游戏客户端向 mod 提供的全部能力：日志输出、绘图原语、屏幕锚点、
//! 经验换算以及只读的全局游戏状态。mod 只通过这里的 trait 访问宿主，
//! 运行时使用 [`NativeHost`]，测试使用 [`RecordingHost`]。

pub mod native;
pub mod recording;

use crate::common::{Color, Palette, TextBuf};

pub use native::NativeHost;
pub use recording::{DrawCall, HostSnapshot, RecordingHost};

/// 属性表第二维的长度（宿主的 `V_MAX`）
pub const STAT_SLOTS: usize = 200;

/// 属性表第一维的长度
pub const STAT_TIERS: usize = 2;

/// 宿主用户名缓冲区长度
pub const USERNAME_LEN: usize = 40;

/// 屏幕坐标
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// 与宿主的 C int 运算一致，溢出时回绕
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.wrapping_add(dx),
            y: self.y.wrapping_add(dy),
        }
    }
}

/// 宿主布局系统中的命名锚点（`dotx`/`doty` 的参数）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    TopLeft,
}

impl Anchor {
    pub fn index(self) -> i32 {
        match self {
            Anchor::TopLeft => 0,
        }
    }
}

/// 属性表第一维
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// 含装备/状态修正后的数值（`value[0]`）
    Modified,
    /// 基础数值（`value[1]`）
    Base,
}

impl Tier {
    pub fn index(self) -> usize {
        match self {
            Tier::Modified => 0,
            Tier::Base => 1,
        }
    }
}

/// 属性表第二维中 mod 用到的槽位
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    Hp,
    Mana,
    Wisdom,
    Intelligence,
    Agility,
    Strength,
}

impl Attribute {
    pub fn index(self) -> usize {
        match self {
            Attribute::Hp => 0,
            Attribute::Mana => 2,
            Attribute::Wisdom => 3,
            Attribute::Intelligence => 4,
            Attribute::Agility => 5,
            Attribute::Strength => 6,
        }
    }
}

/// `render_text` 的标志位，mod 目前只使用 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextFlags(pub i32);

impl TextFlags {
    pub const NONE: TextFlags = TextFlags(0);
}

/// 文本输出：诊断日志和游戏内聊天区
pub trait Console {
    /// 诊断日志（宿主的 `note`）
    fn note(&self, text: &TextBuf);
    /// 游戏内聊天/日志区（宿主的 `addline`）
    fn add_line(&self, text: &TextBuf);
}

/// 绘图原语与布局查询
pub trait Canvas {
    fn render_rect(&self, from: Point, to: Point, color: Color);
    fn render_line(&self, from: Point, to: Point, color: Color);
    fn render_text(&self, at: Point, color: Color, flags: TextFlags, text: &TextBuf);
    fn anchor(&self, anchor: Anchor) -> Point;
}

/// 只读游戏状态
pub trait GameState {
    fn hp(&self) -> i32;
    fn mana(&self) -> i32;
    fn gold(&self) -> i32;
    fn experience(&self) -> i32;
    fn stat(&self, tier: Tier, attribute: Attribute) -> i32;
    fn username(&self) -> TextBuf;
    fn palette(&self) -> Palette;
    /// 宿主的经验→等级换算（`exp2level`）
    fn level_for(&self, experience: i32) -> i32;
}

/// mod 需要的完整宿主能力
pub trait Host: Console + Canvas + GameState + Send + Sync {}

impl<T> Host for T where T: Console + Canvas + GameState + Send + Sync {}
