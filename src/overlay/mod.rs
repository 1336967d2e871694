//! HUD 面板
//!
//! 固定布局：背景矩形、四条边框、标题和四行数值。面板锚定在宿主的
//! 左上角锚点并偏移 (+10, +10)，所有数值每帧直接从宿主读取。

use crate::app::MOD_NAME;
use crate::common::Color;
use crate::host::{Anchor, Attribute, Canvas, GameState, Point, TextFlags, Tier};
use crate::text;

pub const PANEL_OFFSET: (i32, i32) = (10, 10);
pub const PANEL_WIDTH: i32 = 180;
pub const PANEL_HEIGHT: i32 = 80;
/// 文字相对面板左上角的内边距
pub const TEXT_INSET: i32 = 4;
/// 第一行数值相对面板顶部的位置
pub const FIRST_ROW: i32 = 20;
pub const ROW_HEIGHT: i32 = 14;

pub const BACKGROUND: Color = Color::irgb(4, 4, 6);
pub const BORDER: Color = Color::irgb(12, 12, 16);
pub const GOLD: Color = Color::irgb(31, 31, 0);

/// 面板在屏幕上的位置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelRect {
    pub origin: Point,
    pub width: i32,
    pub height: i32,
}

impl PanelRect {
    pub fn anchored_at(anchor: Point) -> Self {
        Self {
            origin: anchor.offset(PANEL_OFFSET.0, PANEL_OFFSET.1),
            width: PANEL_WIDTH,
            height: PANEL_HEIGHT,
        }
    }

    pub fn top_left(&self) -> Point {
        self.origin
    }

    pub fn top_right(&self) -> Point {
        self.origin.offset(self.width, 0)
    }

    pub fn bottom_left(&self) -> Point {
        self.origin.offset(0, self.height)
    }

    pub fn bottom_right(&self) -> Point {
        self.origin.offset(self.width, self.height)
    }

    /// 第 `row` 行数值的文字位置
    pub fn row(&self, row: i32) -> Point {
        self.origin
            .offset(TEXT_INSET, FIRST_ROW + row * ROW_HEIGHT)
    }
}

/// 绘制一帧面板，`frame` 为当前帧计数
pub fn draw<H>(host: &H, frame: u32)
where
    H: Canvas + GameState + ?Sized,
{
    let panel = PanelRect::anchored_at(host.anchor(Anchor::TopLeft));
    let palette = host.palette();

    host.render_rect(panel.top_left(), panel.bottom_right(), BACKGROUND);

    host.render_line(panel.top_left(), panel.top_right(), BORDER);
    host.render_line(panel.bottom_left(), panel.bottom_right(), BORDER);
    host.render_line(panel.top_left(), panel.bottom_left(), BORDER);
    host.render_line(panel.top_right(), panel.bottom_right(), BORDER);

    host.render_text(
        panel.origin.offset(TEXT_INSET, TEXT_INSET),
        palette.white,
        TextFlags::NONE,
        &text!("{}", MOD_NAME),
    );

    let rows = [
        (
            palette.health,
            text!(
                "HP: {} / {}",
                host.hp(),
                host.stat(Tier::Modified, Attribute::Hp)
            ),
        ),
        (
            palette.mana,
            text!(
                "Mana: {} / {}",
                host.mana(),
                host.stat(Tier::Modified, Attribute::Mana)
            ),
        ),
        (GOLD, text!("Gold: {}", host.gold())),
        (palette.text, text!("Frame: {}", frame)),
    ];
    for (row, (color, line)) in (0..).zip(rows.iter()) {
        host.render_text(panel.row(row), *color, TextFlags::NONE, line);
    }
}
