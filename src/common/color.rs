/// 宿主的 15 位颜色（RGB 5-5-5）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color(pub u16);

impl Color {
    /// 对应宿主的 `IRGB(r, g, b)`，每个分量 0..=31，超出部分被截掉
    pub const fn irgb(r: u16, g: u16, b: u16) -> Self {
        Color(((r & 0x1f) << 10) | ((g & 0x1f) << 5) | (b & 0x1f))
    }

    pub const fn raw(self) -> u16 {
        self.0
    }
}

/// 宿主导出的命名颜色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Palette {
    pub white: Color,
    pub text: Color,
    pub health: Color,
    pub mana: Color,
}
