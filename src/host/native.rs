//! 运行时解析的宿主 API
//!
//! 宿主可执行文件导出 mod API（函数与全局变量）。这里不在链接期声明
//! `extern` 符号，而是在 `amod_init` 时通过 `Library::this()` 从当前进程的
//! 符号表中查找，因此动态库本身没有未定义符号，测试二进制也能正常链接。

use std::ffi::{c_char, c_int};

use libloading::Library;
use tracing::debug;

use super::{Anchor, Attribute, Canvas, Console, GameState, Point, TextFlags, Tier};
use super::{STAT_SLOTS, STAT_TIERS, USERNAME_LEN};
use crate::common::{Color, ModError, Palette, TextBuf};

type NoteFn = unsafe extern "C" fn(*const c_char, ...) -> c_int;
type AddLineFn = unsafe extern "C" fn(*const c_char, ...);
type RenderRectFn = unsafe extern "C" fn(c_int, c_int, c_int, c_int, u16);
type RenderLineFn = unsafe extern "C" fn(c_int, c_int, c_int, c_int, u16);
type RenderTextFn = unsafe extern "C" fn(c_int, c_int, u16, c_int, *const c_char) -> c_int;
type DotFn = unsafe extern "C" fn(c_int) -> c_int;
type Exp2LevelFn = unsafe extern "C" fn(c_int) -> c_int;

type StatTable = [[c_int; STAT_SLOTS]; STAT_TIERS];

/// 变参日志函数统一用 "%s" 调用，文本内容不会被当作格式串
const PERCENT_S: &[u8; 3] = b"%s\0";

/// 宿主进程中解析出的函数指针和全局变量地址
pub struct NativeHost {
    note: NoteFn,
    addline: AddLineFn,
    render_rect: RenderRectFn,
    render_line: RenderLineFn,
    render_text: RenderTextFn,
    dotx: DotFn,
    doty: DotFn,
    exp2level: Exp2LevelFn,

    hp: *const c_int,
    mana: *const c_int,
    gold: *const c_int,
    experience: *const c_int,
    value: *const StatTable,
    username: *const [c_char; USERNAME_LEN],

    whitecolor: *const u16,
    textcolor: *const u16,
    healthcolor: *const u16,
    manacolor: *const u16,

    _program: Library,
}

// SAFETY: every pointer refers to host globals that live for the whole process
// and are only read through volatile loads; the host functions are callable
// from whichever thread the host uses to invoke the mod.
unsafe impl Send for NativeHost {}
unsafe impl Sync for NativeHost {}

fn host_program() -> Result<Library, ModError> {
    #[cfg(unix)]
    {
        Ok(libloading::os::unix::Library::this().into())
    }
    #[cfg(windows)]
    {
        libloading::os::windows::Library::this()
            .map(Into::into)
            .map_err(ModError::HostUnavailable)
    }
}

/// 查找单个符号并复制出其值（函数指针或变量地址）
///
/// # Safety
/// `T` 必须与宿主中该符号的真实类型一致
unsafe fn lookup<T: Copy>(program: &Library, name: &'static str) -> Result<T, ModError> {
    let mut symbol = Vec::with_capacity(name.len() + 1);
    symbol.extend_from_slice(name.as_bytes());
    symbol.push(0);
    let sym = program
        .get::<T>(&symbol)
        .map_err(|source| ModError::MissingSymbol { name, source })?;
    Ok(*sym)
}

impl NativeHost {
    /// 从当前进程解析全部宿主符号，任何一个缺失都视为宿主不兼容
    pub fn resolve() -> Result<Self, ModError> {
        let program = host_program()?;
        // SAFETY: the signatures below mirror the host's exported mod API.
        let host = unsafe {
            NativeHost {
                note: lookup(&program, "note")?,
                addline: lookup(&program, "addline")?,
                render_rect: lookup(&program, "render_rect")?,
                render_line: lookup(&program, "render_line")?,
                render_text: lookup(&program, "render_text")?,
                dotx: lookup(&program, "dotx")?,
                doty: lookup(&program, "doty")?,
                exp2level: lookup(&program, "exp2level")?,
                hp: lookup(&program, "hp")?,
                mana: lookup(&program, "mana")?,
                gold: lookup(&program, "gold")?,
                experience: lookup(&program, "experience")?,
                value: lookup(&program, "value")?,
                username: lookup(&program, "username")?,
                whitecolor: lookup(&program, "whitecolor")?,
                textcolor: lookup(&program, "textcolor")?,
                healthcolor: lookup(&program, "healthcolor")?,
                manacolor: lookup(&program, "manacolor")?,
                _program: program,
            }
        };
        debug!("host symbols resolved");
        Ok(host)
    }

    fn read_int(ptr: *const c_int) -> i32 {
        // SAFETY: ptr came from a resolved host global, see `resolve`.
        unsafe { ptr.read_volatile() }
    }

    fn read_color(ptr: *const u16) -> Color {
        // SAFETY: as in read_int.
        Color(unsafe { ptr.read_volatile() })
    }
}

impl Console for NativeHost {
    fn note(&self, text: &TextBuf) {
        unsafe {
            (self.note)(PERCENT_S.as_ptr().cast(), text.as_ptr());
        }
    }

    fn add_line(&self, text: &TextBuf) {
        unsafe {
            (self.addline)(PERCENT_S.as_ptr().cast(), text.as_ptr());
        }
    }
}

impl Canvas for NativeHost {
    fn render_rect(&self, from: Point, to: Point, color: Color) {
        unsafe { (self.render_rect)(from.x, from.y, to.x, to.y, color.raw()) }
    }

    fn render_line(&self, from: Point, to: Point, color: Color) {
        unsafe { (self.render_line)(from.x, from.y, to.x, to.y, color.raw()) }
    }

    fn render_text(&self, at: Point, color: Color, flags: TextFlags, text: &TextBuf) {
        unsafe {
            (self.render_text)(at.x, at.y, color.raw(), flags.0, text.as_ptr());
        }
    }

    fn anchor(&self, anchor: Anchor) -> Point {
        let idx = anchor.index();
        unsafe { Point::new((self.dotx)(idx), (self.doty)(idx)) }
    }
}

impl GameState for NativeHost {
    fn hp(&self) -> i32 {
        Self::read_int(self.hp)
    }

    fn mana(&self) -> i32 {
        Self::read_int(self.mana)
    }

    fn gold(&self) -> i32 {
        Self::read_int(self.gold)
    }

    fn experience(&self) -> i32 {
        Self::read_int(self.experience)
    }

    fn stat(&self, tier: Tier, attribute: Attribute) -> i32 {
        // SAFETY: both indices are bounded by the table's compile-time shape.
        unsafe {
            let cell = std::ptr::addr_of!((*self.value)[tier.index()][attribute.index()]);
            cell.read_volatile()
        }
    }

    fn username(&self) -> TextBuf {
        // SAFETY: fixed-size host buffer, copied out before inspection.
        let raw = unsafe { self.username.read_volatile() };
        TextBuf::from_c_chars(&raw)
    }

    fn palette(&self) -> Palette {
        Palette {
            white: Self::read_color(self.whitecolor),
            text: Self::read_color(self.textcolor),
            health: Self::read_color(self.healthcolor),
            mana: Self::read_color(self.manacolor),
        }
    }

    fn level_for(&self, experience: i32) -> i32 {
        unsafe { (self.exp2level)(experience) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_fails_outside_host() {
        // the test binary exports none of the host API
        match NativeHost::resolve() {
            Err(err) => assert!(err.is_host_failure()),
            Ok(_) => panic!("test process unexpectedly exports the host API"),
        }
    }
}
