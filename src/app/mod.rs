pub mod ffi;
pub mod logging;

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};
use std::sync::Arc;

use tracing::info;

use crate::command::{self, Outcome};
use crate::config::ModConfig;
use crate::host::Host;
use crate::overlay;
use crate::text;

/// mod 在宿主中显示的名字
pub const MOD_NAME: &str = "C++ Demo Mod";

/// `amod_version` 返回的标识串
pub const VERSION_STRING: &std::ffi::CStr = c"C++ Demo Mod 1.0.0";

/// 生命周期阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Phase {
    Uninitialized = 0,
    Running = 1,
    Exited = 2,
}

impl Phase {
    fn from_u8(v: u8) -> Self {
        match v {
            1 => Phase::Running,
            2 => Phase::Exited,
            _ => Phase::Uninitialized,
        }
    }
}

/// 每帧递增的计数器，溢出时回绕
#[derive(Debug, Default)]
pub struct FrameCounter(AtomicU32);

impl FrameCounter {
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    pub fn starting_at(value: u32) -> Self {
        Self(AtomicU32::new(value))
    }

    /// 加一并返回新值
    pub fn advance(&self) -> u32 {
        self.0.fetch_add(1, Ordering::Relaxed).wrapping_add(1)
    }

    pub fn get(&self) -> u32 {
        self.0.load(Ordering::Relaxed)
    }
}

/// 一个已加载的 mod 实例：宿主能力加上全部跨回调状态
pub struct Plugin<H: Host + ?Sized> {
    host: Arc<H>,
    overlay_visible: AtomicBool,
    frames: FrameCounter,
    phase: AtomicU8,
}

impl<H: Host + ?Sized> Plugin<H> {
    pub fn new(host: Arc<H>, config: &ModConfig) -> Self {
        Self {
            host,
            overlay_visible: AtomicBool::new(config.overlay.visible_on_start),
            frames: FrameCounter::new(),
            phase: AtomicU8::new(Phase::Uninitialized as u8),
        }
    }

    /// 测试用：指定帧计数起点
    pub fn with_frame_count(mut self, frames: u32) -> Self {
        self.frames = FrameCounter::starting_at(frames);
        self
    }

    pub fn host(&self) -> &Arc<H> {
        &self.host
    }

    pub fn phase(&self) -> Phase {
        Phase::from_u8(self.phase.load(Ordering::Acquire))
    }

    pub fn is_overlay_visible(&self) -> bool {
        self.overlay_visible.load(Ordering::Relaxed)
    }

    pub fn frame_count(&self) -> u32 {
        self.frames.get()
    }

    // ─── Lifecycle ───────────────────────────────────────────────────────

    pub fn init(&self) {
        self.host.note(&text!("{} initializing...", MOD_NAME));
        self.phase.store(Phase::Running as u8, Ordering::Release);
        info!(overlay = self.is_overlay_visible(), "mod initialized");
    }

    pub fn exit(&self) {
        self.host.note(&text!("{} shutting down.", MOD_NAME));
        self.phase.store(Phase::Exited as u8, Ordering::Release);
        info!(frames = self.frame_count(), "mod exited");
    }

    pub fn game_start(&self) {
        let username = self.host.username();
        self.host
            .note(&text!("{}: Game started! Welcome, {}", MOD_NAME, username));
        self.host.add_line(&text!(
            "{} loaded. Type #hello for commands.",
            MOD_NAME
        ));
    }

    /// 每秒 24 次，预留给周期性逻辑
    pub fn tick(&self) {}

    pub fn frame(&self) {
        let frame = self.frames.advance();
        if !self.overlay_visible.load(Ordering::Relaxed) {
            return;
        }
        overlay::draw(self.host.as_ref(), frame);
    }

    // ─── Input ───────────────────────────────────────────────────────────

    pub fn mouse_move(&self, _x: i32, _y: i32) {}

    pub fn mouse_click(&self, _x: i32, _y: i32, _button: i32) -> Outcome {
        Outcome::Unhandled
    }

    pub fn key_down(&self, _code: i32) -> Outcome {
        Outcome::Unhandled
    }

    pub fn key_up(&self, _code: i32) -> Outcome {
        Outcome::Unhandled
    }

    pub fn client_command(&self, input: &str) -> Outcome {
        command::dispatch(self.host.as_ref(), &self.overlay_visible, input)
    }
}
