//! Ugaris demo mod
//!
//! 以 cdylib 形式被游戏客户端加载，导出 `amod_*` 生命周期回调：
//! 三个聊天命令（`#hello`、`#stats`、`#overlay`）和一个可切换的 HUD 面板。
//! 宿主 API 在 `amod_init` 时从客户端进程中解析，见 [`host::NativeHost`]。

#![allow(clippy::new_without_default, clippy::len_without_is_empty)]

pub mod app;
pub mod command;
pub mod common;
pub mod config;
pub mod host;
pub mod overlay;

pub use app::{FrameCounter, Phase, Plugin, MOD_NAME};
pub use command::{Command, Outcome};
pub use common::{Color, ModError, Palette, TextBuf};
