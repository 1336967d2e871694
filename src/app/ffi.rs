//! FFI 层：宿主按名字查找并调用的 `amod_*` 回调。
//!
//! 所有导出函数使用统一约定：
//! - 返回 c_int 的回调: 1 = 已处理, 0 = 未处理（包括尚未初始化）
//! - 不返回值的回调在实例不存在时什么都不做
//! - 任何错误都在这里转成日志，不会穿过 C ABI

use std::ffi::{c_char, c_int, CStr};
use std::path::Path;
use std::sync::{Arc, OnceLock, RwLock};

use tracing::{error, warn};

use super::{logging, Plugin, VERSION_STRING};
use crate::common::ModError;
use crate::config;
use crate::host::{Console, Host, NativeHost};
use crate::text;

/// 全局 mod 实例
static INSTANCE: OnceLock<RwLock<Option<Plugin<dyn Host>>>> = OnceLock::new();

fn instance_lock() -> &'static RwLock<Option<Plugin<dyn Host>>> {
    INSTANCE.get_or_init(|| RwLock::new(None))
}

/// 安全地从 C 字符串指针读取 &str
unsafe fn from_c_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok()
}

/// 对实例执行操作的宏: 读锁 -> 检查存在 -> 执行闭包
macro_rules! with_plugin {
    ($default:expr, $f:expr) => {{
        let guard = match instance_lock().read() {
            Ok(g) => g,
            Err(_) => return $default, // poisoned lock
        };
        match guard.as_ref() {
            Some(plugin) => $f(plugin),
            None => $default, // not initialized
        }
    }};
}

/// 放入新实例并执行 init；已有实例时保留旧实例
fn install_plugin(plugin: Plugin<dyn Host>) -> bool {
    let mut guard = match instance_lock().write() {
        Ok(g) => g,
        Err(poisoned) => poisoned.into_inner(),
    };
    if guard.is_some() {
        warn!("amod_init called twice, keeping the running instance");
        return false;
    }
    plugin.init();
    *guard = Some(plugin);
    true
}

fn remove_plugin() -> Option<Plugin<dyn Host>> {
    match instance_lock().write() {
        Ok(mut g) => g.take(),
        Err(poisoned) => poisoned.into_inner().take(),
    }
}

/// 宿主解析成功之后的启动步骤：读配置、装日志、构造实例。
///
/// 配置读取失败时使用默认值；日志安装失败时直接写宿主 `note`。
fn bootstrap<F>(host: Arc<dyn Host>, path: &Path, install_logging: F) -> Plugin<dyn Host>
where
    F: FnOnce(Arc<dyn Host>, &str) -> Result<(), ModError>,
{
    let (config, config_err) = match config::load_or_default(path) {
        Ok(c) => (c, None),
        Err(e) => (config::ModConfig::default(), Some(e)),
    };

    if let Err(e) = install_logging(host.clone(), &config.log.level) {
        host.note(&text!("{} logging unavailable: {}", logging::LOG_PREFIX, e));
    }
    if let Some(e) = config_err {
        let kind = ModError::classify(&e);
        let cause = format!("{e:#}");
        warn!(
            path = %path.display(),
            kind = kind.as_str(),
            error = %cause,
            "config ignored, using defaults"
        );
    }

    Plugin::new(host, &config)
}

/// 宿主 API 不可用时只能写 stderr
fn report_without_host(err: &ModError) {
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .try_init();
    error!(error = %err, kind = err.kind().as_str(), "mod disabled");
}

// ═══════════════════════════════════════════════════════════════════════════
// 生命周期
// ═══════════════════════════════════════════════════════════════════════════

/// 获取版本标识（静态字符串，调用方不得释放）
#[no_mangle]
pub extern "C" fn amod_version() -> *const c_char {
    VERSION_STRING.as_ptr()
}

/// 加载后调用一次
#[no_mangle]
pub extern "C" fn amod_init() {
    let host: Arc<dyn Host> = match NativeHost::resolve() {
        Ok(h) => Arc::new(h),
        Err(e) => {
            report_without_host(&e);
            return;
        }
    };

    let plugin = bootstrap(host, &config::config_path(), |h, level| {
        logging::install(h, level)
    });
    install_plugin(plugin);
}

/// 卸载前调用一次
#[no_mangle]
pub extern "C" fn amod_exit() {
    if let Some(plugin) = remove_plugin() {
        plugin.exit();
    }
}

/// 进入游戏
#[no_mangle]
pub extern "C" fn amod_gamestart() {
    with_plugin!((), |p: &Plugin<dyn Host>| p.game_start())
}

/// 每秒 24 次
#[no_mangle]
pub extern "C" fn amod_tick() {
    with_plugin!((), |p: &Plugin<dyn Host>| p.tick())
}

/// 每渲染一帧调用一次
#[no_mangle]
pub extern "C" fn amod_frame() {
    with_plugin!((), |p: &Plugin<dyn Host>| p.frame())
}

// ═══════════════════════════════════════════════════════════════════════════
// 输入
// ═══════════════════════════════════════════════════════════════════════════

#[no_mangle]
pub extern "C" fn amod_mouse_move(x: c_int, y: c_int) {
    with_plugin!((), |p: &Plugin<dyn Host>| p.mouse_move(x, y))
}

#[no_mangle]
pub extern "C" fn amod_mouse_click(x: c_int, y: c_int, button: c_int) -> c_int {
    with_plugin!(0, |p: &Plugin<dyn Host>| p
        .mouse_click(x, y, button)
        .as_c_int())
}

#[no_mangle]
pub extern "C" fn amod_keydown(code: c_int) -> c_int {
    with_plugin!(0, |p: &Plugin<dyn Host>| p.key_down(code).as_c_int())
}

#[no_mangle]
pub extern "C" fn amod_keyup(code: c_int) -> c_int {
    with_plugin!(0, |p: &Plugin<dyn Host>| p.key_up(code).as_c_int())
}

/// 聊天命令
///
/// # Safety
/// `buf` 必须为 null 或合法的 C 字符串指针
#[no_mangle]
pub unsafe extern "C" fn amod_client_cmd(buf: *const c_char) -> c_int {
    let input = match from_c_str(buf) {
        Some(s) => s,
        None => return 0,
    };
    with_plugin!(0, |p: &Plugin<dyn Host>| p.client_command(input).as_c_int())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::logging::HostLogLayer;
    use crate::config::ModConfig;
    use crate::host::RecordingHost;
    use tracing_subscriber::layer::SubscriberExt;

    fn write_config(dir: &tempfile::TempDir, yaml: &str) -> std::path::PathBuf {
        let path = dir.path().join(config::DEFAULT_CONFIG_FILE);
        std::fs::write(&path, yaml).unwrap();
        path
    }

    #[test]
    fn bootstrap_falls_back_on_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "overlay:\n  visible_on_start: maybe\n");
        let host = Arc::new(RecordingHost::new());
        let shared: Arc<dyn Host> = host.clone();

        let subscriber = tracing_subscriber::registry().with(HostLogLayer::new(host.clone()));
        let plugin = tracing::subscriber::with_default(subscriber, || {
            bootstrap(shared, &path, |_, _| Ok(()))
        });

        assert!(!plugin.is_overlay_visible());
        let notes = host.notes();
        assert_eq!(notes.len(), 1);
        assert!(notes[0].starts_with("[demo-mod] warning: config ignored, using defaults"));
        assert!(notes[0].contains("kind=YAML"));
        assert!(notes[0].contains("error=parse mod config: YAML error"));
    }

    #[test]
    fn bootstrap_reports_logging_failure_through_note() {
        let dir = tempfile::tempdir().unwrap();
        let host = Arc::new(RecordingHost::new());
        let shared: Arc<dyn Host> = host.clone();

        let plugin = bootstrap(shared, &dir.path().join("absent.yaml"), |_, _| {
            Err(ModError::Logging("global subscriber already set".into()))
        });

        assert!(!plugin.is_overlay_visible());
        assert_eq!(
            host.notes(),
            vec!["[demo-mod] logging unavailable: logging error: global subscriber already set"]
        );
    }

    #[test]
    fn bootstrap_applies_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            "log:\n  level: \"ugaris_demo_mod=debug\"\noverlay:\n  visible_on_start: true\n",
        );
        let host = Arc::new(RecordingHost::new());
        let shared: Arc<dyn Host> = host.clone();

        let mut level = String::new();
        let plugin = bootstrap(shared, &path, |_, configured| {
            level = configured.to_string();
            Ok(())
        });

        assert_eq!(level, "ugaris_demo_mod=debug");
        assert!(plugin.is_overlay_visible());
        plugin.frame();
        assert_eq!(host.draws().len(), 10);
        assert!(host.notes().is_empty());
    }

    #[test]
    fn ffi_version() {
        let ver = amod_version();
        assert!(!ver.is_null());
        let s = unsafe { CStr::from_ptr(ver) }.to_str().unwrap();
        assert_eq!(s, "C++ Demo Mod 1.0.0");
    }

    #[test]
    fn ffi_client_cmd_null() {
        assert_eq!(unsafe { amod_client_cmd(std::ptr::null()) }, 0);
    }

    #[test]
    fn ffi_client_cmd_non_utf8() {
        let raw = [0xffu8, 0xfe, 0];
        assert_eq!(unsafe { amod_client_cmd(raw.as_ptr().cast()) }, 0);
    }

    // the exported callbacks share one global slot, so the whole lifecycle
    // runs inside a single test
    #[test]
    fn ffi_lifecycle_against_recording_host() {
        // no instance yet: everything declines
        assert_eq!(unsafe { amod_client_cmd(c"#hello".as_ptr()) }, 0);
        amod_frame();
        amod_tick();
        amod_gamestart();
        amod_mouse_move(1, 1);

        // resolving the real host fails in a test binary and leaves no instance
        amod_init();
        assert_eq!(unsafe { amod_client_cmd(c"#hello".as_ptr()) }, 0);

        let host = Arc::new(RecordingHost::new());
        host.update(|s| s.username = "Ishtar".into());
        let shared: Arc<dyn Host> = host.clone();
        assert!(install_plugin(Plugin::new(shared.clone(), &ModConfig::default())));
        assert!(!install_plugin(Plugin::new(shared, &ModConfig::default())));

        amod_gamestart();
        assert_eq!(
            host.notes(),
            vec![
                "C++ Demo Mod initializing...",
                "C++ Demo Mod: Game started! Welcome, Ishtar",
            ]
        );

        assert_eq!(unsafe { amod_client_cmd(c"#hello".as_ptr()) }, 1);
        assert_eq!(unsafe { amod_client_cmd(c"#nope".as_ptr()) }, 0);
        assert_eq!(amod_mouse_click(5, 5, 1), 0);
        assert_eq!(amod_keydown(65), 0);
        assert_eq!(amod_keyup(65), 0);

        amod_frame();
        assert!(host.draws().is_empty());
        assert_eq!(unsafe { amod_client_cmd(c"#overlay".as_ptr()) }, 1);
        amod_frame();
        assert_eq!(host.draws().len(), 10);

        amod_exit();
        assert_eq!(
            host.notes().last().map(String::as_str),
            Some("C++ Demo Mod shutting down.")
        );
        assert_eq!(unsafe { amod_client_cmd(c"#hello".as_ptr()) }, 0);
        amod_exit();
    }
}
