use std::ffi::{c_char, CStr};
use std::fmt::{self, Write};

/// 与宿主约定的单行文本缓冲区大小（含结尾 NUL）
pub const TEXT_CAPACITY: usize = 256;

/// 定长文本缓冲区
///
/// 最多保存 `TEXT_CAPACITY - 1` 字节内容并始终以 NUL 结尾，可直接作为
/// `const char*` 交给宿主。超出容量的内容在 UTF-8 字符边界处静默截断，
/// 内嵌的 NUL 字符被丢弃。写入永远不会失败。
#[derive(Clone)]
pub struct TextBuf {
    buf: [u8; TEXT_CAPACITY],
    len: usize,
}

impl TextBuf {
    pub const fn new() -> Self {
        Self {
            buf: [0; TEXT_CAPACITY],
            len: 0,
        }
    }

    /// 按 `format_args!` 格式化，超长部分截断
    pub fn format(args: fmt::Arguments<'_>) -> Self {
        let mut text = Self::new();
        // TextBuf::write_str never reports an error
        let _ = text.write_fmt(args);
        text
    }

    /// 从宿主的定长 `char[N]` 缓冲区读取，遇到第一个 NUL 即停止。
    /// 非 UTF-8 字节（如 Latin-1 用户名）替换为 U+FFFD
    pub fn from_c_chars(chars: &[c_char]) -> Self {
        let bytes: Vec<u8> = chars
            .iter()
            .take_while(|&&c| c != 0)
            .map(|&c| c as u8)
            .collect();
        let mut text = Self::new();
        text.push_str(&String::from_utf8_lossy(&bytes));
        text
    }

    pub fn as_str(&self) -> &str {
        // only whole chars are ever copied in, see push_str
        std::str::from_utf8(&self.buf[..self.len]).unwrap_or_default()
    }

    pub fn as_c_str(&self) -> &CStr {
        CStr::from_bytes_until_nul(&self.buf[..=self.len]).unwrap_or_default()
    }

    pub fn as_ptr(&self) -> *const c_char {
        self.buf.as_ptr().cast()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn remaining(&self) -> usize {
        TEXT_CAPACITY - 1 - self.len
    }

    /// 追加文本，返回实际写入的字节数
    pub fn push_str(&mut self, s: &str) -> usize {
        let start = self.len;
        for ch in s.chars() {
            if ch == '\0' {
                continue;
            }
            let width = ch.len_utf8();
            if width > self.remaining() {
                break;
            }
            ch.encode_utf8(&mut self.buf[self.len..self.len + width]);
            self.len += width;
        }
        self.buf[self.len] = 0;
        self.len - start
    }

    pub fn clear(&mut self) {
        self.len = 0;
        self.buf[0] = 0;
    }
}

impl Default for TextBuf {
    fn default() -> Self {
        Self::new()
    }
}

impl Write for TextBuf {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.push_str(s);
        Ok(())
    }
}

impl From<&str> for TextBuf {
    fn from(s: &str) -> Self {
        let mut text = Self::new();
        text.push_str(s);
        text
    }
}

impl std::ops::Deref for TextBuf {
    type Target = str;

    fn deref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for TextBuf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for TextBuf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl PartialEq for TextBuf {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for TextBuf {}

impl PartialEq<str> for TextBuf {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for TextBuf {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

/// `format!` 的定长版本，结果为 [`TextBuf`]
#[macro_export]
macro_rules! text {
    ($($arg:tt)*) => {
        $crate::common::text::TextBuf::format(format_args!($($arg)*))
    };
}
