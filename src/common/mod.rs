pub mod color;
pub mod error;
pub mod text;

pub use color::{Color, Palette};
pub use error::{ModError, ModErrorKind};
pub use text::{TextBuf, TEXT_CAPACITY};
