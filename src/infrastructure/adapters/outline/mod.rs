//! Outline Adapter - 从文件读取大纲

mod outline_file;

pub use outline_file::{load_outline, parse_outline, OutlineFileError, OutlineFormat};
