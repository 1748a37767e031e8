//! Page rasters: a borrowed 8-bit view for extraction and owned buffers
//! for the tools.

pub mod io;
pub mod u8;

pub use self::io::PageImage;
pub use self::u8::ImageU8;
