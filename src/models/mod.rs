pub mod image;
pub mod notification;
pub mod options;
pub mod theme;

pub use image::*;
pub use notification::*;
pub use options::*;
pub use theme::*;
