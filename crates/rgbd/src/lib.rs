#![doc = env!("CARGO_PKG_DESCRIPTION")]

#[doc(inline)]
pub use rgbd_align as align;

#[doc(inline)]
pub use rgbd_image as image;

#[doc(inline)]
pub use rgbd_io as io;
