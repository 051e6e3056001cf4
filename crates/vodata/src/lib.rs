#![doc = env!("CARGO_PKG_DESCRIPTION")]

#[doc(inline)]
pub use vodata_image as image;

#[doc(inline)]
pub use vodata_io as io;

#[doc(inline)]
pub use vodata_pose as pose;

#[doc(inline)]
pub use vodata_dataset as dataset;
