#![crate_name = "stomp_codec"]
#![crate_type = "lib"]

#[macro_use]
extern crate log;
extern crate bytes;
extern crate thiserror;
extern crate unicode_segmentation;

pub mod header;
pub mod frame;
pub mod frame_builder;
pub mod codec;
pub mod subscription;
pub mod error;
