//! FAT12 volume engine for HDI disk images.
//!
//! The image lives in one byte-buffer arena; every on-disk structure is
//! addressed by offset into it. [`volume::Fat12Volume`] derives the
//! canonical regions, the FAT chain primitives and directory/file
//! operations mutate them in place, and [`session::Session`] exposes the
//! whole thing through the [`fatvfs::MountOps`] contract.

pub mod bpb;
pub mod codec;
pub mod datetime;
pub mod dir;
pub mod entry;
pub mod fat;
pub mod file;
pub mod hdi;
pub mod image;
pub mod mkimage;
pub mod ms932;
pub mod session;
pub mod volume;

pub use fatvfs::{FsError, FsResult, MountOps};
pub use session::Session;
pub use volume::Fat12Volume;
