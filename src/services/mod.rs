//! Service modules that sit between the parsers and the outside world.
//!
//! Loading touches the filesystem; everything it calls into is pure.

pub mod loader;
