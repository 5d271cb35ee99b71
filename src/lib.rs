#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

pub use lumen_cfg as cfg;
pub use lumen_rtti as rtti;
pub use lumen_utils as utils;
