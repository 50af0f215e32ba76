//! Byte-level reading for PSD/PSB documents
//!
//! This crate provides the bounded, big-endian cursor every parsing stage of the
//! reader is built on.

pub mod reader;

pub use reader::ByteReader;
