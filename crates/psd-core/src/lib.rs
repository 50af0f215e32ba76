//! Core types and utilities for the PSD/PSB reader
//!
//! This crate provides the fundamental data structures shared by every stage of
//! the reader: container version and bit depth, color modes, channel identifiers,
//! layer rectangles, blend modes, the `Sample` pixel trait and the error type.

pub mod consts;
pub mod error;
pub mod image;
pub mod types;

pub use error::{PsdError, PsdResult};
pub use image::*;
pub use types::*;
