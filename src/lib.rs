//! Reelforge - batch image and video tooling
//!
//! This library crate exposes the job layer for integration testing.

pub mod batch;
pub mod config;
pub mod detector;
pub mod jobs;
