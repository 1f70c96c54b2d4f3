//! Common test utilities for bjerknes.
//!
//! Each integration test binary uses a different subset of these helpers.

#![allow(dead_code)]

pub mod assertions;
pub mod http_client;
pub mod image_utils;
pub mod test_data;
