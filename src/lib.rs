//! nquant - PNN palette quantizer for PNG images
//!
//! Thin front end over the `pnn-quant` library: PNG decoding and encoding,
//! YAML configuration and the quantize job the CLI runs.
//! This library exposes modules for integration testing.

pub mod error;
pub mod models;
pub mod services;
