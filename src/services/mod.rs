pub mod png_codec;
pub mod quantize_job;

pub use png_codec::{decode_png, encode_png, DecodedImage};
pub use quantize_job::{default_output_path, JobReport, QuantizeJob};
