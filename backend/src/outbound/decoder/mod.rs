//! HTTP adapter for the external VIN decoding service.

mod dto;
mod http_decoder;

pub use http_decoder::{HttpVinDecoder, DEFAULT_DECODER_URL};
