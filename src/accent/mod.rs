pub mod color;
pub mod extractor;
pub mod histogram;
pub mod quantize;
pub mod request;
pub mod select;
