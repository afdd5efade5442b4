// Adapters layer: concrete implementations of the domain ports.

pub mod codec;
pub mod http;
pub mod storage;

pub use codec::Base64Codec;
pub use http::HttpMeasurementService;
pub use storage::LocalStorage;
