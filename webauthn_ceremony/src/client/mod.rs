mod errors;
mod http;
mod types;

pub use errors::TransportError;
pub use http::{AUTHENTICATE_PATH, HttpWireClient, REGISTER_PATH, VERIFY_INFO_PATH};
pub use types::WireClient;
