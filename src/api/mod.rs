pub mod client;
pub mod request_id;
pub mod state;

pub use client::ApiClient;
pub use request_id::{RequestId, REQUEST_ID_HEADER};
pub use state::AppState;
