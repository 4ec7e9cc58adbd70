//! Network layer: wire DTOs and the WebSocket frame client.

pub mod frame_client;
pub mod types;
