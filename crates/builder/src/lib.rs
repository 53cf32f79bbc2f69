//! Client side of the custom report builder: column selection, the builder
//! state machine, debounced previews and the HTTP client.

pub mod client;
pub mod debounce;
pub mod preview;
pub mod selection;
pub mod session;
