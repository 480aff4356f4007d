//! Port adapters.

mod reqwest_client;
mod route_channel;
mod system_clock;

pub use reqwest_client::ReqwestHttpClient;
pub use route_channel::RouteChannel;
pub use system_clock::SystemClock;
