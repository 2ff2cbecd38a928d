pub use cache::*;
pub use errors::*;
pub use palette::*;
pub use protocol::*;
pub use session::*;
pub use transport::*;

#[cfg(test)]
mod arbitrary;
mod cache;
mod errors;
mod palette;
mod protocol;
mod session;
#[cfg(any(test, feature = "test-util"))]
pub mod testing;
mod transport;
