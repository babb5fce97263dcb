//! Client connections: registration, per-user limits and the JSON driver.

pub mod driver;
pub mod handle;
pub mod pool;

pub use driver::ConnectionDriver;
pub use handle::ClientHandle;
pub use pool::ConnectionPool;
