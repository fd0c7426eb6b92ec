pub mod batch;
pub mod cancel;
pub mod container;
pub mod error;
pub mod freezer;
pub mod resolver;
pub mod runtime;
pub mod statedir;
pub mod utils;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
