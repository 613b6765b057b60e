pub mod shared;
pub mod sync;
