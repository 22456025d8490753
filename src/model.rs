pub mod key;
pub mod object;
pub mod sync;
