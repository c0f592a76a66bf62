pub mod sync;
pub mod watch;
