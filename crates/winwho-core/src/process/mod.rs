pub mod names;
pub mod types;

pub use names::{ProcessNameLookup, SysinfoNameLookup};
pub use types::Pid;
