pub mod meme;
pub mod params;
pub mod raw;

pub use meme::MemeRecord;
pub use params::{ParamsError, RunParams};
pub use raw::RawAgentOutput;
