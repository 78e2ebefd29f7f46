pub mod finder;
pub mod http;
pub mod pipeline;
