pub mod cli;
pub mod confounds;
pub mod ctx;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod pipeline;
pub mod quality;
pub mod schema;
pub mod volume;

pub use error::DenoiseError;
