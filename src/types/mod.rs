pub mod chart;
pub mod instrument;
pub mod settings;
pub mod signals;

pub use chart::*;
pub use instrument::*;
pub use settings::*;
pub use signals::*;
