//! Generation - procedural creation of terrain material and miners.

mod names;
mod spawn;
mod terrain;

pub use names::*;
pub use spawn::*;
pub use terrain::*;
