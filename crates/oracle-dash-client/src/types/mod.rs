/*
[INPUT]:  Wire schema definitions and serde requirements
[OUTPUT]: Typed Rust structs/enums with serialization support
[POS]:    Data layer - type definitions for protocol communication
[UPDATE]: When the wire schema changes or new types are added
*/

pub mod enums;
pub mod frames;
pub mod models;

pub use enums::*;
pub use frames::*;
pub use models::*;
