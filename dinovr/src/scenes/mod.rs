pub mod playground;

pub use playground::{pen_bounds, PlaygroundBuilder, PlaygroundScene};
