pub mod assemble;
pub mod frame;
pub mod load;
pub mod packing;
pub mod wiring;
