pub mod city;
pub mod common;
pub mod state;

pub use city::*;
pub use common::*;
pub use state::*;
