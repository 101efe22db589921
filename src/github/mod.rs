pub mod model;
pub mod rest;
#[cfg(test)]
pub mod stubs;
