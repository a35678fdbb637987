pub mod artifacts;
pub mod backend;
pub mod session;
pub mod utils;

#[cfg(test)]
mod tests;
