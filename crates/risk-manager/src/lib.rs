pub mod conviction;
pub mod models;
#[cfg(test)]
mod tests;

pub use conviction::ConvictionEngine;
pub use models::*;
