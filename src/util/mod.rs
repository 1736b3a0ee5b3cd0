#[cfg(feature = "hydrate")]
pub mod dom;
