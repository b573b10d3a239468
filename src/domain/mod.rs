//! Domain layer: checkout entities, the promotion rule and the ports the
//! application layer depends on.

pub mod basket;
pub mod context;
pub mod money;
pub mod ports;
pub mod product;
pub mod promotion;
