pub mod export;
pub mod normalize;
