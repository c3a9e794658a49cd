mod momo;

pub use momo::MomoProvider;
