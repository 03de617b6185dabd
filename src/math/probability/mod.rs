pub mod bessel;
pub mod seed;
pub mod von_mises_fisher;

pub use seed::SeedConfig;
pub use von_mises_fisher::VonMisesFisher;
