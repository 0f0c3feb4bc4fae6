pub mod fixed;
pub mod position;
pub mod pow;
pub mod rounding;

pub use fixed::{FixedPoint, ParseFixedPointError, Precision, Ray, Wad};
pub use position::CollateralRatio;
pub use pow::rpow;
pub use rounding::{ArithmeticError, Rounding};
