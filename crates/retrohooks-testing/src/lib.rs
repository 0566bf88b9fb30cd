//! Testing utilities and harness for retrohooks

pub mod testing;

pub use testing::*;

pub mod prelude {
    pub use crate::testing::*;
    pub use retrohooks_core::*;
}
