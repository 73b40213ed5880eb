//! External toolchain: detection and package installation

pub mod check;
pub mod installer;

pub use check::{check_node, check_npm, check_toolchain, RuntimeInfo};
pub use installer::PackageInstaller;
