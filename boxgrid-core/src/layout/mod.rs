//! Container tree and layout validation
//!
//! - `tree` - the owned container hierarchy and name-keyed queries
//! - `validator` - stateless bounds and overlap checks

mod tree;
mod validator;

pub use tree::{ContainerTree, ROOT_NAME, adjust_depth};
pub use validator::{GridBounds, LayoutValidator};
