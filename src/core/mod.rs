pub mod expanded;
pub mod path;
pub mod patterns;
pub mod rename;
pub mod render;
pub mod rewrite;
pub mod selection;
pub mod state;
pub mod tree;
pub mod validate;
