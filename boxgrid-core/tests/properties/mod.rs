mod common;
mod container_tree_tests;
mod drag_drop_tests;
mod resize_tests;
