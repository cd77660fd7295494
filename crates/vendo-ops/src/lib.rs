pub mod ops_install;
pub mod ops_tree;
