pub mod app;
pub mod apply;
pub mod cancel;
pub mod cli;
pub mod features;
pub mod lines;
pub mod models;
pub mod patch;
pub mod utils;
pub mod worktree;

#[cfg(test)]
pub mod test_utils;
