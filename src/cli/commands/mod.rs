//! Subcommands of the `ttt-mc` binary

pub mod evaluate;
pub mod inspect;
pub mod play;
pub mod train;
