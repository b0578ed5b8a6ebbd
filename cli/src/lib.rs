#[macro_use]
extern crate log;
pub mod pipeline;
pub mod sim_commands;
