pub mod analysis_commands;
