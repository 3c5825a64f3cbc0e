mod config_tests;
mod figures_tests;
