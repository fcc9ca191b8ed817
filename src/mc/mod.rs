pub mod path_gen;
pub mod results;
pub mod wheel_engine;
