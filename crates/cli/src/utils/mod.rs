pub mod parser;

pub use parser::{parse_launch_args, parse_launch_env};
