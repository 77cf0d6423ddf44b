use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "nljc", about = "Semantic analysis, IR lowering and bytecode generation")]
pub struct Args {
    /// AST dump (JSON) produced by the front end
    pub input: PathBuf,

    /// Stop after semantic analysis
    #[arg(long)]
    pub validate: bool,

    /// Stop after lowering and print the IR text
    #[arg(long)]
    pub ollir: bool,

    /// Run constant folding and propagation before lowering
    #[arg(short, long)]
    pub optimize: bool,

    /// Register request: -1 keeps original slots, 0 minimizes the
    /// count, a positive number is a hard cap
    #[arg(short, long, default_value_t = -1, allow_negative_numbers = true)]
    pub registers: i32,
}
