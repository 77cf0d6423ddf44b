/// Compilation options passed down from the driver.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Config {
    /// Run the AST-level optimizer before lowering.
    pub optimize: bool,
    /// Register allocation request: `-1` pass-through, `0` minimize,
    /// `n > 0` budget of `n` registers.
    pub max_registers: i32,
}

impl Config {
    pub fn new(optimize: bool, max_registers: i32) -> Self {
        Self {
            optimize,
            max_registers,
        }
    }
}
