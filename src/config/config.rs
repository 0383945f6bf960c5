/// Session behavior switches.
pub struct Config {
    /// Disallow implicit flow of values into `any` slots.
    pub ignore_any: bool,
    /// Log the declaration tables after checking.
    pub dump_symbols: bool,
}

impl Config {
    pub fn default() -> Self {
        Self {
            ignore_any: false,
            dump_symbols: false,
        }
    }

    pub fn test() -> Self {
        Self {
            ignore_any: false,
            dump_symbols: false,
        }
    }

    pub fn debug() -> Self {
        Self {
            ignore_any: false,
            dump_symbols: true,
        }
    }
}
