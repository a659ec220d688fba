mod ask_usdcode;

pub use ask_usdcode::*;
