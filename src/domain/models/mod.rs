mod completion;

pub use completion::*;
