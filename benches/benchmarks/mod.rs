pub mod parsing;
pub mod util;
pub mod validation;
