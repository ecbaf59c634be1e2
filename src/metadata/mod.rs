mod kind;
mod value;

pub use kind::{Kind, DefaultValue};
pub use value::{Value, CoercionError};
