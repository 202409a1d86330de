pub(crate) mod color;
pub(crate) mod compat;
pub(crate) mod count;
