pub(crate) mod compositor;
pub(crate) mod metadata;
pub(crate) mod prepare;
