pub(crate) mod model;
pub(crate) mod quota;
pub(crate) mod sampler;
