pub(crate) mod normalize;
pub(crate) mod translate;
