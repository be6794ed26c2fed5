pub(crate) mod piecewise;
pub(crate) mod presets;
