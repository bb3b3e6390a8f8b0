pub(crate) mod placement;
