pub(crate) mod file;
pub(crate) mod in_memory;
