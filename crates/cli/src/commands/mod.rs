pub(crate) mod admin;
pub(crate) mod identify;
pub(crate) mod serve;
