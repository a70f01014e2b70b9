pub(crate) mod binary;
mod maximum;

pub(crate) use binary::*;
pub(crate) use maximum::*;
