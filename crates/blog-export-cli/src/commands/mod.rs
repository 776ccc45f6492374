pub(crate) mod blogs;
pub(crate) mod jobs;
pub(crate) mod pdfs;
pub(crate) mod session;
