//! Small presentational building blocks shared by feature views.

pub(crate) mod empty_state;
pub(crate) mod spinner;

pub(crate) use empty_state::EmptyState;
pub(crate) use spinner::Spinner;
