//! Flutter bridge surface over `fieldlog_core`.

pub mod api;
