//! Folio: a personal blog and portfolio service.
//!
//! Persistence lives in a managed REST backend; this crate owns the public
//! pages, the admin post list (buckets, search, pagination, drag reordering)
//! and the thin data-access glue between them.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
pub mod presentation;
pub(crate) mod util;
