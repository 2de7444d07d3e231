//! Extension requests raised by companies, the reasons given for each, and
//! the files attached to those reasons.
//!
//! A [`model::Request`] is an aggregate: its reasons and their attachments are
//! only ever loaded, changed and written together through a
//! [`repository::RequestRepository`]. The services in [`service`] implement
//! the mutation rules on top of that.

pub mod builder;
pub mod config;
pub mod dto;
pub mod error;
pub mod files;
pub mod identity;
pub mod model;
pub mod repository;
pub mod result;
pub mod service;
pub mod utils;

pub use error::{ErrorKind, Result, ServiceError, StorageError};
pub use result::{FieldError, ListResponse, ResultStatus, ServiceResult};
