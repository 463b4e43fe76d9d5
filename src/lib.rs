#![deny(missing_docs)]
//! A library to read models written in the gpx text format,
//! hand them to CPLEX and read the solution back.

pub mod error;
pub mod gpx_format;
pub mod lp_format;
pub mod model;
pub mod problem;
pub mod solvers;
pub mod tutorial;
pub mod util;

pub use crate::error::{GpxError, SolverError};
pub use crate::model::Model;
