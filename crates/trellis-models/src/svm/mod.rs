//! Support vector machine components.

pub mod linear_svc;

pub use linear_svc::{LinearSvc, LinearSvcConfig};
