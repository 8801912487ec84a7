//! Runtime backends
//!
//! Each backend provides a client type implementing
//! [`ApproxTopKOps`](crate::ops::ApproxTopKOps).

pub mod cpu;
