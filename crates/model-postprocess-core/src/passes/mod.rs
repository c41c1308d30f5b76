//! Post-processing pass modules.
//!
//! Each pass mutates the registry in place and reports what it changed.
//! The passes are independent of each other; the pipeline runs them in
//! numeric order.

pub mod p0_imports;
pub mod p1_hierarchy;
pub mod pass_result;
