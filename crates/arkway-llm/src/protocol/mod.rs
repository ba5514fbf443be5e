//! Wire format types for the vendor API
//!
//! Pure serde structs matching the vendor's JSON shapes. They are only used
//! at the boundary; everything else works on [`crate::types`].

pub mod responses;
