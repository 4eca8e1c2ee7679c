#![allow(dead_code)]

pub mod assertions;
pub mod slate;
