// src/application/ports/util.rs
use crate::domain::activation::CodeValue;

pub trait CodeGenerator: Send + Sync {
    fn generate(&self) -> CodeValue;
}
