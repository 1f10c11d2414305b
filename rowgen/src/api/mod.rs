//! API module for rowgen
//!
//! This module assembles planner outputs into abstract API descriptions and
//! defines the emitter seam that consumes them.

pub mod assembler;
pub mod description;
pub mod emitter;

// Re-export key types
pub use assembler::assemble;
pub use description::{
    ApiDescription, FieldDescriptor, MethodDescriptor, MethodKind, ParamDescriptor,
    RegistrationDescriptor, TypeDescriptor, TypeKind,
};
pub use emitter::{JsonFileEmitter, MemoryEmitter, SourceEmitter};
