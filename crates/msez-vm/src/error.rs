//! # VM Errors
//!
//! Errors raised during bytecode execution. All are fatal to the current
//! call frame — none of them represent a silent degraded-mode continue.
//!
//! ## Implements
//!
//! Spec §4.12 — Smart-Asset VM, memory safety and gas schedule rules.

use thiserror::Error;

use crate::opcode::Opcode;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VmError {
    #[error("stack overflow: depth would exceed {max}")]
    StackOverflow { max: usize },
    #[error("stack underflow: opcode {opcode:?} needs {needed} operands, found {available}")]
    StackUnderflow {
        opcode: Opcode,
        needed: usize,
        available: usize,
    },
    #[error("out of gas: needed {needed}, had {available}")]
    OutOfGas { needed: u64, available: u64 },
    #[error("invalid opcode byte 0x{byte:02x} at pc={pc}")]
    InvalidOpcode { byte: u8, pc: usize },
    #[error("memory access at offset {offset} length {length} exceeds max memory {max}")]
    MemoryLimitExceeded { offset: usize, length: usize, max: usize },
    #[error(
        "read past allocated memory: offset {offset} length {length}, allocated {allocated} \
         (memory must be expanded before every read or write)"
    )]
    UnexpandedMemoryRead {
        offset: usize,
        length: usize,
        allocated: usize,
    },
    #[error("jump to invalid destination {dest}: not a JUMPDEST")]
    InvalidJumpDestination { dest: usize },
    #[error("PUSH at pc={pc} reads past end of bytecode")]
    TruncatedPush { pc: usize },
    #[error("execution reverted: {reason}")]
    Reverted { reason: String },
    #[error("no compliance coprocessor port installed but a compliance opcode was executed")]
    NoComplianceCoprocessor,
    #[error("no migration coprocessor port installed but a migration opcode was executed")]
    NoMigrationCoprocessor,
}
