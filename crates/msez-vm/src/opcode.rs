//! # Opcodes & Gas Schedule
//!
//! Every opcode has an explicit gas cost in [`gas_cost`]. A byte with no
//! entry in the match is [`VmError::InvalidOpcode`] — there is no
//! fallthrough default cost, so adding an opcode without pricing it is a
//! compile error (the match is exhaustive over the enum, and the enum is
//! what `decode` produces).
//!
//! ## Implements
//!
//! Spec §4.12 — Smart-Asset VM, opcode classes and gas schedule.

use crate::error::VmError;

/// Cost of expanding memory, charged per 32-byte word of growth.
pub const MEMORY_EXPANSION_GAS_PER_WORD: u64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    // 0x00-0x0F: Stack
    Push(u8), // operand width in bytes, 1..=32
    Pop,
    Dup(u8),  // 1..=16
    Swap(u8), // 1..=16

    // 0x10-0x1F: Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,

    // 0x20-0x2F: Comparison/bool
    Eq,
    Lt,
    Gt,
    And,
    Or,
    Not,

    // 0x30-0x3F: Memory
    MLoad,
    MStore,
    MSize,

    // 0x40-0x4F: Storage
    SLoad,
    SStore,
    SDelete,

    // 0x50-0x5F: Control flow
    Jump,
    JumpI,
    JumpDest,
    Call,
    Return,
    Revert,

    // 0x60-0x6F: Context
    Caller,
    Origin,
    Jurisdiction,
    Timestamp,
    BlockHeight,

    // 0x70-0x7F: Compliance coprocessor
    TensorGet,
    TensorCommitment,

    // 0x80-0x8F: Migration coprocessor
    Lock,
    Unlock,
    Transit,
    Settle,

    // 0x90-0x9F: Crypto
    Hash,
    VerifySig,
    MerkleVerify,

    // 0xF0-0xFF: System
    Halt,
    Log,
    Debug,
}

impl Opcode {
    /// Decode one instruction byte at `pc`. `Push`/`Dup`/`Swap` encode
    /// their width/slot number in the low nibble, mirroring the
    /// contiguous-range-per-class layout the spec requires.
    pub fn decode(byte: u8, pc: usize) -> Result<Self, VmError> {
        Ok(match byte {
            0x00..=0x1F => Opcode::Push(byte + 1),
            0x20 => Opcode::Pop,
            0x21..=0x30 => Opcode::Dup(byte - 0x21 + 1),
            0x31..=0x40 => Opcode::Swap(byte - 0x31 + 1),

            0x41 => Opcode::Add,
            0x42 => Opcode::Sub,
            0x43 => Opcode::Mul,
            0x44 => Opcode::Div,
            0x45 => Opcode::Mod,

            0x50 => Opcode::Eq,
            0x51 => Opcode::Lt,
            0x52 => Opcode::Gt,
            0x53 => Opcode::And,
            0x54 => Opcode::Or,
            0x55 => Opcode::Not,

            0x60 => Opcode::MLoad,
            0x61 => Opcode::MStore,
            0x62 => Opcode::MSize,

            0x70 => Opcode::SLoad,
            0x71 => Opcode::SStore,
            0x72 => Opcode::SDelete,

            0x80 => Opcode::Jump,
            0x81 => Opcode::JumpI,
            0x82 => Opcode::JumpDest,
            0x83 => Opcode::Call,
            0x84 => Opcode::Return,
            0x85 => Opcode::Revert,

            0x90 => Opcode::Caller,
            0x91 => Opcode::Origin,
            0x92 => Opcode::Jurisdiction,
            0x93 => Opcode::Timestamp,
            0x94 => Opcode::BlockHeight,

            0xA0 => Opcode::TensorGet,
            0xA1 => Opcode::TensorCommitment,

            0xB0 => Opcode::Lock,
            0xB1 => Opcode::Unlock,
            0xB2 => Opcode::Transit,
            0xB3 => Opcode::Settle,

            0xC0 => Opcode::Hash,
            0xC1 => Opcode::VerifySig,
            0xC2 => Opcode::MerkleVerify,

            0xF0 => Opcode::Halt,
            0xF1 => Opcode::Log,
            0xF2 => Opcode::Debug,

            other => return Err(VmError::InvalidOpcode { byte: other, pc }),
        })
    }

    /// Explicit per-opcode gas cost. Exhaustive match: a new variant
    /// added to [`Opcode`] without a corresponding arm here fails to
    /// compile, satisfying the spec's "missing entry = verifier refusal"
    /// rule at compile time rather than at dispatch time.
    pub fn gas_cost(&self) -> u64 {
        match self {
            Opcode::Push(_) => 3,
            Opcode::Pop => 2,
            Opcode::Dup(_) => 3,
            Opcode::Swap(_) => 3,

            Opcode::Add | Opcode::Sub => 3,
            Opcode::Mul => 5,
            Opcode::Div | Opcode::Mod => 5,

            Opcode::Eq | Opcode::Lt | Opcode::Gt | Opcode::And | Opcode::Or | Opcode::Not => 3,

            Opcode::MLoad | Opcode::MStore => 3,
            Opcode::MSize => 2,

            Opcode::SLoad => 100,
            Opcode::SStore => 5_000,
            Opcode::SDelete => 500,

            Opcode::Jump => 8,
            Opcode::JumpI => 10,
            Opcode::JumpDest => 1,
            Opcode::Call => 700,
            Opcode::Return | Opcode::Revert => 0,

            Opcode::Caller
            | Opcode::Origin
            | Opcode::Jurisdiction
            | Opcode::Timestamp
            | Opcode::BlockHeight => 2,

            Opcode::TensorGet => 200,
            Opcode::TensorCommitment => 500,

            Opcode::Lock | Opcode::Unlock | Opcode::Transit | Opcode::Settle => 1_000,

            Opcode::Hash => 30,
            Opcode::VerifySig => 3_000,
            Opcode::MerkleVerify => 1_500,

            Opcode::Halt => 0,
            Opcode::Log => 375,
            Opcode::Debug => 1,
        }
    }
}
