//! # Virtual Machine
//!
//! The execution loop: decode, charge gas, dispatch, repeat until
//! `HALT`/`RETURN`/`REVERT` or an error. Every opcode charges its gas
//! cost before it runs; running out mid-instruction is
//! [`VmError::OutOfGas`], never a partial effect.
//!
//! ## Implements
//!
//! Spec §3 (VM state shape), §4.12 (opcode classes, memory safety, gas
//! schedule, determinism).

use std::collections::BTreeMap;

use msez_core::ComplianceDomain;

use crate::context::ExecutionContext;
use crate::coprocessor::{
    ComplianceCoprocessor, CryptoCoprocessor, MigrationCallOutcome, MigrationCoprocessor,
};
use crate::error::VmError;
use crate::memory::Memory;
use crate::opcode::Opcode;
use crate::word::{self, Word};

pub const STACK_DEPTH_MAX: usize = 1024;
pub const MEMORY_MAX_BYTES: usize = 1024 * 1024;
pub const GAS_LIMIT_DEFAULT: u64 = 10_000_000;

/// One emitted log entry (`LOG` opcode).
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub data: Vec<u8>,
}

/// The full VM state, matching the spec's state-shape verbatim.
pub struct VmState<'a> {
    pub stack: Vec<Word>,
    pub memory: Memory,
    pub storage: BTreeMap<Word, Word>,
    pub pc: usize,
    pub gas_remaining: u64,
    pub halted: bool,
    pub return_data: Vec<u8>,
    pub logs: Vec<LogEntry>,

    context: ExecutionContext,
    compliance: &'a dyn ComplianceCoprocessor,
    migration: &'a mut dyn MigrationCoprocessor,
    crypto: &'a dyn CryptoCoprocessor,
}

impl<'a> VmState<'a> {
    pub fn new(
        context: ExecutionContext,
        compliance: &'a dyn ComplianceCoprocessor,
        migration: &'a mut dyn MigrationCoprocessor,
        crypto: &'a dyn CryptoCoprocessor,
    ) -> Self {
        let gas_remaining = context.gas_limit;
        Self {
            stack: Vec::new(),
            memory: Memory::new(MEMORY_MAX_BYTES),
            storage: BTreeMap::new(),
            pc: 0,
            gas_remaining,
            halted: false,
            return_data: Vec::new(),
            logs: Vec::new(),
            context,
            compliance,
            migration,
            crypto,
        }
    }

    /// Run `bytecode` to completion: until `HALT`/`RETURN`/`REVERT`, an
    /// error, or the program counter runs off the end (implicit halt).
    pub fn run(&mut self, bytecode: &[u8]) -> Result<(), VmError> {
        while !self.halted && self.pc < bytecode.len() {
            self.step(bytecode)?;
        }
        self.halted = true;
        Ok(())
    }

    /// Execute exactly one instruction.
    pub fn step(&mut self, bytecode: &[u8]) -> Result<(), VmError> {
        let byte = bytecode[self.pc];
        let opcode = Opcode::decode(byte, self.pc)?;
        self.charge(opcode.gas_cost())?;

        let mut next_pc = self.pc + 1;
        match opcode {
            Opcode::Push(width) => {
                let width = width as usize;
                if self.pc + 1 + width > bytecode.len() {
                    return Err(VmError::TruncatedPush { pc: self.pc });
                }
                let bytes = &bytecode[self.pc + 1..self.pc + 1 + width];
                self.push(word_from_be_bytes(bytes))?;
                next_pc = self.pc + 1 + width;
            }
            Opcode::Pop => {
                self.pop(opcode)?;
            }
            Opcode::Dup(n) => {
                let n = n as usize;
                if self.stack.len() < n {
                    return Err(VmError::StackUnderflow {
                        opcode,
                        needed: n,
                        available: self.stack.len(),
                    });
                }
                let value = self.stack[self.stack.len() - n];
                self.push(value)?;
            }
            Opcode::Swap(n) => {
                let n = n as usize;
                if self.stack.len() < n + 1 {
                    return Err(VmError::StackUnderflow {
                        opcode,
                        needed: n + 1,
                        available: self.stack.len(),
                    });
                }
                let top = self.stack.len() - 1;
                self.stack.swap(top, top - n);
            }

            Opcode::Add => self.binary_op(opcode, word::wrapping_add)?,
            Opcode::Sub => self.binary_op(opcode, word::wrapping_sub)?,
            Opcode::Mul => self.binary_op(opcode, word::wrapping_mul)?,
            Opcode::Div => self.binary_op(opcode, word::checked_div)?,
            Opcode::Mod => self.binary_op(opcode, word::checked_mod)?,

            Opcode::Eq => self.binary_op(opcode, |a, b| word::word_from_bool(a == b))?,
            Opcode::Lt => self.binary_op(opcode, |a, b| word::word_from_bool(a < b))?,
            Opcode::Gt => self.binary_op(opcode, |a, b| word::word_from_bool(a > b))?,
            Opcode::And => self.binary_op(opcode, |a, b| a & b)?,
            Opcode::Or => self.binary_op(opcode, |a, b| a | b)?,
            Opcode::Not => {
                let a = self.pop(opcode)?;
                self.push(!a)?;
            }

            Opcode::MLoad => {
                let offset = self.pop_usize(opcode)?;
                self.charge(self.memory.expansion_gas(offset, 32)?)?;
                self.memory.expand(offset, 32)?;
                let bytes = self.memory.read(offset, 32)?.to_vec();
                self.push(word_from_be_bytes(&bytes))?;
            }
            Opcode::MStore => {
                let offset = self.pop_usize(opcode)?;
                let value = self.pop(opcode)?;
                self.charge(self.memory.expansion_gas(offset, 32)?)?;
                self.memory.expand(offset, 32)?;
                self.memory.write(offset, &value.to_be_bytes())?;
            }
            Opcode::MSize => {
                self.push(Word::from(self.memory.len() as u64))?;
            }

            Opcode::SLoad => {
                let key = self.pop(opcode)?;
                let value = self.storage.get(&key).copied().unwrap_or(Word::ZERO);
                self.push(value)?;
            }
            Opcode::SStore => {
                let key = self.pop(opcode)?;
                let value = self.pop(opcode)?;
                self.storage.insert(key, value);
            }
            Opcode::SDelete => {
                let key = self.pop(opcode)?;
                self.storage.remove(&key);
            }

            Opcode::Jump => {
                let dest = self.pop_usize(opcode)?;
                self.require_jumpdest(bytecode, dest)?;
                next_pc = dest;
            }
            Opcode::JumpI => {
                let dest = self.pop_usize(opcode)?;
                let cond = self.pop(opcode)?;
                if cond != Word::ZERO {
                    self.require_jumpdest(bytecode, dest)?;
                    next_pc = dest;
                }
            }
            Opcode::JumpDest => {}
            Opcode::Call => {
                // Cross-program calls are out of scope for this VM revision;
                // the opcode is priced and decodable but always reverts.
                return Err(VmError::Reverted {
                    reason: "CALL is not supported in this execution environment".to_string(),
                });
            }
            Opcode::Return => {
                let length = self.pop_usize(opcode)?;
                let offset = self.pop_usize(opcode)?;
                self.charge(self.memory.expansion_gas(offset, length)?)?;
                self.memory.expand(offset, length)?;
                self.return_data = self.memory.read(offset, length)?.to_vec();
                self.halted = true;
            }
            Opcode::Revert => {
                let length = self.pop_usize(opcode)?;
                let offset = self.pop_usize(opcode)?;
                self.charge(self.memory.expansion_gas(offset, length)?)?;
                self.memory.expand(offset, length)?;
                let data = self.memory.read(offset, length)?.to_vec();
                return Err(VmError::Reverted {
                    reason: String::from_utf8_lossy(&data).to_string(),
                });
            }

            Opcode::Caller => self.push(word_from_str(&self.context.caller))?,
            Opcode::Origin => self.push(word_from_str(&self.context.origin))?,
            Opcode::Jurisdiction => self.push(word_from_str(self.context.jurisdiction.as_str()))?,
            Opcode::Timestamp => {
                self.push(Word::from(self.context.timestamp.as_datetime().timestamp() as u64))?
            }
            Opcode::BlockHeight => self.push(Word::from(self.context.block_height))?,

            Opcode::TensorGet => {
                let domain_index = self.pop_usize(opcode)?;
                let domain = *ComplianceDomain::all_domains()
                    .get(domain_index)
                    .unwrap_or(&ComplianceDomain::all_domains()[0]);
                let state = self.compliance.get_state(
                    &self.context.caller,
                    self.context.jurisdiction.as_str(),
                    domain,
                    "",
                );
                let compliant = matches!(
                    state,
                    Some(msez_tensor::ComplianceState::Compliant) | Some(msez_tensor::ComplianceState::Exempt)
                );
                self.push(word::word_from_bool(compliant))?;
            }
            Opcode::TensorCommitment => match self.compliance.commitment_digest() {
                Some(digest) => self.push(word_from_be_bytes(&digest))?,
                None => self.push(Word::ZERO)?,
            },

            Opcode::Lock | Opcode::Unlock | Opcode::Transit | Opcode::Settle => {
                let migration_id = self.context.caller.clone();
                let outcome = match opcode {
                    Opcode::Lock => self.migration.lock(&migration_id),
                    Opcode::Unlock => self.migration.unlock(&migration_id),
                    Opcode::Transit => self.migration.transit(&migration_id),
                    Opcode::Settle => self.migration.settle(&migration_id),
                    _ => unreachable!(),
                };
                self.push(word::word_from_bool(outcome == MigrationCallOutcome::Accepted))?;
            }

            Opcode::Hash => {
                let a = self.pop(opcode)?;
                let digest = msez_core::sha256_bytes(&a.to_be_bytes());
                self.push(word_from_be_bytes(&digest.bytes))?;
            }
            Opcode::VerifySig => {
                let handle = self.pop(opcode)?;
                self.push(word::word_from_bool(self.crypto.verify_signature(handle)))?;
            }
            Opcode::MerkleVerify => {
                let handle = self.pop(opcode)?;
                self.push(word::word_from_bool(self.crypto.verify_merkle(handle)))?;
            }

            Opcode::Halt => self.halted = true,
            Opcode::Log => {
                let length = self.pop_usize(opcode)?;
                let offset = self.pop_usize(opcode)?;
                self.charge(self.memory.expansion_gas(offset, length)?)?;
                self.memory.expand(offset, length)?;
                let data = self.memory.read(offset, length)?.to_vec();
                self.logs.push(LogEntry { data });
            }
            Opcode::Debug => {}
        }

        self.pc = next_pc;
        Ok(())
    }

    fn charge(&mut self, gas: u64) -> Result<(), VmError> {
        if gas > self.gas_remaining {
            return Err(VmError::OutOfGas { needed: gas, available: self.gas_remaining });
        }
        self.gas_remaining -= gas;
        Ok(())
    }

    fn push(&mut self, value: Word) -> Result<(), VmError> {
        if self.stack.len() >= STACK_DEPTH_MAX {
            return Err(VmError::StackOverflow { max: STACK_DEPTH_MAX });
        }
        self.stack.push(value);
        Ok(())
    }

    fn pop(&mut self, opcode: Opcode) -> Result<Word, VmError> {
        self.stack.pop().ok_or(VmError::StackUnderflow {
            opcode,
            needed: 1,
            available: 0,
        })
    }

    fn pop_usize(&mut self, opcode: Opcode) -> Result<usize, VmError> {
        let word = self.pop(opcode)?;
        Ok(word.as_usize())
    }

    fn binary_op(&mut self, opcode: Opcode, f: impl Fn(Word, Word) -> Word) -> Result<(), VmError> {
        let b = self.pop(opcode)?;
        let a = self.pop(opcode)?;
        self.push(f(a, b))
    }

    fn require_jumpdest(&self, bytecode: &[u8], dest: usize) -> Result<(), VmError> {
        match bytecode.get(dest) {
            Some(&byte) if Opcode::decode(byte, dest) == Ok(Opcode::JumpDest) => Ok(()),
            _ => Err(VmError::InvalidJumpDestination { dest }),
        }
    }
}

fn word_from_be_bytes(bytes: &[u8]) -> Word {
    let mut buf = [0u8; 32];
    let start = 32usize.saturating_sub(bytes.len());
    let take = bytes.len().min(32);
    buf[start..].copy_from_slice(&bytes[bytes.len() - take..]);
    Word::from_be_bytes(buf)
}

fn word_from_str(s: &str) -> Word {
    let digest = msez_core::sha256_bytes(s.as_bytes());
    word_from_be_bytes(&digest.bytes)
}
