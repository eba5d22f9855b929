//! # Word
//!
//! The Smart-Asset VM's native integer type: a 256-bit unsigned word.
//! All arithmetic wraps modulo 2²⁵⁶ rather than panicking, matching the
//! VM's determinism requirement — execution must never fault on
//! overflow.
//!
//! ## Implements
//!
//! Spec §4.12 — Smart-Asset VM, Word definition.

use ethnum::U256;

/// A 256-bit unsigned VM word.
pub type Word = U256;

/// Wrapping arithmetic helpers used by the arithmetic opcode class.
/// Kept as free functions (rather than relying on `Add`/`Sub` operator
/// overloads, which panic on overflow in debug builds) so every
/// arithmetic opcode handler reads the same way regardless of build
/// profile.
pub fn wrapping_add(a: Word, b: Word) -> Word {
    a.wrapping_add(b)
}

pub fn wrapping_sub(a: Word, b: Word) -> Word {
    a.wrapping_sub(b)
}

pub fn wrapping_mul(a: Word, b: Word) -> Word {
    a.wrapping_mul(b)
}

/// Division by zero yields zero per the VM's "no faults inside execution"
/// rule — the EVM convention this class of machine descends from.
pub fn checked_div(a: Word, b: Word) -> Word {
    if b == Word::ZERO {
        Word::ZERO
    } else {
        a / b
    }
}

pub fn checked_mod(a: Word, b: Word) -> Word {
    if b == Word::ZERO {
        Word::ZERO
    } else {
        a % b
    }
}

pub fn word_from_bool(b: bool) -> Word {
    if b {
        Word::ONE
    } else {
        Word::ZERO
    }
}
