#![forbid(unsafe_code)]

//! GF(2^5) arithmetic tables for the (31,21) code.
//!
//! Field-generating polynomial 0x25 (x^5 + x^2 + 1). Elements are held in
//! polynomial form as `u8` values below 32; logarithms ("index form") use
//! [`A0`] as the sentinel for log(0).

/// Symbol width in bits.
pub(crate) const MM: usize = 5;

/// Field size minus one; also the codeword length.
pub(crate) const NN: usize = (1 << MM) - 1;

/// Index-form representation of zero (log of zero is minus infinity).
pub(crate) const A0: usize = NN;

const GFPOLY: u32 = 0x25;

pub(crate) struct Gf32 {
    alpha_to: [u8; NN + 1],
    index_of: [u8; NN + 1],
}

impl Gf32 {
    pub(crate) fn new() -> Self {
        let mut alpha_to = [0u8; NN + 1];
        let mut index_of = [0u8; NN + 1];
        let mut sr: u32 = 1;
        for i in 0..NN {
            index_of[sr as usize] = i as u8;
            alpha_to[i] = sr as u8;
            sr <<= 1;
            if sr & (1 << MM) != 0 {
                sr ^= GFPOLY;
            }
            sr &= NN as u32;
        }
        index_of[0] = A0 as u8;
        alpha_to[NN] = 0;
        Self { alpha_to, index_of }
    }

    /// alpha^i for an exponent that may exceed NN; never valid for [`A0`]
    /// sums, which callers must filter out first.
    #[inline]
    pub(crate) fn exp(&self, i: usize) -> u8 {
        self.alpha_to[i % NN]
    }

    /// log(x) in index form; [`A0`] for zero.
    #[inline]
    pub(crate) fn log(&self, x: u8) -> usize {
        self.index_of[x as usize] as usize
    }
}
