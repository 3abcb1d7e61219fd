#![forbid(unsafe_code)]

//! Systematic Reed-Solomon encode and error-and-erasure decode for the
//! fixed (31,21) code: 21 data symbols, 10 parity symbols, first
//! consecutive root 1, primitive element 1.
//!
//! The decoder is the classic Berlekamp-Massey / Chien / Forney chain.
//! Erasure positions (codeword index, data first then parity) seed the
//! locator polynomial so each erasure costs one parity symbol instead of
//! two.

use rf433_core::{DATA_SYMBOLS, PARITY_SYMBOLS};

use crate::gf32::{Gf32, A0, NN};
use crate::Uncorrectable;

/// First consecutive root of the generator polynomial.
const FCR: usize = 1;

const NROOTS: usize = PARITY_SYMBOLS;

pub(crate) struct RsCodec {
    gf: Gf32,
    /// Generator polynomial in index form, genpoly[NROOTS] is the monic
    /// leading term.
    genpoly: [u8; NROOTS + 1],
}

impl RsCodec {
    pub(crate) fn new() -> Self {
        let gf = Gf32::new();
        let genpoly = generator_poly(&gf);
        Self { gf, genpoly }
    }

    /// Compute the 10 parity symbols for `data` (LFSR division by the
    /// generator polynomial).
    pub(crate) fn encode(&self, data: &[u8; DATA_SYMBOLS], parity: &mut [u8; PARITY_SYMBOLS]) {
        let gf = &self.gf;
        parity.fill(0);
        for &sym in data {
            let feedback = gf.log(sym ^ parity[0]);
            if feedback != A0 {
                for j in 1..NROOTS {
                    parity[j] ^= gf.exp(feedback + self.genpoly[NROOTS - j] as usize);
                }
            }
            parity.copy_within(1..NROOTS, 0);
            parity[NROOTS - 1] = if feedback != A0 {
                gf.exp(feedback + self.genpoly[0] as usize)
            } else {
                0
            };
        }
    }

    /// Correct `data`/`parity` in place. `erasures` lists codeword
    /// positions (0..=30, data symbols first) known to be unreliable.
    /// Returns the number of corrected symbol positions.
    pub(crate) fn decode(
        &self,
        data: &mut [u8; DATA_SYMBOLS],
        parity: &mut [u8; PARITY_SYMBOLS],
        erasures: &[usize],
    ) -> Result<usize, Uncorrectable> {
        let gf = &self.gf;
        if erasures.len() > NROOTS {
            return Err(Uncorrectable);
        }

        // Syndromes: evaluate the received word at each generator root.
        let mut syn = [data[0]; NROOTS];
        for &sym in data[1..].iter().chain(parity.iter()) {
            for (i, s) in syn.iter_mut().enumerate() {
                *s = if *s == 0 {
                    sym
                } else {
                    sym ^ gf.exp(gf.log(*s) + FCR + i)
                };
            }
        }
        let mut syn_nonzero = 0u8;
        let mut syn_ix = [A0; NROOTS];
        for i in 0..NROOTS {
            syn_nonzero |= syn[i];
            syn_ix[i] = gf.log(syn[i]);
        }
        if syn_nonzero == 0 {
            return Ok(0);
        }

        // Seed the locator polynomial with the erasure positions.
        let mut lambda = [0u8; NROOTS + 1];
        lambda[0] = 1;
        for (i, &pos) in erasures.iter().enumerate() {
            let u = NN - 1 - pos;
            for j in (1..=i + 1).rev() {
                let tmp = gf.log(lambda[j - 1]);
                if tmp != A0 {
                    lambda[j] ^= gf.exp(u + tmp);
                }
            }
        }
        let mut b = [A0; NROOTS + 1];
        for i in 0..=NROOTS {
            b[i] = gf.log(lambda[i]);
        }

        // Berlekamp-Massey, starting past the known erasures.
        let no_eras = erasures.len();
        let mut el = no_eras;
        for r in no_eras + 1..=NROOTS {
            let mut discr = 0u8;
            for i in 0..r {
                if lambda[i] != 0 && syn_ix[r - i - 1] != A0 {
                    discr ^= gf.exp(gf.log(lambda[i]) + syn_ix[r - i - 1]);
                }
            }
            if discr == 0 {
                b.copy_within(0..NROOTS, 1);
                b[0] = A0;
                continue;
            }
            let discr_ix = gf.log(discr);
            let mut t = [0u8; NROOTS + 1];
            t[0] = lambda[0];
            for i in 0..NROOTS {
                t[i + 1] = if b[i] != A0 {
                    lambda[i + 1] ^ gf.exp(discr_ix + b[i])
                } else {
                    lambda[i + 1]
                };
            }
            if 2 * el <= r + no_eras - 1 {
                el = r + no_eras - el;
                for i in 0..=NROOTS {
                    b[i] = if lambda[i] == 0 {
                        A0
                    } else {
                        (gf.log(lambda[i]) + NN - discr_ix) % NN
                    };
                }
            } else {
                b.copy_within(0..NROOTS, 1);
                b[0] = A0;
            }
            lambda = t;
        }

        // Locator polynomial to index form; find its degree.
        let mut lambda_ix = [A0; NROOTS + 1];
        let mut deg_lambda = 0;
        for i in 0..=NROOTS {
            lambda_ix[i] = gf.log(lambda[i]);
            if lambda_ix[i] != A0 {
                deg_lambda = i;
            }
        }
        if deg_lambda == 0 {
            return Err(Uncorrectable);
        }

        // Chien search for the roots.
        let mut reg = [A0; NROOTS + 1];
        reg[1..].copy_from_slice(&lambda_ix[1..]);
        let mut root = [0usize; NROOTS];
        let mut loc = [0usize; NROOTS];
        let mut count = 0;
        for i in 1..=NN {
            let mut q = 1u8;
            for j in (1..=deg_lambda).rev() {
                if reg[j] != A0 {
                    reg[j] = (reg[j] + j) % NN;
                    q ^= gf.exp(reg[j]);
                }
            }
            if q != 0 {
                continue;
            }
            root[count] = i;
            loc[count] = i - 1;
            count += 1;
            if count == deg_lambda {
                break;
            }
        }
        if count != deg_lambda {
            // deg(lambda) != number of roots: uncorrectable.
            return Err(Uncorrectable);
        }

        // Evaluator polynomial omega(x) = syn(x) * lambda(x) mod x^NROOTS.
        let deg_omega = deg_lambda - 1;
        let mut omega = [A0; NROOTS + 1];
        for i in 0..=deg_omega {
            let mut tmp = 0u8;
            for j in (0..=i).rev() {
                if syn_ix[i - j] != A0 && lambda_ix[j] != A0 {
                    tmp ^= gf.exp(syn_ix[i - j] + lambda_ix[j]);
                }
            }
            omega[i] = gf.log(tmp);
        }

        // Forney: compute and apply the error magnitude at each root.
        for j in (0..count).rev() {
            let mut num1 = 0u8;
            for i in (0..=deg_omega).rev() {
                if omega[i] != A0 {
                    num1 ^= gf.exp(omega[i] + i * root[j]);
                }
            }
            if num1 == 0 {
                continue;
            }
            let num2 = gf.exp(root[j] * (FCR - 1) + NN);
            let mut den = 0u8;
            // lambda[i+1] for even i is the formal derivative of lambda.
            let mut i = deg_lambda.min(NROOTS - 1) & !1;
            loop {
                if lambda_ix[i + 1] != A0 {
                    den ^= gf.exp(lambda_ix[i + 1] + i * root[j]);
                }
                if i < 2 {
                    break;
                }
                i -= 2;
            }
            if den == 0 {
                return Err(Uncorrectable);
            }
            let cor = gf.exp(gf.log(num1) + gf.log(num2) + NN - gf.log(den));
            if loc[j] < DATA_SYMBOLS {
                data[loc[j]] ^= cor;
            } else {
                parity[loc[j] - DATA_SYMBOLS] ^= cor;
            }
        }
        Ok(count)
    }
}

/// Expand prod (x - alpha^(FCR + i)) for i in 0..NROOTS, returned in index
/// form for the encoder's LFSR.
fn generator_poly(gf: &Gf32) -> [u8; NROOTS + 1] {
    let mut g = [0u8; NROOTS + 1];
    g[0] = 1;
    for i in 0..NROOTS {
        let r = FCR + i;
        g[i + 1] = 1;
        for j in (1..=i).rev() {
            g[j] = if g[j] != 0 {
                g[j - 1] ^ gf.exp(gf.log(g[j]) + r)
            } else {
                g[j - 1]
            };
        }
        g[0] = gf.exp(gf.log(g[0]) + r);
    }
    let mut ix = [0u8; NROOTS + 1];
    for i in 0..=NROOTS {
        ix[i] = gf.log(g[i]) as u8;
    }
    ix
}
