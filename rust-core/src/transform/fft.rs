//! In-place radix-2 decimation-in-time FFT on fixed-point buffers
//!
//! The engine operates on parallel real/imaginary `i32` buffers. Every
//! butterfly output is halved to bound growth, so the result carries a
//! cumulative attenuation of `2^stages` that callers must account for.

use super::twiddle::TwiddleTable;
use crate::q15;

/// Stage count for a transform of `len` points, rounded up to even.
///
/// The real-signal adapter always runs its inner transform with an even
/// number of stages: when `log2(len)` is odd, the extra stage mirrors the
/// (halved) spectrum into the zero-filled upper half of the working
/// buffers, which the recombination step then reads through its symmetric
/// index. Standalone callers wanting a plain DFT pass `len.ilog2()`.
pub fn even_stage_count(len: usize) -> u32 {
    (len.ilog2() + 1) & !1
}

/// Compute an in-place complex FFT over `xr`/`xi[0..len]`.
///
/// Bit-reversal reordering followed by `stages` butterfly stages; the
/// output is the DFT in natural order, scaled down by `2^stages`. The
/// twiddle stride is derived from the table's entry count and halves per
/// stage, so the network stays correct whether the table was built for
/// `len` itself or for a longer enclosing transform, as in the real-signal
/// adapter, which runs the engine at half length against the full-length
/// table.
///
/// When `stages` exceeds `log2(len)` the extra stages index up to
/// `2^stages - 1`, so the physical buffers must extend (zero-filled) that
/// far beyond `len`.
pub fn fft_in_place(
    xr: &mut [i32],
    xi: &mut [i32],
    len: usize,
    stages: u32,
    twiddle: &TwiddleTable,
) {
    assert!(len.is_power_of_two(), "FFT length must be a power of two");
    let needed = len.max(1usize << stages);
    assert!(
        xr.len() >= needed && xi.len() >= needed,
        "buffers too short: {} stages over {} points need {} slots",
        stages,
        len,
        needed
    );

    let half_len = len / 2;

    // Bit-reversal sorting: j walks the reversed-order counter alongside i
    let mut j = half_len;
    for i in 1..len - 1 {
        if i < j {
            xr.swap(i, j);
            xi.swap(i, j);
        }

        let mut k = half_len;
        while k <= j {
            j -= k;
            k >>= 1;
        }
        j += k;
    }

    // Synthesis stages: butterfly group size doubles, twiddle stride halves.
    // Starting the stride at the table's entry count makes stage s use
    // angles 2*pi*j / 2^(s+1) at the table's own resolution.
    let mut angle_step = twiddle.len();
    let mut group = 1usize;

    for _stage in 0..stages {
        let bfly_num = group;
        group *= 2;

        let mut angle_idx = 0usize;
        for j in 0..bfly_num {
            let (ur, ui) = twiddle.pair(angle_idx);

            let mut i = j;
            while i < len {
                let ip = i + bfly_num;

                let (pr, pi) = q15::rotate(xr[ip], xi[ip], ur, ui);

                // Halve both outputs to avoid overflow across stages
                xr[ip] = q15::halve(xr[i] - pr);
                xi[ip] = q15::halve(xi[i] - pi);
                xr[i] = q15::halve(xr[i] + pr);
                xi[i] = q15::halve(xi[i] + pi);

                i += group;
            }

            angle_idx += angle_step;
        }

        angle_step /= 2;
    }
}
