//! Slot streams: a file of equally sized slots, one frame per slot.
//!
//! Frames are independent, so both directions fan out over rayon with one
//! [`Scratch`] per worker.

use rayon::prelude::*;

use crate::decoder::{decode, DecodeOptions, DecodeReport};
use crate::domain::{Epmr, SlotBytes};
use crate::encoder::encode;
use crate::error::{FecError, Result};
use crate::scratch::Scratch;
use crate::slot_plan::SlotPlan;

/// One decoded slot of a stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedFrame {
    pub report: DecodeReport,
    /// Recovered payload, empty when the slot was unrecoverable
    pub payload: Vec<u8>,
}

fn encode_frame(plan: &SlotPlan, epmr: Epmr, chunk: &[u8], scratch: &mut Scratch) -> Result<Vec<u8>> {
    let mut buffer = vec![0u8; plan.slot_bytes.as_usize()];
    buffer[..chunk.len()].copy_from_slice(chunk);
    encode(plan.mode, epmr, &mut buffer, plan.payload_bytes, plan.n_pccw, scratch)?;
    Ok(buffer)
}

fn decode_frame(slot: &[u8], options: DecodeOptions, scratch: &mut Scratch) -> DecodedFrame {
    let mut buffer = slot.to_vec();
    let report = decode(&mut buffer, options, scratch);
    buffer.truncate(report.payload_len);
    DecodedFrame {
        report,
        payload: buffer,
    }
}

/// Split `data` into payload-sized frames (the last one zero-padded) and
/// encode each into a slot. Returns the concatenated slots.
pub fn encode_frames(plan: &SlotPlan, epmr: Epmr, data: &[u8], parallel: bool) -> Result<Vec<u8>> {
    if plan.payload_bytes == 0 {
        return Err(FecError::PayloadSizeMismatch {
            mode: plan.mode.number(),
            expected: plan.payload_bytes,
            actual: data.len(),
        });
    }

    let slots: Vec<Vec<u8>> = if parallel {
        data.par_chunks(plan.payload_bytes)
            .map_init(Scratch::new, |scratch, chunk| encode_frame(plan, epmr, chunk, scratch))
            .collect::<Result<_>>()?
    } else {
        let mut scratch = Scratch::new();
        data.chunks(plan.payload_bytes)
            .map(|chunk| encode_frame(plan, epmr, chunk, &mut scratch))
            .collect::<Result<_>>()?
    };

    Ok(slots.concat())
}

/// Decode a stream of `slot_bytes`-sized slots
pub fn decode_frames(
    slot_bytes: SlotBytes,
    data: &[u8],
    options: DecodeOptions,
    parallel: bool,
) -> Result<Vec<DecodedFrame>> {
    let slot = slot_bytes.as_usize();
    if data.len() % slot != 0 {
        return Err(FecError::TruncatedStream {
            len: data.len(),
            slot_bytes: slot,
        });
    }

    let frames: Vec<DecodedFrame> = if parallel {
        data.par_chunks_exact(slot)
            .map_init(Scratch::new, |scratch, chunk| decode_frame(chunk, options, scratch))
            .collect()
    } else {
        let mut scratch = Scratch::new();
        data.chunks_exact(slot)
            .map(|chunk| decode_frame(chunk, options, &mut scratch))
            .collect()
    };

    Ok(frames)
}
