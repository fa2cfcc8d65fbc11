//! WAV encoding for 16-bit mono PCM.

use std::io::Write;

const NUM_CHANNELS: u16 = 1;
const BITS_PER_SAMPLE: u16 = 16;
const BLOCK_ALIGN: u16 = NUM_CHANNELS * (BITS_PER_SAMPLE / 8);

pub fn write_wav(w: &mut impl Write, samples: &[i16], sample_rate: u32) -> std::io::Result<()> {
    w.write_all(&samples_to_wav(samples, sample_rate))
}

pub fn samples_to_wav(samples: &[i16], sample_rate: u32) -> Vec<u8> {
    let data_size = samples.len() as u32 * BLOCK_ALIGN as u32;
    let mut buf = Vec::with_capacity(44 + data_size as usize);
    riff_header(&mut buf, data_size);
    fmt_chunk(&mut buf, sample_rate);
    data_chunk(&mut buf, samples, data_size);
    buf
}

fn riff_header(buf: &mut Vec<u8>, data_size: u32) {
    buf.extend_from_slice(b"RIFF");
    buf.extend_from_slice(&(36 + data_size).to_le_bytes());
    buf.extend_from_slice(b"WAVE");
}

fn fmt_chunk(buf: &mut Vec<u8>, sample_rate: u32) {
    buf.extend_from_slice(b"fmt ");
    buf.extend_from_slice(&16u32.to_le_bytes());
    buf.extend_from_slice(&1u16.to_le_bytes());
    buf.extend_from_slice(&NUM_CHANNELS.to_le_bytes());
    buf.extend_from_slice(&sample_rate.to_le_bytes());
    buf.extend_from_slice(&(sample_rate * BLOCK_ALIGN as u32).to_le_bytes());
    buf.extend_from_slice(&BLOCK_ALIGN.to_le_bytes());
    buf.extend_from_slice(&BITS_PER_SAMPLE.to_le_bytes());
}

fn data_chunk(buf: &mut Vec<u8>, samples: &[i16], data_size: u32) {
    buf.extend_from_slice(b"data");
    buf.extend_from_slice(&data_size.to_le_bytes());
    for sample in samples {
        buf.extend_from_slice(&sample.to_le_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_layout() {
        let wav = samples_to_wav(&[1, -1, 0x1234], 48_000);
        assert_eq!(wav.len(), 44 + 6);
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(u32::from_le_bytes(wav[4..8].try_into().unwrap()), 36 + 6);
        assert_eq!(&wav[8..16], b"WAVEfmt ");
        assert_eq!(u16::from_le_bytes([wav[22], wav[23]]), 1, "mono");
        assert_eq!(u32::from_le_bytes(wav[24..28].try_into().unwrap()), 48_000);
        assert_eq!(u32::from_le_bytes(wav[28..32].try_into().unwrap()), 96_000);
        assert_eq!(&wav[36..40], b"data");
        assert_eq!(&wav[44..], &[1, 0, 0xFF, 0xFF, 0x34, 0x12]);
    }

    #[test]
    fn write_matches_buffer() {
        let mut out = Vec::new();
        write_wav(&mut out, &[5; 10], 8_000).unwrap();
        assert_eq!(out, samples_to_wav(&[5; 10], 8_000));
    }
}
