//! Small hand-built media files for exercising the real decoders.

const ASCII: u16 = 2;
const SHORT: u16 = 3;
const LONG: u16 = 4;
const RATIONAL: u16 = 5;

/// One little-endian IFD entry; `value` is the inline value or the data offset.
fn ifd_entry(out: &mut Vec<u8>, tag: u16, kind: u16, count: u32, value: u32) {
    out.extend_from_slice(&tag.to_le_bytes());
    out.extend_from_slice(&kind.to_le_bytes());
    out.extend_from_slice(&count.to_le_bytes());
    out.extend_from_slice(&value.to_le_bytes());
}

fn rationals(out: &mut Vec<u8>, values: &[(u32, u32)]) {
    for (num, den) in values {
        out.extend_from_slice(&num.to_le_bytes());
        out.extend_from_slice(&den.to_le_bytes());
    }
}

/// Inline ASCII value: up to four bytes, left-justified.
fn inline_ascii(s: &[u8]) -> u32 {
    let mut buf = [0u8; 4];
    buf[..s.len()].copy_from_slice(s);
    u32::from_le_bytes(buf)
}

/// A JPEG whose EXIF block carries Make=Canon, Orientation=6,
/// DateTime=2024:05:01 10:00:00 and GPS 41/1,24/1,3514/100 N, 2/1,10/1,0/1 E.
///
/// `latitude_count` is written as the GPSLatitude component count; anything
/// other than 3 makes the GPS block unreadable.
pub fn exif_jpeg(latitude_count: u32) -> Vec<u8> {
    // Offsets are relative to the TIFF header
    const IFD0: u32 = 8;
    const IFD0_END: u32 = IFD0 + 2 + 4 * 12 + 4;
    const MAKE: u32 = IFD0_END;
    const DATETIME: u32 = MAKE + 6;
    const GPS_IFD: u32 = DATETIME + 20;
    const GPS_END: u32 = GPS_IFD + 2 + 4 * 12 + 4;
    const LATITUDE: u32 = GPS_END;
    const LONGITUDE: u32 = LATITUDE + 24;

    let mut tiff = Vec::new();
    tiff.extend_from_slice(b"II");
    tiff.extend_from_slice(&42u16.to_le_bytes());
    tiff.extend_from_slice(&IFD0.to_le_bytes());

    tiff.extend_from_slice(&4u16.to_le_bytes());
    ifd_entry(&mut tiff, 0x010F, ASCII, 6, MAKE);
    ifd_entry(&mut tiff, 0x0112, SHORT, 1, 6);
    ifd_entry(&mut tiff, 0x0132, ASCII, 20, DATETIME);
    ifd_entry(&mut tiff, 0x8825, LONG, 1, GPS_IFD);
    tiff.extend_from_slice(&0u32.to_le_bytes());

    tiff.extend_from_slice(b"Canon\0");
    tiff.extend_from_slice(b"2024:05:01 10:00:00\0");

    tiff.extend_from_slice(&4u16.to_le_bytes());
    ifd_entry(&mut tiff, 0x0001, ASCII, 2, inline_ascii(b"N\0"));
    ifd_entry(&mut tiff, 0x0002, RATIONAL, latitude_count, LATITUDE);
    ifd_entry(&mut tiff, 0x0003, ASCII, 2, inline_ascii(b"E\0"));
    ifd_entry(&mut tiff, 0x0004, RATIONAL, 3, LONGITUDE);
    tiff.extend_from_slice(&0u32.to_le_bytes());

    rationals(&mut tiff, &[(41, 1), (24, 1), (3514, 100)]);
    rationals(&mut tiff, &[(2, 1), (10, 1), (0, 1)]);
    debug_assert_eq!(tiff.len() as u32, LONGITUDE + 24);

    let mut jpeg = vec![0xFF, 0xD8, 0xFF, 0xE1];
    let segment_len = (2 + 6 + tiff.len()) as u16;
    jpeg.extend_from_slice(&segment_len.to_be_bytes());
    jpeg.extend_from_slice(b"Exif\0\0");
    jpeg.extend_from_slice(&tiff);
    jpeg.extend_from_slice(&[0xFF, 0xD9]);
    jpeg
}

fn riff_chunk(out: &mut Vec<u8>, id: &[u8; 4], body: &[u8]) {
    out.extend_from_slice(id);
    out.extend_from_slice(&(body.len() as u32).to_le_bytes());
    out.extend_from_slice(body);
    if body.len() % 2 == 1 {
        out.push(0);
    }
}

/// One second of 8 kHz mono 8-bit PCM with RIFF INFO
/// title "Song", artist "Band", album "Blue".
pub fn info_wav() -> Vec<u8> {
    const SAMPLE_RATE: u32 = 8000;

    let mut fmt = Vec::new();
    fmt.extend_from_slice(&1u16.to_le_bytes()); // PCM
    fmt.extend_from_slice(&1u16.to_le_bytes()); // channels
    fmt.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
    fmt.extend_from_slice(&SAMPLE_RATE.to_le_bytes()); // byte rate
    fmt.extend_from_slice(&1u16.to_le_bytes()); // block align
    fmt.extend_from_slice(&8u16.to_le_bytes()); // bits per sample

    let mut info = b"INFO".to_vec();
    riff_chunk(&mut info, b"INAM", b"Song\0");
    riff_chunk(&mut info, b"IART", b"Band\0");
    riff_chunk(&mut info, b"IPRD", b"Blue\0");

    let mut body = b"WAVE".to_vec();
    riff_chunk(&mut body, b"fmt ", &fmt);
    riff_chunk(&mut body, b"data", &vec![0x80; SAMPLE_RATE as usize]);
    riff_chunk(&mut body, b"LIST", &info);

    let mut wav = Vec::new();
    riff_chunk(&mut wav, b"RIFF", &body);
    wav
}
