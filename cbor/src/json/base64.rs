use super::sink::Sink;
use crate::error::{Error, Result, check_range};
use base64::Engine;
use base64::engine::GeneralPurpose;
use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD, URL_SAFE, URL_SAFE_NO_PAD};

/// Input bytes per output chunk; a multiple of 3 so only the final chunk
/// can need padding.
const CHUNK_LEN: usize = 192;

/// Encoded size of a full chunk.
const BUFFER_LEN: usize = CHUNK_LEN / 3 * 4;

/// Writes `count` bytes of `data` from `offset` as base64, flushing through
/// `sink` one fixed-size chunk at a time.
///
/// `url_safe` selects the `-`/`_` alphabet; `padding` appends `=` to a short
/// final group. A window outside `data` is an [`Error::OutOfRange`].
pub fn write_base64<S>(
    sink: &mut S,
    data: &[u8],
    offset: usize,
    count: usize,
    url_safe: bool,
    padding: bool,
) -> Result<()>
where
    S: Sink + ?Sized,
{
    check_range(offset, count, data.len())?;
    let engine: &GeneralPurpose = match (url_safe, padding) {
        (false, true) => &STANDARD,
        (false, false) => &STANDARD_NO_PAD,
        (true, true) => &URL_SAFE,
        (true, false) => &URL_SAFE_NO_PAD,
    };

    let mut buf = [0u8; BUFFER_LEN];
    for chunk in data[offset..offset + count].chunks(CHUNK_LEN) {
        let len = engine
            .encode_slice(chunk, &mut buf)
            .map_err(|_| Error::ResourceExhausted("base64 buffer"))?;
        let text =
            core::str::from_utf8(&buf[..len]).map_err(|e| Error::InvalidUtf8(e.valid_up_to()))?;
        sink.write_str(text)?;
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    fn encode(data: &[u8], url_safe: bool, padding: bool) -> String {
        let mut s = String::new();
        write_base64(&mut s, data, 0, data.len(), url_safe, padding).unwrap();
        s
    }

    #[test]
    fn alphabets_and_padding() {
        assert_eq!(encode(b"", false, true), "");
        assert_eq!(encode(b"f", false, true), "Zg==");
        assert_eq!(encode(b"f", false, false), "Zg");
        assert_eq!(encode(b"foob", true, true), "Zm9vYg==");
        assert_eq!(encode(&[0xFB, 0xFF], false, false), "+/8");
        assert_eq!(encode(&[0xFB, 0xFF], true, false), "-_8");
    }

    #[test]
    fn long_input_matches_one_shot() {
        let data: Vec<u8> = (0..1000u32).map(|i| (i * 7) as u8).collect();
        assert_eq!(encode(&data, false, true), STANDARD.encode(&data));
        assert_eq!(encode(&data, true, false), URL_SAFE_NO_PAD.encode(&data));
    }

    #[test]
    fn window() {
        let mut s = String::new();
        write_base64(&mut s, b"xfooy", 1, 3, false, true).unwrap();
        assert_eq!(s, "Zm9v");
        assert!(matches!(
            write_base64(&mut s, b"abc", 2, 2, false, true),
            Err(Error::OutOfRange {
                offset: 2,
                count: 2,
                len: 3
            })
        ));
    }
}
